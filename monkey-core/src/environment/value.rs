use std::cell::RefCell;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::parser::prelude::Block;

use super::prelude::Environment;

pub const TRUE: Value = Value::Boolean { value: true };
pub const FALSE: Value = Value::Boolean { value: false };

#[derive(Clone)]
pub enum Value {
    Integer {
        value: i64,
    },
    Boolean {
        value: bool,
    },
    Null,
    /// Carrier that unwinds a `return` through enclosing blocks. Unwrapped
    /// exactly once, at the surrounding call or program boundary.
    Return {
        value: Box<Value>,
    },
    /// Carrier for runtime failures. Propagates like `Return` but is never
    /// unwrapped, so the message survives to the caller.
    Error {
        message: String,
    },
    Function {
        params: Vec<String>,
        body: Rc<Block>,
        env: Rc<RefCell<Environment>>,
    },
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer { value } => write!(f, "{value}"),
            Value::Boolean { value } => write!(f, "{value}"),
            Value::Null => write!(f, "null"),
            Value::Return { value } => write!(f, "return {value}"),
            Value::Error { message } => write!(f, "ERROR({message:?})"),
            Value::Function { params, body, .. } => {
                write!(f, "fn ({}) {}", params.join(", "), body)
            }
        }
    }
}

// Hand-written so the captured environment is skipped: a recursive binding
// makes `env` point back at the frame holding this very value.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer { value } => {
                f.debug_struct("Integer").field("value", value).finish()
            }
            Value::Boolean { value } => {
                f.debug_struct("Boolean").field("value", value).finish()
            }
            Value::Null => write!(f, "Null"),
            Value::Return { value } => {
                f.debug_struct("Return").field("value", value).finish()
            }
            Value::Error { message } => {
                f.debug_struct("Error").field("message", message).finish()
            }
            Value::Function { params, body, .. } => f
                .debug_struct("Function")
                .field("params", params)
                .field("body", body)
                .finish(),
        }
    }
}

// Same cycle hazard as Debug: function environments compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer { value: left }, Value::Integer { value: right }) => left == right,
            (Value::Boolean { value: left }, Value::Boolean { value: right }) => left == right,
            (Value::Null, Value::Null) => true,
            (Value::Return { value: left }, Value::Return { value: right }) => left == right,
            (Value::Error { message: left }, Value::Error { message: right }) => left == right,
            (
                Value::Function { params: left_params, body: left_body, env: left_env },
                Value::Function { params: right_params, body: right_body, env: right_env },
            ) => {
                left_params == right_params
                    && left_body == right_body
                    && Rc::ptr_eq(left_env, right_env)
            }
            _ => false,
        }
    }
}

impl Value {
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error { .. })
    }
}
