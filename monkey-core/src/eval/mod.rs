#[cfg(test)]
mod tests;

use std::{cell::RefCell, rc::Rc};

use crate::{
    environment::prelude::{Environment, Value, FALSE, TRUE},
    lexer::prelude::Token,
    parser::prelude::{
        Call, Conditional, Expression, Prefix, Primitive, Program, Statement,
    },
};

/// Walks the program under the given environment. A top-level `return`
/// is unwrapped here; a runtime `Error` value is handed back as-is.
pub fn eval(program: &Program, env: Rc<RefCell<Environment>>) -> Value {
    match eval_statements(&program.statements, env) {
        Value::Return { value } => *value,
        value => value,
    }
}

// Shared by the program body, blocks and function bodies: the sequence
// stops at the first Return or Error carrier, otherwise its result is the
// last statement's value (Null when there are no statements).
fn eval_statements(statements: &[Statement], env: Rc<RefCell<Environment>>) -> Value {
    let mut result = Value::Null;

    for statement in statements {
        result = eval_statement(statement, env.clone());

        if matches!(result, Value::Return { .. } | Value::Error { .. }) {
            return result;
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: Rc<RefCell<Environment>>) -> Value {
    match statement {
        Statement::Let(let_) => {
            let value = eval_expression(&let_.value, env.clone());

            if value.is_error() {
                return value;
            }

            env.borrow_mut().set(let_.name.value.clone(), value.clone());

            value
        }
        Statement::Return(return_) => {
            let value = eval_expression(&return_.value, env);

            if value.is_error() {
                return value;
            }

            Value::Return { value: Box::new(value) }
        }
        Statement::Expression(expression) => eval_expression(expression, env),
    }
}

fn eval_expression(expression: &Expression, env: Rc<RefCell<Environment>>) -> Value {
    match expression {
        Expression::Identifier(identifier) => {
            match env.borrow().get(&identifier.value) {
                Some(value) => value,
                None => Value::Error {
                    message: format!("unknown identifier: {}", identifier.value),
                },
            }
        }
        Expression::Primitive(primitive) => match primitive {
            Primitive::Int { value, .. } => Value::Integer { value: *value },
            Primitive::Bool { value, .. } => {
                if *value { TRUE } else { FALSE }
            }
        },
        Expression::Prefix(prefix) => eval_prefix(prefix, env),
        Expression::Infix(infix) => {
            let left = eval_expression(&infix.left, env.clone());
            if left.is_error() {
                return left;
            }

            let right = eval_expression(&infix.right, env);
            if right.is_error() {
                return right;
            }

            eval_infix(&infix.operator, left, right)
        }
        Expression::If(conditional) => eval_conditional(conditional, env),
        Expression::Function(function) => {
            let params = function.params.iter()
                .map(|param| param.value.clone())
                .collect::<Vec<String>>();

            Value::Function {
                params,
                body: function.body.clone(),
                env,
            }
        }
        Expression::Call(call) => eval_call(call, env),
    }
}

fn eval_prefix(prefix: &Prefix, env: Rc<RefCell<Environment>>) -> Value {
    let operand = eval_expression(&prefix.expression, env);

    if operand.is_error() {
        return operand;
    }

    match prefix.operator {
        Token::Bang => match to_bool(&operand) {
            Ok(value) => {
                if value { FALSE } else { TRUE }
            }
            Err(error) => error,
        },
        Token::Minus => match to_integer(&operand) {
            Ok(value) => Value::Integer { value: -value },
            Err(error) => error,
        },
        ref operator => Value::Error {
            message: format!("unknown operator: {}", operator.as_literal()),
        },
    }
}

fn eval_infix(operator: &Token, left: Value, right: Value) -> Value {
    match operator {
        Token::Plus
        | Token::Minus
        | Token::Asterisk
        | Token::Slash
        | Token::LessThan
        | Token::GreaterThan => {
            if matches!(left, Value::Boolean { .. }) {
                return Value::Error {
                    message: format!(
                        "first operand of {} cannot be boolean",
                        operator.as_literal()
                    ),
                };
            }

            if matches!(right, Value::Boolean { .. }) {
                return Value::Error {
                    message: format!(
                        "second operand of {} cannot be boolean",
                        operator.as_literal()
                    ),
                };
            }

            let left = match to_integer(&left) {
                Ok(value) => value,
                Err(error) => return error,
            };
            let right = match to_integer(&right) {
                Ok(value) => value,
                Err(error) => return error,
            };

            match operator {
                Token::Plus => Value::Integer { value: left + right },
                Token::Minus => Value::Integer { value: left - right },
                Token::Asterisk => Value::Integer { value: left * right },
                Token::Slash => {
                    if right == 0 {
                        return Value::Error { message: "divide by zero".to_string() };
                    }

                    Value::Integer { value: left / right }
                }
                Token::LessThan => Value::Boolean { value: left < right },
                Token::GreaterThan => Value::Boolean { value: left > right },
                _ => unreachable!(),
            }
        }
        Token::Equal | Token::NotEqual => {
            let comparable = matches!(
                (&left, &right),
                (Value::Integer { .. }, Value::Integer { .. })
                    | (Value::Boolean { .. }, Value::Boolean { .. })
            );

            if !comparable {
                return Value::Error {
                    message: format!(
                        "cannot do {} of different types",
                        operator.as_literal()
                    ),
                };
            }

            // like kinds only, so the integer coercion is total here
            let left = match to_integer(&left) {
                Ok(value) => value,
                Err(error) => return error,
            };
            let right = match to_integer(&right) {
                Ok(value) => value,
                Err(error) => return error,
            };

            match operator {
                Token::Equal => Value::Boolean { value: left == right },
                Token::NotEqual => Value::Boolean { value: left != right },
                _ => unreachable!(),
            }
        }
        operator => Value::Error {
            message: format!("unknown operator: {}", operator.as_literal()),
        },
    }
}

fn eval_conditional(conditional: &Conditional, env: Rc<RefCell<Environment>>) -> Value {
    let condition = eval_expression(&conditional.condition, env.clone());

    if condition.is_error() {
        return condition;
    }

    match to_bool(&condition) {
        Ok(true) => eval_statements(&conditional.consequence.statements, env),
        Ok(false) => match &conditional.alternative {
            Some(alternative) => eval_statements(&alternative.statements, env),
            None => Value::Null,
        },
        Err(error) => error,
    }
}

fn eval_call(call: &Call, env: Rc<RefCell<Environment>>) -> Value {
    let callee = eval_expression(&call.function, env.clone());

    if callee.is_error() {
        return callee;
    }

    let (params, body, captured) = match callee {
        Value::Function { params, body, env } => (params, body, env),
        value => {
            return Value::Error {
                message: format!("non callable object is used: {value}"),
            }
        }
    };

    // arguments see the caller's scope, the body sees the captured one
    let mut arguments = Vec::with_capacity(call.arguments.len());

    for argument in &call.arguments {
        let value = eval_expression(argument, env.clone());

        if value.is_error() {
            return value;
        }

        arguments.push(value);
    }

    if arguments.len() != params.len() {
        return Value::Error {
            message: format!(
                "wrong number of arguments for fn ({}): expected {}, got {}",
                params.join(", "),
                params.len(),
                arguments.len()
            ),
        };
    }

    let mut scope = Environment::new_enclosed(captured);

    for (param, value) in params.into_iter().zip(arguments) {
        scope.set(param, value);
    }

    match eval_statements(&body.statements, Rc::new(RefCell::new(scope))) {
        Value::Return { value } => *value,
        value => value,
    }
}

fn to_integer(value: &Value) -> Result<i64, Value> {
    match value {
        Value::Integer { value } => Ok(*value),
        Value::Boolean { value } => Ok(if *value { 1 } else { 0 }),
        Value::Null => Ok(0),
        _ => Err(Value::Error {
            message: "unhandled type for integer conversion".to_string(),
        }),
    }
}

fn to_bool(value: &Value) -> Result<bool, Value> {
    match value {
        Value::Boolean { value } => Ok(*value),
        Value::Null => Ok(false),
        Value::Integer { value } => Ok(*value != 0),
        _ => Err(Value::Error {
            message: "unhandled type for bool conversion".to_string(),
        }),
    }
}
