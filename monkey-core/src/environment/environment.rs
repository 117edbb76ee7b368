use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::prelude::Value;

/// A lexical scope. Closures keep their defining scope alive through the
/// shared handle, so a frame may outlive the call that created it.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Environment {
    store: HashMap<String, Value>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            outer: None,
        }
    }

    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Self {
        Self {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Looks the name up through the lexical chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Binds in the current scope only; outer frames are never written.
    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }
}
