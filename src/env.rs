// ═══════════════════════════════════════════════════════════
// Lexical environments — parent-chained scope frames
// ═══════════════════════════════════════════════════════════

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A scope frame mapping names to values, linked to its enclosing scope.
/// Cheap to clone: all clones share the same frame. A child holds a handle
/// to its parent, so closures keep scopes alive past their creating frame.
#[derive(Clone, Debug)]
pub struct Env(Rc<RefCell<EnvInner>>);

#[derive(Debug)]
struct EnvInner {
    bindings: HashMap<String, Value>,
    parent: Option<Env>,
}

impl Env {
    pub fn new() -> Self {
        Env(Rc::new(RefCell::new(EnvInner {
            bindings: HashMap::new(),
            parent: None,
        })))
    }

    pub fn child(parent: &Env) -> Self {
        Env(Rc::new(RefCell::new(EnvInner {
            bindings: HashMap::new(),
            parent: Some(parent.clone()),
        })))
    }

    /// Declare a binding in this scope, shadowing any outer binding of the
    /// same name for the rest of this scope's lifetime.
    pub fn define(&self, name: &str, value: Value) {
        self.0.borrow_mut().bindings.insert(name.to_string(), value);
    }

    /// Overwrite the nearest existing binding along the parent chain.
    /// Never creates a binding; returns false if the name is bound nowhere.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut inner = self.0.borrow_mut();
        if let Some(slot) = inner.bindings.get_mut(name) {
            *slot = value;
            return true;
        }
        let parent = inner.parent.clone();
        drop(inner);
        match parent {
            Some(p) => p.assign(name, value),
            None => false,
        }
    }

    /// Look a name up through this scope and its ancestors.
    pub fn get(&self, name: &str) -> Option<Value> {
        let inner = self.0.borrow();
        if let Some(value) = inner.bindings.get(name) {
            return Some(value.clone());
        }
        inner.parent.as_ref().and_then(|p| p.get(name))
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
