// ═══════════════════════════════════════════════════════════
// Sirocco runtime values
// ═══════════════════════════════════════════════════════════

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::FunBody;
use crate::env::Env;

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    List(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<ValueMap>>),
    Set(Rc<RefCell<ValueSet>>),
    Function(Callable),
    Host(HostObject),
}

#[derive(Clone)]
pub enum Callable {
    User(Rc<UserFn>),
    Native(String),
}

pub struct UserFn {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: FunBody,
    pub env: Env,
}

/// An object the evaluator does not model natively. The host layer owns its
/// member semantics; the evaluator only carries it around by identity.
#[derive(Clone, Debug)]
pub struct HostObject {
    pub type_name: Rc<str>,
    pub fields: Rc<RefCell<HashMap<String, Value>>>,
}

impl HostObject {
    pub fn new(type_name: &str) -> Self {
        HostObject {
            type_name: Rc::from(type_name),
            fields: Rc::new(RefCell::new(HashMap::new())),
        }
    }
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn map(entries: ValueMap) -> Value {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    pub fn set(items: ValueSet) -> Value {
        Value::Set(Rc::new(RefCell::new(items)))
    }

    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::Null        => "Null",
            Value::Bool(_)     => "Bool",
            Value::Int(_)      => "Int",
            Value::Double(_)   => "Double",
            Value::Str(_)      => "String",
            Value::List(_)     => "List",
            Value::Map(_)      => "Map",
            Value::Set(_)      => "Set",
            Value::Function(_) => "Function",
            Value::Host(h)     => &h.type_name,
        }
    }

    /// Language-level equality: numeric tower across Int/Double, structural
    /// for the other primitives, identity for collections and functions.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null)           => true,
            (Value::Bool(a), Value::Bool(b))     => a == b,
            (Value::Int(a), Value::Int(b))       => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Int(a), Value::Double(b))    => (*a as f64) == *b,
            (Value::Double(a), Value::Int(b))    => *a == (*b as f64),
            (Value::Str(a), Value::Str(b))       => a == b,
            (Value::List(a), Value::List(b))     => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b))       => Rc::ptr_eq(a, b),
            (Value::Set(a), Value::Set(b))       => Rc::ptr_eq(a, b),
            (Value::Host(a), Value::Host(b))     => Rc::ptr_eq(&a.fields, &b.fields),
            (Value::Function(a), Value::Function(b)) => match (a, b) {
                (Callable::User(x), Callable::User(y)) => Rc::ptr_eq(x, y),
                (Callable::Native(x), Callable::Native(y)) => x == y,
                _ => false,
            },
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

// ── Insertion-ordered containers ──────────────────────────────────────────────
//
// Vec-backed so that keys need only language-level equality, not Hash.
// Iteration order is insertion order; re-inserting an existing key keeps
// its original position.

#[derive(Debug, Default, Clone)]
pub struct ValueMap {
    entries: Vec<(Value, Value)>,
}

impl ValueMap {
    pub fn new() -> Self {
        ValueMap { entries: Vec::new() }
    }

    pub fn insert(&mut self, key: Value, value: Value) {
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| k.equals(&key)) {
            *slot = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k.equals(key)).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k.equals(key))?;
        Some(self.entries.remove(idx).1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.iter().any(|(k, _)| k.equals(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Default, Clone)]
pub struct ValueSet {
    items: Vec<Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        ValueSet { items: Vec::new() }
    }

    /// Returns false if an equal item was already present (first wins).
    pub fn insert(&mut self, item: Value) -> bool {
        if self.items.iter().any(|x| x.equals(&item)) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains(&self, item: &Value) -> bool {
        self.items.iter().any(|x| x.equals(item))
    }

    pub fn remove(&mut self, item: &Value) -> bool {
        match self.items.iter().position(|x| x.equals(item)) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null    => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n)  => write!(f, "{}", n),
            Value::Double(n) => {
                // Always print a decimal point so Doubles stay visibly Doubles.
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::List(v) => {
                write!(f, "[")?;
                for (i, x) in v.borrow().iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", x)?;
                }
                write!(f, "]")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.borrow().entries().iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Set(s) => {
                write!(f, "{{")?;
                for (i, x) in s.borrow().items().iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", x)?;
                }
                write!(f, "}}")
            }
            Value::Function(Callable::User(fun)) => {
                write!(f, "<fn {}>", fun.name.as_deref().unwrap_or("<closure>"))
            }
            Value::Function(Callable::Native(name)) => write!(f, "<native {}>", name),
            Value::Host(h) => write!(f, "<{}>", h.type_name),
        }
    }
}

// A closure's captured environment can reach the closure itself; keep Debug
// shallow to avoid walking that cycle.
impl fmt::Debug for UserFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFn")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::User(fun) => write!(f, "{:?}", fun),
            Callable::Native(name) => write!(f, "Native({})", name),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
