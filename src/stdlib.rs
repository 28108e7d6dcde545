// ═══════════════════════════════════════════════════════════
// Sirocco host layer — native functions and built-in members
// ═══════════════════════════════════════════════════════════

use std::cell::RefCell;
use std::rc::Rc;

use crate::env::Env;
use crate::error::RuntimeError;
use crate::value::{Callable, HostObject, Value};

/// The host-object boundary. Member access and invocation on values the
/// evaluator does not resolve through its own function/variable model is
/// delegated here, as is resolution of bare identifiers naming host globals.
/// The evaluator only requires the bridge to be total over the host objects
/// a program can actually reach.
pub trait HostBridge {
    /// Pre-populate the root environment with host-provided bindings.
    fn register(&self, env: &Env);

    /// Resolve a bare identifier that names a host global, if any.
    fn resolve_global(&self, name: &str) -> Option<Value>;

    fn get_member(&mut self, recv: &Value, name: &str) -> Result<Value, RuntimeError>;

    /// Store into a member and return the stored value.
    fn set_member(&mut self, recv: &Value, name: &str, value: Value) -> Result<Value, RuntimeError>;

    fn invoke_member(&mut self, recv: &Value, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError>;

    /// Call a native function value by its registered name.
    fn invoke_native(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError>;
}

// ── Default host layer ────────────────────────────────────────────────────────

/// Built-in members for core values, `print`, the numeric-parsing
/// namespaces, and a StringBuffer host type. Output goes to stdout or,
/// for embedders and tests, into a captured line buffer.
pub struct Stdlib {
    out: OutputSink,
    int_ns: Value,
    double_ns: Value,
}

enum OutputSink {
    Stdout,
    Capture(Rc<RefCell<Vec<String>>>),
}

impl Stdlib {
    pub fn new() -> Self {
        Stdlib {
            out: OutputSink::Stdout,
            int_ns: Value::Host(HostObject::new("int")),
            double_ns: Value::Host(HostObject::new("double")),
        }
    }

    /// A Stdlib whose `print` collects lines instead of writing to stdout.
    pub fn with_capture() -> (Self, Rc<RefCell<Vec<String>>>) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let stdlib = Stdlib {
            out: OutputSink::Capture(lines.clone()),
            int_ns: Value::Host(HostObject::new("int")),
            double_ns: Value::Host(HostObject::new("double")),
        };
        (stdlib, lines)
    }

    fn write_line(&mut self, line: String) {
        match &self.out {
            OutputSink::Stdout => println!("{}", line),
            OutputSink::Capture(lines) => lines.borrow_mut().push(line),
        }
    }
}

impl Default for Stdlib {
    fn default() -> Self {
        Stdlib::new()
    }
}

impl HostBridge for Stdlib {
    fn register(&self, env: &Env) {
        for name in ["print", "StringBuffer"] {
            env.define(name, Value::Function(Callable::Native(name.to_string())));
        }
    }

    fn resolve_global(&self, name: &str) -> Option<Value> {
        match name {
            "int"    => Some(self.int_ns.clone()),
            "double" => Some(self.double_ns.clone()),
            _ => None,
        }
    }

    fn invoke_native(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match name {
            "print" => {
                let parts: Vec<String> = args.iter().map(|v| v.to_string()).collect();
                self.write_line(parts.join(" "));
                Ok(Value::Null)
            }

            "StringBuffer" => {
                if args.len() > 1 {
                    return Err(arity("StringBuffer", 1, args.len()));
                }
                let buffer = HostObject::new("StringBuffer");
                let initial = args
                    .into_iter()
                    .next()
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                buffer
                    .fields
                    .borrow_mut()
                    .insert("contents".to_string(), Value::Str(initial));
                Ok(Value::Host(buffer))
            }

            _ => Err(RuntimeError::HostError(format!("unknown native function '{}'", name))),
        }
    }

    fn get_member(&mut self, recv: &Value, name: &str) -> Result<Value, RuntimeError> {
        match (recv, name) {
            // ── String properties ─────────────────────────────────────────
            (Value::Str(s), "length")     => Ok(Value::Int(s.chars().count() as i64)),
            (Value::Str(s), "isEmpty")    => Ok(Value::Bool(s.is_empty())),
            (Value::Str(s), "isNotEmpty") => Ok(Value::Bool(!s.is_empty())),

            // ── List properties ───────────────────────────────────────────
            (Value::List(v), "length")     => Ok(Value::Int(v.borrow().len() as i64)),
            (Value::List(v), "isEmpty")    => Ok(Value::Bool(v.borrow().is_empty())),
            (Value::List(v), "isNotEmpty") => Ok(Value::Bool(!v.borrow().is_empty())),
            (Value::List(v), "first") => v
                .borrow()
                .first()
                .cloned()
                .ok_or_else(|| RuntimeError::HostError("List.first on an empty list".to_string())),
            (Value::List(v), "last") => v
                .borrow()
                .last()
                .cloned()
                .ok_or_else(|| RuntimeError::HostError("List.last on an empty list".to_string())),
            (Value::List(v), "reversed") => {
                let mut items = v.borrow().clone();
                items.reverse();
                Ok(Value::list(items))
            }

            // ── Map properties ────────────────────────────────────────────
            (Value::Map(m), "length")     => Ok(Value::Int(m.borrow().len() as i64)),
            (Value::Map(m), "isEmpty")    => Ok(Value::Bool(m.borrow().is_empty())),
            (Value::Map(m), "isNotEmpty") => Ok(Value::Bool(!m.borrow().is_empty())),
            (Value::Map(m), "keys") => {
                let keys = m.borrow().entries().iter().map(|(k, _)| k.clone()).collect();
                Ok(Value::list(keys))
            }
            (Value::Map(m), "values") => {
                let values = m.borrow().entries().iter().map(|(_, v)| v.clone()).collect();
                Ok(Value::list(values))
            }

            // ── Set properties ────────────────────────────────────────────
            (Value::Set(s), "length")     => Ok(Value::Int(s.borrow().len() as i64)),
            (Value::Set(s), "isEmpty")    => Ok(Value::Bool(s.borrow().is_empty())),
            (Value::Set(s), "isNotEmpty") => Ok(Value::Bool(!s.borrow().is_empty())),

            // ── Number properties ─────────────────────────────────────────
            (Value::Int(n), "isEven")     => Ok(Value::Bool(n % 2 == 0)),
            (Value::Int(n), "isOdd")      => Ok(Value::Bool(n % 2 != 0)),
            (Value::Double(f), "isNaN")   => Ok(Value::Bool(f.is_nan())),
            (Value::Double(f), "isFinite") => Ok(Value::Bool(f.is_finite())),

            // ── Host objects ──────────────────────────────────────────────
            (Value::Host(h), "length") if &*h.type_name == "StringBuffer" => {
                let contents = h.fields.borrow().get("contents").cloned();
                match contents {
                    Some(Value::Str(s)) => Ok(Value::Int(s.chars().count() as i64)),
                    _ => Ok(Value::Int(0)),
                }
            }
            (Value::Host(h), _) => h
                .fields
                .borrow()
                .get(name)
                .cloned()
                .ok_or_else(|| no_member(recv, name)),

            _ => Err(no_member(recv, name)),
        }
    }

    fn set_member(&mut self, recv: &Value, name: &str, value: Value) -> Result<Value, RuntimeError> {
        match recv {
            Value::Host(h) => {
                h.fields.borrow_mut().insert(name.to_string(), value.clone());
                Ok(value)
            }
            _ => Err(RuntimeError::TypeMismatch(format!(
                "member '{}' of {} is not assignable",
                name,
                recv.type_name()
            ))),
        }
    }

    fn invoke_member(&mut self, recv: &Value, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match (recv, name) {
            // ── Numeric-parsing namespaces ────────────────────────────────
            (Value::Host(h), "parse") if &*h.type_name == "int" => {
                let s = one_str("int.parse", &args)?;
                s.trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| RuntimeError::HostError(format!("invalid integer literal '{}'", s)))
            }
            (Value::Host(h), "tryParse") if &*h.type_name == "int" => {
                let s = one_str("int.tryParse", &args)?;
                Ok(s.trim().parse::<i64>().map(Value::Int).unwrap_or(Value::Null))
            }
            (Value::Host(h), "parse") if &*h.type_name == "double" => {
                let s = one_str("double.parse", &args)?;
                s.trim()
                    .parse::<f64>()
                    .map(Value::Double)
                    .map_err(|_| RuntimeError::HostError(format!("invalid double literal '{}'", s)))
            }
            (Value::Host(h), "tryParse") if &*h.type_name == "double" => {
                let s = one_str("double.tryParse", &args)?;
                Ok(s.trim().parse::<f64>().map(Value::Double).unwrap_or(Value::Null))
            }

            // ── StringBuffer ──────────────────────────────────────────────
            (Value::Host(h), "write") if &*h.type_name == "StringBuffer" => {
                let piece = one("StringBuffer.write", &args)?.to_string();
                append_contents(h, &piece);
                Ok(Value::Null)
            }
            (Value::Host(h), "writeln") if &*h.type_name == "StringBuffer" => {
                if args.len() > 1 {
                    return Err(arity("StringBuffer.writeln", 1, args.len()));
                }
                let piece = args.first().map(|v| v.to_string()).unwrap_or_default();
                append_contents(h, &format!("{}\n", piece));
                Ok(Value::Null)
            }
            (Value::Host(h), "clear") if &*h.type_name == "StringBuffer" => {
                h.fields
                    .borrow_mut()
                    .insert("contents".to_string(), Value::Str(String::new()));
                Ok(Value::Null)
            }
            (Value::Host(h), "toString") if &*h.type_name == "StringBuffer" => {
                Ok(h.fields
                    .borrow()
                    .get("contents")
                    .cloned()
                    .unwrap_or_else(|| Value::Str(String::new())))
            }

            // ── String methods ────────────────────────────────────────────
            (Value::Str(s), "contains") => {
                let needle = one_str("String.contains", &args)?;
                Ok(Value::Bool(s.contains(&needle)))
            }
            (Value::Str(s), "startsWith") => {
                let prefix = one_str("String.startsWith", &args)?;
                Ok(Value::Bool(s.starts_with(&prefix)))
            }
            (Value::Str(s), "endsWith") => {
                let suffix = one_str("String.endsWith", &args)?;
                Ok(Value::Bool(s.ends_with(&suffix)))
            }
            (Value::Str(s), "indexOf") => {
                let needle = one_str("String.indexOf", &args)?;
                Ok(Value::Int(s.find(&needle).map(|i| i as i64).unwrap_or(-1)))
            }
            (Value::Str(s), "toUpperCase") => Ok(Value::Str(s.to_uppercase())),
            (Value::Str(s), "toLowerCase") => Ok(Value::Str(s.to_lowercase())),
            (Value::Str(s), "trim") => Ok(Value::Str(s.trim().to_string())),
            (Value::Str(s), "split") => {
                let sep = one_str("String.split", &args)?;
                let parts = s.split(sep.as_str()).map(Value::str).collect();
                Ok(Value::list(parts))
            }
            (Value::Str(s), "substring") => {
                if args.is_empty() || args.len() > 2 {
                    return Err(arity("String.substring", 2, args.len()));
                }
                let chars: Vec<char> = s.chars().collect();
                let start = int_arg("String.substring", &args[0])?.max(0) as usize;
                let end = match args.get(1) {
                    Some(v) => int_arg("String.substring", v)?.max(0) as usize,
                    None => chars.len(),
                };
                if start > end || end > chars.len() {
                    return Err(RuntimeError::HostError(format!(
                        "substring range {}..{} out of bounds for length {}",
                        start,
                        end,
                        chars.len()
                    )));
                }
                Ok(Value::Str(chars[start..end].iter().collect()))
            }
            (Value::Str(s), "replaceAll") => {
                if args.len() != 2 {
                    return Err(arity("String.replaceAll", 2, args.len()));
                }
                let from = str_arg("String.replaceAll", &args[0])?;
                let to = str_arg("String.replaceAll", &args[1])?;
                Ok(Value::Str(s.replace(&from, &to)))
            }
            (Value::Str(s), "compareTo") => {
                let other = one_str("String.compareTo", &args)?;
                Ok(Value::Int(match s.as_str().cmp(other.as_str()) {
                    std::cmp::Ordering::Less => -1,
                    std::cmp::Ordering::Equal => 0,
                    std::cmp::Ordering::Greater => 1,
                }))
            }

            // ── List methods ──────────────────────────────────────────────
            (Value::List(v), "add") => {
                let item = one("List.add", &args)?;
                v.borrow_mut().push(item);
                Ok(Value::Null)
            }
            (Value::List(v), "addAll") => {
                let other = one("List.addAll", &args)?;
                match other {
                    Value::List(o) => {
                        let items = o.borrow().clone();
                        v.borrow_mut().extend(items);
                        Ok(Value::Null)
                    }
                    Value::Set(o) => {
                        let items = o.borrow().items().to_vec();
                        v.borrow_mut().extend(items);
                        Ok(Value::Null)
                    }
                    other => Err(RuntimeError::TypeMismatch(format!(
                        "List.addAll expects an iterable, got {}",
                        other.type_name()
                    ))),
                }
            }
            (Value::List(v), "removeLast") => v
                .borrow_mut()
                .pop()
                .ok_or_else(|| RuntimeError::HostError("List.removeLast on an empty list".to_string())),
            (Value::List(v), "removeAt") => {
                let idx = int_arg("List.removeAt", &one("List.removeAt", &args)?)?;
                let mut items = v.borrow_mut();
                if idx < 0 || idx as usize >= items.len() {
                    return Err(RuntimeError::HostError(format!(
                        "index {} out of range for length {}",
                        idx,
                        items.len()
                    )));
                }
                Ok(items.remove(idx as usize))
            }
            (Value::List(v), "remove") => {
                let item = one("List.remove", &args)?;
                let mut items = v.borrow_mut();
                match items.iter().position(|x| x.equals(&item)) {
                    Some(idx) => {
                        items.remove(idx);
                        Ok(Value::Bool(true))
                    }
                    None => Ok(Value::Bool(false)),
                }
            }
            (Value::List(v), "contains") => {
                let item = one("List.contains", &args)?;
                Ok(Value::Bool(v.borrow().iter().any(|x| x.equals(&item))))
            }
            (Value::List(v), "indexOf") => {
                let item = one("List.indexOf", &args)?;
                Ok(Value::Int(
                    v.borrow()
                        .iter()
                        .position(|x| x.equals(&item))
                        .map(|i| i as i64)
                        .unwrap_or(-1),
                ))
            }
            (Value::List(v), "elementAt") => {
                let idx = int_arg("List.elementAt", &one("List.elementAt", &args)?)?;
                let items = v.borrow();
                if idx < 0 || idx as usize >= items.len() {
                    return Err(RuntimeError::HostError(format!(
                        "index {} out of range for length {}",
                        idx,
                        items.len()
                    )));
                }
                Ok(items[idx as usize].clone())
            }
            (Value::List(v), "join") => {
                if args.len() > 1 {
                    return Err(arity("List.join", 1, args.len()));
                }
                let sep = match args.first() {
                    Some(v) => str_arg("List.join", v)?,
                    None => String::new(),
                };
                let parts: Vec<String> = v.borrow().iter().map(|x| x.to_string()).collect();
                Ok(Value::Str(parts.join(&sep)))
            }
            (Value::List(v), "clear") => {
                v.borrow_mut().clear();
                Ok(Value::Null)
            }

            // ── Map methods ───────────────────────────────────────────────
            (Value::Map(m), "containsKey") => {
                let key = one("Map.containsKey", &args)?;
                Ok(Value::Bool(m.borrow().contains_key(&key)))
            }
            (Value::Map(m), "remove") => {
                let key = one("Map.remove", &args)?;
                Ok(m.borrow_mut().remove(&key).unwrap_or(Value::Null))
            }
            (Value::Map(m), "clear") => {
                m.borrow_mut().clear();
                Ok(Value::Null)
            }

            // ── Set methods ───────────────────────────────────────────────
            (Value::Set(s), "add") => {
                let item = one("Set.add", &args)?;
                Ok(Value::Bool(s.borrow_mut().insert(item)))
            }
            (Value::Set(s), "contains") => {
                let item = one("Set.contains", &args)?;
                Ok(Value::Bool(s.borrow().contains(&item)))
            }
            (Value::Set(s), "remove") => {
                let item = one("Set.remove", &args)?;
                Ok(Value::Bool(s.borrow_mut().remove(&item)))
            }
            (Value::Set(s), "toList") => Ok(Value::list(s.borrow().items().to_vec())),

            // ── Number methods ────────────────────────────────────────────
            (Value::Int(n), "abs")      => Ok(Value::Int(n.wrapping_abs())),
            (Value::Int(n), "toDouble") => Ok(Value::Double(*n as f64)),
            (Value::Double(f), "abs")      => Ok(Value::Double(f.abs())),
            (Value::Double(f), "floor")    => Ok(Value::Int(f.floor() as i64)),
            (Value::Double(f), "ceil")     => Ok(Value::Int(f.ceil() as i64)),
            (Value::Double(f), "round")    => Ok(Value::Int(f.round() as i64)),
            (Value::Double(f), "truncate") => Ok(Value::Int(f.trunc() as i64)),
            (Value::Double(f), "toInt")    => Ok(Value::Int(f.trunc() as i64)),
            (Value::Double(f), "toStringAsFixed") => {
                let digits = int_arg("Double.toStringAsFixed", &one("Double.toStringAsFixed", &args)?)?;
                Ok(Value::Str(format!("{:.*}", digits.clamp(0, 20) as usize, f)))
            }

            // toString is universal
            (recv, "toString") => Ok(Value::Str(recv.to_string())),

            _ => Err(no_member(recv, name)),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn no_member(recv: &Value, name: &str) -> RuntimeError {
    RuntimeError::UnboundName(format!("{}.{}", recv.type_name(), name))
}

fn arity(name: &str, expected: usize, got: usize) -> RuntimeError {
    RuntimeError::Arity { name: name.to_string(), expected, got }
}

fn one(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(arity(name, 1, args.len()));
    }
    Ok(args[0].clone())
}

fn one_str(name: &str, args: &[Value]) -> Result<String, RuntimeError> {
    str_arg(name, &one(name, args)?)
}

fn str_arg(name: &str, value: &Value) -> Result<String, RuntimeError> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(RuntimeError::TypeMismatch(format!(
            "{} expects a String, got {}",
            name,
            other.type_name()
        ))),
    }
}

fn int_arg(name: &str, value: &Value) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(RuntimeError::TypeMismatch(format!(
            "{} expects an Int, got {}",
            name,
            other.type_name()
        ))),
    }
}

fn append_contents(buffer: &HostObject, piece: &str) {
    let mut fields = buffer.fields.borrow_mut();
    let contents = match fields.get("contents") {
        Some(Value::Str(s)) => format!("{}{}", s, piece),
        _ => piece.to_string(),
    };
    fields.insert("contents".to_string(), Value::Str(contents));
}
