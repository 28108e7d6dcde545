// ═══════════════════════════════════════════════════════════
// Sirocco Interpreter — tree-walking evaluator
// ═══════════════════════════════════════════════════════════

use std::rc::Rc;

use log::{debug, trace};

use crate::ast::*;
use crate::env::Env;
use crate::error::RuntimeError;
use crate::stdlib::{HostBridge, Stdlib};
use crate::value::{Callable, UserFn, Value, ValueMap, ValueSet};

// ── Control flow signals ──────────────────────────────────────────────────────

/// What stops a statement from running to completion: a non-local exit or an
/// ordinary error. Loops handle Break/Continue, function calls handle Return,
/// `try` handles only Error; anything else propagates outward.
#[derive(Debug)]
pub enum Signal {
    Return(Value),
    Break,
    Continue,
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(e: RuntimeError) -> Self {
        Signal::Error(e)
    }
}

pub type EvalResult = Result<Value, Signal>;
type ExecResult = Result<(), Signal>;

// A resolved assignment target: the receiver of a property place is
// evaluated exactly once, even for compound assignment and ++/--.
enum Place {
    Var(String),
    Member(Value, String),
}

// ── Interpreter ───────────────────────────────────────────────────────────────

pub struct Interpreter {
    pub globals: Env,
    host: Box<dyn HostBridge>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_host(Box::new(Stdlib::new()))
    }

    pub fn with_host(host: Box<dyn HostBridge>) -> Self {
        let globals = Env::new();
        host.register(&globals);
        Interpreter { globals, host }
    }

    /// Execute a compilation unit (or any statement sequence) against the
    /// global scope. An uncaught ordinary error is the result of the run.
    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        debug!("running {} top-level statement(s)", stmts.len());
        let env = self.globals.clone();
        for stmt in stmts {
            match self.exec_stmt(stmt, &env) {
                Ok(()) => {}
                Err(Signal::Error(e)) => return Err(e),
                Err(other) => return Err(stray(other)),
            }
        }
        Ok(())
    }

    /// Evaluate a single expression against the global scope (REPL, tests).
    pub fn eval(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        let env = self.globals.clone();
        match self.eval_expr(expr, &env) {
            Ok(v) => Ok(v),
            Err(Signal::Error(e)) => Err(e),
            Err(other) => Err(stray(other)),
        }
    }

    /// Invoke a function value with already-evaluated arguments. This is the
    /// entry point embedders use after looking up their designated binding.
    pub fn call_function(&mut self, callable: &Callable, args: Vec<Value>) -> Result<Value, RuntimeError> {
        self.call_value(callable, args)
    }

    // ── Statement execution ───────────────────────────────────────────────────

    fn exec_stmt(&mut self, stmt: &Stmt, env: &Env) -> ExecResult {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval_expr(expr, env)?;
                Ok(())
            }

            Stmt::VarDecl { decls, .. } => {
                // final/const are accepted syntactically; bindings stay
                // mutable at runtime
                for (name, init) in decls {
                    let value = match init {
                        Some(expr) => self.eval_expr(expr, env)?,
                        None => Value::Null,
                    };
                    env.define(name, value);
                }
                Ok(())
            }

            Stmt::FunDecl(decl) => {
                let function = self.make_closure(
                    Some(decl.name.clone()),
                    &decl.params,
                    decl.optional_params,
                    &decl.body,
                    env,
                )?;
                debug!("declared function '{}'", decl.name);
                env.define(&decl.name, function);
                Ok(())
            }

            Stmt::Block(stmts) => {
                let child = Env::child(env);
                self.exec_stmts(stmts, &child)
            }

            Stmt::If { cond, then_branch, else_branch } => {
                if self.eval_condition(cond, env, "if")? {
                    self.exec_stmt(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch, env)
                } else {
                    Ok(())
                }
            }

            Stmt::While { cond, body } => {
                while self.eval_condition(cond, env, "while")? {
                    match self.exec_stmt(body, env) {
                        Ok(()) | Err(Signal::Continue) => {}
                        Err(Signal::Break) => break,
                        Err(other) => return Err(other),
                    }
                }
                Ok(())
            }

            Stmt::DoWhile { body, cond } => {
                loop {
                    match self.exec_stmt(body, env) {
                        Ok(()) | Err(Signal::Continue) => {}
                        Err(Signal::Break) => break,
                        Err(other) => return Err(other),
                    }
                    if !self.eval_condition(cond, env, "do-while")? {
                        break;
                    }
                }
                Ok(())
            }

            Stmt::For { init, cond, update, body } => {
                // One scope owns the loop's declared variables for all
                // iterations; each body run still gets its own block scope.
                let loop_env = Env::child(env);
                if let Some(init) = init {
                    self.exec_stmt(init, &loop_env)?;
                }
                loop {
                    if let Some(cond) = cond {
                        if !self.eval_condition(cond, &loop_env, "for")? {
                            break;
                        }
                    }
                    match self.exec_stmt(body, &loop_env) {
                        // The updaters still run after a continue,
                        Ok(()) | Err(Signal::Continue) => {}
                        // but not after a break.
                        Err(Signal::Break) => break,
                        Err(other) => return Err(other),
                    }
                    for expr in update {
                        self.eval_expr(expr, &loop_env)?;
                    }
                }
                Ok(())
            }

            Stmt::ForIn { var, iterable, body } => {
                let source = self.eval_expr(iterable, env)?;
                let items: Vec<Value> = match &source {
                    Value::List(v) => v.borrow().clone(),
                    Value::Set(s) => s.borrow().items().to_vec(),
                    other => {
                        return Err(Signal::Error(RuntimeError::TypeMismatch(format!(
                            "{} is not iterable",
                            other.type_name()
                        ))))
                    }
                };
                for item in items {
                    let iter_env = Env::child(env);
                    iter_env.define(var, item);
                    match self.exec_stmt(body, &iter_env) {
                        Ok(()) | Err(Signal::Continue) => {}
                        Err(Signal::Break) => break,
                        Err(other) => return Err(other),
                    }
                }
                Ok(())
            }

            Stmt::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Null,
                };
                Err(Signal::Return(value))
            }

            Stmt::Break => Err(Signal::Break),
            Stmt::Continue => Err(Signal::Continue),

            Stmt::Try { body, catch, finally } => {
                if let Some(clause) = catch {
                    if let Some(ty) = &clause.exception_type {
                        return Err(Signal::Error(RuntimeError::Unsupported(format!(
                            "typed catch clause 'on {}'",
                            ty
                        ))));
                    }
                }

                let try_env = Env::child(env);
                let outcome = self.exec_stmts(body, &try_env);

                // Only ordinary errors transfer to the catch body;
                // return/break/continue pass through untouched.
                let outcome = match (outcome, catch) {
                    (Err(Signal::Error(err)), Some(clause)) => {
                        debug!("caught: {}", err);
                        let catch_env = Env::child(env);
                        if let Some(param) = &clause.param {
                            catch_env.define(param, Value::Str(err.to_string()));
                        }
                        self.exec_stmts(&clause.body, &catch_env)
                    }
                    (outcome, _) => outcome,
                };

                // finally always runs; if it raises or signals, that
                // supersedes the pending outcome.
                if let Some(finally) = finally {
                    let finally_env = Env::child(env);
                    self.exec_stmts(finally, &finally_env)?;
                }
                outcome
            }
        }
    }

    fn exec_stmts(&mut self, stmts: &[Stmt], env: &Env) -> ExecResult {
        for stmt in stmts {
            self.exec_stmt(stmt, env)?;
        }
        Ok(())
    }

    fn eval_condition(&mut self, expr: &Expr, env: &Env, what: &str) -> Result<bool, Signal> {
        match self.eval_expr(expr, env)? {
            Value::Bool(b) => Ok(b),
            other => Err(Signal::Error(RuntimeError::TypeMismatch(format!(
                "{} condition must be a Bool, got {}",
                what,
                other.type_name()
            )))),
        }
    }

    // ── Expression evaluation ─────────────────────────────────────────────────

    pub fn eval_expr(&mut self, expr: &Expr, env: &Env) -> EvalResult {
        match expr {
            Expr::Null      => Ok(Value::Null),
            Expr::Bool(b)   => Ok(Value::Bool(*b)),
            Expr::Int(n)    => Ok(Value::Int(*n)),
            Expr::Double(f) => Ok(Value::Double(*f)),
            Expr::Str(s)    => Ok(Value::Str(s.clone())),

            Expr::StringInterp(parts) => {
                let mut result = String::new();
                for part in parts {
                    match part {
                        StringPart::Lit(s) => result.push_str(s),
                        StringPart::Expr(e) => {
                            let value = self.eval_expr(e, env)?;
                            result.push_str(&value.to_string());
                        }
                    }
                }
                Ok(Value::Str(result))
            }

            Expr::Ident(name) => self.lookup(name, env),

            Expr::Binary { lhs, op, rhs } => match op {
                // && and || short-circuit: the right operand is evaluated
                // only if it can still decide the result
                BinOp::And => {
                    if !self.eval_operand_bool(lhs, env, "&&")? {
                        return Ok(Value::Bool(false));
                    }
                    Ok(Value::Bool(self.eval_operand_bool(rhs, env, "&&")?))
                }
                BinOp::Or => {
                    if self.eval_operand_bool(lhs, env, "||")? {
                        return Ok(Value::Bool(true));
                    }
                    Ok(Value::Bool(self.eval_operand_bool(rhs, env, "||")?))
                }
                _ => {
                    let l = self.eval_expr(lhs, env)?;
                    let r = self.eval_expr(rhs, env)?;
                    binary_op(*op, l, r).map_err(Signal::Error)
                }
            },

            Expr::Unary { op, operand } => {
                let value = self.eval_expr(operand, env)?;
                match op {
                    UnaryOp::Neg => match value {
                        Value::Int(n)    => Ok(Value::Int(n.wrapping_neg())),
                        Value::Double(f) => Ok(Value::Double(-f)),
                        other => Err(Signal::Error(RuntimeError::TypeMismatch(format!(
                            "cannot negate {}",
                            other.type_name()
                        )))),
                    },
                    UnaryOp::Not => match value {
                        Value::Bool(b) => Ok(Value::Bool(!b)),
                        other => Err(Signal::Error(RuntimeError::TypeMismatch(format!(
                            "'!' requires a Bool, got {}",
                            other.type_name()
                        )))),
                    },
                }
            }

            Expr::IncDec { target, dec, prefix } => {
                let place = self.resolve_place(target, env)?;
                let old = self.load_place(&place, env)?;
                let op = if *dec { BinOp::Sub } else { BinOp::Add };
                let new = binary_op(op, old.clone(), Value::Int(1)).map_err(Signal::Error)?;
                self.store_place(&place, new.clone(), env)?;
                Ok(if *prefix { new } else { old })
            }

            Expr::Conditional { cond, then_branch, else_branch } => {
                // Exactly one branch is ever evaluated
                if self.eval_condition(cond, env, "conditional")? {
                    self.eval_expr(then_branch, env)
                } else {
                    self.eval_expr(else_branch, env)
                }
            }

            Expr::Assign { target, op, value } => {
                let place = self.resolve_place(target, env)?;
                let new = match op {
                    None => self.eval_expr(value, env)?,
                    Some(op) => {
                        let current = self.load_place(&place, env)?;
                        let rhs = self.eval_expr(value, env)?;
                        binary_op(*op, current, rhs).map_err(Signal::Error)?
                    }
                };
                self.store_place(&place, new.clone(), env)?;
                Ok(new)
            }

            Expr::Call { callee, args } => {
                let callee = self.eval_expr(callee, env)?;
                let args = self.eval_args(args, env)?;
                match callee {
                    Value::Function(callable) => {
                        self.call_value(&callable, args).map_err(Signal::Error)
                    }
                    other => Err(Signal::Error(RuntimeError::TypeMismatch(format!(
                        "{} is not callable",
                        other.type_name()
                    )))),
                }
            }

            Expr::Property { object, name } => {
                let object = self.eval_expr(object, env)?;
                self.host.get_member(&object, name).map_err(Signal::Error)
            }

            Expr::MethodCall { object, name, args } => {
                let object = self.eval_expr(object, env)?;
                let args = self.eval_args(args, env)?;
                trace!("host dispatch: {}.{}", object.type_name(), name);
                self.host.invoke_member(&object, name, args).map_err(Signal::Error)
            }

            Expr::ListLit(elements) => {
                let mut staged = Vec::new();
                self.stage_elements(elements, env, &mut staged)?;
                let mut items = Vec::with_capacity(staged.len());
                for entry in staged {
                    match entry {
                        Staged::Single(v) => items.push(v),
                        Staged::Pair(..) => {
                            return Err(Signal::Error(RuntimeError::TypeMismatch(
                                "key/value entry in a list literal".to_string(),
                            )))
                        }
                    }
                }
                Ok(Value::list(items))
            }

            Expr::SetOrMapLit(elements) => {
                let mut staged = Vec::new();
                self.stage_elements(elements, env, &mut staged)?;
                // Empty braces are a Map; otherwise the first staged entry
                // decides between Map and Set
                match staged.first() {
                    None => Ok(Value::map(ValueMap::new())),
                    Some(Staged::Pair(..)) => {
                        let mut map = ValueMap::new();
                        for entry in staged {
                            match entry {
                                Staged::Pair(k, v) => map.insert(k, v),
                                Staged::Single(_) => {
                                    return Err(Signal::Error(RuntimeError::TypeMismatch(
                                        "expected a key/value entry in a map literal".to_string(),
                                    )))
                                }
                            }
                        }
                        Ok(Value::map(map))
                    }
                    Some(Staged::Single(_)) => {
                        let mut set = ValueSet::new();
                        for entry in staged {
                            match entry {
                                Staged::Single(v) => {
                                    set.insert(v);
                                }
                                Staged::Pair(..) => {
                                    return Err(Signal::Error(RuntimeError::TypeMismatch(
                                        "key/value entry in a set literal".to_string(),
                                    )))
                                }
                            }
                        }
                        Ok(Value::set(set))
                    }
                }
            }

            Expr::FunLit { params, optional_params, body } => {
                self.make_closure(None, params, *optional_params, body, env)
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr], env: &Env) -> Result<Vec<Value>, Signal> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg, env)?);
        }
        Ok(values)
    }

    fn eval_operand_bool(&mut self, expr: &Expr, env: &Env, op: &str) -> Result<bool, Signal> {
        match self.eval_expr(expr, env)? {
            Value::Bool(b) => Ok(b),
            other => Err(Signal::Error(RuntimeError::TypeMismatch(format!(
                "'{}' requires Bool operands, got {}",
                op,
                other.type_name()
            )))),
        }
    }

    fn lookup(&mut self, name: &str, env: &Env) -> EvalResult {
        if let Some(value) = env.get(name) {
            return Ok(value);
        }
        // Bare identifiers can denote host-provided globals (e.g. the
        // numeric-parsing namespaces)
        if let Some(value) = self.host.resolve_global(name) {
            return Ok(value);
        }
        Err(Signal::Error(RuntimeError::UnboundName(name.to_string())))
    }

    // ── Assignable places ─────────────────────────────────────────────────────

    fn resolve_place(&mut self, expr: &Expr, env: &Env) -> Result<Place, Signal> {
        match expr {
            Expr::Ident(name) => Ok(Place::Var(name.clone())),
            Expr::Property { object, name } => {
                let object = self.eval_expr(object, env)?;
                Ok(Place::Member(object, name.clone()))
            }
            other => Err(Signal::Error(RuntimeError::TypeMismatch(format!(
                "{:?} is not an assignable place",
                other
            )))),
        }
    }

    fn load_place(&mut self, place: &Place, env: &Env) -> EvalResult {
        match place {
            Place::Var(name) => self.lookup(name, env),
            Place::Member(object, name) => {
                self.host.get_member(object, name).map_err(Signal::Error)
            }
        }
    }

    fn store_place(&mut self, place: &Place, value: Value, env: &Env) -> ExecResult {
        match place {
            Place::Var(name) => {
                if env.assign(name, value) {
                    Ok(())
                } else {
                    Err(Signal::Error(RuntimeError::UnboundName(name.clone())))
                }
            }
            Place::Member(object, name) => {
                self.host
                    .set_member(object, name, value)
                    .map(|_| ())
                    .map_err(Signal::Error)
            }
        }
    }

    // ── Collection literal staging ────────────────────────────────────────────

    fn stage_elements(
        &mut self,
        elements: &[Element],
        env: &Env,
        out: &mut Vec<Staged>,
    ) -> Result<(), Signal> {
        for element in elements {
            self.stage_element(element, env, out)?;
        }
        Ok(())
    }

    fn stage_element(&mut self, element: &Element, env: &Env, out: &mut Vec<Staged>) -> Result<(), Signal> {
        match element {
            Element::Expr(expr) => {
                let value = self.eval_expr(expr, env)?;
                out.push(Staged::Single(value));
            }
            Element::Pair(key, value) => {
                let key = self.eval_expr(key, env)?;
                let value = self.eval_expr(value, env)?;
                out.push(Staged::Pair(key, value));
            }
            Element::NullAware(expr) => {
                let value = self.eval_expr(expr, env)?;
                if !matches!(value, Value::Null) {
                    out.push(Staged::Single(value));
                }
            }
            Element::Spread { expr, null_aware } => {
                let source = self.eval_expr(expr, env)?;
                match source {
                    Value::Null if *null_aware => {}
                    Value::Null => {
                        return Err(Signal::Error(RuntimeError::TypeMismatch(
                            "cannot spread null; use '...?'".to_string(),
                        )))
                    }
                    Value::List(v) => {
                        for item in v.borrow().iter() {
                            out.push(Staged::Single(item.clone()));
                        }
                    }
                    Value::Set(s) => {
                        for item in s.borrow().items() {
                            out.push(Staged::Single(item.clone()));
                        }
                    }
                    Value::Map(m) => {
                        for (k, v) in m.borrow().entries() {
                            out.push(Staged::Pair(k.clone(), v.clone()));
                        }
                    }
                    other => {
                        return Err(Signal::Error(RuntimeError::TypeMismatch(format!(
                            "cannot spread {}; not an iterable or a map",
                            other.type_name()
                        ))))
                    }
                }
            }
            Element::If { cond, then_branch, else_branch } => {
                // Exactly one branch expands; the other is never evaluated
                if self.eval_condition(cond, env, "collection if")? {
                    self.stage_element(then_branch, env, out)?;
                } else if let Some(else_branch) = else_branch {
                    self.stage_element(else_branch, env, out)?;
                }
            }
        }
        Ok(())
    }

    // ── Function machinery ────────────────────────────────────────────────────

    fn make_closure(
        &mut self,
        name: Option<String>,
        params: &[String],
        optional_params: bool,
        body: &FunBody,
        env: &Env,
    ) -> EvalResult {
        if optional_params {
            return Err(Signal::Error(RuntimeError::Unsupported(
                "optional and named parameters".to_string(),
            )));
        }
        Ok(Value::Function(Callable::User(Rc::new(UserFn {
            name,
            params: params.to_vec(),
            body: body.clone(),
            env: env.clone(),
        }))))
    }

    fn call_value(&mut self, callable: &Callable, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match callable {
            Callable::Native(name) => self.host.invoke_native(name, args),
            Callable::User(fun) => {
                if args.len() != fun.params.len() {
                    return Err(RuntimeError::Arity {
                        name: fun.name.clone().unwrap_or_else(|| "<closure>".to_string()),
                        expected: fun.params.len(),
                        got: args.len(),
                    });
                }
                trace!("calling {}", fun.name.as_deref().unwrap_or("<closure>"));
                let call_env = Env::child(&fun.env);
                for (param, arg) in fun.params.iter().zip(args) {
                    call_env.define(param, arg);
                }
                match &fun.body {
                    FunBody::Expr(expr) => match self.eval_expr(expr, &call_env) {
                        Ok(value) => Ok(value),
                        Err(Signal::Error(e)) => Err(e),
                        Err(other) => Err(stray(other)),
                    },
                    FunBody::Block(stmts) => match self.exec_stmts(stmts, &call_env) {
                        Ok(()) => Ok(Value::Null),
                        Err(Signal::Return(value)) => Ok(value),
                        Err(Signal::Error(e)) => Err(e),
                        Err(other) => Err(stray(other)),
                    },
                }
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

// A control-flow signal that reached a boundary it must never cross
fn stray(signal: Signal) -> RuntimeError {
    match signal {
        Signal::Break => RuntimeError::StrayControl("break"),
        Signal::Continue => RuntimeError::StrayControl("continue"),
        Signal::Return(_) => RuntimeError::StrayControl("return"),
        Signal::Error(e) => e,
    }
}

// ── Staged collection entries ─────────────────────────────────────────────────

enum Staged {
    Single(Value),
    Pair(Value, Value),
}

// ── Binary operations ─────────────────────────────────────────────────────────

pub fn binary_op(op: BinOp, l: Value, r: Value) -> Result<Value, RuntimeError> {
    match op {
        BinOp::Add => match (&l, &r) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
            _ => numeric_op(op, &l, &r, |a, b| a.wrapping_add(b), |a, b| a + b),
        },
        BinOp::Sub => numeric_op(op, &l, &r, |a, b| a.wrapping_sub(b), |a, b| a - b),
        BinOp::Mul => match (&l, &r) {
            (Value::Str(s), Value::Int(n)) => Ok(Value::Str(s.repeat((*n).max(0) as usize))),
            _ => numeric_op(op, &l, &r, |a, b| a.wrapping_mul(b), |a, b| a * b),
        },
        BinOp::Div => match (&l, &r) {
            (Value::Int(_), Value::Int(0)) => Err(RuntimeError::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_div(*b))),
            _ => {
                let (a, b) = doubles(op, &l, &r)?;
                Ok(Value::Double(a / b))
            }
        },
        BinOp::TruncDiv => match (&l, &r) {
            (Value::Int(_), Value::Int(0)) => Err(RuntimeError::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_div(*b))),
            _ => {
                let (a, b) = doubles(op, &l, &r)?;
                let q = a / b;
                if q.is_finite() {
                    Ok(Value::Int(q.trunc() as i64))
                } else {
                    Err(RuntimeError::DivisionByZero)
                }
            }
        },
        BinOp::Mod => match (&l, &r) {
            (Value::Int(_), Value::Int(0)) => Err(RuntimeError::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_rem(*b))),
            _ => {
                let (a, b) = doubles(op, &l, &r)?;
                Ok(Value::Double(a % b))
            }
        },
        BinOp::Eq => Ok(Value::Bool(l.equals(&r))),
        BinOp::NotEq => Ok(Value::Bool(!l.equals(&r))),
        BinOp::Lt => compare_op(op, &l, &r, |o| o == std::cmp::Ordering::Less),
        BinOp::LtEq => compare_op(op, &l, &r, |o| o != std::cmp::Ordering::Greater),
        BinOp::Gt => compare_op(op, &l, &r, |o| o == std::cmp::Ordering::Greater),
        BinOp::GtEq => compare_op(op, &l, &r, |o| o != std::cmp::Ordering::Less),
        // Short-circuiting; handled before operand evaluation
        BinOp::And | BinOp::Or => Err(RuntimeError::TypeMismatch(format!(
            "'{}' requires Bool operands",
            op.symbol()
        ))),
    }
}

// Mixed Int/Double promotes to Double; two Ints stay Int
fn numeric_op(
    op: BinOp,
    l: &Value,
    r: &Value,
    int_op: impl Fn(i64, i64) -> i64,
    double_op: impl Fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(int_op(*a, *b))),
        (Value::Double(a), Value::Double(b)) => Ok(Value::Double(double_op(*a, *b))),
        (Value::Int(a), Value::Double(b)) => Ok(Value::Double(double_op(*a as f64, *b))),
        (Value::Double(a), Value::Int(b)) => Ok(Value::Double(double_op(*a, *b as f64))),
        _ => Err(type_mismatch(op, l, r)),
    }
}

fn doubles(op: BinOp, l: &Value, r: &Value) -> Result<(f64, f64), RuntimeError> {
    match (l, r) {
        (Value::Int(a), Value::Double(b)) => Ok((*a as f64, *b)),
        (Value::Double(a), Value::Int(b)) => Ok((*a, *b as f64)),
        (Value::Double(a), Value::Double(b)) => Ok((*a, *b)),
        _ => Err(type_mismatch(op, l, r)),
    }
}

fn compare_op(
    op: BinOp,
    l: &Value,
    r: &Value,
    pred: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<Value, RuntimeError> {
    let ordering = match (l, r) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Double(a), Value::Double(b)) => a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal),
        (Value::Int(a), Value::Double(b)) => {
            (*a as f64).partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
        }
        (Value::Double(a), Value::Int(b)) => {
            a.partial_cmp(&(*b as f64)).unwrap_or(std::cmp::Ordering::Equal)
        }
        _ => return Err(type_mismatch(op, l, r)),
    };
    Ok(Value::Bool(pred(ordering)))
}

fn type_mismatch(op: BinOp, l: &Value, r: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch(format!(
        "'{}' not supported between {} and {}",
        op.symbol(),
        l.type_name(),
        r.type_name()
    ))
}
