#![allow(dead_code)]

use sirocco::ast::Stmt;
use sirocco::error::RuntimeError;
use sirocco::interpreter::Interpreter;
use sirocco::lexer::Lexer;
use sirocco::parser::Parser;
use sirocco::stdlib::Stdlib;
use sirocco::value::Value;

/// Run a compilation unit, invoke its zero-parameter main(), and return the
/// outcome plus everything the program printed.
pub fn run_main(source: &str) -> (Result<Value, RuntimeError>, Vec<String>) {
    let (stdlib, out) = Stdlib::with_capture();
    let mut interp = Interpreter::with_host(Box::new(stdlib));
    let tokens = Lexer::new(source).tokenize().expect("lex error");
    let program = Parser::new(tokens).parse_program().expect("parse error");
    let result = interp.run(&program).and_then(|()| {
        match interp.globals.get("main") {
            Some(Value::Function(f)) => interp.call_function(&f, Vec::new()),
            _ => panic!("program has no main() function"),
        }
    });
    let lines = out.borrow().clone();
    (result, lines)
}

/// Like run_main, but the program must succeed; returns the printed lines.
pub fn output_of(source: &str) -> Vec<String> {
    let (result, lines) = run_main(source);
    result.expect("program failed");
    lines
}

/// Evaluate a statement sequence as typed at the REPL and return the value
/// of the final expression.
pub fn eval(source: &str) -> Result<Value, RuntimeError> {
    let (stdlib, _out) = Stdlib::with_capture();
    let mut interp = Interpreter::with_host(Box::new(stdlib));
    let tokens = Lexer::new(source).tokenize().expect("lex error");
    let stmts = Parser::new(tokens).parse_repl().expect("parse error");
    let (last, rest) = stmts.split_last().expect("empty source");
    interp.run(rest)?;
    match last {
        Stmt::Expr(expr) => interp.eval(expr),
        other => {
            interp.run(std::slice::from_ref(other))?;
            Ok(Value::Null)
        }
    }
}

pub fn eval_ok(source: &str) -> Value {
    match eval(source) {
        Ok(value) => value,
        Err(e) => panic!("evaluation of {:?} failed: {}", source, e),
    }
}
