// ═══════════════════════════════════════════════════════════
// Sirocco — a small scripting language, interpreted
// ═══════════════════════════════════════════════════════════
//
// Pipeline: lexer → parser → AST → tree-walking interpreter.
// The interpreter consumes the AST plus a root environment whose
// host-provided bindings come from a pluggable `HostBridge`.

pub mod ast;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod stdlib;
pub mod value;

pub use error::RuntimeError;
pub use interpreter::Interpreter;
pub use value::Value;
