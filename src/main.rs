// ═══════════════════════════════════════════════════════════
// Sirocco — The Sirocco Programming Language
// ═══════════════════════════════════════════════════════════

use std::env;
use std::fs;
use std::process::ExitCode;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use sirocco::ast::Stmt;
use sirocco::interpreter::Interpreter;
use sirocco::lexer::Lexer;
use sirocco::parser::Parser;
use sirocco::value::{Callable, Value};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("repl") | None => {
            repl();
            ExitCode::SUCCESS
        }

        Some("run") => match args.get(2) {
            Some(file) => run_file(file, &args[3..]),
            None => {
                eprintln!("Usage: sirocco run <file.sco> [args...]");
                ExitCode::FAILURE
            }
        },

        Some("check") => match args.get(2) {
            Some(file) => check_file(file),
            None => {
                eprintln!("Usage: sirocco check <file.sco>");
                ExitCode::FAILURE
            }
        },

        Some(file) if file.ends_with(".sco") => run_file(file, &args[2..]),

        Some(cmd) => {
            eprintln!("Unknown command '{}'. Try: sirocco [run|check|repl] ...", cmd);
            eprintln!();
            eprintln!("  sirocco run <file.sco> [args]  Run a source file");
            eprintln!("  sirocco <file.sco> [args]      Shorthand for run");
            eprintln!("  sirocco check <file.sco>       Parse-check without running");
            eprintln!("  sirocco repl                   Start interactive REPL");
            ExitCode::FAILURE
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Running source files
// ═══════════════════════════════════════════════════════════

fn run_file(path: &str, prog_args: &[String]) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("\x1b[31m[sirocco]\x1b[0m Cannot read '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };
    match run_source(&source, path, prog_args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31m[sirocco]\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_source(source: &str, filename: &str, prog_args: &[String]) -> Result<(), String> {
    let tokens = Lexer::new(source)
        .tokenize()
        .map_err(|e| format!("Lex error in {}: {}", filename, e))?;
    let program = Parser::new(tokens)
        .parse_program()
        .map_err(|e| format!("Parse error in {}: {}", filename, e))?;
    let mut interp = Interpreter::new();
    interp
        .run(&program)
        .map_err(|e| format!("Runtime error: {}", e))?;
    invoke_entry(&mut interp, prog_args)
}

// The entry-point protocol: after the compilation unit's declarations have
// run, look up 'main' and call it. A one-parameter main receives the
// remaining command-line arguments as a List of Strings.
fn invoke_entry(interp: &mut Interpreter, prog_args: &[String]) -> Result<(), String> {
    let entry = match interp.globals.get("main") {
        Some(Value::Function(f)) => f,
        Some(other) => return Err(format!("'main' is not a function (found {})", other.type_name())),
        None => return Err("missing entry point: no 'main' function declared".to_string()),
    };

    let call_args = match &entry {
        Callable::User(f) if f.params.is_empty() => Vec::new(),
        Callable::User(f) if f.params.len() == 1 => {
            let args = prog_args.iter().map(|a| Value::str(a.as_str())).collect();
            vec![Value::list(args)]
        }
        Callable::User(f) => {
            return Err(format!(
                "'main' must take 0 or 1 parameter(s), has {}",
                f.params.len()
            ))
        }
        Callable::Native(_) => Vec::new(),
    };

    interp
        .call_function(&entry, call_args)
        .map(|_| ())
        .map_err(|e| format!("Runtime error: {}", e))
}

// ═══════════════════════════════════════════════════════════
// check subcommand
// ═══════════════════════════════════════════════════════════

fn check_file(path: &str) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("\x1b[31m[sirocco]\x1b[0m Cannot read '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };
    let tokens = match Lexer::new(&source).tokenize() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("\x1b[31m[lex error]\x1b[0m in {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };
    match Parser::new(tokens).parse_program() {
        Ok(program) => {
            println!("\x1b[32m✓\x1b[0m {} — OK ({} top-level declarations)", path, program.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("\x1b[31m[parse error]\x1b[0m in {}: {}", path, e);
            ExitCode::FAILURE
        }
    }
}

// ═══════════════════════════════════════════════════════════
// REPL
// ═══════════════════════════════════════════════════════════

fn repl() {
    println!("\x1b[36mSirocco\x1b[0m — the Sirocco programming language");
    println!("\x1b[90mType :help for help, :quit to exit\x1b[0m");
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Cannot start line editor: {}", e);
            return;
        }
    };

    let mut interp = Interpreter::new();
    let mut buffer = String::new();
    let mut depth: i32 = 0;

    loop {
        let prompt = if buffer.is_empty() { "\x1b[36msco>\x1b[0m " } else { " ... " };
        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if buffer.is_empty() {
                    match trimmed {
                        ":quit" | ":q" | ":exit" => break,
                        ":help" | ":h" => {
                            print_help();
                            continue;
                        }
                        "" => continue,
                        _ => {}
                    }
                }

                let _ = rl.add_history_entry(&line);
                for ch in trimmed.chars() {
                    match ch {
                        '{' | '(' | '[' => depth += 1,
                        '}' | ')' | ']' => depth -= 1,
                        _ => {}
                    }
                }
                buffer.push_str(&line);
                buffer.push('\n');

                if depth > 0 {
                    continue;
                }
                depth = 0;
                let source = std::mem::take(&mut buffer);
                eval_line(&mut interp, &source);
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                depth = 0;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }
}

fn eval_line(interp: &mut Interpreter, source: &str) {
    let tokens = match Lexer::new(source).tokenize() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("\x1b[31m[lex error]\x1b[0m {}", e);
            return;
        }
    };
    let stmts = match Parser::new(tokens).parse_repl() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("\x1b[31m[parse error]\x1b[0m {}", e);
            return;
        }
    };

    for stmt in &stmts {
        match stmt {
            // Echo expression results, stay quiet about everything else
            Stmt::Expr(expr) => match interp.eval(expr) {
                Ok(Value::Null) => {}
                Ok(value) => println!("\x1b[32m=> {}\x1b[0m", value),
                Err(e) => {
                    eprintln!("\x1b[31m[runtime error]\x1b[0m {}", e);
                    return;
                }
            },
            other => {
                if let Err(e) = interp.run(std::slice::from_ref(other)) {
                    eprintln!("\x1b[31m[runtime error]\x1b[0m {}", e);
                    return;
                }
            }
        }
    }
}

fn print_help() {
    println!();
    println!("  \x1b[1mSirocco Quick Reference\x1b[0m");
    println!();
    println!("  \x1b[33mVariables:\x1b[0m");
    println!("    var x = 42;         final y = \"fixed\";");
    println!();
    println!("  \x1b[33mFunctions:\x1b[0m");
    println!("    add(a, b) => a + b;");
    println!("    greet(name) {{ print(\"Hello, ${{name}}!\"); }}");
    println!();
    println!("  \x1b[33mControl flow:\x1b[0m");
    println!("    if (x > 0) {{ ... }} else {{ ... }}");
    println!("    while (c) {{ ... }}   do {{ ... }} while (c);");
    println!("    for (var i = 0; i < 10; i++) {{ ... }}");
    println!("    for (x in xs) {{ ... }}");
    println!("    try {{ ... }} catch (e) {{ ... }} finally {{ ... }}");
    println!();
    println!("  \x1b[33mCollections:\x1b[0m");
    println!("    var list = [1, 2, ...rest];");
    println!("    var map  = {{\"a\": 1, \"b\": 2}};");
    println!("    var set  = {{1, 2, 3}};");
    println!();
    println!("  \x1b[33mOperators:\x1b[0m  + - * / ~/ % == != < <= > >= && || ?: ++ --");
    println!();
    println!("  \x1b[33mREPL commands:\x1b[0m  :help  :quit");
    println!();
}
