use pretty_assertions::assert_eq;

use sirocco::error::RuntimeError;
use sirocco::value::Value;

use super::util::{eval, eval_ok, output_of, run_main};

#[test]
fn unbound_identifiers_fail_by_name() {
    assert_eq!(eval("foo"), Err(RuntimeError::UnboundName("foo".to_string())));
}

#[test]
fn assigning_an_unbound_name_never_creates_a_binding() {
    assert_eq!(eval("b = 1"), Err(RuntimeError::UnboundName("b".to_string())));
    // ...even when an unrelated binding exists in an outer scope
    assert_eq!(
        eval("var a = 1; { b = 2; } a"),
        Err(RuntimeError::UnboundName("b".to_string()))
    );
}

#[test]
fn catch_handles_ordinary_errors() {
    let lines = output_of(
        "main() {
            try { 1 ~/ 0; } catch (e) { print('C'); }
        }",
    );
    assert_eq!(lines, vec!["C"]);
}

#[test]
fn finally_runs_whether_or_not_the_catch_ran() {
    let lines = output_of(
        "main() {
            try { 1 ~/ 0; } catch (e) { print('C'); } finally { print('F'); }
            try { print('ok'); } catch (e) { print('no'); } finally { print('F2'); }
        }",
    );
    assert_eq!(lines, vec!["C", "F", "ok", "F2"]);
}

#[test]
fn the_error_value_is_bound_to_the_catch_parameter() {
    let lines = output_of(
        "main() {
            try { missing; } catch (e) { print(e); }
        }",
    );
    assert_eq!(lines, vec!["undefined name 'missing'"]);
}

#[test]
fn catch_scope_is_fresh_and_does_not_leak() {
    assert_eq!(
        eval("try { 1 ~/ 0; } catch (e) {} e"),
        Err(RuntimeError::UnboundName("e".to_string()))
    );
}

#[test]
fn break_passes_through_try_untouched() {
    let lines = output_of(
        "main() {
            while (true) {
                try { break; } catch (e) { print('caught'); }
            }
            print('out');
        }",
    );
    assert_eq!(lines, vec!["out"]);
}

#[test]
fn finally_still_runs_for_a_pending_break() {
    let lines = output_of(
        "main() {
            while (true) {
                try { break; } finally { print('F'); }
            }
            print('done');
        }",
    );
    assert_eq!(lines, vec!["F", "done"]);
}

#[test]
fn return_passes_through_catch_but_triggers_finally() {
    let lines = output_of(
        "f() {
            try { return 1; } catch (e) { return 2; } finally { print('F'); }
        }
        main() { print(f()); }",
    );
    assert_eq!(lines, vec!["F", "1"]);
}

#[test]
fn a_raising_finally_supersedes_the_original_outcome() {
    assert_eq!(eval_ok("f() { try { return 1; } finally { return 2; } } f()"), Value::Int(2));
    // The original error is replaced by the one raised in finally
    assert_eq!(
        eval("f() { try { 1 ~/ 0; } finally { missing; } return 0; } f()"),
        Err(RuntimeError::UnboundName("missing".to_string()))
    );
}

#[test]
fn typed_catch_clauses_are_unsupported() {
    let result = eval("try { 1; } on FormatException catch (e) {} 0");
    assert!(matches!(result, Err(RuntimeError::Unsupported(_))), "{:?}", result);
}

#[test]
fn errors_in_the_catch_body_propagate() {
    assert_eq!(
        eval("try { missing; } catch (e) { 1 ~/ 0; } 0"),
        Err(RuntimeError::DivisionByZero)
    );
}

#[test]
fn nested_try_blocks_catch_independently() {
    let lines = output_of(
        "main() {
            try {
                try { 1 ~/ 0; } catch (e) { print('inner'); }
                missing;
            } catch (e) {
                print('outer');
            }
        }",
    );
    assert_eq!(lines, vec!["inner", "outer"]);
}

#[test]
fn uncaught_errors_are_the_result_of_the_run() {
    let (result, lines) = run_main("main() { print('x'); 1 ~/ 0; print('y'); }");
    assert_eq!(result, Err(RuntimeError::DivisionByZero));
    // Statements after the failure never ran
    assert_eq!(lines, vec!["x"]);
}

#[test]
fn arity_and_type_errors_are_catchable() {
    let lines = output_of(
        "f(a) => a;
        main() {
            try { f(1, 2); } catch (e) { print('arity'); }
            try { 1 + 'x'; } catch (e) { print('types'); }
        }",
    );
    assert_eq!(lines, vec!["arity", "types"]);
}
