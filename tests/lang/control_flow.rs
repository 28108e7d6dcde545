use pretty_assertions::assert_eq;

use sirocco::error::RuntimeError;
use sirocco::value::Value;

use super::util::{eval, eval_ok, output_of};

#[test]
fn while_loop_with_break_and_postfix_increment() {
    let lines = output_of(
        "main() {
            var i = 0;
            while (i < 3) {
                if (i == 2) break;
                print(i++);
            }
        }",
    );
    assert_eq!(lines, vec!["0", "1"]);
}

#[test]
fn while_condition_must_be_a_bool() {
    assert!(matches!(
        eval("while (1) { break; }"),
        Err(RuntimeError::TypeMismatch(_))
    ));
}

#[test]
fn if_condition_must_be_a_bool() {
    assert!(matches!(eval("if (1) {} 0"), Err(RuntimeError::TypeMismatch(_))));
}

#[test]
fn if_else_chains() {
    let lines = output_of(
        "classify(n) {
            if (n < 0) { print('neg'); }
            else if (n == 0) { print('zero'); }
            else { print('pos'); }
        }
        main() { classify(-1); classify(0); classify(3); }",
    );
    assert_eq!(lines, vec!["neg", "zero", "pos"]);
}

#[test]
fn do_while_runs_the_body_at_least_once() {
    let lines = output_of(
        "main() {
            var i = 10;
            do { print(i); } while (false);
        }",
    );
    assert_eq!(lines, vec!["10"]);
}

#[test]
fn do_while_continue_rechecks_the_condition() {
    let lines = output_of(
        "main() {
            var i = 0;
            do {
                i++;
                if (i % 2 == 0) continue;
                print(i);
            } while (i < 5);
        }",
    );
    assert_eq!(lines, vec!["1", "3", "5"]);
}

#[test]
fn continue_in_while_skips_the_rest_of_the_iteration() {
    let lines = output_of(
        "main() {
            var i = 0;
            while (i < 5) {
                i++;
                if (i % 2 == 0) continue;
                print(i);
            }
        }",
    );
    assert_eq!(lines, vec!["1", "3", "5"]);
}

#[test]
fn classic_for_runs_updaters_even_after_continue() {
    // Would loop forever if continue skipped the updater
    let lines = output_of(
        "main() {
            for (var i = 0; i < 5; i++) {
                if (i % 2 == 1) continue;
                print(i);
            }
        }",
    );
    assert_eq!(lines, vec!["0", "2", "4"]);
}

#[test]
fn classic_for_break_skips_the_updaters() {
    let lines = output_of(
        "main() {
            var i = 0;
            for (; i < 10; i++) {
                if (i == 3) break;
            }
            print(i);
        }",
    );
    assert_eq!(lines, vec!["3"]);
}

#[test]
fn classic_for_with_no_condition_loops_until_break() {
    let lines = output_of(
        "main() {
            for (var i = 0; ; i++) {
                if (i == 3) break;
                print(i);
            }
        }",
    );
    assert_eq!(lines, vec!["0", "1", "2"]);
}

#[test]
fn classic_for_with_multiple_updaters() {
    let lines = output_of(
        "main() {
            for (var i = 0, j = 10; i < j; i++, j--) {}
            print('ok');
        }",
    );
    assert_eq!(lines, vec!["ok"]);
}

#[test]
fn for_in_iterates_lists_and_sets_in_order() {
    let lines = output_of(
        "main() {
            for (x in [1, 2, 3]) { print(x); }
            for (x in {'a', 'b', 'a'}) { print(x); }
        }",
    );
    assert_eq!(lines, vec!["1", "2", "3", "a", "b"]);
}

#[test]
fn for_in_binds_a_fresh_variable_each_iteration() {
    let lines = output_of(
        "main() {
            var fs = [];
            for (x in [1, 2, 3]) {
                fs.add(() => x);
            }
            for (f in fs) { print(f()); }
        }",
    );
    assert_eq!(lines, vec!["1", "2", "3"]);
}

#[test]
fn for_in_over_a_non_iterable_is_an_error() {
    assert!(matches!(
        eval("for (x in 42) {} 0"),
        Err(RuntimeError::TypeMismatch(_))
    ));
    assert!(matches!(
        eval("for (x in {'k': 1}) {} 0"),
        Err(RuntimeError::TypeMismatch(_))
    ));
}

#[test]
fn break_only_exits_the_innermost_loop() {
    let lines = output_of(
        "main() {
            for (var i = 0; i < 2; i++) {
                for (var j = 0; j < 10; j++) {
                    if (j == 1) break;
                    print(\"${i}:${j}\");
                }
            }
        }",
    );
    assert_eq!(lines, vec!["0:0", "1:0"]);
}

#[test]
fn block_declarations_do_not_leak_outward() {
    assert_eq!(
        eval("{ var x = 1; } x"),
        Err(RuntimeError::UnboundName("x".to_string()))
    );
}

#[test]
fn inner_declarations_shadow_outer_ones() {
    let lines = output_of(
        "main() {
            var x = 1;
            { var x = 2; print(x); }
            print(x);
        }",
    );
    assert_eq!(lines, vec!["2", "1"]);
}

#[test]
fn loop_variables_rebind_across_block_entries() {
    // The body's own declarations are re-created per iteration without
    // clashing with the loop-owned counter
    let lines = output_of(
        "main() {
            for (var i = 0; i < 2; i++) {
                var seen = i * 10;
                print(seen);
            }
        }",
    );
    assert_eq!(lines, vec!["0", "10"]);
}

#[test]
fn declaration_without_initializer_is_null() {
    assert_eq!(eval_ok("var a; a"), Value::Null);
}

#[test]
fn final_and_const_declare_like_var() {
    assert_eq!(eval_ok("final a = 1; const b = 2; a + b"), Value::Int(3));
}
