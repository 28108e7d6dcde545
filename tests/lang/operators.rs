use pretty_assertions::assert_eq;

use sirocco::error::RuntimeError;
use sirocco::value::Value;

use super::util::{eval, eval_ok};

#[test]
fn truncating_division_rounds_toward_zero() {
    let cases = [(7, 2, 3), (-7, 2, -3), (7, -2, -3), (-7, -2, 3), (9, 4, 2), (1, 3, 0)];
    for (a, b, expected) in cases {
        assert_eq!(eval_ok(&format!("{} ~/ {}", a, b)), Value::Int(expected), "{} ~/ {}", a, b);
    }
}

#[test]
fn remainder_satisfies_the_division_identity() {
    for a in [-9, -7, -1, 0, 1, 7, 9, 42] {
        for b in [-4, -3, -1, 1, 3, 4] {
            let q = eval_ok(&format!("{} ~/ {}", a, b));
            let r = eval_ok(&format!("{} % {}", a, b));
            let (Value::Int(q), Value::Int(r)) = (q, r) else { panic!("expected Ints") };
            assert_eq!(q * b + r, a, "{} ~/ {} and {} % {}", a, b, a, b);
        }
    }
}

#[test]
fn mixed_arithmetic_promotes_to_double() {
    assert_eq!(eval_ok("1 + 2.0"), Value::Double(3.0));
    assert_eq!(eval_ok("2.5 * 2"), Value::Double(5.0));
    assert_eq!(eval_ok("3 - 0.5"), Value::Double(2.5));
    assert_eq!(eval_ok("1 / 2.0"), Value::Double(0.5));
    assert_eq!(eval_ok("1 + 2"), Value::Int(3));
}

#[test]
fn truncating_division_always_yields_int() {
    assert_eq!(eval_ok("7 ~/ 2"), Value::Int(3));
    assert_eq!(eval_ok("7.5 ~/ 2"), Value::Int(3));
    assert_eq!(eval_ok("7 ~/ 2.0"), Value::Int(3));
    assert_eq!(eval_ok("-7.5 ~/ 2"), Value::Int(-3));
}

#[test]
fn integer_division_by_zero_is_an_error() {
    assert_eq!(eval("1 ~/ 0"), Err(RuntimeError::DivisionByZero));
    assert_eq!(eval("1 / 0"), Err(RuntimeError::DivisionByZero));
    assert_eq!(eval("1 % 0"), Err(RuntimeError::DivisionByZero));
    assert_eq!(eval("1.0 ~/ 0.0"), Err(RuntimeError::DivisionByZero));
}

#[test]
fn double_division_by_zero_follows_ieee() {
    assert_eq!(eval_ok("1.0 / 0.0").to_string(), "inf");
}

#[test]
fn string_concatenation_requires_both_strings() {
    assert_eq!(eval_ok("'a' + 'b'"), Value::str("ab"));
    assert!(matches!(eval("'a' + 1"), Err(RuntimeError::TypeMismatch(_))));
    assert!(matches!(eval("1 + 'a'"), Err(RuntimeError::TypeMismatch(_))));
}

#[test]
fn string_repetition_takes_string_times_int() {
    assert_eq!(eval_ok("'ab' * 3"), Value::str("ababab"));
    assert_eq!(eval_ok("'ab' * 0"), Value::str(""));
    assert!(matches!(eval("3 * 'ab'"), Err(RuntimeError::TypeMismatch(_))));
}

#[test]
fn logical_operators_short_circuit() {
    // The right operand must never be evaluated when the left decides
    assert_eq!(eval_ok("false && (1 / 0 > 0)"), Value::Bool(false));
    assert_eq!(eval_ok("true || (1 ~/ 0 > 0)"), Value::Bool(true));
    assert_eq!(eval("true && (1 ~/ 0 > 0)"), Err(RuntimeError::DivisionByZero));
    assert_eq!(eval("false || (1 ~/ 0 > 0)"), Err(RuntimeError::DivisionByZero));
}

#[test]
fn logical_operators_require_bools() {
    assert!(matches!(eval("1 && true"), Err(RuntimeError::TypeMismatch(_))));
    assert!(matches!(eval("false || 0"), Err(RuntimeError::TypeMismatch(_))));
}

#[test]
fn comparisons_use_the_numeric_tower() {
    assert_eq!(eval_ok("1 < 2.5"), Value::Bool(true));
    assert_eq!(eval_ok("3.0 >= 3"), Value::Bool(true));
    assert_eq!(eval_ok("2 > 2"), Value::Bool(false));
    assert!(matches!(eval("'a' < 'b'"), Err(RuntimeError::TypeMismatch(_))));
}

#[test]
fn equality_crosses_int_and_double() {
    assert_eq!(eval_ok("1 == 1.0"), Value::Bool(true));
    assert_eq!(eval_ok("1 != 1.5"), Value::Bool(true));
    assert_eq!(eval_ok("1 == '1'"), Value::Bool(false));
    assert_eq!(eval_ok("null == null"), Value::Bool(true));
}

#[test]
fn unary_operators() {
    assert_eq!(eval_ok("-3"), Value::Int(-3));
    assert_eq!(eval_ok("-2.5"), Value::Double(-2.5));
    assert_eq!(eval_ok("!false"), Value::Bool(true));
    assert!(matches!(eval("-'a'"), Err(RuntimeError::TypeMismatch(_))));
    assert!(matches!(eval("!1"), Err(RuntimeError::TypeMismatch(_))));
}

#[test]
fn conditional_evaluates_exactly_one_branch() {
    assert_eq!(eval_ok("true ? 1 : 1 ~/ 0"), Value::Int(1));
    assert_eq!(eval_ok("false ? 1 ~/ 0 : 2"), Value::Int(2));
    assert!(matches!(eval("1 ? 2 : 3"), Err(RuntimeError::TypeMismatch(_))));
}

#[test]
fn string_interpolation_converts_in_source_order() {
    assert_eq!(eval_ok(r#"var x = 3; "x = ${x}, next = ${x + 1}""#), Value::str("x = 3, next = 4"));
    assert_eq!(eval_ok(r#""half = ${1 / 2.0}""#), Value::str("half = 0.5"));
    assert_eq!(eval_ok(r#"var name = 'sco'; "hi $name!""#), Value::str("hi sco!"));
}

#[test]
fn assignment_returns_the_stored_value() {
    assert_eq!(eval_ok("var a = 1; a = 5"), Value::Int(5));
    assert_eq!(eval_ok("var a = 7; a ~/= 2"), Value::Int(3));
    assert_eq!(eval_ok("var a = 7; a %= 4; a"), Value::Int(3));
    assert_eq!(eval_ok("var s = 'a'; s += 'b'"), Value::str("ab"));
}

#[test]
fn increment_and_decrement() {
    // postfix yields the old value, prefix the new one
    assert_eq!(eval_ok("var i = 0; i++"), Value::Int(0));
    assert_eq!(eval_ok("var i = 0; i++; i"), Value::Int(1));
    assert_eq!(eval_ok("var i = 0; ++i"), Value::Int(1));
    assert_eq!(eval_ok("var i = 5; i--"), Value::Int(5));
    assert_eq!(eval_ok("var i = 5; --i"), Value::Int(4));
    assert_eq!(eval_ok("var f = 1.5; ++f"), Value::Double(2.5));
    assert!(matches!(eval("var s = 'a'; s++"), Err(RuntimeError::TypeMismatch(_))));
}

#[test]
fn doubles_always_display_with_a_decimal_point() {
    assert_eq!(eval_ok("4.0").to_string(), "4.0");
    assert_eq!(eval_ok("2.0 + 2").to_string(), "4.0");
    assert_eq!(eval_ok("4").to_string(), "4");
}
