use pretty_assertions::assert_eq;

use sirocco::error::RuntimeError;
use sirocco::value::Value;

use super::util::{eval, eval_ok, output_of};

#[test]
fn list_elements_stage_left_to_right() {
    let value = eval_ok("var a = [2, 3]; [1, ...a, 4]");
    assert_eq!(value.to_string(), "[1, 2, 3, 4]");
}

#[test]
fn conditional_elements_expand_exactly_one_branch() {
    assert_eq!(eval_ok("[1, if (true) 2 else 3, 4]").to_string(), "[1, 2, 4]");
    assert_eq!(eval_ok("[1, if (false) 2 else 3, 4]").to_string(), "[1, 3, 4]");
    assert_eq!(eval_ok("[1, if (false) 2, 4]").to_string(), "[1, 4]");
    // The untaken branch is never evaluated
    assert_eq!(eval_ok("[if (false) 1 ~/ 0 else 2]").to_string(), "[2]");
}

#[test]
fn conditional_elements_nest_with_spreads() {
    let value = eval_ok("var xs = [2, 3]; [1, if (true) ...xs else 0, 4]");
    assert_eq!(value.to_string(), "[1, 2, 3, 4]");
}

#[test]
fn null_aware_elements_drop_nulls() {
    assert_eq!(eval_ok("var x = null; [1, ?x, 2]").to_string(), "[1, 2]");
    assert_eq!(eval_ok("var x = 9; [1, ?x, 2]").to_string(), "[1, 9, 2]");
}

#[test]
fn null_tolerant_spread_of_null_contributes_nothing() {
    assert_eq!(eval_ok("var x = null; [1, ...?x, 2]").to_string(), "[1, 2]");
    assert!(matches!(
        eval("var x = null; [1, ...x, 2]"),
        Err(RuntimeError::TypeMismatch(_))
    ));
}

#[test]
fn spreading_a_non_iterable_is_an_error() {
    assert!(matches!(eval("[...42]"), Err(RuntimeError::TypeMismatch(_))));
}

#[test]
fn empty_braces_are_a_map() {
    let value = eval_ok("var m = {}; m");
    assert_eq!(value.type_name(), "Map");
    assert_eq!(value.to_string(), "{}");
}

#[test]
fn first_staged_entry_classifies_braces() {
    assert_eq!(eval_ok("var x = {1: 'a'}; x").type_name(), "Map");
    assert_eq!(eval_ok("var x = {1}; x").type_name(), "Set");
    // Classification follows staging, so a leading spread decides too
    assert_eq!(eval_ok("var m = {1: 'a'}; var x = {...m}; x").type_name(), "Map");
    assert_eq!(eval_ok("var s = {1}; var x = {...s}; x").type_name(), "Set");
}

#[test]
fn mixed_entries_in_braces_are_an_error() {
    assert!(matches!(eval("var x = {1: 2, 3}; x"), Err(RuntimeError::TypeMismatch(_))));
    assert!(matches!(eval("var x = {1, 2: 3}; x"), Err(RuntimeError::TypeMismatch(_))));
}

#[test]
fn spreading_a_map_into_a_list_is_an_error() {
    assert!(matches!(
        eval("var m = {1: 2}; [...m]"),
        Err(RuntimeError::TypeMismatch(_))
    ));
}

#[test]
fn sets_deduplicate_with_first_occurrence_winning() {
    let value = eval_ok("var s = {1, 2, 1.0, 3, 2}; s");
    assert_eq!(value.to_string(), "{1, 2, 3}");
    assert_eq!(eval_ok("var s = {...[1, 1, 2]}; s.length"), Value::Int(2));
}

#[test]
fn maps_iterate_in_insertion_order() {
    assert_eq!(eval_ok("var m = {'b': 1, 'a': 2}; m.keys.join(',')"), Value::str("b,a"));
    assert_eq!(eval_ok("var m = {'b': 1, 'a': 2}; m.values.join(',')"), Value::str("1,2"));
}

#[test]
fn duplicate_map_keys_keep_the_first_position_with_the_last_value() {
    let value = eval_ok("var m = {1: 'x', 2: 'y', 1: 'z'}; m");
    assert_eq!(value.to_string(), "{1: z, 2: y}");
}

#[test]
fn map_spreads_merge_entries() {
    let value = eval_ok("var m = {'a': 1}; var n = {...m, 'b': 2}; n");
    assert_eq!(value.to_string(), "{a: 1, b: 2}");
}

#[test]
fn set_spreads_flatten_lists_and_sets() {
    assert_eq!(eval_ok("[...{1, 2}]").to_string(), "[1, 2]");
    assert_eq!(eval_ok("var s = {0, ...[1, 2]}; s").to_string(), "{0, 1, 2}");
}

#[test]
fn staged_entries_round_trip_through_iteration() {
    // Construction order is exactly the staged order, minus set dedup
    let lines = output_of(
        "main() {
            var tail = [4, 5];
            var xs = [1, if (true) 2, ...tail, ?null, 6];
            for (x in xs) { print(x); }
        }",
    );
    assert_eq!(lines, vec!["1", "2", "4", "5", "6"]);
}

#[test]
fn collection_ifs_require_bool_conditions() {
    assert!(matches!(eval("[if (1) 2]"), Err(RuntimeError::TypeMismatch(_))));
}
