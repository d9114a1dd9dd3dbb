//! Integration tests for selector parsing, specificity, and `&` resolution.

use sass_core::selector::extend::resolve_parent_selectors;
use sass_core::selector::parser::parse_selector_list;

#[test]
fn test_parses_compound_selector_with_class_and_id() {
    let list = parse_selector_list(".a#b");
    assert_eq!(list.complexes.len(), 1);
    assert_eq!(list.complexes[0].components.len(), 1);
}

#[test]
fn test_parses_comma_separated_selector_list() {
    let list = parse_selector_list(".a, .b, .c");
    assert_eq!(list.complexes.len(), 3);
}

#[test]
fn test_parses_descendant_and_child_combinators() {
    let list = parse_selector_list(".a .b > .c");
    assert_eq!(list.complexes.len(), 1);
    assert_eq!(list.complexes[0].components.len(), 3);
}

#[test]
fn test_implicit_nesting_prepends_parent_as_descendant() {
    let parent = parse_selector_list(".card");
    let child = parse_selector_list(".title");
    let resolved = resolve_parent_selectors(&child, Some(&parent));
    assert_eq!(resolved.to_string(), ".card .title");
}

#[test]
fn test_explicit_parent_reference_substitutes_in_place() {
    let parent = parse_selector_list(".card");
    let child = parse_selector_list("&:hover");
    let resolved = resolve_parent_selectors(&child, Some(&parent));
    assert_eq!(resolved.to_string(), ".card:hover");
}

#[test]
fn test_no_parent_context_leaves_selector_unchanged() {
    let child = parse_selector_list(".standalone");
    let resolved = resolve_parent_selectors(&child, None);
    assert_eq!(resolved.to_string(), ".standalone");
}

#[test]
fn test_multiple_comma_separated_parents_fan_out() {
    let parent = parse_selector_list(".a, .b");
    let child = parse_selector_list(".c");
    let resolved = resolve_parent_selectors(&child, Some(&parent));
    assert_eq!(resolved.complexes.len(), 2);
    assert_eq!(resolved.to_string(), ".a .c, .b .c");
}
