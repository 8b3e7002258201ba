//! Integration tests for the superselector relation.

use lapis_selector::{
    ComplexSelector, SelectorList, Superselector, parse_complex, parse_compound,
    parse_selector_list,
};

fn complex(selector: &str) -> ComplexSelector {
    parse_complex(selector).unwrap()
}

fn list(selector: &str) -> SelectorList {
    parse_selector_list(selector).unwrap()
}

fn compound_covers(lhs: &str, rhs: &str) -> bool {
    parse_compound(lhs)
        .unwrap()
        .is_superselector_of(&parse_compound(rhs).unwrap())
}

fn complex_covers(lhs: &str, rhs: &str) -> bool {
    complex(lhs).is_superselector_of(&complex(rhs))
}

#[test]
fn test_compound_subset() {
    assert!(compound_covers(".a", ".a.b"));
    assert!(compound_covers(".a", ".a"));
    assert!(!compound_covers(".a.b", ".a"));
    assert!(compound_covers("div", "div.a"));
    assert!(!compound_covers("div", "span.a"));
}

#[test]
fn test_universal_covers_unqualified() {
    assert!(compound_covers("*", ".a"));
    assert!(compound_covers("*|*", "svg|rect"));
    assert!(compound_covers("svg|*", "svg|rect"));
    assert!(!compound_covers("svg|*", ".a"));
}

#[test]
fn test_pseudo_elements_must_match() {
    assert!(compound_covers(".a::before", ".a.b::before"));
    assert!(!compound_covers(".a", ".a::before"));
    assert!(!compound_covers(".a::before", ".a::after"));
}

#[test]
fn test_not_pseudo() {
    assert!(compound_covers(":not(.a)", ":not(.a)"));
    assert!(compound_covers(":not(.a)", ":not(.a, .b)"));
    assert!(!compound_covers(":not(.a, .b)", ":not(.a)"));
    assert!(compound_covers(":not(div)", "span"));
    assert!(compound_covers(":not(#a)", "#b.c"));
    assert!(!compound_covers(":not(.a)", ".b"));
}

#[test]
fn test_matches_pseudo() {
    assert!(compound_covers(":matches(.a, .b)", ".a.c"));
    assert!(compound_covers(":is(.a, .b)", ":is(.a)"));
    assert!(compound_covers(".a", ":matches(.a.b, .a.c)"));
    assert!(!compound_covers(".a", ":matches(.a.b, .c)"));
}

#[test]
fn test_descendant_chains() {
    assert!(complex_covers(".a .b", ".x .a .y .b"));
    assert!(complex_covers(".b", ".a .b"));
    assert!(!complex_covers(".a .b", ".b"));
    assert!(!complex_covers(".a .b", ".b .a"));
}

#[test]
fn test_descendant_covers_child() {
    assert!(complex_covers(".a .b", ".a > .b"));
    assert!(!complex_covers(".a > .b", ".a .b"));
}

#[test]
fn test_sibling_combinators() {
    assert!(complex_covers(".a ~ .b", ".a + .b"));
    assert!(complex_covers(".a ~ .b", ".a ~ .b"));
    assert!(!complex_covers(".a + .b", ".a ~ .b"));
    assert!(!complex_covers(".a > .b", ".a + .b"));
}

#[test]
fn test_reflexive() {
    for selector in [".a", ".a > .b", ".a + .b ~ .c d", "#x :not(.y)"] {
        assert!(complex_covers(selector, selector), "{selector}");
    }
}

#[test]
fn test_bare_parent_reference_matches_anything() {
    assert!(complex_covers("&", "&"));
    assert!(complex_covers("&", ".a"));
    assert!(complex_covers("&", ".a > .b"));
    assert!(!complex_covers(".a", "&"));
    assert!(!complex_covers("&", "a::before"));
}

#[test]
fn test_dangling_combinators_are_never_related() {
    assert!(!complex_covers("> .a", "> .a"));
    assert!(!complex_covers(".a", ".a >"));
}

#[test]
fn test_list_in_subject_position_needs_every_alternative() {
    assert!(!list(".x, .y").is_superselector_of(&complex(".x")));
    assert!(list(".x").is_superselector_of(&complex(".x")));
    assert!(!SelectorList::new().is_superselector_of(&complex(".x")));
}

#[test]
fn test_list_in_object_position_needs_every_alternative() {
    assert!(!complex(".x").is_superselector_of(&list(".x, .y")));
    assert!(complex(".x").is_superselector_of(&list(".x.a, .x.b")));
}

#[test]
fn test_list_against_list() {
    assert!(list(".x, .y").is_superselector_of(&list(".x")));
    assert!(list(".x, .y").is_superselector_of(&list(".y.z, .x")));
    assert!(!list(".x").is_superselector_of(&list(".x, .y")));
    let both = list(".a .b, .c");
    assert!(both.is_superselector_of(&both));
}
