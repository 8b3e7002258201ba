//! Integration tests for specificity calculation.

use lapis_selector::parse_selector_list;
use lapis_selector::specificity::{
    SPECIFICITY_CLASS, SPECIFICITY_ID, SPECIFICITY_TYPE, SPECIFICITY_UNIVERSAL,
};

fn specificity(selector: &str) -> u64 {
    parse_selector_list(selector).unwrap().specificity()
}

#[test]
fn test_simple_selector_weights() {
    assert_eq!(specificity("*"), SPECIFICITY_UNIVERSAL);
    assert_eq!(specificity("div"), SPECIFICITY_TYPE);
    assert_eq!(specificity("::before"), SPECIFICITY_TYPE);
    assert_eq!(specificity(".a"), SPECIFICITY_CLASS);
    assert_eq!(specificity("[href]"), SPECIFICITY_CLASS);
    assert_eq!(specificity(":hover"), SPECIFICITY_CLASS);
    assert_eq!(specificity("#main"), SPECIFICITY_ID);
    assert_eq!(specificity("%placeholder"), SPECIFICITY_UNIVERSAL);
}

#[test]
fn test_compound_and_complex_sum() {
    assert_eq!(specificity("div.a.b"), 2 * SPECIFICITY_CLASS + SPECIFICITY_TYPE);
    assert_eq!(
        specificity("#nav > ul li.active"),
        SPECIFICITY_ID + 2 * SPECIFICITY_TYPE + SPECIFICITY_CLASS
    );
}

#[test]
fn test_list_takes_maximum() {
    assert_eq!(specificity("div, .a, #b"), SPECIFICITY_ID);
    assert_eq!(specificity("a b c, .x"), SPECIFICITY_CLASS);
}

#[test]
fn test_selector_pseudo_uses_argument() {
    assert_eq!(specificity(":not(#a, .b)"), SPECIFICITY_ID);
    assert_eq!(specificity("a:not(b)"), 2 * SPECIFICITY_TYPE);
    assert_eq!(specificity(":nth-child(2n)"), SPECIFICITY_CLASS);
}

#[test]
fn test_weights_order_like_triples() {
    // Ten classes still lose to one id.
    let classes = ".a".repeat(10);
    assert!(specificity(&classes) < specificity("#a"));
    assert!(specificity("div div div") < specificity(".a"));
}
