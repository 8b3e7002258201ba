//! Integration tests for `@extend` resolution.

use lapis_common::Severity;
use lapis_selector::{
    ExtendDirective, ExtendError, ExtendOptions, ExtendResolver, Redundancy, SelectorList,
    parse_complex, parse_selector_list, resolve_extends,
};

fn list(selector: &str) -> SelectorList {
    parse_selector_list(selector).unwrap()
}

/// `extender { @extend target; }`
fn directive(target: &str, extender: &str) -> ExtendDirective {
    ExtendDirective::new(list(target), parse_complex(extender).unwrap())
}

fn extend(selector: &str, directives: Vec<ExtendDirective>) -> String {
    let resolution = resolve_extends(&[list(selector)], directives, &ExtendOptions::default());
    resolution.lists[0].to_string()
}

#[test]
fn test_simple_extend() {
    assert_eq!(extend(".a", vec![directive(".a", ".b")]), ".a, .b");
}

#[test]
fn test_extend_inside_complex_selector() {
    assert_eq!(extend(".x .a", vec![directive(".a", ".b")]), ".x .a, .x .b");
}

#[test]
fn test_extend_keeps_rest_of_compound() {
    assert_eq!(extend("div.a:hover", vec![directive(".a", ".b")]), "div.a:hover, div:hover.b");
}

#[test]
fn test_descendant_extender_is_woven() {
    assert_eq!(
        extend(".a .b", vec![directive(".b", ".c .d")]),
        ".a .b, .a .c .d, .c .a .d"
    );
}

#[test]
fn test_child_extender() {
    assert_eq!(extend(".a", vec![directive(".a", ".p > .q")]), ".a, .p > .q");
}

#[test]
fn test_compound_target_needs_every_simple_selector() {
    assert_eq!(extend(".a.b.c", vec![directive(".a.b", ".x")]), ".a.b.c, .c.x");
    assert_eq!(extend(".a", vec![directive(".a.b", ".x")]), ".a");
}

#[test]
fn test_multiple_extenders_in_directive_order() {
    assert_eq!(
        extend(".a", vec![directive(".a", ".b"), directive(".a", ".c")]),
        ".a, .b, .c"
    );
}

#[test]
fn test_target_list_extends_each_alternative() {
    assert_eq!(extend(".a, .b", vec![directive(".a, .b", ".x")]), ".a, .x, .b");
}

#[test]
fn test_chained_extends() {
    let directives = vec![directive(".a", ".b"), directive(".b", ".c")];
    assert_eq!(extend(".a", directives.clone()), ".a, .b, .c");
    assert_eq!(extend(".b", directives), ".b, .c");
}

#[test]
fn test_mutual_extends_terminate() {
    let directives = vec![directive(".b", ".a"), directive(".a", ".b")];
    let resolution = resolve_extends(
        &[list(".a"), list(".b")],
        directives,
        &ExtendOptions::default(),
    );
    assert_eq!(resolution.lists[0].to_string(), ".a, .b");
    assert_eq!(resolution.lists[1].to_string(), ".b, .a");
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn test_self_extend_terminates() {
    assert_eq!(extend(".a", vec![directive(".a", ".a.b")]), ".a, .a.b");
}

#[test]
fn test_failed_unification_leaves_selector() {
    let resolution = resolve_extends(
        &[list("div.a")],
        vec![directive(".a", "span")],
        &ExtendOptions::default(),
    );
    assert_eq!(resolution.lists[0].to_string(), "div.a");
    // The target was found, so nothing is reported.
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn test_unmatched_target_warns_and_changes_nothing() {
    let lists = [list(".a"), list(".b .c")];
    let resolution = resolve_extends(
        &lists,
        vec![directive(".never-used", ".x")],
        &ExtendOptions::default(),
    );
    assert_eq!(resolution.lists, lists.to_vec());
    assert_eq!(
        resolution.diagnostics,
        vec![ExtendError::UnmatchedTarget {
            target: ".never-used".to_string(),
            extender: ".x".to_string(),
        }]
    );
    assert_eq!(resolution.diagnostics[0].severity(), Severity::Warning);
}

#[test]
fn test_optional_directive_is_silent() {
    let resolution = resolve_extends(
        &[list(".a")],
        vec![directive(".never-used", ".x").optional()],
        &ExtendOptions::default(),
    );
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn test_unmatched_warnings_can_be_disabled() {
    let options = ExtendOptions {
        warn_unmatched: false,
        ..ExtendOptions::default()
    };
    let resolution = resolve_extends(&[list(".a")], vec![directive(".never-used", ".x")], &options);
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn test_invalid_targets_are_reported_and_skipped() {
    let resolution = resolve_extends(
        &[list(".a .b")],
        vec![directive(".a .b", ".x"), directive(".a > .b", ".y")],
        &ExtendOptions::default(),
    );
    assert_eq!(resolution.lists[0].to_string(), ".a .b");
    assert_eq!(
        resolution.diagnostics,
        vec![
            ExtendError::InvalidTarget {
                target: ".a .b".to_string(),
                extender: ".x".to_string(),
            },
            ExtendError::InvalidTarget {
                target: ".a > .b".to_string(),
                extender: ".y".to_string(),
            },
        ]
    );
    assert!(
        resolution
            .diagnostics
            .iter()
            .all(|diagnostic| diagnostic.severity() == Severity::Error)
    );
}

#[test]
fn test_specificity_redundancy_drops_covered_selectors() {
    let directives = vec![directive("a", "a.foo")];
    assert_eq!(extend(".bar a", directives.clone()), ".bar a, .bar a.foo");

    let options = ExtendOptions {
        redundancy: Redundancy::Specificity,
        ..ExtendOptions::default()
    };
    let resolution = resolve_extends(&[list(".bar a")], directives, &options);
    assert_eq!(resolution.lists[0].to_string(), ".bar a");
}

#[test]
fn test_specificity_redundancy_keeps_more_specific_extender() {
    let options = ExtendOptions {
        redundancy: Redundancy::Specificity,
        ..ExtendOptions::default()
    };
    let resolution = resolve_extends(&[list("a")], vec![directive("a", "a.foo")], &options);
    assert_eq!(resolution.lists[0].to_string(), "a, a.foo");
}

#[test]
fn test_resolver_reports_after_every_list() {
    let mut resolver = ExtendResolver::build(
        vec![directive(".a", ".x"), directive(".b", ".y")],
        ExtendOptions::default(),
    );
    assert_eq!(resolver.target_map().len(), 2);

    assert_eq!(resolver.extend_list(&list(".a")).to_string(), ".a, .x");
    assert_eq!(resolver.extend_list(&list(".c")).to_string(), ".c");
    let diagnostics = resolver.finish();
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        &diagnostics[0],
        ExtendError::UnmatchedTarget { target, .. } if target == ".b"
    ));
}

#[test]
fn test_no_directives_is_identity() {
    let original = list(".a > .b, .c");
    let resolution = resolve_extends(&[original.clone()], Vec::new(), &ExtendOptions::default());
    assert_eq!(resolution.lists, vec![original]);
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn test_diagnostics_serialize_with_kind() {
    let error = ExtendError::UnmatchedTarget {
        target: ".never-used".to_string(),
        extender: ".x".to_string(),
    };
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(value["kind"], "unmatched-target");
    assert_eq!(value["target"], ".never-used");
    assert_eq!(
        error.to_string(),
        "\".x\" failed to @extend \".never-used\": the selector was not found"
    );
}

#[test]
fn test_options_deserialize_with_defaults() {
    let options: ExtendOptions = serde_json::from_str(r#"{ "redundancy": "specificity" }"#).unwrap();
    assert_eq!(options.redundancy, Redundancy::Specificity);
    assert!(options.warn_unmatched);
    assert_eq!("identical-only".parse::<Redundancy>().ok(), Some(Redundancy::IdenticalOnly));
}
