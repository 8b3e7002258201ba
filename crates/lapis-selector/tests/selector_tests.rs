//! Integration tests for selector chains: link accessors and the sharing
//! rules of shallow and full clones.

use std::rc::Rc;

use lapis_selector::node::{Node, complex_to_node};
use lapis_selector::selector::SourcesSet;
use lapis_selector::{
    Combinator, ComplexSelector, SelectorList, SimpleSelector, parse_complex,
    parse_selector_list,
};

fn complex(selector: &str) -> ComplexSelector {
    parse_complex(selector).unwrap()
}

fn sources_of(selector: &str) -> SourcesSet {
    std::iter::once(complex(selector)).collect()
}

fn heads_shared(lhs: &ComplexSelector, rhs: &ComplexSelector) -> bool {
    lhs.links()
        .zip(rhs.links())
        .all(|(ours, theirs)| match (ours.head_rc(), theirs.head_rc()) {
            (Some(ours), Some(theirs)) => Rc::ptr_eq(ours, theirs),
            _ => false,
        })
}

#[test]
fn test_empty_ancestor_link() {
    let chain = ComplexSelector::new(Combinator::Descendant, None, Some(complex(".a .b")));
    assert!(chain.is_empty_ancestor());
    assert_eq!(chain.first().map(ToString::to_string), Some(".a .b".to_string()));
    assert_eq!(chain.to_string(), ".a .b");

    let leading_child = complex("> .a");
    assert!(!leading_child.is_empty_ancestor());
    assert!(!complex(".a").is_empty_ancestor());
}

#[test]
fn test_first_skips_parent_reference() {
    let chain = complex("& .a > .b");
    assert_eq!(chain.first().map(ToString::to_string), Some(".a > .b".to_string()));
    assert!(complex("&").first().is_none());
}

#[test]
fn test_innermost_is_the_subject() {
    assert_eq!(complex(".a > .b .c").innermost().unwrap().to_string(), ".c");
    assert_eq!(complex(".a >").innermost().unwrap().to_string(), ".a");
    assert_eq!(complex(".a > .b").length(), 2);
}

#[test]
fn test_shallow_clone_shares_heads() {
    let original = complex(".a > .b");
    let copy = original.clone();
    assert!(heads_shared(&original, &copy));
    assert!(!heads_shared(&original, &original.clone_fully()));
}

#[test]
fn test_sources_on_shallow_clone_do_not_leak() {
    let original = complex(".a .b");
    let mut copy = original.clone();
    copy.add_sources(&sources_of(".x"));

    assert_eq!(copy.sources().len(), 1);
    assert!(original.sources().is_empty());
    assert!(!heads_shared(&original, &copy));
}

#[test]
fn test_specializing_shallow_clone_leaves_original() {
    let original = complex(".a .b");
    let mut copy = original.clone();
    copy.head_mut()
        .unwrap()
        .push(SimpleSelector::Class("c".to_string()));

    assert_eq!(copy.to_string(), ".a.c .b");
    assert_eq!(original.to_string(), ".a .b");
    // The untouched link is still shared.
    assert!(Rc::ptr_eq(
        original.tail().unwrap().head_rc().unwrap(),
        copy.tail().unwrap().head_rc().unwrap()
    ));
}

#[test]
fn test_full_clone_keeps_sources_and_owns_heads() {
    let mut original = complex(".a .b");
    original.add_sources(&sources_of(".x"));
    let mut copy = original.clone_fully();
    assert_eq!(copy, original);
    assert_eq!(copy.sources(), original.sources());

    copy.clear_sources();
    assert!(copy.sources().is_empty());
    assert_eq!(original.sources().len(), 1);
}

#[test]
fn test_list_full_clone() {
    let original: SelectorList = parse_selector_list(".a .b, .c").unwrap();
    let copy = original.clone_fully();
    assert_eq!(copy, original);
    assert!(
        original
            .iter()
            .zip(copy.iter())
            .all(|(ours, theirs)| !heads_shared(ours, theirs))
    );
}

#[test]
fn test_node_fragments_copy_on_write() {
    let selector = complex(".a > .b");
    let mut shallow = complex_to_node(Some(&selector));
    let mut full = shallow.clone_fully();

    shallow.add_sources(&sources_of(".x"));
    full.add_sources(&sources_of(".y"));

    assert!(selector.sources().is_empty());
    assert_eq!(shallow.sources(), sources_of(".x"));
    assert_eq!(full.sources(), sources_of(".y"));
    assert!(Node::nil().clone_fully().is_nil());
}
