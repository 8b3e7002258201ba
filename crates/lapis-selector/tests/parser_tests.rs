//! Integration tests for selector parsing and rendering.

use lapis_selector::selector::{AttributeOperator, PseudoArgument};
use lapis_selector::{
    Combinator, Namespace, ParseError, SimpleSelector, parse_complex, parse_compound,
    parse_selector_list,
};

#[test]
fn test_parse_compound_components_in_order() {
    let compound = parse_compound("a.b#c[d]:hover").unwrap();
    assert_eq!(compound.len(), 5);
    assert!(matches!(
        &compound.components()[0],
        SimpleSelector::Type { namespace: Namespace::Implicit, name } if name == "a"
    ));
    assert_eq!(compound.components()[1], SimpleSelector::Class("b".to_string()));
    assert_eq!(compound.components()[2], SimpleSelector::Id("c".to_string()));
    assert!(matches!(&compound.components()[3], SimpleSelector::Attribute(attr) if attr.name == "d"));
    assert!(matches!(&compound.components()[4], SimpleSelector::PseudoClass(p) if p.name == "hover"));
}

#[test]
fn test_parse_placeholder_and_parent() {
    let compound = parse_compound("&%message").unwrap();
    assert_eq!(compound.components()[0], SimpleSelector::Parent);
    assert_eq!(
        compound.components()[1],
        SimpleSelector::Placeholder("message".to_string())
    );
    assert!(compound.has_parent_reference());
    assert!(compound.has_placeholder());
}

#[test]
fn test_parse_namespaces() {
    let list = parse_selector_list("svg|rect, *|a, |b, ns|*, *").unwrap();
    let bases: Vec<&SimpleSelector> = list
        .iter()
        .map(|complex| &complex.head().unwrap().components()[0])
        .collect();
    assert!(matches!(
        bases[0],
        SimpleSelector::Type { namespace: Namespace::Named(ns), name } if ns == "svg" && name == "rect"
    ));
    assert!(matches!(bases[1], SimpleSelector::Type { namespace: Namespace::Any, .. }));
    assert!(matches!(bases[2], SimpleSelector::Type { namespace: Namespace::Empty, .. }));
    assert!(matches!(bases[3], SimpleSelector::Universal(Namespace::Named(ns)) if ns == "ns"));
    assert_eq!(*bases[4], SimpleSelector::universal());
    assert_eq!(list.to_string(), "svg|rect, *|a, |b, ns|*, *");
}

#[test]
fn test_parse_attribute_selectors() {
    let compound = parse_compound("[type=\"text\" i][lang|=en][data-x]").unwrap();
    let SimpleSelector::Attribute(first) = &compound.components()[0] else {
        panic!("expected an attribute selector");
    };
    let matcher = first.matcher.as_ref().unwrap();
    assert_eq!(first.name, "type");
    assert_eq!(matcher.operator, AttributeOperator::Equals);
    assert_eq!(matcher.value, "\"text\"");
    assert_eq!(matcher.modifier, Some('i'));

    let SimpleSelector::Attribute(second) = &compound.components()[1] else {
        panic!("expected an attribute selector");
    };
    assert_eq!(second.namespace, Namespace::Implicit);
    assert_eq!(
        second.matcher.as_ref().unwrap().operator,
        AttributeOperator::DashMatch
    );

    let SimpleSelector::Attribute(third) = &compound.components()[2] else {
        panic!("expected an attribute selector");
    };
    assert!(third.matcher.is_none());
}

#[test]
fn test_parse_namespaced_attribute() {
    let compound = parse_compound("[xlink|href^='#']").unwrap();
    let SimpleSelector::Attribute(attr) = &compound.components()[0] else {
        panic!("expected an attribute selector");
    };
    assert_eq!(attr.namespace, Namespace::Named("xlink".to_string()));
    assert_eq!(attr.name, "href");
    assert_eq!(attr.matcher.as_ref().unwrap().operator, AttributeOperator::Prefix);
}

#[test]
fn test_parse_raw_pseudo_argument() {
    let compound = parse_compound(":nth-child( 2n+1 )").unwrap();
    let SimpleSelector::PseudoClass(pseudo) = &compound.components()[0] else {
        panic!("expected a pseudo-class");
    };
    assert_eq!(pseudo.argument, Some(PseudoArgument::Raw("2n+1".to_string())));
}

#[test]
fn test_parse_selector_pseudo_argument() {
    let compound = parse_compound(":not(.a, .b > .c)").unwrap();
    let wrapped = compound.components()[0].wrapped_selector().unwrap();
    assert_eq!(wrapped.len(), 2);
    assert_eq!(wrapped.to_string(), ".a, .b > .c");
    assert_eq!(compound.to_string(), ":not(.a, .b > .c)");
}

#[test]
fn test_legacy_pseudo_elements() {
    let compound = parse_compound("a:before").unwrap();
    assert!(compound.components()[1].is_pseudo_element());
    assert_eq!(compound.to_string(), "a::before");

    let compound = parse_compound("a::selection").unwrap();
    assert!(compound.components()[1].is_pseudo_element());

    let compound = parse_compound("a:hover").unwrap();
    assert!(!compound.components()[1].is_pseudo_element());
}

#[test]
fn test_parse_combinators() {
    let complex = parse_complex("a > b + c ~ d e").unwrap();
    let combinators: Vec<Combinator> = complex.links().map(|link| link.combinator().clone()).collect();
    assert_eq!(
        combinators,
        vec![
            Combinator::Child,
            Combinator::Adjacent,
            Combinator::GeneralSibling,
            Combinator::Descendant,
            Combinator::Descendant,
        ]
    );
    assert_eq!(complex.length(), 5);
    assert_eq!(complex.to_string(), "a > b + c ~ d e");
}

#[test]
fn test_combinators_without_whitespace() {
    let complex = parse_complex("a>b+c").unwrap();
    assert_eq!(complex.to_string(), "a > b + c");
}

#[test]
fn test_parse_reference_combinator() {
    let complex = parse_complex("label /for/ input").unwrap();
    assert_eq!(*complex.combinator(), Combinator::Reference("for".to_string()));
    assert_eq!(complex.to_string(), "label /for/ input");
}

#[test]
fn test_leading_and_trailing_combinators() {
    let leading = parse_complex("> .a").unwrap();
    assert!(leading.head().is_none());
    assert_eq!(*leading.combinator(), Combinator::Child);
    assert_eq!(leading.to_string(), "> .a");

    let trailing = parse_complex(".a +").unwrap();
    assert_eq!(*trailing.combinator(), Combinator::Adjacent);
    assert!(trailing.tail().is_none());
    assert_eq!(trailing.to_string(), ".a +");
}

#[test]
fn test_line_feed_after_comma() {
    let list = parse_selector_list(".a,\n.b, .c").unwrap();
    let feeds: Vec<bool> = list.iter().map(|complex| complex.has_line_feed()).collect();
    assert_eq!(feeds, vec![false, true, false]);
    assert_eq!(list.to_string(), ".a,\n.b, .c");
}

#[test]
fn test_empty_alternative_is_an_error() {
    assert_eq!(
        parse_selector_list(".a, , .b"),
        Err(ParseError::EmptySelector { offset: 4 })
    );
    assert_eq!(parse_selector_list(""), Err(ParseError::EmptySelector { offset: 0 }));
}

#[test]
fn test_unexpected_character() {
    assert_eq!(
        parse_selector_list(".a !b"),
        Err(ParseError::UnexpectedChar { ch: '!', offset: 3 })
    );
    assert_eq!(
        parse_compound(".a .b"),
        Err(ParseError::UnexpectedChar { ch: '.', offset: 3 })
    );
}

#[test]
fn test_unterminated_constructs() {
    assert!(matches!(
        parse_selector_list("[href"),
        Err(ParseError::UnexpectedEnd { .. } | ParseError::Unterminated { .. })
    ));
    assert_eq!(
        parse_selector_list("[a=\"x]"),
        Err(ParseError::Unterminated { what: "string", offset: 0 })
    );
    assert_eq!(
        parse_selector_list(":not(.a"),
        Err(ParseError::Unterminated {
            what: "pseudo-class argument",
            offset: 4
        })
    );
}

#[test]
fn test_complex_rejects_lists() {
    assert_eq!(
        parse_complex(".a, .b"),
        Err(ParseError::UnexpectedChar { ch: ',', offset: 2 })
    );
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    assert_eq!(parse_compound("  .a.b \n").unwrap().to_string(), ".a.b");
    assert_eq!(parse_complex("\t.a > .b  ").unwrap().to_string(), ".a > .b");
    assert_eq!(parse_selector_list(" .a ,  .b ").unwrap().to_string(), ".a, .b");
}
