//! The superselector relation.
//!
//! `A` is a superselector of `B` when every element matched by `B` is also
//! matched by `A`. The relation is conservative: `false` means "could not
//! prove it", never "provably not".

use crate::node::{Node, complex_to_node};
use crate::selector::{
    Combinator, ComplexSelector, CompoundSelector, PseudoSelector, SelectorList, SimpleSelector,
};

/// Pseudo-classes that match when any argument alternative matches.
const MATCHES_PSEUDOS: &[&str] = &["matches", "is", "where", "any", "-moz-any", "-webkit-any"];

/// Decide whether `self` matches a superset of what `other` matches.
pub trait Superselector<Rhs: ?Sized = Self> {
    /// `true` if every element matched by `other` is matched by `self`.
    fn is_superselector_of(&self, other: &Rhs) -> bool;
}

impl Superselector for CompoundSelector {
    /// Every simple selector of `self` must be implied by `other`, and both
    /// sides must name the same pseudo-elements in the same order.
    fn is_superselector_of(&self, other: &Self) -> bool {
        if !self.pseudo_elements().eq(other.pseudo_elements()) {
            return false;
        }
        self.iter().all(|simple| simple_is_implied_by(simple, other))
    }
}

impl Superselector for ComplexSelector {
    /// A chain of bare `&` heads has no sequence form; it is compared by
    /// its innermost compound, where `&` constrains nothing.
    fn is_superselector_of(&self, other: &Self) -> bool {
        let lhs = complex_to_node(Some(self));
        let rhs = complex_to_node(Some(other));
        match (lhs.as_collection(), rhs.as_collection()) {
            (Some([]), Some(_)) | (Some(_), Some([])) => self
                .innermost()
                .zip(other.innermost())
                .is_some_and(|(ours, theirs)| ours.is_superselector_of(theirs)),
            (Some(lhs), Some(rhs)) => is_sequence_superselector(lhs, rhs),
            _ => false,
        }
    }
}

impl Superselector<CompoundSelector> for ComplexSelector {
    fn is_superselector_of(&self, other: &CompoundSelector) -> bool {
        self.is_superselector_of(&Self::from_compound(other.clone()))
    }
}

impl Superselector<ComplexSelector> for SelectorList {
    /// A list in subject position is the conjunction of the rules sharing
    /// it: every alternative has to cover `other`.
    fn is_superselector_of(&self, other: &ComplexSelector) -> bool {
        !self.is_empty()
            && self
                .iter()
                .all(|alternative| alternative.is_superselector_of(other))
    }
}

impl Superselector<SelectorList> for ComplexSelector {
    /// A list in object position is any of its alternatives: all of them
    /// have to be covered.
    fn is_superselector_of(&self, other: &SelectorList) -> bool {
        other
            .iter()
            .all(|alternative| self.is_superselector_of(alternative))
    }
}

impl Superselector for SelectorList {
    /// Union semantics: every alternative of `other` is covered by some
    /// alternative of `self`.
    fn is_superselector_of(&self, other: &Self) -> bool {
        list_covers(self, other)
    }
}

/// Every alternative of `object` is a subselector of some alternative of
/// `subject`.
fn list_covers(subject: &SelectorList, object: &SelectorList) -> bool {
    object.iter().all(|theirs| {
        subject
            .iter()
            .any(|ours| ours.is_superselector_of(theirs))
    })
}

/// Whether the condition `simple` holds for every element `compound`
/// matches.
fn simple_is_implied_by(simple: &SimpleSelector, compound: &CompoundSelector) -> bool {
    match simple {
        SimpleSelector::Parent | SimpleSelector::PseudoElement(_) => true,
        SimpleSelector::Universal(namespace) => {
            namespace.is_unconstrained()
                || compound
                    .base()
                    .and_then(SimpleSelector::namespace)
                    .is_some_and(|theirs| theirs == namespace)
        }
        SimpleSelector::PseudoClass(pseudo) if pseudo.selector().is_some() => {
            wrapped_is_implied_by(pseudo, compound)
        }
        _ => compound.contains(simple) || implied_by_matches_argument(simple, compound),
    }
}

/// `.a` holds for `:matches(.a.b, .a.c)`: every alternative of a
/// matches-like argument ends in a compound containing it.
fn implied_by_matches_argument(simple: &SimpleSelector, compound: &CompoundSelector) -> bool {
    compound.iter().any(|theirs| match theirs {
        SimpleSelector::PseudoClass(pseudo) if MATCHES_PSEUDOS.contains(&pseudo.name.as_str()) => {
            pseudo.selector().is_some_and(|list| {
                !list.is_empty()
                    && list.iter().all(|alternative| {
                        alternative
                            .innermost()
                            .is_some_and(|last| last.contains(simple))
                    })
            })
        }
        _ => false,
    })
}

/// Selector-argument pseudo-classes on the left-hand side.
fn wrapped_is_implied_by(pseudo: &PseudoSelector, compound: &CompoundSelector) -> bool {
    let Some(ours) = pseudo.selector() else {
        return false;
    };
    let same_name_covered = || {
        same_name_arguments(compound, &pseudo.name).any(|theirs| list_covers(ours, theirs))
    };

    if pseudo.name == "not" {
        // Every negated alternative has to be excluded by `compound`, either
        // through a conflicting type or id, or through a stronger `:not`.
        return ours.iter().all(|negated| {
            let negated_last = negated.innermost();
            compound.iter().any(|theirs| match theirs {
                SimpleSelector::Type { .. } | SimpleSelector::Id(_) => {
                    negated_last.is_some_and(|last| {
                        last.iter().any(|candidate| {
                            std::mem::discriminant(candidate) == std::mem::discriminant(theirs)
                                && candidate != theirs
                        })
                    })
                }
                SimpleSelector::PseudoClass(their_pseudo) if their_pseudo.name == "not" => {
                    let negated = SelectorList::from(negated.clone());
                    their_pseudo
                        .selector()
                        .is_some_and(|their_list| their_list.is_superselector_of(&negated))
                }
                _ => false,
            })
        });
    }

    if MATCHES_PSEUDOS.contains(&pseudo.name.as_str()) {
        return same_name_covered()
            || ours
                .iter()
                .any(|alternative| alternative.is_superselector_of(compound));
    }

    same_name_covered()
}

/// Arguments of the selector pseudo-classes named `name` in `compound`.
fn same_name_arguments<'a>(
    compound: &'a CompoundSelector,
    name: &'a str,
) -> impl Iterator<Item = &'a SelectorList> {
    compound.iter().filter_map(move |simple| match simple {
        SimpleSelector::PseudoClass(pseudo) if pseudo.name == name => pseudo.selector(),
        _ => None,
    })
}

/// The superselector test on sequence form.
///
/// Sequences that start or end with a combinator are neither superselectors
/// nor subselectors. The first compound of `seq1` is matched against the
/// earliest compound of `seq2` it covers; the rest is checked recursively
/// under these combinator rules:
/// - `~` on the left covers `~` or `+` on the right, other combinators must
///   be equal;
/// - a descendant on the left covers a `>` on the right;
/// - `A > B` never covers a chain longer than three nodes.
pub(crate) fn is_sequence_superselector(seq1: &[Node], seq2: &[Node]) -> bool {
    let dangling = |seq: &[Node]| {
        seq.first().is_none_or(Node::is_combinator) || seq.last().is_none_or(Node::is_combinator)
    };
    if dangling(seq1) || dangling(seq2) || seq1.len() > seq2.len() {
        return false;
    }
    let Some(first) = seq1[0].as_compound() else {
        return false;
    };
    if seq1.len() == 1 {
        return seq2
            .last()
            .and_then(Node::as_compound)
            .is_some_and(|last| first.is_superselector_of(last));
    }

    let Some(si) = seq2[..seq2.len() - 1].iter().position(|node| {
        node.as_compound()
            .is_some_and(|compound| first.is_superselector_of(compound))
    }) else {
        return false;
    };

    match (seq1[1].as_combinator(), seq2[si + 1].as_combinator()) {
        (Some(ours), Some(theirs)) => {
            let compatible = if *ours == Combinator::GeneralSibling {
                matches!(theirs, Combinator::GeneralSibling | Combinator::Adjacent)
            } else {
                ours == theirs
            };
            compatible
                && !(seq1.len() == 3 && seq2.len() > 3)
                && is_sequence_superselector(&seq1[2..], &seq2[si + 2..])
        }
        (Some(_), None) => false,
        (None, Some(theirs)) => {
            *theirs == Combinator::Child && is_sequence_superselector(&seq1[1..], &seq2[si + 2..])
        }
        (None, None) => is_sequence_superselector(&seq1[1..], &seq2[si + 1..]),
    }
}
