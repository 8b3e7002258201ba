//! The `@extend` resolver: build the target map, rewrite every selector
//! list, report what never matched.

use std::collections::BTreeSet;

#[cfg(feature = "extend-trace")]
use std::cell::Cell;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::subset_map::{ExtendTargetMap, Extension};
use crate::error::ExtendError;
use crate::node::{Node, complex_to_node, node_to_complex};
use crate::selector::{Combinator, ComplexSelector, CompoundSelector, SelectorList, SourcesSet};
use crate::superselector::is_sequence_superselector;
use crate::weave::{Sequence, paths, weave};

#[cfg(feature = "extend-trace")]
thread_local! {
    static EXTEND_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Above this many woven groups the specificity trim is skipped; it is
/// quadratic in the number of results.
const TRIM_LIMIT: usize = 100;

/// How generated alternatives that add nothing are removed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Redundancy {
    /// Only structurally identical alternatives collapse.
    #[default]
    IdenticalOnly,
    /// Also drop a generated alternative when an alternative woven from a
    /// different choice is its superselector and is at least as specific
    /// as every source of the dropped one.
    Specificity,
}

/// Options for one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendOptions {
    /// The redundancy-elimination policy.
    pub redundancy: Redundancy,
    /// Report targets that never matched.
    pub warn_unmatched: bool,
}

impl Default for ExtendOptions {
    fn default() -> Self {
        Self {
            redundancy: Redundancy::IdenticalOnly,
            warn_unmatched: true,
        }
    }
}

/// `extender { @extend target; }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendDirective {
    /// What is extended. Every alternative must be a single compound.
    pub target: SelectorList,
    /// The selector that inherits the target's rules.
    pub extender: ComplexSelector,
    /// `!optional`: no diagnostic when the target never matches.
    pub optional: bool,
}

impl ExtendDirective {
    /// A required directive.
    #[must_use]
    pub const fn new(target: SelectorList, extender: ComplexSelector) -> Self {
        Self {
            target,
            extender,
            optional: false,
        }
    }

    /// Mark the directive `!optional`.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// The rewritten lists of a [`resolve_extends`] pass, in input order, and
/// the diagnostics it produced.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// One rewritten list per input list.
    pub lists: Vec<SelectorList>,
    /// Invalid and unmatched directives.
    pub diagnostics: Vec<ExtendError>,
}

/// Resolve `directives` against every list of a stylesheet.
#[must_use]
pub fn resolve_extends(
    lists: &[SelectorList],
    directives: Vec<ExtendDirective>,
    options: &ExtendOptions,
) -> Resolution {
    let mut resolver = ExtendResolver::build(directives, options.clone());
    let lists = lists.iter().map(|list| resolver.extend_list(list)).collect();
    Resolution {
        lists,
        diagnostics: resolver.finish(),
    }
}

/// One resolution pass over a stylesheet.
///
/// [`ExtendResolver::build`] indexes the directives, each
/// [`ExtendResolver::extend_list`] call rewrites one rule's selector list,
/// and [`ExtendResolver::finish`] yields the diagnostics once every list
/// has been seen.
#[derive(Debug, Clone)]
pub struct ExtendResolver {
    map: ExtendTargetMap,
    options: ExtendOptions,
    matched: BTreeSet<usize>,
    diagnostics: Vec<ExtendError>,
}

impl ExtendResolver {
    /// Index every target compound of every directive.
    ///
    /// A target alternative that is not a single compound selector is
    /// recorded as [`ExtendError::InvalidTarget`] and skipped.
    #[must_use]
    pub fn build(directives: Vec<ExtendDirective>, options: ExtendOptions) -> Self {
        let mut map = ExtendTargetMap::new();
        let mut diagnostics = Vec::new();
        for directive in directives {
            if directive.target.is_empty() {
                diagnostics.push(ExtendError::InvalidTarget {
                    target: String::new(),
                    extender: directive.extender.to_string(),
                });
            }
            for alternative in &directive.target {
                let Some(target) = extend_target(alternative) else {
                    diagnostics.push(ExtendError::InvalidTarget {
                        target: alternative.to_string(),
                        extender: directive.extender.to_string(),
                    });
                    continue;
                };
                let _ = map.insert(Extension {
                    extender: directive.extender.clone(),
                    target,
                    optional: directive.optional,
                });
            }
        }
        Self {
            map,
            options,
            matched: BTreeSet::new(),
            diagnostics,
        }
    }

    /// The indexed extensions.
    #[must_use]
    pub const fn target_map(&self) -> &ExtendTargetMap {
        &self.map
    }

    /// Rewrite one selector list.
    ///
    /// Each alternative is followed by the selectors generated from it;
    /// duplicates keep their first occurrence.
    #[must_use]
    pub fn extend_list(&mut self, list: &SelectorList) -> SelectorList {
        if self.map.is_empty() {
            return list.clone();
        }
        let mut pass = ExtendPass {
            map: &self.map,
            redundancy: self.options.redundancy,
            matched: &mut self.matched,
        };
        let mut extended: SelectorList = list
            .iter()
            .flat_map(|alternative| pass.extend_complex(alternative))
            .collect();
        extended.dedup();
        extended
    }

    /// The invalid-target diagnostics, followed by one unmatched-target
    /// diagnostic per required target that no list contained.
    #[must_use]
    pub fn finish(self) -> Vec<ExtendError> {
        let mut diagnostics = self.diagnostics;
        if self.options.warn_unmatched {
            for (id, extension) in self.map.entries().iter().enumerate() {
                if extension.optional || self.matched.contains(&id) {
                    continue;
                }
                diagnostics.push(ExtendError::UnmatchedTarget {
                    target: extension.target.to_string(),
                    extender: extension.extender.to_string(),
                });
            }
        }
        diagnostics
    }
}

/// The compound of a single-compound target, or `None` if the target has
/// combinators, several compounds, or a parent reference.
fn extend_target(target: &ComplexSelector) -> Option<CompoundSelector> {
    if target.tail().is_some() || *target.combinator() != Combinator::Descendant {
        return None;
    }
    let compound = target.head()?;
    if compound.is_empty() || compound.has_parent_reference() {
        return None;
    }
    let mut compound = compound.clone();
    compound.clear_sources();
    Some(compound)
}

/// State of rewriting one list.
struct ExtendPass<'a> {
    map: &'a ExtendTargetMap,
    redundancy: Redundancy,
    matched: &'a mut BTreeSet<usize>,
}

impl ExtendPass<'_> {
    /// Every alternative `complex` expands to, itself first.
    fn extend_complex(&mut self, complex: &ComplexSelector) -> Vec<ComplexSelector> {
        if !complex.compounds().any(|compound| self.map.matches(compound)) {
            return vec![complex.clone()];
        }
        let Some(sequence) = complex_to_node(Some(complex)).into_collection() else {
            return vec![complex.clone()];
        };
        self.extend_sequence(&sequence, &BTreeSet::new(), Some(complex))
            .into_iter()
            .filter_map(sequence_to_complex)
            .map(|mut extended| {
                extended.set_line_feed(complex.has_line_feed());
                extended
            })
            .collect()
    }

    /// Extend every compound of `sequence`, then weave each combination of
    /// choices back into whole sequences.
    ///
    /// `original` is the selector being rewritten at the top level; it is
    /// recorded as a source of its own compounds.
    fn extend_sequence(
        &mut self,
        sequence: &[Node],
        seen: &BTreeSet<CompoundSelector>,
        original: Option<&ComplexSelector>,
    ) -> Vec<Sequence> {
        #[cfg(feature = "extend-trace")]
        let _depth = {
            let depth = EXTEND_DEPTH.with(|d| {
                let current = d.get();
                d.set(current + 1);
                current
            });
            eprintln!(
                "[EXTEND DEPTH] depth={depth} sequence={} seen={}",
                sequence_to_complex(sequence.to_vec())
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                seen.len()
            );
            // Guard struct decrements depth counter on all return paths.
            struct DepthGuard;
            impl Drop for DepthGuard {
                fn drop(&mut self) {
                    EXTEND_DEPTH.with(|d| d.set(d.get() - 1));
                }
            }
            DepthGuard
        };

        let own_source: Option<SourcesSet> = original
            .filter(|complex| !complex.has_placeholder())
            .map(|complex| std::iter::once(complex.clone()).collect());

        let mut choices: Vec<Vec<Sequence>> = Vec::with_capacity(sequence.len());
        for node in sequence {
            let Some(compound) = node.as_compound() else {
                choices.push(vec![vec![node.clone()]]);
                continue;
            };
            let mut extended = self.extend_compound(compound, seen);
            if let (Some(sources), Some(first)) = (&own_source, extended.first_mut()) {
                for part in first {
                    part.add_sources(sources);
                }
            }
            choices.push(extended);
        }

        let woven: Vec<Vec<Sequence>> = paths(&choices).iter().map(|path| weave(path)).collect();
        self.trim(woven)
    }

    /// Every sequence a single compound expands to: the compound itself,
    /// then each extender woven with what is left of the compound, each
    /// extended further.
    fn extend_compound(
        &mut self,
        compound: &CompoundSelector,
        seen: &BTreeSet<CompoundSelector>,
    ) -> Vec<Sequence> {
        let map = self.map;
        let mut groups: Vec<(&ComplexSelector, Vec<_>)> = Vec::new();
        for (id, extension) in map.get(compound) {
            let _ = self.matched.insert(id);
            match groups
                .iter_mut()
                .find(|(extender, _)| *extender == &extension.extender)
            {
                Some((_, targets)) => targets.extend(extension.target.iter().cloned()),
                None => groups.push((
                    &extension.extender,
                    extension.target.components().to_vec(),
                )),
            }
        }

        let mut generated: Vec<(CompoundSelector, Sequence)> = Vec::new();
        for (extender, targets) in groups {
            // An extender never applies to what it already produced.
            if compound.sources().contains(extender) {
                continue;
            }
            let Some(extender_nodes) = complex_to_node(Some(extender)).into_collection() else {
                continue;
            };
            let Some((innermost, prefix)) = extender_nodes.split_last() else {
                continue;
            };
            let Some(innermost) = innermost.as_compound() else {
                continue;
            };
            let Some(unified) = compound.minus(&targets).unify_with(innermost) else {
                continue;
            };
            if unified.is_empty() {
                continue;
            }

            let mut sources = compound.sources().clone();
            let _ = sources.insert(extender);
            let mut sequence = prefix.to_vec();
            sequence.push(Node::compound(unified));
            for node in &mut sequence {
                node.add_sources(&sources);
            }
            generated.push((CompoundSelector::from(targets), sequence));
        }

        let original = Node::collection(vec![Node::compound(compound.clone())]);
        let mut results = Node::collection(vec![original]);
        for (targets, sequence) in generated {
            if seen.contains(&targets) {
                continue;
            }
            let mut seen = seen.clone();
            let _ = seen.insert(targets);
            for extended in self.extend_sequence(&sequence, &seen, None) {
                let candidate = Node::collection(extended);
                if !results.contains(&candidate, false) {
                    results.plus(Node::collection(vec![candidate]));
                }
            }
        }
        results
            .into_collection()
            .unwrap_or_default()
            .into_iter()
            .filter_map(Node::into_collection)
            .collect()
    }

    /// Flatten the woven groups, dropping redundant sequences according to
    /// the redundancy policy.
    fn trim(&self, woven: Vec<Vec<Sequence>>) -> Vec<Sequence> {
        if self.redundancy == Redundancy::IdenticalOnly || woven.len() > TRIM_LIMIT {
            return woven.into_iter().flatten().collect();
        }

        // Compare against the partially trimmed groups so that two identical
        // sequences never remove each other.
        let mut result = woven.clone();
        for (index, group) in woven.iter().enumerate() {
            let kept: Vec<Sequence> = group
                .iter()
                .filter(|candidate| {
                    let floor = sequence_sources(candidate)
                        .iter()
                        .map(ComplexSelector::specificity)
                        .max()
                        .unwrap_or(0);
                    !result.iter().enumerate().any(|(other, others)| {
                        other != index
                            && others.iter().any(|cover| {
                                sequence_specificity(cover) >= floor
                                    && is_sequence_superselector(cover, candidate)
                            })
                    })
                })
                .cloned()
                .collect();
            result[index] = kept;
        }
        result.into_iter().flatten().collect()
    }
}

fn sequence_sources(sequence: &[Node]) -> SourcesSet {
    let mut sources = SourcesSet::new();
    for node in sequence {
        sources.merge(&node.sources());
    }
    sources
}

fn sequence_specificity(sequence: &[Node]) -> u64 {
    sequence
        .iter()
        .filter_map(Node::as_compound)
        .map(CompoundSelector::specificity)
        .sum()
}

/// Rebuild a selector from a woven sequence, without the `&` anchor.
fn sequence_to_complex(sequence: Sequence) -> Option<ComplexSelector> {
    node_to_complex(&Node::collection(sequence)).map(ComplexSelector::strip_anchor)
}
