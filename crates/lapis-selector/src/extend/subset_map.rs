//! Index from simple selectors to the `@extend` directives that target
//! them.

use std::collections::{BTreeMap, BTreeSet};

use crate::selector::{ComplexSelector, CompoundSelector, SimpleSelector};

/// One `(target, extender)` pair of an `@extend` directive.
///
/// `.c .d { @extend .a.b }` produces the extension with target `.a.b` and
/// extender `.c .d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// The selector doing the extending.
    pub extender: ComplexSelector,
    /// The compound selector being extended.
    pub target: CompoundSelector,
    /// `!optional`: never reported as unmatched.
    pub optional: bool,
}

/// The subset map of extensions.
///
/// A lookup with a compound selector returns every extension whose target
/// is a subset of that compound, in insertion order. Each extension is
/// indexed under every simple selector of its target.
#[derive(Debug, Clone, Default)]
pub struct ExtendTargetMap {
    entries: Vec<Extension>,
    index: BTreeMap<SimpleSelector, Vec<usize>>,
}

impl ExtendTargetMap {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Add an extension and return its id.
    pub fn insert(&mut self, extension: Extension) -> usize {
        let id = self.entries.len();
        for simple in &extension.target {
            let ids = self.index.entry(simple.clone()).or_default();
            if ids.last() != Some(&id) {
                ids.push(id);
            }
        }
        self.entries.push(extension);
        id
    }

    /// Every extension whose target is contained in `compound`, with its
    /// id, in insertion order.
    #[must_use]
    pub fn get(&self, compound: &CompoundSelector) -> Vec<(usize, &Extension)> {
        let candidates: BTreeSet<usize> = compound
            .iter()
            .filter_map(|simple| self.index.get(simple))
            .flatten()
            .copied()
            .collect();
        candidates
            .into_iter()
            .filter_map(|id| self.entries.get(id).map(|extension| (id, extension)))
            .filter(|(_, extension)| extension.target.iter().all(|simple| compound.contains(simple)))
            .collect()
    }

    /// Whether any extension targets a subset of `compound`.
    #[must_use]
    pub fn matches(&self, compound: &CompoundSelector) -> bool {
        !self.get(compound).is_empty()
    }

    /// Every extension, indexed by id.
    #[must_use]
    pub fn entries(&self) -> &[Extension] {
        &self.entries
    }

    /// Number of extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no extensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_complex, parse_compound};

    fn extension(target: &str, extender: &str) -> Extension {
        Extension {
            extender: parse_complex(extender).unwrap(),
            target: parse_compound(target).unwrap(),
            optional: false,
        }
    }

    #[test]
    fn test_lookup_requires_whole_target() {
        let mut map = ExtendTargetMap::new();
        let _ = map.insert(extension(".a.b", ".x"));
        assert!(map.get(&parse_compound(".a").unwrap()).is_empty());
        assert_eq!(map.get(&parse_compound(".b.c.a").unwrap()).len(), 1);
    }

    #[test]
    fn test_lookup_keeps_insertion_order() {
        let mut map = ExtendTargetMap::new();
        let first = map.insert(extension(".b", ".y"));
        let second = map.insert(extension(".a", ".x"));
        let hits: Vec<usize> = map
            .get(&parse_compound(".a.b").unwrap())
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(hits, vec![first, second]);
    }

    #[test]
    fn test_repeated_simple_selector_indexed_once() {
        let mut map = ExtendTargetMap::new();
        let _ = map.insert(extension(".a.a", ".x"));
        assert_eq!(map.get(&parse_compound(".a").unwrap()).len(), 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_entries_keep_each_extension() {
        let mut map = ExtendTargetMap::new();
        let _ = map.insert(extension(".a", ".x"));
        let _ = map.insert(Extension {
            optional: true,
            ..extension(".b.c", ".y .z")
        });
        let entries: Vec<(String, String, bool)> = map
            .entries()
            .iter()
            .map(|entry| (entry.target.to_string(), entry.extender.to_string(), entry.optional))
            .collect();
        assert_eq!(
            entries,
            vec![
                (".a".to_string(), ".x".to_string(), false),
                (".b.c".to_string(), ".y .z".to_string(), true),
            ]
        );
    }
}
