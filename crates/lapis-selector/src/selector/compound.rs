//! Compound selectors and the sources bookkeeping used by `@extend`.
//!
//! [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::collections::btree_set;

use super::{ComplexSelector, SimpleSelector};

/// The set of complex selectors a compound selector was produced from.
///
/// Membership is structural: two chains that print the same are the same
/// source, whatever object they live in. Stored chains are kept without
/// their own sources so the set never nests.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourcesSet(BTreeSet<ComplexSelector>);

impl SourcesSet {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add a source. Returns `true` if it was not already present.
    pub fn insert(&mut self, source: &ComplexSelector) -> bool {
        let mut key = source.clone();
        key.clear_sources();
        self.0.insert(key)
    }

    /// Whether `source` is (structurally) a member.
    #[must_use]
    pub fn contains(&self, source: &ComplexSelector) -> bool {
        self.0.contains(source)
    }

    /// Add every member of `other`.
    pub fn merge(&mut self, other: &Self) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Iterate members in their total order.
    pub fn iter(&self) -> btree_set::Iter<'_, ComplexSelector> {
        self.0.iter()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a SourcesSet {
    type Item = &'a ComplexSelector;
    type IntoIter = btree_set::Iter<'a, ComplexSelector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ComplexSelector> for SourcesSet {
    fn from_iter<T: IntoIterator<Item = ComplexSelector>>(iter: T) -> Self {
        let mut set = Self::new();
        for source in iter {
            let _ = set.insert(&source);
        }
        set
    }
}

/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
///
/// Equality and ordering look only at the components, in order. Use
/// [`CompoundSelector::set_eq`] for the order-independent comparison.
#[derive(Debug, Clone, Default)]
pub struct CompoundSelector {
    components: Vec<SimpleSelector>,
    has_parent_reference: bool,
    has_placeholder: bool,
    sources: SourcesSet,
}

impl CompoundSelector {
    /// An empty compound selector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            components: Vec::new(),
            has_parent_reference: false,
            has_placeholder: false,
            sources: SourcesSet::new(),
        }
    }

    /// A compound selector consisting of a single `&`.
    #[must_use]
    pub fn parent_reference() -> Self {
        Self::from(vec![SimpleSelector::Parent])
    }

    /// Append a simple selector, updating the derived flags.
    pub fn push(&mut self, simple: SimpleSelector) {
        self.has_parent_reference |= simple.has_reference();
        self.has_placeholder |= simple.has_placeholder();
        self.components.push(simple);
    }

    /// Insert a simple selector at `index`, updating the derived flags.
    ///
    /// # Panics
    /// Panics if `index > self.len()`.
    pub fn insert(&mut self, index: usize, simple: SimpleSelector) {
        self.has_parent_reference |= simple.has_reference();
        self.has_placeholder |= simple.has_placeholder();
        self.components.insert(index, simple);
    }

    /// Replace the component at `index`, recomputing the derived flags.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn replace(&mut self, index: usize, simple: SimpleSelector) {
        self.components[index] = simple;
        self.recompute_flags();
    }

    /// Remove the component at `index`, recomputing the derived flags.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn remove(&mut self, index: usize) -> SimpleSelector {
        let removed = self.components.remove(index);
        self.recompute_flags();
        removed
    }

    fn recompute_flags(&mut self) {
        self.has_parent_reference = self.components.iter().any(SimpleSelector::has_reference);
        self.has_placeholder = self.components.iter().any(SimpleSelector::has_placeholder);
    }

    /// The simple selectors, in source order.
    #[must_use]
    pub fn components(&self) -> &[SimpleSelector] {
        &self.components
    }

    /// Iterate the simple selectors.
    pub fn iter(&self) -> std::slice::Iter<'_, SimpleSelector> {
        self.components.iter()
    }

    /// Number of simple selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether there are no simple selectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether `simple` is one of the components.
    #[must_use]
    pub fn contains(&self, simple: &SimpleSelector) -> bool {
        self.components.contains(simple)
    }

    /// Any component is `&` or wraps a selector containing one.
    #[must_use]
    pub const fn has_parent_reference(&self) -> bool {
        self.has_parent_reference
    }

    /// Any component is `%name` or wraps a selector containing one.
    #[must_use]
    pub const fn has_placeholder(&self) -> bool {
        self.has_placeholder
    }

    /// The only component is a universal selector.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        matches!(self.components.as_slice(), [SimpleSelector::Universal(_)])
    }

    /// The only component is `&`.
    #[must_use]
    pub fn is_empty_reference(&self) -> bool {
        matches!(self.components.as_slice(), [SimpleSelector::Parent])
    }

    /// The leading type or universal selector, if there is one.
    #[must_use]
    pub fn base(&self) -> Option<&SimpleSelector> {
        self.components.first().filter(|simple| simple.is_element())
    }

    /// The pseudo-element components, in order.
    pub fn pseudo_elements(&self) -> impl Iterator<Item = &SimpleSelector> {
        self.components.iter().filter(|simple| simple.is_pseudo_element())
    }

    /// The components of `self` that do not appear in `other`.
    ///
    /// The result carries no sources.
    #[must_use]
    pub fn minus(&self, other: &[SimpleSelector]) -> Self {
        self.components
            .iter()
            .filter(|simple| !other.contains(simple))
            .cloned()
            .collect()
    }

    /// Order-independent equality: both sides contain the same simple
    /// selectors, ignoring order and duplicates.
    #[must_use]
    pub fn set_eq(&self, other: &Self) -> bool {
        let lhs: BTreeSet<&SimpleSelector> = self.components.iter().collect();
        let rhs: BTreeSet<&SimpleSelector> = other.components.iter().collect();
        lhs == rhs
    }

    /// The complex selectors this compound was produced from.
    #[must_use]
    pub const fn sources(&self) -> &SourcesSet {
        &self.sources
    }

    /// Add every source in `sources`.
    pub fn merge_sources(&mut self, sources: &SourcesSet) {
        self.sources.merge(sources);
    }

    /// Forget all sources.
    pub fn clear_sources(&mut self) {
        self.sources.clear();
    }
}

impl From<Vec<SimpleSelector>> for CompoundSelector {
    fn from(components: Vec<SimpleSelector>) -> Self {
        let mut compound = Self {
            components,
            ..Self::new()
        };
        compound.recompute_flags();
        compound
    }
}

impl FromIterator<SimpleSelector> for CompoundSelector {
    fn from_iter<T: IntoIterator<Item = SimpleSelector>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a CompoundSelector {
    type Item = &'a SimpleSelector;
    type IntoIter = std::slice::Iter<'a, SimpleSelector>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

impl PartialEq for CompoundSelector {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for CompoundSelector {}

impl PartialOrd for CompoundSelector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompoundSelector {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}
