//! Comma-separated selector lists.
//!
//! [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)

use std::cmp::Ordering;

use super::ComplexSelector;

/// "A selector list is a comma-separated list of selectors; it represents
/// the union of all elements selected by each of the individual selectors
/// in the list."
///
/// Equality is order-independent over the alternatives.
#[derive(Debug, Clone, Default)]
pub struct SelectorList {
    alternatives: Vec<ComplexSelector>,
}

impl SelectorList {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            alternatives: Vec::new(),
        }
    }

    /// Append an alternative.
    pub fn push(&mut self, alternative: ComplexSelector) {
        self.alternatives.push(alternative);
    }

    /// The alternatives, in source order.
    #[must_use]
    pub fn alternatives(&self) -> &[ComplexSelector] {
        &self.alternatives
    }

    /// Consume the list, yielding its alternatives.
    #[must_use]
    pub fn into_alternatives(self) -> Vec<ComplexSelector> {
        self.alternatives
    }

    /// Iterate the alternatives.
    pub fn iter(&self) -> std::slice::Iter<'_, ComplexSelector> {
        self.alternatives.iter()
    }

    /// Number of alternatives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Whether the list has no alternatives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Any alternative contains a parent reference.
    #[must_use]
    pub fn has_parent_reference(&self) -> bool {
        self.alternatives
            .iter()
            .any(ComplexSelector::has_parent_reference)
    }

    /// Any alternative contains a placeholder.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.alternatives.iter().any(ComplexSelector::has_placeholder)
    }

    /// The alternatives that contain no placeholder, i.e. what is emitted.
    #[must_use]
    pub fn without_placeholders(&self) -> Self {
        self.alternatives
            .iter()
            .filter(|alternative| !alternative.has_placeholder())
            .cloned()
            .collect()
    }

    /// Copy every alternative with [`ComplexSelector::clone_fully`].
    #[must_use]
    pub fn clone_fully(&self) -> Self {
        self.alternatives
            .iter()
            .map(ComplexSelector::clone_fully)
            .collect()
    }

    /// Drop alternatives structurally identical to an earlier one, keeping
    /// first occurrences in order. Compounds compare order-independently.
    pub fn dedup(&mut self) {
        let mut kept: Vec<ComplexSelector> = Vec::with_capacity(self.alternatives.len());
        for alternative in self.alternatives.drain(..) {
            if !kept.iter().any(|seen| seen.eq_unordered(&alternative)) {
                kept.push(alternative);
            }
        }
        self.alternatives = kept;
    }

    fn sorted(&self) -> Vec<&ComplexSelector> {
        let mut sorted: Vec<&ComplexSelector> = self.alternatives.iter().collect();
        sorted.sort();
        sorted
    }
}

impl From<Vec<ComplexSelector>> for SelectorList {
    fn from(alternatives: Vec<ComplexSelector>) -> Self {
        Self { alternatives }
    }
}

impl From<ComplexSelector> for SelectorList {
    fn from(alternative: ComplexSelector) -> Self {
        Self {
            alternatives: vec![alternative],
        }
    }
}

impl FromIterator<ComplexSelector> for SelectorList {
    fn from_iter<T: IntoIterator<Item = ComplexSelector>>(iter: T) -> Self {
        Self {
            alternatives: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SelectorList {
    type Item = ComplexSelector;
    type IntoIter = std::vec::IntoIter<ComplexSelector>;

    fn into_iter(self) -> Self::IntoIter {
        self.alternatives.into_iter()
    }
}

impl<'a> IntoIterator for &'a SelectorList {
    type Item = &'a ComplexSelector;
    type IntoIter = std::slice::Iter<'a, ComplexSelector>;

    fn into_iter(self) -> Self::IntoIter {
        self.alternatives.iter()
    }
}

impl PartialEq for SelectorList {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SelectorList {}

impl PartialOrd for SelectorList {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SelectorList {
    /// Lexicographic over the sorted alternatives, so source order is
    /// irrelevant.
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted().cmp(&other.sorted())
    }
}
