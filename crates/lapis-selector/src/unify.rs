//! Selector unification: the selector matching exactly the intersection
//! of two selectors.
//!
//! Failure to unify is not an error. Compounds yield `None`, complex
//! selectors and lists yield an empty [`SelectorList`].

use crate::node::{Node, complex_to_node, node_to_complex};
use crate::selector::{ComplexSelector, CompoundSelector, SelectorList, SimpleSelector};
use crate::weave::weave;

impl SimpleSelector {
    /// Add this simple selector to the components of a compound.
    ///
    /// Type and universal selectors merge with an existing base (their
    /// namespaces must unify, type names must be equal) and always end up
    /// first. A bare `*` disappears into any other compound. Two different
    /// IDs or two different pseudo-elements cannot coexist. Everything else
    /// is appended, ahead of a trailing pseudo-element.
    #[must_use]
    pub fn unify_into(&self, mut components: Vec<Self>) -> Option<Vec<Self>> {
        match self {
            Self::Universal(namespace) => {
                let base = match components.first() {
                    Some(Self::Universal(theirs)) => Self::Universal(namespace.unify(theirs)?),
                    Some(Self::Type {
                        namespace: theirs,
                        name,
                    }) => Self::Type {
                        namespace: namespace.unify(theirs)?,
                        name: name.clone(),
                    },
                    _ => {
                        if !namespace.is_unconstrained() || components.is_empty() {
                            components.insert(0, self.clone());
                        }
                        return Some(components);
                    }
                };
                components[0] = base;
                Some(components)
            }
            Self::Type { namespace, name } => {
                let unified = match components.first() {
                    Some(Self::Universal(theirs)) => namespace.unify(theirs)?,
                    Some(Self::Type {
                        namespace: theirs,
                        name: their_name,
                    }) => {
                        if name != their_name {
                            return None;
                        }
                        namespace.unify(theirs)?
                    }
                    _ => {
                        components.insert(0, self.clone());
                        return Some(components);
                    }
                };
                components[0] = Self::Type {
                    namespace: unified,
                    name: name.clone(),
                };
                Some(components)
            }
            _ => {
                if let [Self::Universal(_)] = components.as_slice() {
                    let universal = components.remove(0);
                    return universal.unify_into(vec![self.clone()]);
                }
                if components.contains(self) {
                    return Some(components);
                }
                let conflicts = match self {
                    Self::Id(ours) => components
                        .iter()
                        .any(|theirs| matches!(theirs, Self::Id(name) if name != ours)),
                    Self::PseudoElement(_) => components.iter().any(Self::is_pseudo_element),
                    _ => false,
                };
                if conflicts {
                    return None;
                }
                match components.iter().position(Self::is_pseudo_element) {
                    Some(index) if !self.is_pseudo_element() => components.insert(index, self.clone()),
                    _ => components.push(self.clone()),
                }
                Some(components)
            }
        }
    }
}

impl CompoundSelector {
    /// Unify with `other`, keeping this compound's components first.
    ///
    /// Returns `None` for incompatible type selectors, namespaces, IDs, or
    /// pseudo-elements. The result carries no sources.
    #[must_use]
    pub fn unify_with(&self, other: &Self) -> Option<Self> {
        let mut components = self.components().to_vec();
        for simple in other {
            components = simple.unify_into(components)?;
        }
        Some(Self::from(components))
    }
}

impl ComplexSelector {
    /// Every selector matching both `self` and `other`.
    ///
    /// The innermost compounds are unified and every interleaving of the
    /// remaining ancestors is woven in front of the result. Interleavings
    /// whose compounds cannot be unified are dropped; if none survive the
    /// list is empty.
    #[must_use]
    pub fn unify_with(&self, other: &Self) -> SelectorList {
        let lhs = complex_to_node(Some(self))
            .into_collection()
            .unwrap_or_default();
        let rhs = complex_to_node(Some(other))
            .into_collection()
            .unwrap_or_default();
        let (Some((base, lhs_prefix)), Some((other_base, rhs_prefix))) =
            (lhs.split_last(), rhs.split_last())
        else {
            return SelectorList::new();
        };
        let (Some(base), Some(other_base)) = (base.as_compound(), other_base.as_compound()) else {
            return SelectorList::new();
        };
        let Some(unified) = base.unify_with(other_base) else {
            return SelectorList::new();
        };

        let mut rhs_path = rhs_prefix.to_vec();
        rhs_path.push(Node::compound(unified));
        let woven = weave(&[lhs_prefix.to_vec(), rhs_path]);

        let mut list: SelectorList = woven
            .into_iter()
            .filter_map(|sequence| node_to_complex(&Node::collection(sequence).naive_trim()))
            .map(Self::strip_anchor)
            .collect();
        list.dedup();
        list
    }
}

impl SelectorList {
    /// The cross product of unifying every alternative of `self` with every
    /// alternative of `other`.
    #[must_use]
    pub fn unify_with(&self, other: &Self) -> Self {
        let mut list: Self = self
            .iter()
            .flat_map(|lhs| other.iter().flat_map(|rhs| lhs.unify_with(rhs)))
            .collect();
        list.dedup();
        list
    }
}
