//! Complex selectors: compound selectors chained by combinators.
//!
//! [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)

use std::cmp::Ordering;
use std::rc::Rc;

use super::{CompoundSelector, SourcesSet};

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Combinator {
    /// `A B` — B is an arbitrary descendant of A.
    #[default]
    Descendant,
    /// `A > B` — B is a direct child of A.
    Child,
    /// `A ~ B` — B follows A among its siblings.
    GeneralSibling,
    /// `A + B` — B immediately follows A.
    Adjacent,
    /// `A /attr/ B` — B is referenced by A's `attr` attribute.
    Reference(String),
}

impl Combinator {
    /// The combinator as written between two compounds (`" "` for descendant).
    #[must_use]
    pub fn symbol(&self) -> String {
        match self {
            Self::Descendant => " ".to_string(),
            Self::Child => ">".to_string(),
            Self::GeneralSibling => "~".to_string(),
            Self::Adjacent => "+".to_string(),
            Self::Reference(name) => format!("/{name}/"),
        }
    }
}

/// One link of a selector chain, leftmost first.
///
/// `a > b c` is the chain
/// ```text
/// [a] --(Child)--> [b] --(Descendant)--> [c]
/// ```
/// where each link owns its `head` compound, the combinator to its `tail`,
/// and the rest of the chain. The last link's combinator is `Descendant`
/// unless the selector ends with a dangling combinator.
///
/// Heads are reference counted. [`Clone`] copies the chain of links and
/// shares the heads; [`ComplexSelector::clone_fully`] copies the heads as
/// well. Mutating a shared head through [`ComplexSelector::head_mut`]
/// copies it first, so a head is never changed behind another chain's back.
#[derive(Debug, Clone, Default)]
pub struct ComplexSelector {
    combinator: Combinator,
    head: Option<Rc<CompoundSelector>>,
    tail: Option<Box<ComplexSelector>>,
    has_line_feed: bool,
}

impl ComplexSelector {
    /// Build one link in front of `tail`.
    #[must_use]
    pub fn new(
        combinator: Combinator,
        head: Option<CompoundSelector>,
        tail: Option<Self>,
    ) -> Self {
        Self {
            combinator,
            head: head.map(Rc::new),
            tail: tail.map(Box::new),
            has_line_feed: false,
        }
    }

    /// A single-link chain holding `compound`.
    #[must_use]
    pub fn from_compound(compound: CompoundSelector) -> Self {
        Self::new(Combinator::Descendant, Some(compound), None)
    }

    /// A single-link chain sharing an existing head.
    #[must_use]
    pub fn from_rc_head(head: Rc<CompoundSelector>) -> Self {
        Self {
            head: Some(head),
            ..Self::default()
        }
    }

    /// Build a chain from `(compound, combinator to the next link)` pairs,
    /// leftmost first.
    #[must_use]
    pub fn from_links(links: Vec<(Option<CompoundSelector>, Combinator)>) -> Option<Self> {
        links
            .into_iter()
            .rev()
            .fold(None, |tail, (head, combinator)| {
                Some(Self::new(combinator, head, tail))
            })
    }

    /// The combinator between this link's head and its tail.
    #[must_use]
    pub const fn combinator(&self) -> &Combinator {
        &self.combinator
    }

    /// Replace this link's combinator.
    pub fn set_combinator(&mut self, combinator: Combinator) {
        self.combinator = combinator;
    }

    /// This link's compound selector.
    #[must_use]
    pub fn head(&self) -> Option<&CompoundSelector> {
        self.head.as_deref()
    }

    /// The shared handle to this link's compound selector.
    #[must_use]
    pub const fn head_rc(&self) -> Option<&Rc<CompoundSelector>> {
        self.head.as_ref()
    }

    /// Mutable access to this link's head, copying it if it is shared.
    pub fn head_mut(&mut self) -> Option<&mut CompoundSelector> {
        self.head.as_mut().map(Rc::make_mut)
    }

    /// Replace this link's head.
    pub fn set_head(&mut self, head: Option<CompoundSelector>) {
        self.head = head.map(Rc::new);
    }

    /// The rest of the chain.
    #[must_use]
    pub fn tail(&self) -> Option<&Self> {
        self.tail.as_deref()
    }

    /// Mutable access to the rest of the chain.
    pub fn tail_mut(&mut self) -> Option<&mut Self> {
        self.tail.as_deref_mut()
    }

    /// Replace the rest of the chain.
    pub fn set_tail(&mut self, tail: Option<Self>) {
        self.tail = tail.map(Box::new);
    }

    /// Whether a line break preceded this selector in its list.
    #[must_use]
    pub const fn has_line_feed(&self) -> bool {
        self.has_line_feed
    }

    /// Record whether a line break preceded this selector.
    pub fn set_line_feed(&mut self, has_line_feed: bool) {
        self.has_line_feed = has_line_feed;
    }

    /// Iterate the links of the chain, leftmost first.
    pub fn links(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |link| link.tail())
    }

    /// Iterate the compound selectors of the chain, leftmost first.
    pub fn compounds(&self) -> impl Iterator<Item = &CompoundSelector> {
        self.links().filter_map(Self::head)
    }

    /// Number of links in the chain.
    #[must_use]
    pub fn length(&self) -> usize {
        self.links().count()
    }

    /// A link with no (or an empty) head joined by a descendant combinator.
    /// Such links only hold chains together.
    #[must_use]
    pub fn is_empty_ancestor(&self) -> bool {
        self.head().is_none_or(CompoundSelector::is_empty)
            && self.combinator == Combinator::Descendant
    }

    /// The first link that carries a real compound, skipping empty
    /// ancestors and bare `&` heads.
    #[must_use]
    pub fn first(&self) -> Option<&Self> {
        self.links().find(|link| {
            link.head()
                .is_some_and(|head| !head.is_empty() && !head.is_empty_reference())
        })
    }

    /// The innermost link that carries a compound (the subject).
    #[must_use]
    pub fn last(&self) -> &Self {
        self.links()
            .filter(|link| link.head().is_some_and(|head| !head.is_empty()))
            .last()
            .unwrap_or_else(|| self.links().last().unwrap_or(self))
    }

    /// The innermost link's compound selector.
    #[must_use]
    pub fn innermost(&self) -> Option<&CompoundSelector> {
        self.last().head()
    }

    /// Any head contains a parent reference.
    #[must_use]
    pub fn has_parent_reference(&self) -> bool {
        self.compounds().any(CompoundSelector::has_parent_reference)
    }

    /// Any head contains a placeholder.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.compounds().any(CompoundSelector::has_placeholder)
    }

    /// Copy the chain and every compound selector in it.
    ///
    /// The copied compounds keep their sources; a full clone denotes the
    /// same origin as the original.
    #[must_use]
    pub fn clone_fully(&self) -> Self {
        Self {
            combinator: self.combinator.clone(),
            head: self
                .head
                .as_ref()
                .map(|head| Rc::new(CompoundSelector::clone(head))),
            tail: self.tail.as_ref().map(|tail| Box::new(tail.clone_fully())),
            has_line_feed: self.has_line_feed,
        }
    }

    /// Remove the leading `&` anchor added when a chain is rebuilt from its
    /// sequence form.
    ///
    /// A bare `&` head followed by a descendant combinator is dropped with
    /// its link; a bare `&` head followed by another combinator is emptied
    /// so the leading combinator survives.
    #[must_use]
    pub fn strip_anchor(mut self) -> Self {
        if !self.head().is_some_and(CompoundSelector::is_empty_reference) {
            return self;
        }
        let descendant = self.combinator == Combinator::Descendant;
        match self.tail.take() {
            Some(tail) if descendant => {
                let mut tail = *tail;
                tail.has_line_feed |= self.has_line_feed;
                tail
            }
            tail => {
                self.head = None;
                self.tail = tail;
                self
            }
        }
    }

    /// The union of every head's sources.
    #[must_use]
    pub fn sources(&self) -> SourcesSet {
        let mut sources = SourcesSet::new();
        for compound in self.compounds() {
            sources.merge(compound.sources());
        }
        sources
    }

    /// Add `sources` to every head, copying shared heads first.
    pub fn add_sources(&mut self, sources: &SourcesSet) {
        let mut link = Some(self);
        while let Some(current) = link {
            if let Some(head) = current.head_mut() {
                head.merge_sources(sources);
            }
            link = current.tail_mut();
        }
    }

    /// Forget the sources of every head, copying shared heads first.
    pub fn clear_sources(&mut self) {
        let mut link = Some(self);
        while let Some(current) = link {
            if let Some(head) = current.head_mut() {
                head.clear_sources();
            }
            link = current.tail_mut();
        }
    }

    /// Chain-wise equality with order-independent compound comparison.
    #[must_use]
    pub fn eq_unordered(&self, other: &Self) -> bool {
        let heads_match = match (self.head(), other.head()) {
            (Some(lhs), Some(rhs)) => lhs.set_eq(rhs),
            (None, None) => true,
            _ => false,
        };
        let tails_match = match (self.tail(), other.tail()) {
            (Some(lhs), Some(rhs)) => lhs.eq_unordered(rhs),
            (None, None) => true,
            _ => false,
        };
        heads_match && tails_match && self.combinator == other.combinator
    }
}

impl From<CompoundSelector> for ComplexSelector {
    fn from(compound: CompoundSelector) -> Self {
        Self::from_compound(compound)
    }
}

impl PartialEq for ComplexSelector {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ComplexSelector {}

impl PartialOrd for ComplexSelector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComplexSelector {
    /// Combinator, then head, then tail. Line feeds and sources are ignored.
    fn cmp(&self, other: &Self) -> Ordering {
        self.combinator
            .cmp(&other.combinator)
            .then_with(|| self.head().cmp(&other.head()))
            .then_with(|| self.tail().cmp(&other.tail()))
    }
}
