//! Flat sequence form of complex selectors.
//!
//! Weaving and `@extend` work on selector chains as flat sequences of
//! compound fragments and combinators instead of linked lists:
//!
//! ```text
//! a > b c   <=>   [Selector(a), Combinator(>), Selector(b), Selector(c)]
//! ```
//!
//! Descendant combinators are implicit between adjacent fragments. A
//! [`Node`] is always built from, and turned back into, a
//! [`ComplexSelector`]; it has no identity of its own.

use std::rc::Rc;

use crate::selector::{Combinator, ComplexSelector, CompoundSelector, SourcesSet};

/// What a [`Node`] holds.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A non-descendant combinator between two fragments.
    Combinator(Combinator),
    /// A single compound selector wrapped as a one-link chain fragment.
    Selector(ComplexSelector),
    /// An ordered sequence of nodes.
    Collection(Vec<Node>),
    /// The absence of a selector.
    Nil,
}

/// One element of the sequence form, plus whether a line break preceded
/// it in the source list.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    got_line_feed: bool,
}

impl Node {
    /// A combinator node.
    #[must_use]
    pub const fn combinator(combinator: Combinator) -> Self {
        Self {
            kind: NodeKind::Combinator(combinator),
            got_line_feed: false,
        }
    }

    /// A selector node holding the head of `selector` as a fragment.
    ///
    /// The fragment shares the head compound, drops the tail, and uses a
    /// descendant combinator.
    #[must_use]
    pub fn selector(selector: &ComplexSelector) -> Self {
        let fragment = selector
            .head_rc()
            .map(|head| ComplexSelector::from_rc_head(Rc::clone(head)))
            .unwrap_or_default();
        Self {
            kind: NodeKind::Selector(fragment),
            got_line_feed: selector.has_line_feed(),
        }
    }

    /// A selector node for a bare compound selector.
    #[must_use]
    pub fn compound(compound: CompoundSelector) -> Self {
        Self {
            kind: NodeKind::Selector(ComplexSelector::from_compound(compound)),
            got_line_feed: false,
        }
    }

    /// A collection of `nodes`.
    #[must_use]
    pub const fn collection(nodes: Vec<Self>) -> Self {
        Self {
            kind: NodeKind::Collection(nodes),
            got_line_feed: false,
        }
    }

    /// The nil node.
    #[must_use]
    pub const fn nil() -> Self {
        Self {
            kind: NodeKind::Nil,
            got_line_feed: false,
        }
    }

    /// What this node holds.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether a line break preceded this node.
    #[must_use]
    pub const fn got_line_feed(&self) -> bool {
        self.got_line_feed
    }

    /// Record whether a line break preceded this node.
    pub fn set_line_feed(&mut self, got_line_feed: bool) {
        self.got_line_feed = got_line_feed;
    }

    /// Whether this is a combinator node.
    #[must_use]
    pub const fn is_combinator(&self) -> bool {
        matches!(self.kind, NodeKind::Combinator(_))
    }

    /// Whether this is a selector node.
    #[must_use]
    pub const fn is_selector(&self) -> bool {
        matches!(self.kind, NodeKind::Selector(_))
    }

    /// Whether this is a collection node.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self.kind, NodeKind::Collection(_))
    }

    /// Whether this is the nil node.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self.kind, NodeKind::Nil)
    }

    /// The combinator of a combinator node.
    #[must_use]
    pub const fn as_combinator(&self) -> Option<&Combinator> {
        match &self.kind {
            NodeKind::Combinator(combinator) => Some(combinator),
            _ => None,
        }
    }

    /// The fragment of a selector node.
    #[must_use]
    pub const fn as_selector(&self) -> Option<&ComplexSelector> {
        match &self.kind {
            NodeKind::Selector(fragment) => Some(fragment),
            _ => None,
        }
    }

    /// The compound selector of a selector node.
    #[must_use]
    pub fn as_compound(&self) -> Option<&CompoundSelector> {
        self.as_selector().and_then(ComplexSelector::head)
    }

    /// The children of a collection node.
    #[must_use]
    pub fn as_collection(&self) -> Option<&[Self]> {
        match &self.kind {
            NodeKind::Collection(nodes) => Some(nodes),
            _ => None,
        }
    }

    /// Consume a collection node, yielding its children.
    #[must_use]
    pub fn into_collection(self) -> Option<Vec<Self>> {
        match self.kind {
            NodeKind::Collection(nodes) => Some(nodes),
            _ => None,
        }
    }

    /// Copy the node, giving every selector fragment its own compound.
    #[must_use]
    pub fn clone_fully(&self) -> Self {
        let kind = match &self.kind {
            NodeKind::Selector(fragment) => NodeKind::Selector(fragment.clone_fully()),
            NodeKind::Collection(nodes) => {
                NodeKind::Collection(nodes.iter().map(Self::clone_fully).collect())
            }
            other => other.clone(),
        };
        Self {
            kind,
            got_line_feed: self.got_line_feed,
        }
    }

    /// The union of the sources of every compound in this node.
    #[must_use]
    pub fn sources(&self) -> SourcesSet {
        match &self.kind {
            NodeKind::Selector(fragment) => fragment.sources(),
            NodeKind::Collection(nodes) => {
                let mut sources = SourcesSet::new();
                for node in nodes {
                    sources.merge(&node.sources());
                }
                sources
            }
            NodeKind::Combinator(_) | NodeKind::Nil => SourcesSet::new(),
        }
    }

    /// Add `sources` to every compound in this node, copying shared
    /// compounds first.
    pub fn add_sources(&mut self, sources: &SourcesSet) {
        match &mut self.kind {
            NodeKind::Selector(fragment) => fragment.add_sources(sources),
            NodeKind::Collection(nodes) => {
                for node in nodes {
                    node.add_sources(sources);
                }
            }
            NodeKind::Combinator(_) | NodeKind::Nil => {}
        }
    }

    /// Append the children of `rhs` to this collection.
    ///
    /// # Panics
    /// Panics if either node is not a collection; that is a construction
    /// bug, not bad input.
    pub fn plus(&mut self, rhs: Self) {
        let NodeKind::Collection(rhs_nodes) = rhs.kind else {
            panic!("Node::plus: the right-hand node must be a collection");
        };
        let NodeKind::Collection(nodes) = &mut self.kind else {
            panic!("Node::plus: the left-hand node must be a collection");
        };
        nodes.extend(rhs_nodes);
    }

    /// Whether any child of this collection equals `child` under
    /// [`nodes_equal`].
    ///
    /// # Panics
    /// Panics if this node is not a collection.
    #[must_use]
    pub fn contains(&self, child: &Self, order_dependent: bool) -> bool {
        let Some(nodes) = self.as_collection() else {
            panic!("Node::contains: the receiver must be a collection");
        };
        nodes
            .iter()
            .any(|candidate| nodes_equal(candidate, child, order_dependent))
    }

    /// Remove repeated selector fragments from this collection.
    ///
    /// Fragments are keyed by their structural identity. The scan runs from
    /// the back, so of several equal fragments the last one survives;
    /// combinators and nested collections always survive. Survivors keep
    /// their original order.
    ///
    /// # Panics
    /// Panics if this node is not a collection.
    #[must_use]
    pub fn naive_trim(&self) -> Self {
        let Some(nodes) = self.as_collection() else {
            panic!("Node::naive_trim: the receiver must be a collection");
        };
        let mut seen = SourcesSet::new();
        let mut kept: Vec<Self> = Vec::with_capacity(nodes.len());
        for node in nodes.iter().rev() {
            match node.as_selector() {
                Some(fragment) if !seen.insert(fragment) => {}
                _ => kept.push(node.clone()),
            }
        }
        kept.reverse();
        let mut result = Self::collection(kept);
        result.got_line_feed = self.got_line_feed;
        result
    }
}

impl PartialEq for Node {
    /// Order-dependent [`nodes_equal`].
    fn eq(&self, other: &Self) -> bool {
        nodes_equal(self, other, true)
    }
}

/// Compare two selectors either component-for-component or as sets of
/// simple selectors per compound.
#[must_use]
pub fn selectors_equal(
    lhs: &ComplexSelector,
    rhs: &ComplexSelector,
    order_dependent: bool,
) -> bool {
    if order_dependent {
        lhs == rhs
    } else {
        lhs.eq_unordered(rhs)
    }
}

/// Structural node equality. Line-feed flags are ignored.
#[must_use]
pub fn nodes_equal(lhs: &Node, rhs: &Node, order_dependent: bool) -> bool {
    match (&lhs.kind, &rhs.kind) {
        (NodeKind::Combinator(a), NodeKind::Combinator(b)) => a == b,
        (NodeKind::Nil, NodeKind::Nil) => true,
        (NodeKind::Selector(a), NodeKind::Selector(b)) => selectors_equal(a, b, order_dependent),
        (NodeKind::Collection(a), NodeKind::Collection(b)) => sequences_equal(a, b, order_dependent),
        _ => false,
    }
}

/// Element-wise [`nodes_equal`] over two sequences.
#[must_use]
pub fn sequences_equal(lhs: &[Node], rhs: &[Node], order_dependent: bool) -> bool {
    lhs.len() == rhs.len()
        && lhs
            .iter()
            .zip(rhs)
            .all(|(a, b)| nodes_equal(a, b, order_dependent))
}

/// Flatten a complex selector into a collection of selector and
/// combinator nodes.
///
/// Empty heads and bare `&` heads are dropped; descendant combinators are
/// implicit. The line feed of the chain moves to its first emitted node.
#[must_use]
pub fn complex_to_node(selector: Option<&ComplexSelector>) -> Node {
    let Some(selector) = selector else {
        return Node::nil();
    };
    let mut pending_line_feed = selector.has_line_feed();
    let mut nodes = Vec::new();
    for link in selector.links() {
        let real_head = link
            .head()
            .is_some_and(|head| !head.is_empty() && !head.is_empty_reference());
        if real_head {
            let mut node = Node::selector(link);
            node.got_line_feed |= pending_line_feed;
            pending_line_feed = false;
            nodes.push(node);
        }
        if *link.combinator() != Combinator::Descendant {
            let mut node = Node::combinator(link.combinator().clone());
            node.got_line_feed = pending_line_feed;
            pending_line_feed = false;
            nodes.push(node);
        }
    }
    let mut collection = Node::collection(nodes);
    collection.got_line_feed = selector.has_line_feed();
    collection
}

/// Rebuild a complex selector from a collection of selector and
/// combinator nodes.
///
/// Every rebuilt chain starts with a link whose head is a lone `&`, marking
/// where the original selector's own prefix belongs. Two adjacent
/// combinators get an empty link between them. Nil yields `None`.
///
/// # Panics
/// Panics if `node` is a selector or combinator node, or if a child of the
/// collection is itself a collection or nil.
#[must_use]
pub fn node_to_complex(node: &Node) -> Option<ComplexSelector> {
    let children = match &node.kind {
        NodeKind::Nil => return None,
        NodeKind::Collection(children) => children,
        _ => panic!("node_to_complex: the node must be a collection or nil"),
    };

    // (head, combinator to the next link, line feed)
    let mut links: Vec<(Option<ComplexSelector>, Combinator, bool)> =
        vec![(None, Combinator::Descendant, node.got_line_feed)];

    for (index, child) in children.iter().enumerate() {
        match &child.kind {
            NodeKind::Selector(fragment) => {
                links.push((Some(fragment.clone()), Combinator::Descendant, false));
            }
            NodeKind::Combinator(combinator) => {
                if let Some(last) = links.last_mut() {
                    last.1 = combinator.clone();
                    last.2 |= child.got_line_feed;
                }
                if children.get(index + 1).is_some_and(Node::is_combinator) {
                    links.push((None, Combinator::Descendant, false));
                }
            }
            NodeKind::Collection(_) | NodeKind::Nil => {
                panic!("node_to_complex: children must be selectors or combinators")
            }
        }
    }

    let mut tail: Option<ComplexSelector> = None;
    let count = links.len();
    for (position, (fragment, combinator, line_feed)) in links.into_iter().rev().enumerate() {
        let mut link = match fragment {
            Some(fragment) => fragment,
            None if position == count - 1 => {
                ComplexSelector::from_compound(CompoundSelector::parent_reference())
            }
            None => ComplexSelector::default(),
        };
        link.set_combinator(combinator);
        link.set_tail(tail);
        link.set_line_feed(link.has_line_feed() || line_feed);
        tail = Some(link);
    }
    tail
}
