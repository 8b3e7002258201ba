//! Simple selectors: the atomic matchers a compound selector is built from.
//!
//! [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
//! [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)

use strum_macros::{Display, EnumString};

use super::SelectorList;

/// [§ 6.1 Namespaces in elemental selectors](https://www.w3.org/TR/selectors-4/#type-nmsp)
///
/// The namespace prefix of a type, universal, or attribute selector.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Namespace {
    /// No prefix was written (`div`): the default namespace applies.
    #[default]
    Implicit,
    /// `|div` — elements without a namespace.
    Empty,
    /// `*|div` — elements in any namespace.
    Any,
    /// `svg|rect` — elements in the named namespace.
    Named(String),
}

impl Namespace {
    /// Whether this namespace places no constraint on the element
    /// (`*|` or no prefix at all).
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        matches!(self, Self::Implicit | Self::Any)
    }

    /// Whether this is an explicit, named namespace (`svg|`).
    #[must_use]
    pub const fn is_qualified(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    /// Combine two namespace constraints into one that satisfies both.
    ///
    /// `*|` and the implicit namespace yield to the other side; two
    /// explicit namespaces unify only when they are equal.
    #[must_use]
    pub fn unify(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Self::Any | Self::Implicit, _) => Some(other.clone()),
            (_, Self::Any | Self::Implicit) => Some(self.clone()),
            _ if self == other => Some(self.clone()),
            _ => None,
        }
    }
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// The operator of an attribute selector with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
pub enum AttributeOperator {
    /// `[attr=value]` — exact match
    #[strum(serialize = "=")]
    Equals,
    /// `[attr~=value]` — whitespace-separated word match
    #[strum(serialize = "~=")]
    Includes,
    /// `[attr|=value]` — exact or prefix followed by `-`
    #[strum(serialize = "|=")]
    DashMatch,
    /// `[attr^=value]` — starts with
    #[strum(serialize = "^=")]
    Prefix,
    /// `[attr$=value]` — ends with
    #[strum(serialize = "$=")]
    Suffix,
    /// `[attr*=value]` — substring
    #[strum(serialize = "*=")]
    Substring,
}

/// The `op value modifier` part of an attribute selector.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeMatcher {
    /// The comparison operator.
    pub operator: AttributeOperator,
    /// The value exactly as written, including any quotes.
    pub value: String,
    /// The optional case-sensitivity modifier (`i` or `s`).
    pub modifier: Option<char>,
}

/// An attribute selector such as `[href]` or `[xlink|href^="https"]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeSelector {
    /// The namespace prefix of the attribute name.
    pub namespace: Namespace,
    /// The attribute name.
    pub name: String,
    /// `None` for the existence form `[attr]`.
    pub matcher: Option<AttributeMatcher>,
}

/// The argument of a functional pseudo-class or pseudo-element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PseudoArgument {
    /// Opaque argument text, e.g. the `2n+1` of `:nth-child(2n+1)`.
    Raw(String),
    /// A nested selector list, e.g. the `.a, .b` of `:not(.a, .b)`.
    Selector(SelectorList),
}

/// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Shared payload of pseudo-class and pseudo-element selectors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PseudoSelector {
    /// The name without leading colons.
    pub name: String,
    /// The functional argument, if any.
    pub argument: Option<PseudoArgument>,
}

impl PseudoSelector {
    /// A pseudo selector without an argument.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
        }
    }

    /// A functional pseudo selector whose argument is a selector list.
    #[must_use]
    pub fn wrapping(name: impl Into<String>, selector: SelectorList) -> Self {
        Self {
            name: name.into(),
            argument: Some(PseudoArgument::Selector(selector)),
        }
    }

    /// The nested selector list, when the argument is one.
    #[must_use]
    pub const fn selector(&self) -> Option<&SelectorList> {
        match &self.argument {
            Some(PseudoArgument::Selector(list)) => Some(list),
            _ => None,
        }
    }
}

/// A simple selector is a single condition on an element.
///
/// Equality and ordering are structural: variant first, then namespace,
/// then name, then the remaining fields. The order exists for stable
/// sorting and set membership; it says nothing about matching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SimpleSelector {
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    ///
    /// Examples: `*`, `*|*`, `svg|*`
    Universal(Namespace),

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `svg|rect`
    Type {
        /// The namespace prefix.
        namespace: Namespace,
        /// The element name.
        name: String,
    },

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Examples: `.highlight`, `.btn`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Examples: `#main`, `#nav-bar`
    Id(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[type="text"]`
    Attribute(AttributeSelector),

    /// A pseudo-class, optionally functional.
    ///
    /// Examples: `:hover`, `:nth-child(2n+1)`, `:not(.a)`
    PseudoClass(PseudoSelector),

    /// A pseudo-element. At most one may appear in a compound selector.
    ///
    /// Examples: `::before`, `::slotted(span)`
    PseudoElement(PseudoSelector),

    /// An extend-only placeholder (`%name`). Never emitted.
    Placeholder(String),

    /// The parent reference `&`.
    Parent,
}

impl SimpleSelector {
    /// Shorthand for a type selector in the implicit namespace.
    #[must_use]
    pub fn type_selector(name: impl Into<String>) -> Self {
        Self::Type {
            namespace: Namespace::Implicit,
            name: name.into(),
        }
    }

    /// The bare `*` selector.
    #[must_use]
    pub const fn universal() -> Self {
        Self::Universal(Namespace::Implicit)
    }

    /// The namespace of namespaced variants.
    #[must_use]
    pub const fn namespace(&self) -> Option<&Namespace> {
        match self {
            Self::Universal(namespace) | Self::Type { namespace, .. } => Some(namespace),
            Self::Attribute(attribute) => Some(&attribute.namespace),
            _ => None,
        }
    }

    /// Whether this is a type or universal selector (the compound's "base").
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self, Self::Universal(_) | Self::Type { .. })
    }

    /// Whether this is a universal selector in any namespace.
    #[must_use]
    pub const fn is_universal(&self) -> bool {
        matches!(self, Self::Universal(_))
    }

    /// Whether this is a pseudo-element.
    #[must_use]
    pub const fn is_pseudo_element(&self) -> bool {
        matches!(self, Self::PseudoElement(_))
    }

    /// The nested selector of a selector-argument pseudo (`:not(.a)`).
    #[must_use]
    pub const fn wrapped_selector(&self) -> Option<&SelectorList> {
        match self {
            Self::PseudoClass(pseudo) | Self::PseudoElement(pseudo) => pseudo.selector(),
            _ => None,
        }
    }

    /// True for `&`, or for a pseudo whose nested selector contains one.
    #[must_use]
    pub fn has_reference(&self) -> bool {
        match self {
            Self::Parent => true,
            _ => self
                .wrapped_selector()
                .is_some_and(SelectorList::has_parent_reference),
        }
    }

    /// True for `%name`, or for a pseudo whose nested selector contains one.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        match self {
            Self::Placeholder(_) => true,
            _ => self
                .wrapped_selector()
                .is_some_and(SelectorList::has_placeholder),
        }
    }
}
