//! Textual rendering of selectors.
//!
//! The output is canonical CSS: one space around non-descendant
//! combinators, `", "` between alternatives (`",\n"` where the source had a
//! line break), pseudo-elements always with `::`.

use std::fmt;

use super::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Namespace, PseudoArgument,
    PseudoSelector, SelectorList, SimpleSelector,
};

impl fmt::Display for Namespace {
    /// The prefix including the `|`, or nothing for the implicit namespace.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implicit => Ok(()),
            Self::Empty => f.write_str("|"),
            Self::Any => f.write_str("*|"),
            Self::Named(prefix) => write!(f, "{prefix}|"),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}{}", self.namespace, self.name)?;
        if let Some(matcher) = &self.matcher {
            write!(f, "{}{}", matcher.operator, matcher.value)?;
            if let Some(modifier) = matcher.modifier {
                write!(f, " {modifier}")?;
            }
        }
        f.write_str("]")
    }
}

impl fmt::Display for PseudoSelector {
    /// The name and argument, without the leading colons.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match &self.argument {
            None => Ok(()),
            Some(PseudoArgument::Raw(raw)) => write!(f, "({raw})"),
            Some(PseudoArgument::Selector(list)) => write!(f, "({list})"),
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal(namespace) => write!(f, "{namespace}*"),
            Self::Type { namespace, name } => write!(f, "{namespace}{name}"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Attribute(attribute) => write!(f, "{attribute}"),
            Self::PseudoClass(pseudo) => write!(f, ":{pseudo}"),
            Self::PseudoElement(pseudo) => write!(f, "::{pseudo}"),
            Self::Placeholder(name) => write!(f, "%{name}"),
            Self::Parent => f.write_str("&"),
        }
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for simple in self {
            write!(f, "{simple}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        for link in self.links() {
            if let Some(head) = link.head().filter(|head| !head.is_empty()) {
                parts.push(head.to_string());
            }
            if !matches!(link.combinator(), Combinator::Descendant) {
                parts.push(link.combinator().symbol());
            }
        }
        f.write_str(&parts.join(" "))
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, alternative) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(if alternative.has_line_feed() { ",\n" } else { ", " })?;
            }
            write!(f, "{alternative}")?;
        }
        Ok(())
    }
}
