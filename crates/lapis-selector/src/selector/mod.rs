//! The selector data model.
//!
//! Four entity kinds, leaves first:
//! - [`SimpleSelector`] — one atomic condition (`div`, `.a`, `[href]`, `:hover`, `%ph`, `&`)
//! - [`CompoundSelector`] — simple selectors with no combinator between them
//! - [`ComplexSelector`] — compound selectors linked by [`Combinator`]s
//! - [`SelectorList`] — comma-separated alternatives
//!
//! Trees are value types. Compound heads inside a chain are shared through
//! reference counting and copied on write, so specializing one outcome of
//! unification or `@extend` never changes another.

mod complex;
mod compound;
mod display;
mod list;
mod simple;

pub use complex::{Combinator, ComplexSelector};
pub use compound::{CompoundSelector, SourcesSet};
pub use list::SelectorList;
pub use simple::{
    AttributeMatcher, AttributeOperator, AttributeSelector, Namespace, PseudoArgument,
    PseudoSelector, SimpleSelector,
};
