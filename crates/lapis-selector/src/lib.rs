//! Selector algebra and `@extend` resolution for the Lapis stylesheet compiler.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector model** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Simple, compound, and complex selectors and selector lists
//!   - Placeholder (`%name`) and parent (`&`) selectors
//!   - Canonical textual rendering
//!
//! - **Specificity** ([§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules))
//!
//! - **Superselector relation**
//!   - Compound, complex, and list forms
//!   - Selector pseudo-classes (`:not`, `:matches`, `:is`, ...)
//!
//! - **Unification** of compounds, complex selectors, and lists, built on
//!   weaving of selector sequences
//!
//! - **`@extend` resolution**
//!   - Target map keyed by simple selectors
//!   - Recursive extension with cycle detection
//!   - Unmatched and invalid target diagnostics
//!
//! - **Flat stylesheets**: reading selector text and rules, compiling them to CSS
//!
//! # Not Yet Implemented
//!
//! - Nested rules and parent selector resolution
//! - Media-context checks for `@extend`
//! - Extending selectors inside `:not(...)` arguments

/// Errors from parsing and diagnostics from `@extend`.
pub mod error;
/// `@extend` resolution.
pub mod extend;
/// Flat sequence form of complex selectors used by weaving and `@extend`.
pub mod node;
/// Selector parser per [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax).
pub mod parser;
/// The selector data model.
pub mod selector;
/// Specificity per [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules).
pub mod specificity;
/// Flat stylesheets and compilation.
pub mod stylesheet;
/// The superselector relation.
pub mod superselector;
/// Selector unification.
pub mod unify;
/// Interleaving of selector sequences.
pub mod weave;

// Re-exports for convenience
pub use error::{ExtendError, ParseError};
pub use extend::{
    ExtendDirective, ExtendOptions, ExtendResolver, Redundancy, Resolution, resolve_extends,
};
pub use parser::{parse_complex, parse_compound, parse_selector_list};
pub use selector::{
    Combinator, ComplexSelector, CompoundSelector, Namespace, PseudoSelector, SelectorList,
    SimpleSelector,
};
pub use stylesheet::{Compilation, Stylesheet, compile};
pub use superselector::Superselector;
