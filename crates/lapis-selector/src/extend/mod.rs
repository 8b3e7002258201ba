//! `@extend` resolution.
//!
//! Build, rewrite, merge: the directives of a stylesheet are indexed by
//! their target simple selectors, every rule's selector list is expanded
//! with the selectors that extend it, and targets that matched nothing are
//! reported once all lists have been seen.

mod resolver;
mod subset_map;

pub use resolver::{
    ExtendDirective, ExtendOptions, ExtendResolver, Redundancy, Resolution, resolve_extends,
};
pub use subset_map::{ExtendTargetMap, Extension};
