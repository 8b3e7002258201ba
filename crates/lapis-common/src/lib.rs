//! Common utilities for the Lapis stylesheet compiler.
//!
//! This crate provides shared infrastructure used by all compiler components:
//! - **Warning System** - colored, deduplicated terminal output for diagnostics

pub mod warning;

pub use warning::Severity;
