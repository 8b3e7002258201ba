//! Errors surfaced to users of the selector core.

use lapis_common::Severity;
use serde::Serialize;
use thiserror::Error;

/// Errors from reading selector or stylesheet text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character that cannot start or continue the current construct.
    #[error("unexpected character '{ch}' at byte {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset into the input.
        offset: usize,
    },

    /// The input ended in the middle of a construct.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd {
        /// What the parser was looking for.
        expected: &'static str,
    },

    /// A selector, or one alternative of a list, was empty.
    #[error("empty selector at byte {offset}")]
    EmptySelector {
        /// Byte offset where the selector should have started.
        offset: usize,
    },

    /// A quoted string, attribute selector, pseudo argument, or comment was
    /// not closed.
    #[error("unterminated {what} starting at byte {offset}")]
    Unterminated {
        /// What was left open.
        what: &'static str,
        /// Byte offset of the opening delimiter.
        offset: usize,
    },

    /// A style rule inside another style rule.
    #[error("nested rule at byte {offset}: only flat stylesheets are supported")]
    NestedRule {
        /// Byte offset of the inner `{`.
        offset: usize,
    },

    /// An at-rule other than `@extend`.
    #[error("unsupported at-rule '@{name}' at byte {offset}")]
    UnsupportedAtRule {
        /// The at-rule name without `@`.
        name: String,
        /// Byte offset of the `@`.
        offset: usize,
    },
}

/// A diagnostic about one `@extend` directive.
///
/// Neither condition aborts a compilation: an invalid target skips the
/// directive, an unmatched target makes it a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ExtendError {
    /// The target is not a single compound selector.
    #[error("\"{extender}\" can't extend \"{target}\": only compound selectors can be extended")]
    InvalidTarget {
        /// The target as written.
        target: String,
        /// The extending selector.
        extender: String,
    },

    /// No selector in the stylesheet contains the target.
    #[error("\"{extender}\" failed to @extend \"{target}\": the selector was not found")]
    UnmatchedTarget {
        /// The target as written.
        target: String,
        /// The extending selector.
        extender: String,
    },
}

impl ExtendError {
    /// How serious the condition is.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::InvalidTarget { .. } => Severity::Error,
            Self::UnmatchedTarget { .. } => Severity::Warning,
        }
    }
}
