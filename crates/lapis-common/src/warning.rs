//! Compiler diagnostics with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same diagnostic multiple
//! times when one directive is reported from several rules.

use std::collections::HashSet;
use std::sync::Mutex;

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Global set of diagnostics we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// How serious a reported diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// The compilation continues and the output is still meaningful.
    Warning,
    /// The offending directive was skipped.
    Error,
}

/// Report a diagnostic once per unique `(severity, component, message)`.
///
/// Returns `true` if the diagnostic was printed, `false` if it had already
/// been reported since the last [`clear_warnings`].
///
/// # Panics
/// Panics if the global diagnostic set mutex is poisoned.
pub fn report(severity: Severity, component: &str, message: &str) -> bool {
    let key = format!("{severity}[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        let (color, marker) = match severity {
            Severity::Warning => (YELLOW, "⚠"),
            Severity::Error => (RED, "✖"),
        };
        eprintln!("{color}[Lapis {component}] {marker} {severity}: {message}{RESET}");
    }
    should_print
}

/// Clear all recorded diagnostics (call before compiling a new stylesheet)
///
/// # Panics
/// Panics if the global diagnostic set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_deduplicates() {
        clear_warnings();
        assert!(report(Severity::Warning, "Test", "dedup probe"));
        assert!(!report(Severity::Warning, "Test", "dedup probe"));
        // Same message at a different severity is a distinct diagnostic.
        assert!(report(Severity::Error, "Test", "dedup probe"));
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!("error".parse::<Severity>().ok(), Some(Severity::Error));
    }
}
