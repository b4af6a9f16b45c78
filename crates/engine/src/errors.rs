//! Error taxonomy for engine operations

use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// Every polling operation is deadline-bounded, so the engine never hangs:
/// a wait either returns its match or fails with one of the timeout
/// variants below. Errors carry the offending selector or text for
/// diagnosability, and no partial state survives a failure (the pointer
/// position only commits after a completed move).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A mandatory argument was omitted or empty. Raised synchronously
    /// before any asynchronous work begins; never retried.
    #[error("Argument '{0}' is required")]
    MissingArgument(String),

    /// A single-target wait exceeded its deadline.
    #[error("No element with selector '{selector}'{} found", text_clause(.text))]
    ElementNotFound {
        selector: String,
        text: Option<String>,
    },

    /// A quorum wait exceeded its deadline without satisfying its spec.
    #[error("No matching elements found")]
    NoMatchingElements { selectors: Vec<String> },

    /// The stability-gated action exhausted its retry budget because the
    /// target kept moving during pointer travel.
    #[error("Target '{0}' kept moving during pointer travel")]
    TargetUnstable(String),

    /// `select` was invoked with none of value/index/label supplied.
    #[error("Select requires one of value, index or label")]
    InvalidSelection,

    /// The engine's cancellation token fired while the operation was
    /// suspended at a poll boundary.
    #[error("Operation cancelled while waiting for '{0}'")]
    Cancelled(String),
}

impl EngineError {
    /// Create a not-found error for a plain element wait.
    pub fn not_found(selector: impl Into<String>) -> Self {
        EngineError::ElementNotFound {
            selector: selector.into(),
            text: None,
        }
    }

    /// Create a not-found error for a text wait.
    pub fn text_not_found(selector: impl Into<String>, text: impl Into<String>) -> Self {
        EngineError::ElementNotFound {
            selector: selector.into(),
            text: Some(text.into()),
        }
    }

    /// Whether this error is a deadline expiry rather than a usage error.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            EngineError::ElementNotFound { .. } | EngineError::NoMatchingElements { .. }
        )
    }
}

fn text_clause(text: &Option<String>) -> String {
    match text {
        Some(t) => format!(" and text '{}'", t),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_selector_and_text() {
        let err = EngineError::not_found("#login");
        assert_eq!(err.to_string(), "No element with selector '#login' found");

        let err = EngineError::text_not_found("#status", "ready");
        assert_eq!(
            err.to_string(),
            "No element with selector '#status' and text 'ready' found"
        );
    }

    #[test]
    fn timeout_classification() {
        assert!(EngineError::not_found("#a").is_timeout());
        assert!(EngineError::NoMatchingElements { selectors: vec![] }.is_timeout());
        assert!(!EngineError::InvalidSelection.is_timeout());
        assert!(!EngineError::MissingArgument("selector".into()).is_timeout());
    }
}
