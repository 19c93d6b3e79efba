//! Error types for ctxmenu-core.

use thiserror::Error;

/// Selector parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Empty selector
    #[error("empty selector")]
    Empty,
    /// Unexpected character
    #[error("unexpected character: '{0}'")]
    UnexpectedChar(char),
    /// Expected identifier
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// Invalid attribute syntax
    #[error("invalid attribute syntax")]
    InvalidAttribute,
    /// Unclosed attribute bracket
    #[error("unclosed attribute bracket")]
    UnclosedAttribute,
    /// Combinator with nothing on one side (`"> li"`, `"ul >"`, `"a,"`)
    #[error("dangling combinator")]
    DanglingCombinator,
}

/// Errors raised by a [`Dom`](crate::Dom) backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// Node handle does not belong to this document
    #[error("unknown node: {0}")]
    UnknownNode(String),
    /// Selector could not be parsed
    #[error("invalid selector '{selector}': {source}")]
    InvalidSelector {
        /// Selector text
        selector: String,
        /// Parse failure
        #[source]
        source: SelectorError,
    },
    /// Host environment refused the operation
    #[error("host error: {0}")]
    Host(String),
}

/// Result alias for DOM operations.
pub type DomResult<T> = Result<T, DomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_error_display_all_variants() {
        assert_eq!(SelectorError::Empty.to_string(), "empty selector");
        assert_eq!(
            SelectorError::UnexpectedChar('@').to_string(),
            "unexpected character: '@'"
        );
        assert_eq!(
            SelectorError::ExpectedIdentifier.to_string(),
            "expected identifier"
        );
        assert_eq!(
            SelectorError::InvalidAttribute.to_string(),
            "invalid attribute syntax"
        );
        assert_eq!(
            SelectorError::UnclosedAttribute.to_string(),
            "unclosed attribute bracket"
        );
        assert_eq!(
            SelectorError::DanglingCombinator.to_string(),
            "dangling combinator"
        );
    }

    #[test]
    fn test_dom_error_display() {
        let err = DomError::InvalidSelector {
            selector: "..x".to_string(),
            source: SelectorError::ExpectedIdentifier,
        };
        assert_eq!(
            err.to_string(),
            "invalid selector '..x': expected identifier"
        );
        assert_eq!(
            DomError::UnknownNode("#9".to_string()).to_string(),
            "unknown node: #9"
        );
        assert_eq!(DomError::Host("boom".to_string()).to_string(), "host error: boom");
    }

    #[test]
    fn test_dom_error_source_chain() {
        use std::error::Error as _;
        let err = DomError::InvalidSelector {
            selector: String::new(),
            source: SelectorError::Empty,
        };
        assert!(err.source().is_some());
    }
}
