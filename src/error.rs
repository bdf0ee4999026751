use thiserror::Error;

/// Boxed error returned by native supplier functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building an object.
///
/// Every failure aborts the whole build: the partially populated object is
/// dropped and never handed back to the caller.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The builder was called with fewer than one or more than three arguments.
    #[error("incorrect number of arguments: expected 1 to 3, found {found}")]
    ArgumentCount { found: usize },

    /// A three-argument build received a key supplier that is not a function,
    /// an array or an object.
    #[error("invalid key supplier: expected a function, array or object, found {kind}")]
    InvalidKeySupplier { kind: &'static str },

    /// The value supplier has a shape with no sensible constant meaning.
    #[error("invalid value supplier: expected a function, array, object or primitive, found {kind}")]
    InvalidValueSupplier { kind: &'static str },

    /// The source is null or undefined, or a key/element source is neither
    /// iterable nor an object.
    #[error("invalid source: expected an iterable or an object, found {kind}")]
    InvalidSource { kind: &'static str },

    /// A supplier function returned an error.
    #[error("supplier function failed: {source}")]
    Supplier { source: BoxError },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    /// Test that error messages name what was expected and what was found.
    ///
    /// This test verifies that:
    /// 1. The argument count message states the accepted range
    /// 2. The key supplier message includes the offending kind
    fn test_messages_identify_the_problem() {
        let err = BuildError::ArgumentCount { found: 4 };
        assert_eq!(
            err.to_string(),
            "incorrect number of arguments: expected 1 to 3, found 4"
        );

        let err = BuildError::InvalidKeySupplier { kind: "string" };
        assert!(err.to_string().contains("invalid key supplier"));
        assert!(err.to_string().ends_with("found string"));
    }

    #[test]
    /// Test that a failing supplier keeps the original error as its source.
    fn test_supplier_error_exposes_source() {
        let inner: BoxError = "boom".into();
        let err = BuildError::Supplier { source: inner };

        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));
        assert_eq!(err.to_string(), "supplier function failed: boom");
    }
}
