//! Error types for XML operations
//!
//! This module defines the error type shared by the parser, serializer,
//! XPath evaluator and the Junos helpers built on top of them.

use thiserror::Error;

/// Errors raised while parsing, serializing or querying XML
#[derive(Debug, Error)]
pub enum JxmlError {
    /// Bad parameter, such as a conflicting namespace declaration
    #[error("Bad parameter: {0}")]
    BadParam(String),

    /// Bad XPath expression
    #[error("Bad XPath: {0}")]
    BadXPath(String),

    /// Malformed XML input
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Tree that cannot be written as well-formed XML
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Failure of the underlying XML writer
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// XPath construct outside the supported subset
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Result alias used throughout the crate
pub type JxmlResult<T> = Result<T, JxmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JxmlError::BadXPath("a[".to_string());
        assert_eq!(err.to_string(), "Bad XPath: a[");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WriteZero, "sink closed");
        let err: JxmlError = io_err.into();
        assert!(matches!(err, JxmlError::IoError(_)));
    }
}
