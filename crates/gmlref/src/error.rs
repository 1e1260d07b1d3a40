//! Error types for reference resolution and geometry operations

use thiserror::Error;

/// Main error type for gmlref operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefError {
    /// Reference string has no `#` fragment separator
    #[error("Reference string (='{href}') does not contain a '#' fragment identifier")]
    MalformedReference {
        /// The offending reference string
        href: String,
    },

    /// Capability operation invoked before the reference was resolved
    #[error("Geometry reference '#{id}' has not been resolved")]
    UnresolvedReference {
        /// Fragment identifier of the reference
        id: String,
    },

    /// A reference (or identifier) was resolved a second time
    #[error("Internal error: geometry reference '#{id}' has already been resolved")]
    AlreadyResolved {
        /// Fragment identifier of the reference
        id: String,
    },

    /// A reference was asked to resolve to itself
    #[error("Geometry reference '#{id}' cannot be resolved to itself")]
    SelfReference {
        /// Fragment identifier of the reference
        id: String,
    },

    /// Identifiers referenced in a document but never resolved
    #[error("Dangling references: {}", format_ids(.ids))]
    DanglingReferences {
        /// Unresolved identifiers, in first-seen order
        ids: Vec<String>,
    },

    /// The session reference limit was exceeded
    #[error("Too many references in one session (max {max})")]
    TooManyReferences {
        /// Configured maximum
        max: usize,
    },

    /// Operands of a binary operation use different coordinate systems
    #[error("CRS mismatch: {left} vs {right}")]
    CrsMismatch {
        /// CRS of the receiver
        left: String,
        /// CRS of the argument
        right: String,
    },

    /// Operands of a binary operation have different coordinate dimensions
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension of the receiver
        expected: usize,
        /// Dimension of the argument
        got: usize,
    },

    /// Geometry construction with invalid coordinates
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Operation result cannot be represented by the geometry kernel
    #[error("Unsupported geometry operation: {0}")]
    Unsupported(String),

    /// The input document could not be read
    #[error("Document error: {0}")]
    Document(String),
}

impl From<serde_json::Error> for RefError {
    fn from(err: serde_json::Error) -> Self {
        RefError::Document(err.to_string())
    }
}

fn format_ids(ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("#{}", id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for gmlref operations
pub type Result<T> = std::result::Result<T, RefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_message_lists_every_id() {
        let err = RefError::DanglingReferences {
            ids: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Dangling references: #a, #b");
    }

    #[test]
    fn test_malformed_message_quotes_href() {
        let err = RefError::MalformedReference {
            href: "http://example.org/doc".to_string(),
        };
        assert!(err.to_string().contains("http://example.org/doc"));
    }
}
