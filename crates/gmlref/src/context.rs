//! Parse session configuration

use crate::geometry::Crs;

/// How dangling references are reported when a session finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Log at `warn` level
    #[default]
    Warning,

    /// Log at `error` level
    Error,
}

/// Configuration for a parse session.
///
/// Passed to [`ParseSession::new`](crate::ParseSession::new) and shared by
/// the registry and the document loader.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum number of reference occurrences in one session
    pub max_references: usize,

    /// Log level used for dangling references
    pub dangling_severity: Severity,

    /// CRS assigned to inline geometries that do not name one
    pub default_crs: Crs,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_references: 10_000,
            dangling_severity: Severity::Warning,
            default_crs: Crs::new("EPSG:4326"),
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference limit.
    pub fn with_max_references(mut self, max: usize) -> Self {
        self.max_references = max;
        self
    }

    /// Set the severity used for dangling references.
    pub fn with_dangling_severity(mut self, severity: Severity) -> Self {
        self.dangling_severity = severity;
        self
    }

    /// Set the default CRS for inline geometries.
    pub fn with_default_crs(mut self, crs: impl Into<String>) -> Self {
        self.default_crs = Crs::new(crs);
        self
    }
}
