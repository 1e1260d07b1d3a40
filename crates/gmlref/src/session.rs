//! Parse sessions
//!
//! A [`ParseSession`] is the parser-facing entry point: it owns one
//! [`ReferenceRegistry`] for the duration of one document and reports the
//! identifiers that were never bound once the document is done.

use std::sync::Arc;

use crate::context::{SessionConfig, Severity};
use crate::error::{RefError, Result};
use crate::geometry::GeometryHandle;
use crate::reference::GeometryReference;
use crate::registry::ReferenceRegistry;

/// An identifier that was referenced but never bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// The fragment identifier
    pub id: String,

    /// How many times the document referenced it
    pub occurrences: usize,
}

/// Result of a finished parse session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Unbound identifiers, in first-seen order
    pub dangling: Vec<DanglingReference>,

    /// Number of references resolved during the session
    pub resolved: usize,
}

impl ParseOutcome {
    /// Whether every reference was resolved.
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
    }

    /// The unbound identifiers.
    pub fn dangling_ids(&self) -> Vec<&str> {
        self.dangling.iter().map(|d| d.id.as_str()).collect()
    }

    /// Turn dangling references into an error.
    ///
    /// # Errors
    ///
    /// `DanglingReferences` listing every unbound identifier.
    pub fn into_result(self) -> Result<usize> {
        if self.is_clean() {
            Ok(self.resolved)
        } else {
            Err(RefError::DanglingReferences {
                ids: self.dangling.into_iter().map(|d| d.id).collect(),
            })
        }
    }
}

/// State of one document parse.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gmlref::{Crs, ParseSession, Point, SessionConfig};
///
/// let mut session = ParseSession::new(SessionConfig::default());
/// let _a = session.reference("#a").unwrap();
/// let _b = session.reference("#b").unwrap();
///
/// let point = Point::new(vec![0.0, 0.0], Crs::new("EPSG:4326")).unwrap();
/// session.bind("a", Arc::new(point)).unwrap();
///
/// let outcome = session.finish();
/// assert_eq!(outcome.dangling_ids(), vec!["b"]);
/// ```
#[derive(Debug)]
pub struct ParseSession {
    config: SessionConfig,
    registry: ReferenceRegistry,
    resolved: usize,
}

impl Default for ParseSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl ParseSession {
    /// Start a session.
    pub fn new(config: SessionConfig) -> Self {
        let registry = ReferenceRegistry::new(&config);
        Self {
            config,
            registry,
            resolved: 0,
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The session registry (for inspection).
    pub fn registry(&self) -> &ReferenceRegistry {
        &self.registry
    }

    /// Get a reference placeholder for `href`.
    ///
    /// See [`ReferenceRegistry::lookup_or_create`].
    pub fn reference(&mut self, href: &str) -> Result<Arc<GeometryReference>> {
        let reference = self.registry.lookup_or_create(href)?;
        // Backward references are resolved on creation
        if self.registry.is_bound(reference.identifier()) {
            self.resolved += 1;
        }
        Ok(reference)
    }

    /// Bind a parsed target to its identifier.
    ///
    /// See [`Binder::bind`](crate::Binder::bind).
    pub fn bind(&mut self, id: &str, target: GeometryHandle) -> Result<usize> {
        let count = self.registry.binder().bind(id, target)?;
        self.resolved += count;
        Ok(count)
    }

    /// End the session and report unbound identifiers.
    ///
    /// Each dangling identifier is logged once, at the configured severity.
    pub fn finish(self) -> ParseOutcome {
        let dangling: Vec<DanglingReference> = self
            .registry
            .finalize()
            .into_iter()
            .map(|id| DanglingReference {
                occurrences: self.registry.occurrences(&id),
                id,
            })
            .collect();

        for d in &dangling {
            match self.config.dangling_severity {
                Severity::Warning => tracing::warn!(
                    id = %d.id,
                    occurrences = d.occurrences,
                    "dangling geometry reference"
                ),
                Severity::Error => tracing::error!(
                    id = %d.id,
                    occurrences = d.occurrences,
                    "dangling geometry reference"
                ),
            }
        }

        ParseOutcome {
            dangling,
            resolved: self.resolved,
        }
    }
}
