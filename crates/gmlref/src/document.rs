//! Document readers
//!
//! This module defines the `DocumentReader` trait implemented by concrete
//! input formats. A reader walks a document in order and drives a
//! [`ParseSession`]:
//!
//! ```text
//! Source → [DocumentReader] → features + references → [ParseSession] → LoadedDocument
//! ```
//!
//! Readers are responsible for:
//! - Parsing the source text
//! - Creating a placeholder for every `href` through the session
//! - Binding every identified geometry through the session
//!
//! The session is responsible for deduplication, resolution and the final
//! dangling-reference report.

use indexmap::IndexMap;

use crate::context::SessionConfig;
use crate::error::Result;
use crate::geometry::GeometryHandle;
use crate::session::{ParseOutcome, ParseSession};

/// A feature read from a document.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature identifier
    pub id: String,

    /// Geometry-valued properties in document order.
    ///
    /// Values may be [`GeometryReference`](crate::GeometryReference)
    /// placeholders; once the outcome is clean they all answer like the
    /// geometries they point to.
    pub geometries: IndexMap<String, GeometryHandle>,
}

impl Feature {
    /// Create a feature without geometries.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            geometries: IndexMap::new(),
        }
    }

    /// Add a geometry property (builder pattern).
    pub fn with_geometry(mut self, name: impl Into<String>, geometry: GeometryHandle) -> Self {
        self.geometries.insert(name.into(), geometry);
        self
    }

    /// Get a geometry property by name.
    pub fn geometry(&self, name: &str) -> Option<&GeometryHandle> {
        self.geometries.get(name)
    }
}

/// Features of a document plus its reference report.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Features in document order
    pub features: Vec<Feature>,

    /// Reference resolution report
    pub outcome: ParseOutcome,
}

impl LoadedDocument {
    /// Look up a feature by identifier.
    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }
}

/// A document format that can feed a parse session.
pub trait DocumentReader {
    /// Human-readable format name.
    fn name(&self) -> &str;

    /// File extension for documents in this format (without the dot).
    fn file_extension(&self) -> &str;

    /// Read `source`, registering references and binding targets in
    /// `session`.
    ///
    /// # Errors
    ///
    /// Syntax errors, malformed references and duplicate identifiers abort
    /// the read. Dangling references do not; they are reported by the
    /// session.
    fn read(&self, source: &str, session: &mut ParseSession) -> Result<Vec<Feature>>;
}

/// Read a whole document with `reader` in a fresh session.
pub fn load_str(
    reader: &dyn DocumentReader,
    source: &str,
    config: SessionConfig,
) -> Result<LoadedDocument> {
    let mut session = ParseSession::new(config);
    let features = reader.read(source, &mut session)?;
    let outcome = session.finish();
    tracing::debug!(
        format = reader.name(),
        features = features.len(),
        resolved = outcome.resolved,
        dangling = outcome.dangling.len(),
        "document loaded"
    );
    Ok(LoadedDocument { features, outcome })
}
