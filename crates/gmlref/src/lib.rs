//! # gmlref
//!
//! Deferred resolution of document-local geometry references.
//!
//! Documents such as GML point to geometries with `xlink:href="#id"`, often
//! before the geometry with that identifier has been parsed. gmlref hands
//! the parser a [`GeometryReference`] for each such link. The placeholder
//! implements [`Geometry`] like any concrete geometry and forwards every
//! operation to its target once the target has been bound.
//!
//! ## Architecture
//!
//! - **Reference**: set-once placeholder forwarding to its delegate
//! - **Registry**: per-session table deduplicating references by identifier
//! - **Binder**: resolves every pending reference for a parsed target
//! - **Session**: parser-facing API and dangling-reference report
//! - **Readers**: document formats driving a session
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use gmlref::{Crs, Geometry, ParseSession, Point, SessionConfig};
//!
//! let mut session = ParseSession::new(SessionConfig::default());
//!
//! // A feature refers to "#p1" before p1 is parsed
//! let placeholder = session.reference("doc.gml#p1").unwrap();
//!
//! // ...later the parser reaches p1
//! let p1 = Point::new(vec![7.1, 50.7], Crs::new("EPSG:4326")).unwrap().with_id("p1");
//! session.bind("p1", Arc::new(p1)).unwrap();
//!
//! assert!(session.finish().is_clean());
//! assert_eq!(placeholder.crs().unwrap().name(), "EPSG:4326");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binder;
pub mod context;
pub mod document;
pub mod error;
pub mod geometry;
pub mod readers;
pub mod reference;
pub mod registry;
pub mod session;

// Re-export main types
pub use binder::Binder;
pub use context::{SessionConfig, Severity};
pub use document::{load_str, DocumentReader, Feature, LoadedDocument};
pub use error::{RefError, Result};
pub use geometry::{
    Crs, Envelope, Geometry, GeometryHandle, GeometryType, Measure, Point, PrecisionModel,
    Rectangle, StandardProperties,
};
pub use reference::GeometryReference;
pub use registry::ReferenceRegistry;
pub use session::{DanglingReference, ParseOutcome, ParseSession};

/// gmlref version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
