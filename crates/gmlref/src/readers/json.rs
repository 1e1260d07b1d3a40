//! JSON feature documents
//!
//! ```json
//! {
//!   "features": [
//!     { "id": "f1", "geometries": { "position": { "href": "#p2" } } },
//!     { "id": "f2", "geometries": { "position": {
//!         "type": "Point", "id": "p2", "crs": "EPSG:4326", "coordinates": [7.1, 50.7]
//!     } } }
//!   ]
//! }
//! ```
//!
//! A geometry value is either a reference (`{ "href": "...#id" }`) or an
//! inline `Point` / `Rectangle`. Inline geometries carrying an `id` are bound
//! in the session as soon as they are read. Unknown keys are rejected at
//! every level, so a reference object cannot carry inline members.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::document::{DocumentReader, Feature};
use crate::error::{RefError, Result};
use crate::geometry::{
    Crs, Envelope, GeometryHandle, Point, PrecisionModel, Rectangle, StandardProperties,
};
use crate::session::ParseSession;

// ═══════════════════════════════════════════════════════════════════════
// Wire Format
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentNode {
    #[serde(default)]
    features: Vec<FeatureNode>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeatureNode {
    id: String,
    #[serde(default)]
    geometries: IndexMap<String, GeometryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeometryNode {
    Reference(ReferenceNode),
    Inline(InlineNode),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReferenceNode {
    href: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
enum InlineKind {
    Point,
    Rectangle,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InlineNode {
    #[serde(rename = "type")]
    kind: InlineKind,
    id: Option<String>,
    crs: Option<String>,
    /// Fixed precision grid scale
    scale: Option<f64>,
    description: Option<String>,
    #[serde(default)]
    names: Vec<String>,
    coordinates: Option<Vec<f64>>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

fn required(kind: InlineKind, name: &str, value: Option<Vec<f64>>) -> Result<Vec<f64>> {
    value.ok_or_else(|| RefError::InvalidGeometry(format!("{:?} requires '{}'", kind, name)))
}

fn forbidden(kind: InlineKind, name: &str, value: &Option<Vec<f64>>) -> Result<()> {
    match value {
        Some(_) => Err(RefError::InvalidGeometry(format!(
            "{:?} does not take '{}'",
            kind, name
        ))),
        None => Ok(()),
    }
}

impl InlineNode {
    fn crs(&self, session: &ParseSession) -> Crs {
        match &self.crs {
            Some(name) => Crs::new(name.clone()),
            None => session.config().default_crs.clone(),
        }
    }

    fn precision(&self) -> PrecisionModel {
        match self.scale {
            Some(scale) => PrecisionModel::Fixed { scale },
            None => PrecisionModel::Floating,
        }
    }

    fn properties(&self) -> StandardProperties {
        StandardProperties {
            description: self.description.clone(),
            names: self.names.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Reader
// ═══════════════════════════════════════════════════════════════════════

/// Reader for JSON feature documents.
///
/// # Example
///
/// ```
/// use gmlref::document::load_str;
/// use gmlref::readers::JsonReader;
/// use gmlref::{Geometry, SessionConfig};
///
/// let source = r##"{ "features": [
///     { "id": "a", "geometries": { "at": { "href": "#p" } } },
///     { "id": "b", "geometries": { "at": { "type": "Point", "id": "p", "coordinates": [1, 2] } } }
/// ] }"##;
///
/// let doc = load_str(&JsonReader::new(), source, SessionConfig::default()).unwrap();
/// assert!(doc.outcome.is_clean());
/// let at = doc.feature("a").unwrap().geometry("at").unwrap();
/// assert_eq!(at.coordinate_dimension().unwrap(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonReader;

impl JsonReader {
    /// Create a new JSON reader.
    pub fn new() -> Self {
        Self
    }

    fn geometry(&self, node: GeometryNode, session: &mut ParseSession) -> Result<GeometryHandle> {
        match node {
            GeometryNode::Reference(ReferenceNode { href }) => {
                let reference: GeometryHandle = session.reference(&href)?;
                Ok(reference)
            }
            GeometryNode::Inline(inline) => self.inline(inline, session),
        }
    }

    fn inline(&self, node: InlineNode, session: &mut ParseSession) -> Result<GeometryHandle> {
        let crs = node.crs(session);
        let geometry: GeometryHandle = match node.kind {
            InlineKind::Point => {
                forbidden(node.kind, "lower", &node.lower)?;
                forbidden(node.kind, "upper", &node.upper)?;
                let coordinates = required(node.kind, "coordinates", node.coordinates.clone())?;
                let mut point = Point::new(coordinates, crs)?
                    .with_precision(node.precision())
                    .with_properties(node.properties());
                if let Some(id) = &node.id {
                    point = point.with_id(id.clone());
                }
                Arc::new(point)
            }
            InlineKind::Rectangle => {
                forbidden(node.kind, "coordinates", &node.coordinates)?;
                let lower = required(node.kind, "lower", node.lower.clone())?;
                let upper = required(node.kind, "upper", node.upper.clone())?;
                let mut rect = Rectangle::new(Envelope::new(lower, upper, crs)?)
                    .with_precision(node.precision())
                    .with_properties(node.properties());
                if let Some(id) = &node.id {
                    rect = rect.with_id(id.clone());
                }
                Arc::new(rect)
            }
        };

        if let Some(id) = &node.id {
            session.bind(id, Arc::clone(&geometry))?;
        }
        Ok(geometry)
    }
}

impl DocumentReader for JsonReader {
    fn name(&self) -> &str {
        "JSON"
    }

    fn file_extension(&self) -> &str {
        "json"
    }

    fn read(&self, source: &str, session: &mut ParseSession) -> Result<Vec<Feature>> {
        let document: DocumentNode = serde_json::from_str(source)?;

        let mut features = Vec::with_capacity(document.features.len());
        for node in document.features {
            let mut feature = Feature::new(node.id);
            for (name, geometry) in node.geometries {
                let handle = self.geometry(geometry, session)?;
                feature.geometries.insert(name, handle);
            }
            features.push(feature);
        }
        Ok(features)
    }
}
