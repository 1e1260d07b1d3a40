//! Geometry capability set
//!
//! [`Geometry`] is the interface shared by concrete geometries and by
//! [`GeometryReference`](crate::GeometryReference) placeholders. Consumers
//! program against `&dyn Geometry` or [`GeometryHandle`] and never need to
//! know which of the two they hold.
//!
//! Every operation is fallible: a placeholder that has not been resolved yet
//! answers with [`RefError::UnresolvedReference`](crate::RefError) instead of
//! a value.
//!
//! The concrete kernel ([`Point`], [`Rectangle`]) is envelope-based: spatial
//! predicates compare bounding envelopes, and constructive operations return
//! a result only when it is itself representable as an envelope.

mod kernel;
mod primitives;
mod props;

pub use primitives::{Point, Rectangle};
pub use props::{Crs, Envelope, Measure, PrecisionModel, StandardProperties};

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::reference::GeometryReference;

/// Shared handle to a geometry.
///
/// Document graphs and references share targets through this handle, so a
/// target referenced from several places is owned exactly once.
pub type GeometryHandle = Arc<dyn Geometry>;

/// Kind of a concrete geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    /// A single position
    Point,

    /// An axis-aligned box
    Rectangle,
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryType::Point => write!(f, "Point"),
            GeometryType::Rectangle => write!(f, "Rectangle"),
        }
    }
}

/// Operations every geometry supports.
///
/// Binary operations take the other operand as `&dyn Geometry`; the
/// receiver is always `self`.
pub trait Geometry: fmt::Debug + Send + Sync {
    /// Document identifier, if the geometry has one.
    fn id(&self) -> Option<&str>;

    /// Kind of geometry.
    fn geometry_type(&self) -> Result<GeometryType>;

    /// Number of ordinates per position.
    fn coordinate_dimension(&self) -> Result<usize>;

    /// Coordinate reference system.
    fn crs(&self) -> Result<Crs>;

    /// Precision model of the coordinates.
    fn precision(&self) -> Result<PrecisionModel>;

    /// Bounding envelope.
    fn envelope(&self) -> Result<Envelope>;

    /// Whether `other` lies completely inside this geometry.
    fn contains(&self, other: &dyn Geometry) -> Result<bool>;

    /// Whether this geometry and `other` share at least one position.
    fn intersects(&self, other: &dyn Geometry) -> Result<bool>;

    /// Whether this geometry lies completely inside `other`.
    fn is_within(&self, other: &dyn Geometry) -> Result<bool>;

    /// Spatial equality.
    fn equals(&self, other: &dyn Geometry) -> Result<bool>;

    /// Shortest distance to `other`, in CRS units.
    fn distance(&self, other: &dyn Geometry) -> Result<f64>;

    /// Whether `other` is no farther than `distance`.
    fn is_within_distance(&self, other: &dyn Geometry, distance: &Measure) -> Result<bool>;

    /// Whether `other` is farther than `distance`.
    fn is_beyond(&self, other: &dyn Geometry, distance: &Measure) -> Result<bool>;

    /// Geometry grown by `distance` in every direction.
    fn buffer(&self, distance: &Measure) -> Result<GeometryHandle>;

    /// Smallest convex geometry containing this one.
    fn convex_hull(&self) -> Result<GeometryHandle>;

    /// Shared part of both geometries, `None` when they are disjoint.
    fn intersection(&self, other: &dyn Geometry) -> Result<Option<GeometryHandle>>;

    /// Combined geometry.
    fn union(&self, other: &dyn Geometry) -> Result<GeometryHandle>;

    /// Part of this geometry not covered by `other`, `None` when empty.
    fn difference(&self, other: &dyn Geometry) -> Result<Option<GeometryHandle>>;

    /// Descriptive GML properties (description, names).
    fn standard_properties(&self) -> Result<StandardProperties>;

    /// Replace the descriptive GML properties.
    fn set_standard_properties(&self, props: StandardProperties) -> Result<()>;

    /// This geometry as a reference placeholder, if it is one.
    fn as_reference(&self) -> Option<&GeometryReference> {
        None
    }
}
