//! Concrete geometries: points and rectangles

use std::sync::RwLock;

use super::kernel;
use super::{
    Crs, Envelope, Geometry, GeometryHandle, GeometryType, Measure, PrecisionModel,
    StandardProperties,
};
use crate::error::{RefError, Result};

/// State common to every concrete geometry.
#[derive(Debug, Default)]
struct Common {
    id: Option<String>,
    precision: PrecisionModel,
    // Interior mutability: geometries are shared through `Arc`
    props: RwLock<StandardProperties>,
}

impl Common {
    fn props(&self) -> StandardProperties {
        self.props
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_props(&self, props: StandardProperties) {
        *self
            .props
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = props;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Point
// ═══════════════════════════════════════════════════════════════════════

/// A single position.
#[derive(Debug)]
pub struct Point {
    coords: Vec<f64>,
    crs: Crs,
    common: Common,
}

impl Point {
    /// Create an anonymous point.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` if `coords` is empty or contains a non-finite value.
    pub fn new(coords: Vec<f64>, crs: Crs) -> Result<Self> {
        if coords.is_empty() {
            return Err(RefError::InvalidGeometry(
                "point needs at least one ordinate".to_string(),
            ));
        }
        if coords.iter().any(|v| !v.is_finite()) {
            return Err(RefError::InvalidGeometry(
                "point ordinates must be finite".to_string(),
            ));
        }
        Ok(Self::from_position(coords, crs))
    }

    pub(super) fn from_position(coords: Vec<f64>, crs: Crs) -> Self {
        Self {
            coords,
            crs,
            common: Common::default(),
        }
    }

    /// Set the document identifier (builder pattern).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.common.id = Some(id.into());
        self
    }

    /// Set the precision model (builder pattern).
    pub fn with_precision(mut self, precision: PrecisionModel) -> Self {
        self.common.precision = precision;
        self
    }

    /// Set the standard properties (builder pattern).
    pub fn with_properties(self, props: StandardProperties) -> Self {
        self.common.set_props(props);
        self
    }

    /// The ordinates of the position.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }
}

impl Geometry for Point {
    fn id(&self) -> Option<&str> {
        self.common.id.as_deref()
    }

    fn geometry_type(&self) -> Result<GeometryType> {
        Ok(GeometryType::Point)
    }

    fn coordinate_dimension(&self) -> Result<usize> {
        Ok(self.coords.len())
    }

    fn crs(&self) -> Result<Crs> {
        Ok(self.crs.clone())
    }

    fn precision(&self) -> Result<PrecisionModel> {
        Ok(self.common.precision)
    }

    fn envelope(&self) -> Result<Envelope> {
        Ok(Envelope::from_position(&self.coords, self.crs.clone()))
    }

    fn contains(&self, other: &dyn Geometry) -> Result<bool> {
        kernel::contains(self, other)
    }

    fn intersects(&self, other: &dyn Geometry) -> Result<bool> {
        kernel::intersects(self, other)
    }

    fn is_within(&self, other: &dyn Geometry) -> Result<bool> {
        kernel::is_within(self, other)
    }

    fn equals(&self, other: &dyn Geometry) -> Result<bool> {
        kernel::equals(self, other)
    }

    fn distance(&self, other: &dyn Geometry) -> Result<f64> {
        kernel::distance(self, other)
    }

    fn is_within_distance(&self, other: &dyn Geometry, distance: &Measure) -> Result<bool> {
        kernel::is_within_distance(self, other, distance)
    }

    fn is_beyond(&self, other: &dyn Geometry, distance: &Measure) -> Result<bool> {
        kernel::is_beyond(self, other, distance)
    }

    fn buffer(&self, distance: &Measure) -> Result<GeometryHandle> {
        kernel::buffer(self, distance)
    }

    fn convex_hull(&self) -> Result<GeometryHandle> {
        kernel::convex_hull(self)
    }

    fn intersection(&self, other: &dyn Geometry) -> Result<Option<GeometryHandle>> {
        kernel::intersection(self, other)
    }

    fn union(&self, other: &dyn Geometry) -> Result<GeometryHandle> {
        kernel::union(self, other)
    }

    fn difference(&self, other: &dyn Geometry) -> Result<Option<GeometryHandle>> {
        kernel::difference(self, other)
    }

    fn standard_properties(&self) -> Result<StandardProperties> {
        Ok(self.common.props())
    }

    fn set_standard_properties(&self, props: StandardProperties) -> Result<()> {
        self.common.set_props(props);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Rectangle
// ═══════════════════════════════════════════════════════════════════════

/// An axis-aligned box.
#[derive(Debug)]
pub struct Rectangle {
    bounds: Envelope,
    common: Common,
}

impl Rectangle {
    /// Create an anonymous rectangle covering `bounds`.
    pub fn new(bounds: Envelope) -> Self {
        Self {
            bounds,
            common: Common::default(),
        }
    }

    /// Set the document identifier (builder pattern).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.common.id = Some(id.into());
        self
    }

    /// Set the precision model (builder pattern).
    pub fn with_precision(mut self, precision: PrecisionModel) -> Self {
        self.common.precision = precision;
        self
    }

    /// Set the standard properties (builder pattern).
    pub fn with_properties(self, props: StandardProperties) -> Self {
        self.common.set_props(props);
        self
    }
}

impl Geometry for Rectangle {
    fn id(&self) -> Option<&str> {
        self.common.id.as_deref()
    }

    fn geometry_type(&self) -> Result<GeometryType> {
        Ok(GeometryType::Rectangle)
    }

    fn coordinate_dimension(&self) -> Result<usize> {
        Ok(self.bounds.dimension())
    }

    fn crs(&self) -> Result<Crs> {
        Ok(self.bounds.crs().clone())
    }

    fn precision(&self) -> Result<PrecisionModel> {
        Ok(self.common.precision)
    }

    fn envelope(&self) -> Result<Envelope> {
        Ok(self.bounds.clone())
    }

    fn contains(&self, other: &dyn Geometry) -> Result<bool> {
        kernel::contains(self, other)
    }

    fn intersects(&self, other: &dyn Geometry) -> Result<bool> {
        kernel::intersects(self, other)
    }

    fn is_within(&self, other: &dyn Geometry) -> Result<bool> {
        kernel::is_within(self, other)
    }

    fn equals(&self, other: &dyn Geometry) -> Result<bool> {
        kernel::equals(self, other)
    }

    fn distance(&self, other: &dyn Geometry) -> Result<f64> {
        kernel::distance(self, other)
    }

    fn is_within_distance(&self, other: &dyn Geometry, distance: &Measure) -> Result<bool> {
        kernel::is_within_distance(self, other, distance)
    }

    fn is_beyond(&self, other: &dyn Geometry, distance: &Measure) -> Result<bool> {
        kernel::is_beyond(self, other, distance)
    }

    fn buffer(&self, distance: &Measure) -> Result<GeometryHandle> {
        kernel::buffer(self, distance)
    }

    fn convex_hull(&self) -> Result<GeometryHandle> {
        kernel::convex_hull(self)
    }

    fn intersection(&self, other: &dyn Geometry) -> Result<Option<GeometryHandle>> {
        kernel::intersection(self, other)
    }

    fn union(&self, other: &dyn Geometry) -> Result<GeometryHandle> {
        kernel::union(self, other)
    }

    fn difference(&self, other: &dyn Geometry) -> Result<Option<GeometryHandle>> {
        kernel::difference(self, other)
    }

    fn standard_properties(&self) -> Result<StandardProperties> {
        Ok(self.common.props())
    }

    fn set_standard_properties(&self, props: StandardProperties) -> Result<()> {
        self.common.set_props(props);
        Ok(())
    }
}
