//! Value types used by geometry operations

use std::fmt;
use std::sync::Arc;

use crate::error::{RefError, Result};

/// Coordinate reference system, identified by name (e.g. `EPSG:4326`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Crs(Arc<str>);

impl Crs {
    /// Create a CRS from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Crs(Arc::from(name.into()))
    }

    /// The CRS name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A length with its unit of measure.
///
/// The kernel interprets `value` in the units of the operands' CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    /// Numeric value
    pub value: f64,

    /// Unit of measure (e.g. `m`, `deg`)
    pub uom: String,
}

impl Measure {
    /// Create a measure.
    pub fn new(value: f64, uom: impl Into<String>) -> Self {
        Self {
            value,
            uom: uom.into(),
        }
    }
}

/// How coordinates are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PrecisionModel {
    /// Full double precision
    #[default]
    Floating,

    /// Fixed grid: coordinates are multiples of `1 / scale`
    Fixed {
        /// Grid scale factor
        scale: f64,
    },
}

/// Descriptive properties every GML object may carry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StandardProperties {
    /// `gml:description`
    pub description: Option<String>,

    /// `gml:name` values
    pub names: Vec<String>,
}

impl StandardProperties {
    /// Create properties with a description.
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            names: Vec::new(),
        }
    }

    /// Add a name (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    min: Vec<f64>,
    max: Vec<f64>,
    crs: Crs,
}

impl Envelope {
    /// Create an envelope from its lower and upper corners.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the corners differ in dimension
    /// - `InvalidGeometry` if the corners are empty, not finite, or inverted
    pub fn new(min: Vec<f64>, max: Vec<f64>, crs: Crs) -> Result<Self> {
        if min.len() != max.len() {
            return Err(RefError::DimensionMismatch {
                expected: min.len(),
                got: max.len(),
            });
        }
        if min.is_empty() {
            return Err(RefError::InvalidGeometry(
                "envelope needs at least one ordinate".to_string(),
            ));
        }
        if min.iter().chain(max.iter()).any(|v| !v.is_finite()) {
            return Err(RefError::InvalidGeometry(
                "envelope ordinates must be finite".to_string(),
            ));
        }
        if min.iter().zip(max.iter()).any(|(lo, hi)| lo > hi) {
            return Err(RefError::InvalidGeometry(format!(
                "inverted envelope: {:?} > {:?}",
                min, max
            )));
        }
        Ok(Self { min, max, crs })
    }

    /// Degenerate envelope around a single position.
    pub(crate) fn from_position(coords: &[f64], crs: Crs) -> Self {
        Self {
            min: coords.to_vec(),
            max: coords.to_vec(),
            crs,
        }
    }

    /// Lower corner.
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Upper corner.
    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// Coordinate reference system of the corners.
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Number of ordinates per corner.
    pub fn dimension(&self) -> usize {
        self.min.len()
    }

    /// Whether the envelope collapses to a single position.
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }
}
