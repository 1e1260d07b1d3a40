//! Envelope-based implementations of the geometry operations
//!
//! Shared by the concrete primitives. Every function reads the operands
//! through the [`Geometry`] trait, so either operand may be a resolved
//! reference.

use std::sync::Arc;

use super::{Envelope, Geometry, GeometryHandle, Measure, Point, Rectangle};
use crate::error::{RefError, Result};

// ═══════════════════════════════════════════════════════════════════════
// Operand Checks
// ═══════════════════════════════════════════════════════════════════════

/// Envelopes of both operands, checked for a common CRS and dimension.
fn operands(this: &dyn Geometry, other: &dyn Geometry) -> Result<(Envelope, Envelope)> {
    let a = this.envelope()?;
    let b = other.envelope()?;
    if a.crs() != b.crs() {
        return Err(RefError::CrsMismatch {
            left: a.crs().to_string(),
            right: b.crs().to_string(),
        });
    }
    if a.dimension() != b.dimension() {
        return Err(RefError::DimensionMismatch {
            expected: a.dimension(),
            got: b.dimension(),
        });
    }
    Ok((a, b))
}

fn envelope_contains(outer: &Envelope, inner: &Envelope) -> bool {
    outer
        .min()
        .iter()
        .zip(outer.max())
        .zip(inner.min().iter().zip(inner.max()))
        .all(|((olo, ohi), (ilo, ihi))| olo <= ilo && ihi <= ohi)
}

fn envelope_intersects(a: &Envelope, b: &Envelope) -> bool {
    a.min()
        .iter()
        .zip(a.max())
        .zip(b.min().iter().zip(b.max()))
        .all(|((alo, ahi), (blo, bhi))| alo <= bhi && blo <= ahi)
}

fn envelope_distance(a: &Envelope, b: &Envelope) -> f64 {
    a.min()
        .iter()
        .zip(a.max())
        .zip(b.min().iter().zip(b.max()))
        .map(|((alo, ahi), (blo, bhi))| {
            let gap = (blo - ahi).max(alo - bhi).max(0.0);
            gap * gap
        })
        .sum::<f64>()
        .sqrt()
}

/// Wrap an envelope as the simplest geometry that represents it.
pub(super) fn from_envelope(envelope: Envelope) -> GeometryHandle {
    if envelope.is_point() {
        Arc::new(Point::from_position(
            envelope.min().to_vec(),
            envelope.crs().clone(),
        ))
    } else {
        Arc::new(Rectangle::new(envelope))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Predicates
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn contains(this: &dyn Geometry, other: &dyn Geometry) -> Result<bool> {
    let (a, b) = operands(this, other)?;
    Ok(envelope_contains(&a, &b))
}

pub(super) fn intersects(this: &dyn Geometry, other: &dyn Geometry) -> Result<bool> {
    let (a, b) = operands(this, other)?;
    Ok(envelope_intersects(&a, &b))
}

pub(super) fn is_within(this: &dyn Geometry, other: &dyn Geometry) -> Result<bool> {
    let (a, b) = operands(this, other)?;
    Ok(envelope_contains(&b, &a))
}

pub(super) fn equals(this: &dyn Geometry, other: &dyn Geometry) -> Result<bool> {
    let (a, b) = operands(this, other)?;
    Ok(this.geometry_type()? == other.geometry_type()? && a == b)
}

pub(super) fn distance(this: &dyn Geometry, other: &dyn Geometry) -> Result<f64> {
    let (a, b) = operands(this, other)?;
    Ok(envelope_distance(&a, &b))
}

pub(super) fn is_within_distance(
    this: &dyn Geometry,
    other: &dyn Geometry,
    limit: &Measure,
) -> Result<bool> {
    Ok(distance(this, other)? <= limit.value)
}

pub(super) fn is_beyond(
    this: &dyn Geometry,
    other: &dyn Geometry,
    limit: &Measure,
) -> Result<bool> {
    Ok(distance(this, other)? > limit.value)
}

// ═══════════════════════════════════════════════════════════════════════
// Constructive Operations
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn buffer(this: &dyn Geometry, amount: &Measure) -> Result<GeometryHandle> {
    let env = this.envelope()?;
    let min: Vec<f64> = env.min().iter().map(|v| v - amount.value).collect();
    let max: Vec<f64> = env.max().iter().map(|v| v + amount.value).collect();
    if min.iter().zip(&max).any(|(lo, hi)| lo > hi) {
        return Err(RefError::Unsupported(format!(
            "buffer of {} collapses the geometry",
            amount.value
        )));
    }
    Ok(from_envelope(Envelope::new(min, max, env.crs().clone())?))
}

pub(super) fn convex_hull(this: &dyn Geometry) -> Result<GeometryHandle> {
    Ok(from_envelope(this.envelope()?))
}

pub(super) fn intersection(
    this: &dyn Geometry,
    other: &dyn Geometry,
) -> Result<Option<GeometryHandle>> {
    let (a, b) = operands(this, other)?;
    if !envelope_intersects(&a, &b) {
        return Ok(None);
    }
    let min = a.min().iter().zip(b.min()).map(|(x, y)| x.max(*y)).collect();
    let max = a.max().iter().zip(b.max()).map(|(x, y)| x.min(*y)).collect();
    Ok(Some(from_envelope(Envelope::new(min, max, a.crs().clone())?)))
}

pub(super) fn union(this: &dyn Geometry, other: &dyn Geometry) -> Result<GeometryHandle> {
    let (a, b) = operands(this, other)?;
    if envelope_contains(&a, &b) {
        Ok(from_envelope(a))
    } else if envelope_contains(&b, &a) {
        Ok(from_envelope(b))
    } else {
        Err(RefError::Unsupported(
            "union of geometries where neither contains the other".to_string(),
        ))
    }
}

pub(super) fn difference(
    this: &dyn Geometry,
    other: &dyn Geometry,
) -> Result<Option<GeometryHandle>> {
    let (a, b) = operands(this, other)?;
    if envelope_contains(&b, &a) {
        Ok(None)
    } else if !envelope_intersects(&a, &b) {
        Ok(Some(from_envelope(a)))
    } else {
        Err(RefError::Unsupported(
            "difference of partially overlapping geometries".to_string(),
        ))
    }
}
