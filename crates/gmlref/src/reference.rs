//! Forward references to geometries
//!
//! A [`GeometryReference`] stands in for a geometry that a document points
//! to with an `xlink:href` style fragment (`#id`) before that geometry has
//! been parsed. It implements [`Geometry`] itself, so it can be placed into
//! the graph wherever the real geometry belongs.
//!
//! The delegate slot is a [`OnceLock`]: it can be written exactly once, and
//! every capability call before that write fails with
//! [`RefError::UnresolvedReference`].

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{RefError, Result};
use crate::geometry::{
    Crs, Envelope, Geometry, GeometryHandle, GeometryType, Measure, PrecisionModel,
    StandardProperties,
};

/// Placeholder for a geometry identified by a document-local fragment.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gmlref::{Crs, Geometry, GeometryReference, Point};
///
/// let reference = GeometryReference::new("#p1").unwrap();
/// assert_eq!(reference.id(), Some("p1"));
/// assert!(reference.coordinate_dimension().is_err());
///
/// let point = Point::new(vec![7.1, 50.7], Crs::new("EPSG:4326")).unwrap();
/// reference.resolve(Arc::new(point.with_id("p1"))).unwrap();
/// assert_eq!(reference.coordinate_dimension().unwrap(), 2);
/// ```
pub struct GeometryReference {
    /// The reference string as found in the document
    href: String,

    /// Text after the last `#` of `href`
    identifier: String,

    /// The resolved target, written once
    delegate: OnceLock<GeometryHandle>,
}

impl GeometryReference {
    /// Create an unresolved reference from a reference string.
    ///
    /// Only document-local references (`...#fragment`) are supported.
    ///
    /// # Errors
    ///
    /// `MalformedReference` if `href` has no `#`. An empty fragment yields
    /// the empty identifier.
    pub fn new(href: impl Into<String>) -> Result<Self> {
        let href = href.into();
        let identifier = fragment_of(&href)?.to_string();
        Ok(Self {
            href,
            identifier,
            delegate: OnceLock::new(),
        })
    }

    /// The original reference string.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// The fragment identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether a delegate has been bound.
    pub fn is_resolved(&self) -> bool {
        self.delegate.get().is_some()
    }

    /// The bound delegate, if any.
    pub fn target(&self) -> Option<&GeometryHandle> {
        self.delegate.get()
    }

    /// The bound delegate.
    ///
    /// # Errors
    ///
    /// `UnresolvedReference` if `resolve` has not been called yet.
    pub fn delegate(&self) -> Result<&GeometryHandle> {
        self.delegate
            .get()
            .ok_or_else(|| RefError::UnresolvedReference {
                id: self.identifier.clone(),
            })
    }

    /// Bind the delegate. Allowed exactly once.
    ///
    /// # Errors
    ///
    /// - `SelfReference` if `target` is this reference, or a chain of
    ///   resolved references leading back to it
    /// - `AlreadyResolved` if a delegate is already bound; the existing
    ///   delegate is kept
    pub fn resolve(&self, target: GeometryHandle) -> Result<()> {
        if self.is_reachable_from(target.as_ref()) {
            tracing::error!(href = %self.href, "geometry reference would resolve to itself");
            return Err(RefError::SelfReference {
                id: self.identifier.clone(),
            });
        }
        self.delegate.set(target).map_err(|_| {
            tracing::error!(href = %self.href, "geometry reference resolved twice");
            RefError::AlreadyResolved {
                id: self.identifier.clone(),
            }
        })?;
        tracing::trace!(id = %self.identifier, "geometry reference resolved");
        Ok(())
    }

    /// Whether following `start` through resolved references arrives here.
    pub(crate) fn is_reachable_from(&self, start: &dyn Geometry) -> bool {
        let this = self as *const Self as *const ();
        let mut current = start;
        loop {
            if std::ptr::eq(current as *const dyn Geometry as *const (), this) {
                return true;
            }
            match current.as_reference().and_then(GeometryReference::target) {
                Some(next) => current = next.as_ref(),
                None => return false,
            }
        }
    }
}

/// Extract the fragment identifier of a reference string.
pub(crate) fn fragment_of(href: &str) -> Result<&str> {
    match href.rfind('#') {
        Some(pos) => Ok(&href[pos + 1..]),
        None => Err(RefError::MalformedReference {
            href: href.to_string(),
        }),
    }
}

impl fmt::Debug for GeometryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryReference")
            .field("href", &self.href)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Capability Forwarding
// ═══════════════════════════════════════════════════════════════════════
//
// The receiver of every forwarded call is the bound delegate. Arguments are
// passed through untouched.

impl Geometry for GeometryReference {
    fn id(&self) -> Option<&str> {
        Some(&self.identifier)
    }

    fn geometry_type(&self) -> Result<GeometryType> {
        self.delegate()?.geometry_type()
    }

    fn coordinate_dimension(&self) -> Result<usize> {
        self.delegate()?.coordinate_dimension()
    }

    fn crs(&self) -> Result<Crs> {
        self.delegate()?.crs()
    }

    fn precision(&self) -> Result<PrecisionModel> {
        self.delegate()?.precision()
    }

    fn envelope(&self) -> Result<Envelope> {
        self.delegate()?.envelope()
    }

    fn contains(&self, other: &dyn Geometry) -> Result<bool> {
        self.delegate()?.contains(other)
    }

    fn intersects(&self, other: &dyn Geometry) -> Result<bool> {
        self.delegate()?.intersects(other)
    }

    fn is_within(&self, other: &dyn Geometry) -> Result<bool> {
        self.delegate()?.is_within(other)
    }

    fn equals(&self, other: &dyn Geometry) -> Result<bool> {
        self.delegate()?.equals(other)
    }

    fn distance(&self, other: &dyn Geometry) -> Result<f64> {
        self.delegate()?.distance(other)
    }

    fn is_within_distance(&self, other: &dyn Geometry, distance: &Measure) -> Result<bool> {
        self.delegate()?.is_within_distance(other, distance)
    }

    fn is_beyond(&self, other: &dyn Geometry, distance: &Measure) -> Result<bool> {
        self.delegate()?.is_beyond(other, distance)
    }

    fn buffer(&self, distance: &Measure) -> Result<GeometryHandle> {
        self.delegate()?.buffer(distance)
    }

    fn convex_hull(&self) -> Result<GeometryHandle> {
        self.delegate()?.convex_hull()
    }

    fn intersection(&self, other: &dyn Geometry) -> Result<Option<GeometryHandle>> {
        self.delegate()?.intersection(other)
    }

    fn union(&self, other: &dyn Geometry) -> Result<GeometryHandle> {
        self.delegate()?.union(other)
    }

    fn difference(&self, other: &dyn Geometry) -> Result<Option<GeometryHandle>> {
        self.delegate()?.difference(other)
    }

    fn standard_properties(&self) -> Result<StandardProperties> {
        self.delegate()?.standard_properties()
    }

    fn set_standard_properties(&self, props: StandardProperties) -> Result<()> {
        self.delegate()?.set_standard_properties(props)
    }

    fn as_reference(&self) -> Option<&GeometryReference> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rectangle};

    fn point(id: &str, x: f64, y: f64) -> GeometryHandle {
        Arc::new(
            Point::new(vec![x, y], Crs::new("EPSG:4326"))
                .unwrap()
                .with_id(id),
        )
    }

    #[test]
    fn test_identifier_is_text_after_last_hash() {
        let r = GeometryReference::new("doc.gml#outer#inner").unwrap();
        assert_eq!(r.identifier(), "inner");
        assert_eq!(r.href(), "doc.gml#outer#inner");
    }

    #[test]
    fn test_missing_hash_is_malformed() {
        assert_eq!(
            GeometryReference::new("http://example.org/geom").unwrap_err(),
            RefError::MalformedReference {
                href: "http://example.org/geom".to_string()
            }
        );
    }

    #[test]
    fn test_empty_fragment_is_an_empty_identifier() {
        let r = GeometryReference::new("doc.gml#").unwrap();
        assert_eq!(r.identifier(), "");
        assert!(!r.is_resolved());
    }

    #[test]
    fn test_unresolved_call_fails() {
        let r = GeometryReference::new("#p1").unwrap();
        assert_eq!(
            r.crs().unwrap_err(),
            RefError::UnresolvedReference {
                id: "p1".to_string()
            }
        );
        assert!(!r.is_resolved());
    }

    #[test]
    fn test_id_does_not_depend_on_resolution() {
        let r = GeometryReference::new("#p1").unwrap();
        assert_eq!(Geometry::id(&r), Some("p1"));
        r.resolve(point("other", 0.0, 0.0)).unwrap();
        assert_eq!(Geometry::id(&r), Some("p1"));
    }

    #[test]
    fn test_second_resolve_keeps_first_delegate() {
        let r = GeometryReference::new("#p1").unwrap();
        r.resolve(point("p1", 1.0, 1.0)).unwrap();
        let err = r.resolve(point("p1", 9.0, 9.0)).unwrap_err();
        assert_eq!(
            err,
            RefError::AlreadyResolved {
                id: "p1".to_string()
            }
        );
        assert_eq!(r.envelope().unwrap().min(), &[1.0, 1.0]);
    }

    #[test]
    fn test_binary_call_uses_delegate_as_receiver() {
        // Receiver and argument differ, so a swapped call would flip the answer
        let big = Arc::new(Rectangle::new(
            Envelope::new(vec![0.0, 0.0], vec![10.0, 10.0], Crs::new("EPSG:4326")).unwrap(),
        ));
        let small = point("s", 5.0, 5.0);

        let r = GeometryReference::new("#big").unwrap();
        r.resolve(big).unwrap();
        assert!(r.contains(small.as_ref()).unwrap());
        assert!(!r.is_within(small.as_ref()).unwrap());
    }

    #[test]
    fn test_resolving_to_itself_is_rejected() {
        let r = Arc::new(GeometryReference::new("#loop").unwrap());
        let handle: GeometryHandle = r.clone();
        assert_eq!(
            r.resolve(handle).unwrap_err(),
            RefError::SelfReference {
                id: "loop".to_string()
            }
        );
        assert!(!r.is_resolved());
    }

    #[test]
    fn test_resolving_into_a_cycle_is_rejected() {
        let a = Arc::new(GeometryReference::new("#a").unwrap());
        let b = Arc::new(GeometryReference::new("#b").unwrap());
        let c = Arc::new(GeometryReference::new("#c").unwrap());
        b.resolve(c.clone()).unwrap();
        a.resolve(b.clone()).unwrap();

        // c -> a -> b -> c
        assert_eq!(
            c.resolve(a.clone()).unwrap_err(),
            RefError::SelfReference {
                id: "c".to_string()
            }
        );
        assert!(!c.is_resolved());
        assert_eq!(
            a.crs().unwrap_err(),
            RefError::UnresolvedReference {
                id: "c".to_string()
            }
        );
    }
}
