//! Per-session table of geometry references
//!
//! The registry deduplicates references by fragment identifier and keeps the
//! targets that have already been bound, so that:
//!
//! - repeated forward references to `#a` share one placeholder,
//! - a backward reference to an already parsed `#a` is resolved on creation,
//! - identifiers that were never bound can be listed when parsing ends.
//!
//! It lives exactly as long as the [`ParseSession`](crate::ParseSession)
//! that owns it; nothing is shared between sessions.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::binder::Binder;
use crate::context::SessionConfig;
use crate::error::{RefError, Result};
use crate::geometry::GeometryHandle;
use crate::reference::{fragment_of, GeometryReference};

/// Everything known about one fragment identifier.
#[derive(Debug, Default)]
struct Entry {
    /// Placeholders handed out for this identifier
    references: Vec<Arc<GeometryReference>>,

    /// The bound target, once the parser has produced it
    target: Option<GeometryHandle>,

    /// How many times the identifier was referenced
    occurrences: usize,
}

/// Table mapping fragment identifiers to references and bound targets.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gmlref::{Crs, Geometry, Point, ReferenceRegistry, SessionConfig};
///
/// let mut registry = ReferenceRegistry::new(&SessionConfig::default());
/// let first = registry.lookup_or_create("#a").unwrap();
/// let second = registry.lookup_or_create("#a").unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
///
/// let point = Point::new(vec![1.0, 2.0], Crs::new("EPSG:4326")).unwrap();
/// registry.binder().bind("a", Arc::new(point)).unwrap();
/// assert_eq!(first.coordinate_dimension().unwrap(), 2);
/// assert!(registry.finalize().is_empty());
/// ```
#[derive(Debug)]
pub struct ReferenceRegistry {
    /// Entries in first-seen order
    entries: IndexMap<String, Entry>,

    /// Total reference occurrences so far
    occurrences: usize,

    /// Maximum allowed occurrences
    max_references: usize,
}

impl Default for ReferenceRegistry {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl ReferenceRegistry {
    /// Create an empty registry.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            entries: IndexMap::new(),
            occurrences: 0,
            max_references: config.max_references,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Reference Creation
    // ═══════════════════════════════════════════════════════════════════

    /// Get the reference for `href`, creating it if needed.
    ///
    /// Returns the existing unresolved reference for the identifier when
    /// there is one. If the identifier has already been bound, the new
    /// reference is resolved before it is returned.
    ///
    /// # Errors
    ///
    /// - `MalformedReference` if `href` has no `#`
    /// - `TooManyReferences` if the session limit is reached
    pub fn lookup_or_create(&mut self, href: &str) -> Result<Arc<GeometryReference>> {
        let id = fragment_of(href)?;
        self.count_occurrence()?;

        let entry = self.entries.entry(id.to_string()).or_default();
        entry.occurrences += 1;

        if entry.target.is_none() {
            if let Some(existing) = entry.references.iter().find(|r| !r.is_resolved()) {
                tracing::trace!(id, "reusing pending geometry reference");
                return Ok(Arc::clone(existing));
            }
        }

        let reference = Arc::new(GeometryReference::new(href)?);
        if let Some(target) = &entry.target {
            reference.resolve(Arc::clone(target))?;
            tracing::trace!(id, "backward geometry reference resolved on creation");
        } else {
            tracing::trace!(id, "new pending geometry reference");
        }
        entry.references.push(Arc::clone(&reference));
        Ok(reference)
    }

    /// Add a reference created elsewhere.
    ///
    /// Unlike [`lookup_or_create`](Self::lookup_or_create) this never
    /// deduplicates: every registered instance is resolved by the next bind
    /// of its identifier.
    ///
    /// # Errors
    ///
    /// - `TooManyReferences` if the session limit is reached
    /// - `AlreadyResolved` if the identifier is bound and `reference`
    ///   already has a delegate
    /// - `SelfReference` if the bound target leads back to `reference`
    ///
    /// On error the registry is left unchanged.
    pub fn register(&mut self, reference: Arc<GeometryReference>) -> Result<()> {
        self.check_capacity()?;
        if let Some(target) = self.bound_target(reference.identifier()) {
            reference.resolve(Arc::clone(target))?;
        }
        self.occurrences += 1;

        let entry = self
            .entries
            .entry(reference.identifier().to_string())
            .or_default();
        entry.occurrences += 1;
        entry.references.push(reference);
        Ok(())
    }

    fn check_capacity(&self) -> Result<()> {
        if self.occurrences >= self.max_references {
            return Err(RefError::TooManyReferences {
                max: self.max_references,
            });
        }
        Ok(())
    }

    fn count_occurrence(&mut self) -> Result<()> {
        self.check_capacity()?;
        self.occurrences += 1;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding
    // ═══════════════════════════════════════════════════════════════════

    /// Borrow the registry for binding parsed targets.
    pub fn binder(&mut self) -> Binder<'_> {
        Binder::new(self)
    }

    /// Record the target bound to `id`.
    ///
    /// Called by the binder after every pending reference was resolved.
    pub(crate) fn record_target(&mut self, id: &str, target: GeometryHandle) {
        self.entries.entry(id.to_string()).or_default().target = Some(target);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Every unresolved reference for `id`.
    pub fn all_pending_for(&self, id: &str) -> Vec<Arc<GeometryReference>> {
        self.entries
            .get(id)
            .map(|entry| {
                entry
                    .references
                    .iter()
                    .filter(|r| !r.is_resolved())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether a target has been bound to `id`.
    pub fn is_bound(&self, id: &str) -> bool {
        self.bound_target(id).is_some()
    }

    /// The target bound to `id`, if any.
    pub fn bound_target(&self, id: &str) -> Option<&GeometryHandle> {
        self.entries.get(id).and_then(|entry| entry.target.as_ref())
    }

    /// How many times `id` was referenced.
    pub fn occurrences(&self, id: &str) -> usize {
        self.entries.get(id).map_or(0, |entry| entry.occurrences)
    }

    /// Number of unresolved references across all identifiers.
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .flat_map(|entry| entry.references.iter())
            .filter(|r| !r.is_resolved())
            .count()
    }

    /// Number of known identifiers (referenced or bound).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry knows no identifiers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers that were referenced but never bound, in first-seen order.
    pub fn finalize(&self) -> IndexSet<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.target.is_none() && entry.occurrences > 0)
            .map(|(id, _)| id.clone())
            .collect()
    }
}
