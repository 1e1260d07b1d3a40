//! Binding parsed targets to pending references

use std::sync::Arc;

use crate::error::{RefError, Result};
use crate::geometry::GeometryHandle;
use crate::registry::ReferenceRegistry;

/// Resolves pending references once their target has been parsed.
///
/// Obtained from [`ReferenceRegistry::binder`]; holds the registry mutably
/// for as long as it lives.
#[derive(Debug)]
pub struct Binder<'a> {
    registry: &'a mut ReferenceRegistry,
}

impl<'a> Binder<'a> {
    pub(crate) fn new(registry: &'a mut ReferenceRegistry) -> Self {
        Self { registry }
    }

    /// Resolve every pending reference for `id` to `target`.
    ///
    /// Returns the number of references resolved. Binding an identifier
    /// nobody referenced resolves nothing, but the target is remembered so
    /// that later references to `id` resolve on creation.
    ///
    /// # Errors
    ///
    /// - `AlreadyResolved` if `id` was bound before in this session
    /// - `SelfReference` if `target` is one of the pending references, or
    ///   resolves through other references to one of them
    ///
    /// On error no reference is modified.
    pub fn bind(&mut self, id: &str, target: GeometryHandle) -> Result<usize> {
        if self.registry.is_bound(id) {
            tracing::error!(id, "geometry identifier bound twice");
            return Err(RefError::AlreadyResolved { id: id.to_string() });
        }

        let pending = self.registry.all_pending_for(id);
        if pending.iter().any(|r| r.is_reachable_from(target.as_ref())) {
            tracing::error!(id, "geometry bound to a reference that leads back to it");
            return Err(RefError::SelfReference { id: id.to_string() });
        }

        for reference in &pending {
            reference.resolve(Arc::clone(&target))?;
        }
        self.registry.record_target(id, target);

        tracing::debug!(id, resolved = pending.len(), "bound geometry");
        Ok(pending.len())
    }

    /// Bind several targets, stopping at the first error.
    ///
    /// Returns the total number of references resolved.
    pub fn bind_all<I, S>(&mut self, targets: I) -> Result<usize>
    where
        I: IntoIterator<Item = (S, GeometryHandle)>,
        S: AsRef<str>,
    {
        let mut total = 0;
        for (id, target) in targets {
            total += self.bind(id.as_ref(), target)?;
        }
        Ok(total)
    }
}
