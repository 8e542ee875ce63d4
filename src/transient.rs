use crate::host::{JavaObjectRegistry, ObjectId, ResolvedArg};
use log::trace;
use std::collections::TryReserveError;

/// Java objects created only to pass host values to one Java call.
///
/// Every tracked object is removed from the registry when the list is dropped, on success and
/// error paths alike.
pub struct TransientIds<'r, R: JavaObjectRegistry + ?Sized> {
    registry: &'r R,
    ids: Vec<ObjectId>,
}

impl<'r, R: JavaObjectRegistry + ?Sized> TransientIds<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        TransientIds {
            registry,
            ids: Vec::new(),
        }
    }

    /// Create a list that can track `capacity` objects without reallocating.
    pub fn with_capacity(registry: &'r R, capacity: usize) -> Result<Self, TryReserveError> {
        let mut ids = Vec::new();
        ids.try_reserve_exact(capacity)?;
        Ok(TransientIds { registry, ids })
    }

    /// Record a resolved argument, returning its id.
    pub fn track(&mut self, argument: ResolvedArg) -> ObjectId {
        if let ResolvedArg::Transient(id) = argument {
            self.ids.push(id);
        }
        argument.id()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Remove the tracked objects from the registry now.
    pub fn release(self) {
        drop(self);
    }
}

impl<'r, R: JavaObjectRegistry + ?Sized> Drop for TransientIds<'r, R> {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            trace!("Removing transient Java object {}", id);
            self.registry.remove_object(id);
        }
    }
}
