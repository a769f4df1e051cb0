//! Owner/laptops use-case service.
//!
//! # Invariants
//! - Every laptop points back at its owner before persistence.
//! - `update_laptops` honors the tri-state input: absent keeps the stored
//!   collection, cleared removes it, populated replaces it.

use crate::link::Enforce;
use crate::model::assoc::Assoc;
use crate::model::key::EntityId;
use crate::model::owner::{Device, Owner};
use crate::repo::owner_repo::OwnerStore;
use crate::repo::store::{RepoError, RepoResult};
use log::info;

pub struct OwnerService<S: OwnerStore> {
    store: S,
}

impl<S: OwnerStore> OwnerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Links every laptop to the owner and persists the whole graph.
    pub fn add_owner(&mut self, mut owner: Owner) -> RepoResult<Owner> {
        owner.enforce();
        let saved = self.store.save(owner)?;
        info!(
            "event=entity_save module=service entity=owner status=ok id={} linked={}",
            saved.id,
            saved.laptops.as_ref().map_or(0, Vec::len)
        );
        Ok(saved)
    }

    pub fn get_owner_by_id(&self, id: EntityId) -> RepoResult<Option<Owner>> {
        self.store.find_by_id(id)
    }

    /// Applies a tri-state laptop update to a persisted owner.
    pub fn update_laptops(
        &mut self,
        owner_id: EntityId,
        laptops: Assoc<Device>,
    ) -> RepoResult<Owner> {
        let mut owner = self
            .store
            .find_by_id(owner_id)?
            .ok_or(RepoError::NotFound {
                entity: "owner",
                id: owner_id,
            })?;

        let replacement = match laptops {
            Assoc::Absent => return Ok(owner),
            Assoc::Cleared => Vec::new(),
            Assoc::Populated(items) => items,
        };

        owner.set_laptops(replacement);
        let devices = owner.laptops.take().unwrap_or_default();
        let count = devices.len();
        let updated = self.store.replace_devices(owner_id, devices)?;
        info!(
            "event=entity_update module=service entity=owner status=ok id={owner_id} linked={count}"
        );
        Ok(updated)
    }
}
