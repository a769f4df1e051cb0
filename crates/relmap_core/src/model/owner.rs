//! One-to-many pair: an owner and the ordered list of laptops they hold.
//!
//! # Invariants
//! - `laptops` order is the caller's order and survives persistence.
//! - `None` means "not provided"; `Some(vec![])` means "no laptops".

use crate::link::{link_one_to_many, one_to_many_holds, BackRef, Enforce};
use crate::model::key::{EntityId, Key, Ref, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub key: Key<Owner>,
    pub name: String,
    #[serde(default)]
    pub laptops: Option<Vec<Device>>,
}

/// Laptop held by an [`Owner`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub key: Key<Device>,
    pub lap_name: String,
    #[serde(default)]
    pub lap_model: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub lap_price: i64,
    #[serde(default)]
    pub owner: Option<Ref<Owner>>,
}

impl Owner {
    /// Back-reference to this entity as currently identified.
    pub fn to_ref(&self) -> Ref<Owner> {
        Ref::new(self.id, self.key)
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            key: Key::generate(),
            name: name.into(),
            laptops: None,
        }
    }

    /// Replaces the laptop list and points every entry back at this owner.
    pub fn set_laptops(&mut self, laptops: Vec<Device>) {
        self.laptops = Some(laptops);
        link_one_to_many(self.to_ref(), self.laptops.as_mut());
    }
}

impl Device {
    pub fn new(
        lap_name: impl Into<String>,
        lap_model: impl Into<String>,
        brand: impl Into<String>,
        lap_price: i64,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            key: Key::generate(),
            lap_name: lap_name.into(),
            lap_model: lap_model.into(),
            brand: brand.into(),
            lap_price,
            owner: None,
        }
    }
}

impl BackRef<Owner> for Device {
    fn back_ref(&self) -> Option<Ref<Owner>> {
        self.owner
    }

    fn set_back_ref(&mut self, owner: Ref<Owner>) {
        self.owner = Some(owner);
    }
}

impl Enforce for Owner {
    fn enforce(&mut self) {
        link_one_to_many(self.to_ref(), self.laptops.as_mut());
    }

    fn is_enforced(&self) -> bool {
        one_to_many_holds(self.key, self.laptops.as_ref())
    }
}
