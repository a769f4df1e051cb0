//! One-to-one pair: a student and the laptop assigned to them.
//!
//! The student is the aggregate root; the laptop row owns the foreign key.

use crate::link::{link_one_to_one, one_to_one_holds, BackRef, Enforce};
use crate::model::key::{EntityId, Key, Ref, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub key: Key<Student>,
    pub name: String,
    #[serde(default)]
    pub laptop: Option<Laptop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Laptop {
    #[serde(default)]
    pub lap_id: EntityId,
    #[serde(default)]
    pub key: Key<Laptop>,
    pub name: String,
    pub price: i64,
    /// Back-reference to the owning student.
    #[serde(default)]
    pub student: Option<Ref<Student>>,
}

impl Student {
    /// Back-reference to this entity as currently identified.
    pub fn to_ref(&self) -> Ref<Student> {
        Ref::new(self.id, self.key)
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            key: Key::generate(),
            name: name.into(),
            laptop: None,
        }
    }

    /// Assigns the laptop and points it back at this student.
    pub fn set_laptop(&mut self, laptop: Laptop) {
        self.laptop = Some(laptop);
        link_one_to_one(self.to_ref(), self.laptop.as_mut());
    }
}

impl Laptop {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            lap_id: UNASSIGNED_ID,
            key: Key::generate(),
            name: name.into(),
            price,
            student: None,
        }
    }
}

impl BackRef<Student> for Laptop {
    fn back_ref(&self) -> Option<Ref<Student>> {
        self.student
    }

    fn set_back_ref(&mut self, owner: Ref<Student>) {
        self.student = Some(owner);
    }
}

impl Enforce for Student {
    fn enforce(&mut self) {
        link_one_to_one(self.to_ref(), self.laptop.as_mut());
    }

    fn is_enforced(&self) -> bool {
        one_to_one_holds(self.key, self.laptop.as_ref())
    }
}
