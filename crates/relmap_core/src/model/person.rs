//! One-to-one pair where the owning row holds the foreign key: a person
//! and their passport.

use crate::link::{link_one_to_one, one_to_one_holds, BackRef, Enforce};
use crate::model::key::{EntityId, Key, Ref, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub key: Key<Person>,
    pub name: String,
    #[serde(default)]
    pub passport: Option<Passport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passport {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub key: Key<Passport>,
    pub name: String,
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub person: Option<Ref<Person>>,
}

impl Person {
    /// Back-reference to this entity as currently identified.
    pub fn to_ref(&self) -> Ref<Person> {
        Ref::new(self.id, self.key)
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            key: Key::generate(),
            name: name.into(),
            passport: None,
        }
    }

    /// Replaces the passport; `None` detaches it.
    pub fn set_passport(&mut self, passport: Option<Passport>) {
        self.passport = passport;
        link_one_to_one(self.to_ref(), self.passport.as_mut());
    }
}

impl Passport {
    pub fn new(name: impl Into<String>, valid: bool) -> Self {
        Self {
            id: UNASSIGNED_ID,
            key: Key::generate(),
            name: name.into(),
            valid,
            person: None,
        }
    }
}

impl BackRef<Person> for Passport {
    fn back_ref(&self) -> Option<Ref<Person>> {
        self.person
    }

    fn set_back_ref(&mut self, owner: Ref<Person>) {
        self.person = Some(owner);
    }
}

impl Enforce for Person {
    fn enforce(&mut self) {
        link_one_to_one(self.to_ref(), self.passport.as_mut());
    }

    fn is_enforced(&self) -> bool {
        one_to_one_holds(self.key, self.passport.as_ref())
    }
}
