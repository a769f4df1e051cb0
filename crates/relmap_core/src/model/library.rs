//! Many-to-many pair: library students and the libraries they use.
//!
//! # Invariants
//! - `Library::students` is a set; one student appears at most once.
//! - The student side owns the association (join rows are written from it).

use crate::link::{link_many_to_many, many_to_many_holds, Enforce, ReverseSet};
use crate::model::key::{EntityId, Key, Ref, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibStudent {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub key: Key<LibStudent>,
    pub name: String,
    #[serde(default)]
    pub libraries: Option<Vec<Library>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub key: Key<Library>,
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub valid: bool,
    /// Reverse side of the association.
    #[serde(default)]
    pub students: BTreeSet<Key<LibStudent>>,
}

impl LibStudent {
    /// Back-reference to this entity as currently identified.
    pub fn to_ref(&self) -> Ref<LibStudent> {
        Ref::new(self.id, self.key)
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            key: Key::generate(),
            name: name.into(),
            libraries: None,
        }
    }

    /// Appends one library and registers this student on its reverse side.
    pub fn add_library(&mut self, mut library: Library) {
        library.students.insert(self.key);
        self.libraries.get_or_insert_with(Vec::new).push(library);
    }
}

impl Library {
    pub fn new(book: impl Into<String>, valid: bool) -> Self {
        Self {
            id: UNASSIGNED_ID,
            key: Key::generate(),
            book: book.into(),
            valid,
            students: BTreeSet::new(),
        }
    }

    /// Reference to an already persisted library, by store identity.
    pub fn existing(id: EntityId) -> Self {
        Self {
            id,
            ..Self::new("", false)
        }
    }
}

impl ReverseSet<LibStudent> for Library {
    fn reverse(&self) -> &BTreeSet<Key<LibStudent>> {
        &self.students
    }

    fn reverse_mut(&mut self) -> &mut BTreeSet<Key<LibStudent>> {
        &mut self.students
    }
}

impl Enforce for LibStudent {
    fn enforce(&mut self) {
        link_many_to_many(self.to_ref(), self.libraries.as_mut());
    }

    fn is_enforced(&self) -> bool {
        many_to_many_holds(self.key, self.libraries.as_ref())
    }
}
