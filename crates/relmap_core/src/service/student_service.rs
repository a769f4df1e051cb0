//! Student/laptop use-case service.
//!
//! # Invariants
//! - The laptop back-reference is enforced before every save.
//! - Store errors are returned unchanged.

use crate::link::Enforce;
use crate::model::key::EntityId;
use crate::model::student::Student;
use crate::repo::store::{RepoResult, Store};
use log::info;

/// Use-case service for students and their laptop.
pub struct StudentService<S: Store<Student>> {
    store: S,
}

impl<S: Store<Student>> StudentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Links the laptop (if any) to the student and persists both.
    pub fn save_student_with_laptop(&mut self, mut student: Student) -> RepoResult<Student> {
        student.enforce();
        let saved = self.store.save(student)?;
        info!(
            "event=entity_save module=service entity=student status=ok id={} linked={}",
            saved.id,
            u8::from(saved.laptop.is_some())
        );
        Ok(saved)
    }

    /// Gets one student with their laptop.
    pub fn get_student_by_id(&self, id: EntityId) -> RepoResult<Option<Student>> {
        self.store.find_by_id(id)
    }

    pub fn get_all_students(&self) -> RepoResult<Vec<Student>> {
        self.store.find_all()
    }
}
