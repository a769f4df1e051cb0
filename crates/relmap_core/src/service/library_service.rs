//! Library-student/library use-case service.

use crate::link::Enforce;
use crate::model::key::EntityId;
use crate::model::library::{LibStudent, Library};
use crate::repo::library_repo::LibraryStore;
use crate::repo::store::RepoResult;
use log::info;

pub struct LibStudentService<S: LibraryStore> {
    store: S,
}

impl<S: LibraryStore> LibStudentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers the student on every library's reverse side and persists.
    pub fn add_student(&mut self, mut student: LibStudent) -> RepoResult<LibStudent> {
        student.enforce();
        let saved = self.store.save(student)?;
        info!(
            "event=entity_save module=service entity=lib_student status=ok id={} linked={}",
            saved.id,
            saved.libraries.as_ref().map_or(0, Vec::len)
        );
        Ok(saved)
    }

    pub fn get_student_by_id(&self, id: EntityId) -> RepoResult<Option<LibStudent>> {
        self.store.find_by_id(id)
    }

    pub fn get_library_by_id(&self, id: EntityId) -> RepoResult<Option<Library>> {
        self.store.find_library(id)
    }
}
