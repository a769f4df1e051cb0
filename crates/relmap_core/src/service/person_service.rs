//! Person/passport use-case service.

use crate::link::Enforce;
use crate::model::key::EntityId;
use crate::model::person::Person;
use crate::repo::store::{RepoResult, Store};
use log::info;

pub struct PersonService<S: Store<Person>> {
    store: S,
}

impl<S: Store<Person>> PersonService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Links the passport (if any) back to the person and persists both.
    pub fn save_person(&mut self, mut person: Person) -> RepoResult<Person> {
        person.enforce();
        let saved = self.store.save(person)?;
        info!(
            "event=entity_save module=service entity=person status=ok id={} linked={}",
            saved.id,
            u8::from(saved.passport.is_some())
        );
        Ok(saved)
    }

    pub fn get_person_by_id(&self, id: EntityId) -> RepoResult<Option<Person>> {
        self.store.find_by_id(id)
    }
}
