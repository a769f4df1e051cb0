//! Core domain logic for relmap.
//! Entity graph, relationship enforcement and the SQLite store facade.

pub mod db;
pub mod link;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use link::{
    link_many_to_many, link_one_to_many, link_one_to_one, BackRef, Enforce, ReverseSet,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::assoc::Assoc;
pub use model::key::{EntityId, Key, Ref, UNASSIGNED_ID};
pub use model::library::{LibStudent, Library};
pub use model::owner::{Device, Owner};
pub use model::person::{Passport, Person};
pub use model::student::{Laptop, Student};
pub use repo::library_repo::LibraryStore;
pub use repo::owner_repo::OwnerStore;
pub use repo::store::{RepoError, RepoResult, SqliteStore, Store};
pub use service::library_service::LibStudentService;
pub use service::owner_service::OwnerService;
pub use service::person_service::PersonService;
pub use service::student_service::StudentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
