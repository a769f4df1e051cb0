//! Store facade: persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define generic save/find contracts for aggregate roots.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, `AlreadyPersisted`,
//!   `Inconsistent`) in addition to DB transport errors.
//! - One `save` call is one transaction.

pub mod library_repo;
pub mod owner_repo;
pub mod person_repo;
pub mod store;
pub mod student_repo;
