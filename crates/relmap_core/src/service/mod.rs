//! Use-case services: enforce associations, then delegate to the store.
//!
//! # Invariants
//! - Services never bypass the store's transaction or validation contract.
//! - Services stay storage-agnostic; they depend only on store traits.

pub mod library_service;
pub mod owner_service;
pub mod person_service;
pub mod student_service;
