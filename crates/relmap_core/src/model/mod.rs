//! Entity graph for the relationship-mapping exercises.
//!
//! # Responsibility
//! - Define the four entity pairs (one-to-one x2, one-to-many, many-to-many).
//! - Express back-references as typed keys instead of object references.
//!
//! # Invariants
//! - Every entity has a stable `Key` from construction and an `EntityId`
//!   that stays `UNASSIGNED_ID` until the store persists it.
//! - The graph never contains reference cycles.

pub mod assoc;
pub mod key;
pub mod library;
pub mod owner;
pub mod person;
pub mod student;
