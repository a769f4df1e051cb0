//! Entity identity types.
//!
//! # Responsibility
//! - Define the store identity (`EntityId`) assigned on first persistence.
//! - Define the typed graph identity (`Key<T>`) and the back-reference
//!   (`Ref<T>`) that pairs it with the store identity.
//!
//! # Invariants
//! - `EntityId == UNASSIGNED_ID` means the entity has never been persisted.
//! - A `Key<T>` can only be stored where a `T` reference is declared, so a
//!   back-reference of the wrong associated type is a compile error.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// Surrogate identity assigned by the store.
pub type EntityId = i64;

/// Identity value carried by transient (never persisted) entities.
pub const UNASSIGNED_ID: EntityId = 0;

/// Typed graph identity of one entity instance.
///
/// Generated when the entity is constructed, before the store assigns an
/// `EntityId`, so relationships can be expressed on transient graphs.
pub struct Key<T> {
    uuid: Uuid,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    /// Generates a fresh random key.
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wraps an existing UUID, e.g. one loaded from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _entity: PhantomData,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Decoded entities without a key get a fresh one.
impl<T> Default for Key<T> {
    fn default() -> Self {
        Self::generate()
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<T> Eq for Key<T> {}

impl<T> PartialOrd for Key<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Key<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid.cmp(&other.uuid)
    }
}

impl<T> Hash for Key<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<T> Debug for Key<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Key({})", self.uuid)
    }
}

impl<T> Display for Key<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.uuid, f)
    }
}

impl<T> Serialize for Key<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.uuid.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Key<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}

/// Back-reference from a related entity to its owner.
///
/// `key` links the graph before persistence; `id` mirrors the owner's
/// `EntityId` and is filled in by the store on save and load.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Ref<T> {
    #[serde(default)]
    pub id: EntityId,
    pub key: Key<T>,
}

impl<T> Ref<T> {
    pub fn new(id: EntityId, key: Key<T>) -> Self {
        Self { id, key }
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ref<T> {}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.key == other.key
    }
}

impl<T> Eq for Ref<T> {}

impl<T> Debug for Ref<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ref({}, {})", self.id, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, Ref};
    use std::collections::BTreeSet;

    struct Marker;

    #[test]
    fn generated_keys_are_distinct() {
        let a: Key<Marker> = Key::generate();
        let b: Key<Marker> = Key::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn key_serializes_as_bare_uuid() {
        let key: Key<Marker> = Key::generate();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.uuid()));

        let decoded: Key<Marker> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn ref_serializes_id_and_key() {
        let key: Key<Marker> = Key::generate();
        let json = serde_json::to_value(Ref::new(7, key)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["key"], key.uuid().to_string());

        let decoded: Ref<Marker> =
            serde_json::from_str(&format!("{{\"key\":\"{}\"}}", key.uuid())).unwrap();
        assert_eq!(decoded, Ref::new(0, key));
    }

    #[test]
    fn keys_have_set_semantics() {
        let key: Key<Marker> = Key::generate();
        let mut set = BTreeSet::new();
        assert!(set.insert(key));
        assert!(!set.insert(key));
        assert_eq!(set.len(), 1);
    }
}
