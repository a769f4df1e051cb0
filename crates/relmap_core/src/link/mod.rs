//! Bidirectional relationship enforcement.
//!
//! # Responsibility
//! - Make both sides of a declared association agree before persistence.
//! - Stay stateless: every call works only on the entities passed in.
//!
//! # Invariants
//! - Enforcement is one hop deep; nested relationships are not visited.
//! - Absent references and absent collections are no-ops, never errors.
//! - Reverse collections have set semantics, so repeated enforcement is
//!   idempotent.
//! - Symmetry is judged by graph key; a back-reference's `id` only mirrors
//!   the owner's store identity.

use crate::model::key::{Key, Ref};
use std::collections::BTreeSet;

/// Related side of a one-to-one or one-to-many association with owner `O`.
pub trait BackRef<O> {
    /// Current back-reference, if any.
    fn back_ref(&self) -> Option<Ref<O>>;
    /// Points the back-reference at `owner`.
    fn set_back_ref(&mut self, owner: Ref<O>);
}

/// Related side of a many-to-many association with owner `O`.
pub trait ReverseSet<O> {
    fn reverse(&self) -> &BTreeSet<Key<O>>;
    fn reverse_mut(&mut self) -> &mut BTreeSet<Key<O>>;
}

/// Aggregate root that knows its own declared associations.
pub trait Enforce {
    /// Applies every declared association rule of this root.
    fn enforce(&mut self);

    /// Returns whether every related entity already points back at this root.
    fn is_enforced(&self) -> bool;
}

/// Sets `related`'s back-reference to `owner`.
///
/// Mutates only `related`. No-op when `related` is `None`.
pub fn link_one_to_one<O, R>(owner: Ref<O>, related: Option<&mut R>)
where
    R: BackRef<O>,
{
    if let Some(related) = related {
        related.set_back_ref(owner);
    }
}

/// Sets the back-reference of every child to `parent`.
///
/// Children are visited in order and never reordered; duplicates are
/// handled independently. No-op when `children` is `None`.
pub fn link_one_to_many<'a, O, C, I>(parent: Ref<O>, children: Option<I>)
where
    C: BackRef<O> + 'a,
    I: IntoIterator<Item = &'a mut C>,
{
    let Some(children) = children else {
        return;
    };
    for child in children {
        child.set_back_ref(parent);
    }
}

/// Adds `owner` to the reverse collection of every related entity.
///
/// An owner already present is not added twice. No-op when `related` is
/// `None`.
pub fn link_many_to_many<'a, O, R, I>(owner: Ref<O>, related: Option<I>)
where
    R: ReverseSet<O> + 'a,
    I: IntoIterator<Item = &'a mut R>,
{
    let Some(related) = related else {
        return;
    };
    for entry in related {
        entry.reverse_mut().insert(owner.key);
    }
}

/// Returns whether `related` (if present) points back at `owner`.
pub fn one_to_one_holds<O, R>(owner: Key<O>, related: Option<&R>) -> bool
where
    R: BackRef<O>,
{
    related.map_or(true, |related| points_at(related, owner))
}

/// Returns whether every child points back at `parent`.
pub fn one_to_many_holds<'a, O, C, I>(parent: Key<O>, children: Option<I>) -> bool
where
    C: BackRef<O> + 'a,
    I: IntoIterator<Item = &'a C>,
{
    children.map_or(true, |children| {
        children
            .into_iter()
            .all(|child| points_at(child, parent))
    })
}

/// Returns whether every related entity lists `owner` in its reverse set.
pub fn many_to_many_holds<'a, O, R, I>(owner: Key<O>, related: Option<I>) -> bool
where
    R: ReverseSet<O> + 'a,
    I: IntoIterator<Item = &'a R>,
{
    related.map_or(true, |related| {
        related
            .into_iter()
            .all(|entry| entry.reverse().contains(&owner))
    })
}

fn points_at<O, R: BackRef<O>>(related: &R, owner: Key<O>) -> bool {
    related.back_ref().map(|back| back.key) == Some(owner)
}
