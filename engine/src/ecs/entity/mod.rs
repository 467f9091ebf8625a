//! Entity identity for the ECS (Entity Component System).
//!
//! An [`Entity`] is a lightweight handle: a numeric [`Id`] plus the id of the
//! [`Registry`](crate::ecs::registry::Registry) that created it. The entity owns no data of its
//! own. All component storage and signatures live in the registry and are keyed by the id.
//!
//! # Identity
//!
//! Ids are assigned from a monotonic counter starting at zero and are never reused, so two
//! entities from the same registry are equal exactly when their ids are equal. Equality, ordering
//! and hashing ignore the registry tag.
//!
//! # Back-reference
//!
//! The registry tag is a non-owning back-reference. It never keeps a registry alive and is never
//! dereferenced; a registry compares it against its own id and rejects entities it did not create
//! with [`RegistryError::ForeignEntity`](crate::ecs::RegistryError::ForeignEntity).
//!
//! To operate on an entity's components through the entity itself, borrow a facade from the
//! registry with [`Registry::entity`](crate::ecs::registry::Registry::entity) or
//! [`Registry::entity_mut`](crate::ecs::registry::Registry::entity_mut). The facade borrows the
//! registry, so it can never outlive it.

mod reference;

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use crate::ecs::registry;

/// Export the facade types for entity references.
pub use reference::{EntityMut, EntityRef};

/// An entity identifier. Ids are unique for the lifetime of a registry and strictly increasing in
/// creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// The first id handed out by a registry.
    pub const FIRST: Self = Self(0);

    /// Construct an id from a raw value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Get the index of this id if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Get the id following this one, or `None` once the id space is exhausted.
    #[inline]
    pub const fn next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity in the ECS.
///
/// Entities are plain values: copying one copies the handle, not any component data.
#[derive(Debug, Clone, Copy)]
pub struct Entity {
    /// The unique identifier of the entity.
    id: Id,

    /// The registry that created this entity.
    registry: registry::Id,
}

impl Entity {
    /// Construct an entity handle for the given id, owned by the given registry.
    #[inline]
    pub(crate) const fn new(id: Id, registry: registry::Id) -> Self {
        Self { id, registry }
    }

    /// Get the id of this entity.
    #[inline]
    pub const fn id(&self) -> Id {
        self.id
    }

    /// Get the id of the registry that created this entity.
    #[inline]
    pub const fn registry(&self) -> registry::Id {
        self.registry
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub const fn index(&self) -> usize {
        self.id.index()
    }
}

impl PartialEq for Entity {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Order entities by id, which is also creation order.
impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity {}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn entity(id: u32, registry: u32) -> Entity {
        Entity::new(Id::new(id), registry::Id::new(registry))
    }

    #[test]
    fn entity_ordering() {
        // Given
        let e1 = entity(1, 0);
        let e2 = entity(2, 0);
        let e10 = entity(10, 0);

        // Then - Ordered by id
        assert!(e1 < e2);
        assert!(e2 < e10);
        assert_eq!(e1.cmp(&e1), Ordering::Equal);
    }

    #[test]
    fn entity_equality_ignores_registry() {
        // Given
        let e1 = entity(42, 0);
        let e2 = entity(42, 7);
        let e3 = entity(43, 0);

        // Then
        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
    }

    #[test]
    fn entity_hash_matches_equality() {
        // Given
        let mut set = HashSet::new();

        // When
        set.insert(entity(5, 0));
        set.insert(entity(5, 1));
        set.insert(entity(6, 0));

        // Then
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn entity_index() {
        // Given
        let e1 = entity(0, 0);
        let e2 = entity(42, 0);
        let e3 = entity(1000, 0);

        // Then
        assert_eq!(e1.index(), 0);
        assert_eq!(e2.index(), 42);
        assert_eq!(e3.index(), 1000);
    }

    #[test]
    fn id_next() {
        // Given
        let first = Id::FIRST;

        // When
        let second = first.next();
        let last = Id::new(u32::MAX).next();

        // Then
        assert_eq!(second, Some(Id::new(1)));
        assert_eq!(last, None);
    }

    #[test]
    fn entity_display() {
        assert_eq!(entity(3, 0).to_string(), "entity 3");
    }
}
