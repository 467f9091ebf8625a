//! Systems: processing units that operate on the entities matching a required signature.
//!
//! # Overview
//!
//! A system embeds a [`Members`] value holding two things: the [`Signature`] of component kinds an
//! entity must own to be of interest, and the current list of entities that do. The list is a
//! cache maintained by the [`Registry`](crate::ecs::registry::Registry) at every flush; systems
//! never edit it while processing.
//!
//! What a system does with its members is up to the system. The registry never calls into it, so
//! the processing entry point can take whatever per-frame context it needs (elapsed time, a
//! drawing surface, ...).
//!
//! ```rust,ignore
//! use ember_engine::ecs::{Registry, component::ComponentTypes, system::Members};
//! use ember_macros::{Component, System};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Component)]
//! struct Velocity { x: f32, y: f32 }
//!
//! #[derive(System)]
//! struct Movement {
//!     #[members]
//!     members: Members,
//! }
//!
//! impl Movement {
//!     fn new(types: &ComponentTypes) -> Self {
//!         Self { members: Members::requiring::<(Position, Velocity)>(types) }
//!     }
//!
//!     fn update(&mut self, registry: &mut Registry, dt: f32) {
//!         for &entity in self.members.entities() {
//!             let velocity = registry.get_component::<Velocity>(entity).map(|v| (v.x, v.y));
//!             if let (Ok((vx, vy)), Ok(position)) =
//!                 (velocity, registry.get_component_mut::<Position>(entity))
//!             {
//!                 position.x += vx * dt;
//!                 position.y += vy * dt;
//!             }
//!         }
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! let movement = Movement::new(registry.component_types());
//! registry.add_system(movement)?;
//! registry.update();
//! registry.with_system(|movement: &mut Movement, registry| movement.update(registry, 1.0))?;
//! ```
//!
//! # Membership
//!
//! An entity is a member exactly when its signature is a superset of the required signature, as
//! of the last flush. Each entity appears at most once. Members are kept in the order they were
//! admitted, which for entities admitted in the same flush is creation order.

use std::any::type_name;

use fixedbitset::FixedBitSet;

use crate::ecs::{
    component::{Component, ComponentTypes, IntoSignature, Signature},
    entity::Entity,
};

pub mod registry;

pub use registry::Registry;

/// A processing unit with a required signature and a member list.
///
/// Implement it with `#[derive(System)]` on a struct that has a [`Members`] field marked
/// `#[members]`.
pub trait System: 'static {
    /// The membership state of this system.
    fn members(&self) -> &Members;

    /// The membership state of this system, mutably. Used by the registry at flush time.
    fn members_mut(&mut self) -> &mut Members;

    /// A human readable name for diagnostics.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// The required signature of a system and the entities currently matching it.
#[derive(Debug, Clone, Default)]
pub struct Members {
    /// The component kinds an entity must own.
    signature: Signature,

    /// Matching entities in admission order.
    entities: Vec<Entity>,

    /// Entity ids present in `entities`, for O(1) membership tests.
    index: FixedBitSet,
}

impl Members {
    /// Create a member set requiring nothing. Such a system is interested in every entity.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a member set requiring every kind in `S`, e.g. `(Position, Velocity)`.
    #[inline]
    pub fn requiring<S: IntoSignature>(types: &ComponentTypes) -> Self {
        Self {
            signature: S::into_signature(types),
            ..Self::default()
        }
    }

    /// Add kind `C` to the required signature, registering it if needed.
    ///
    /// # Panics
    ///
    /// Panics if `C` is a new kind and no component kind id is left.
    #[inline]
    pub fn require<C: Component>(mut self, types: &ComponentTypes) -> Self {
        self.signature.set(types.register::<C>());
        self
    }

    /// Get the required signature.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Get the member entities in admission order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Check whether `entity` is a member.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains(entity.index())
    }

    /// Get the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if there are no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Check whether an entity with the given signature qualifies for membership.
    #[inline]
    pub fn interested_in(&self, signature: &Signature) -> bool {
        signature.matches(&self.signature)
    }

    /// Append `entity` to the member list. Returns `false` if it was already a member.
    pub fn add_entity(&mut self, entity: Entity) -> bool {
        if self.contains(entity) {
            return false;
        }

        self.index.grow(entity.index() + 1);
        self.index.insert(entity.index());
        self.entities.push(entity);
        true
    }

    /// Remove `entity` from the member list, keeping the order of the rest. Returns `false` if it
    /// was not a member.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        if !self.contains(entity) {
            return false;
        }

        self.index.set(entity.index(), false);
        if let Some(position) = self.entities.iter().position(|member| *member == entity) {
            self.entities.remove(position);
        }
        true
    }

    /// Drop every member. The required signature is kept.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.index.clear();
    }
}
