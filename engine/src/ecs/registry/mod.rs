//! The Registry is the central container for all entities, components, and systems in the ECS.
//!
//! # Architecture
//!
//! The Registry coordinates several pieces of state:
//! - **Entity counter**: hands out monotonic entity ids, never reused
//! - **Component types**: the shared [`ComponentTypes`] assigning kind ids
//! - **Pools**: one type-erased [`Pool`](crate::ecs::storage::Pool) per component kind
//! - **Signatures**: one [`Signature`] per entity id recording the kinds it owns
//! - **Systems**: one instance per system type, each caching its matching entities
//! - **Pending sets**: entities whose membership must be reconciled at the next flush
//!
//! # Deferred Membership
//!
//! Structural changes never touch a system's member list directly. Creating an entity, adding or
//! removing a component, registering a system and killing an entity only enqueue the affected
//! entities. [`Registry::update`] (the flush) then applies pending kills and re-evaluates every
//! pending entity against every system. Member lists therefore only change at the flush, never
//! while a system iterates them.
//!
//! A system detached by [`Registry::with_system`] misses the flushes its closure runs. Those
//! flushes record what they applied, and the record is replayed onto the system when it is
//! attached again, so it ends up exactly where the attached systems are.
//!
//! ```text
//!   mutation phase              flush (update)                 processing phase
//! ┌──────────────────┐   ┌──────────────────────────────┐   ┌──────────────────────┐
//! │ create_entity    │   │ 1. pending kills:            │   │ with_system(|s, r| { │
//! │ add_component    │──▶│    leave systems, reset sig  │──▶│   for e in members   │
//! │ remove_component │   │ 2. pending refresh (id order)│   │     ...              │
//! │ kill_entity      │   │    add / remove per system   │   │ })                   │
//! │ add_system       │   └──────────────────────────────┘   └──────────────────────┘
//! └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ember_engine::ecs::Registry;
//!
//! let mut registry = Registry::new();
//!
//! let entity = registry.create_entity();
//! registry.add_component(entity, Position { x: 10.0, y: 20.0 })?;
//! registry.add_component(entity, Velocity { x: 5.0, y: 0.0 })?;
//!
//! let movement = Movement::new(registry.component_types());
//! registry.add_system(movement)?;
//!
//! // Not a member yet.
//! assert!(registry.get_system::<Movement>()?.members().is_empty());
//!
//! registry.update();
//! assert_eq!(registry.get_system::<Movement>()?.members().entities(), &[entity]);
//! ```

use std::{
    any::{TypeId, type_name},
    collections::BTreeSet,
    fmt, mem,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

use fixedbitset::FixedBitSet;

use crate::{
    core::config::RegistryConfig,
    ecs::{
        RegistryError, Result,
        component::{Component, ComponentTypes, Signature},
        entity::{self, Entity, EntityMut, EntityRef},
        storage::Pools,
        system::{self, System},
    },
};

/// Source of registry ids, unique within the process.
static NEXT_ID: AtomicU32 = AtomicU32::new(0);

/// A registry identifier, used to tag the entities a registry creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Create a new registry identifier.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Id(id)
    }

    /// Get the raw identifier value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Allocate a fresh, process-unique id.
    fn next() -> Self {
        Id(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A membership change applied by a flush or a clear while some system was detached.
#[derive(Debug)]
enum Change {
    Leave(Entity),
    Refresh(Entity, Signature),
    Clear,
}

/// The Registry owns every entity, component and system of one simulation.
///
/// All mutation goes through `&mut self`; a registry is meant to be driven from a single thread.
/// Only the [`ComponentTypes`] it refers to is shared.
pub struct Registry {
    /// The registry's unique identifier.
    id: Id,

    /// The id the next created entity receives. `None` once the id space is exhausted.
    next_entity: Option<entity::Id>,

    /// The assignment of component kind ids.
    types: Arc<ComponentTypes>,

    /// Component storage, one pool per kind.
    pools: Pools,

    /// The signature of every entity ever created, indexed by entity id.
    signatures: Vec<Signature>,

    /// Entity ids that have not been killed.
    alive: FixedBitSet,

    /// Registered systems.
    systems: system::Registry,

    /// Entities whose system membership must be re-evaluated at the next flush.
    pending_refresh: BTreeSet<Entity>,

    /// Entities killed since the last flush.
    pending_kill: BTreeSet<Entity>,

    /// Number of flushes performed so far.
    flushes: u64,

    /// System types currently detached by [`with_system`](Self::with_system).
    detached: Vec<TypeId>,

    /// Changes the detached systems missed, replayed when they are attached again.
    missed: Vec<Change>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry using the process-wide [`ComponentTypes`].
    pub fn new() -> Self {
        Self::with_types(ComponentTypes::global())
    }

    /// Create a registry using the given component kind assignment.
    ///
    /// Registries sharing one [`ComponentTypes`] agree on kind ids, so signatures built against
    /// one are valid for the others.
    pub fn with_types(types: Arc<ComponentTypes>) -> Self {
        let id = Id::next();
        log::debug!("created registry {id}");

        Self {
            id,
            next_entity: Some(entity::Id::FIRST),
            types,
            pools: Pools::new(),
            signatures: Vec::new(),
            alive: FixedBitSet::new(),
            systems: system::Registry::new(),
            pending_refresh: BTreeSet::new(),
            pending_kill: BTreeSet::new(),
            flushes: 0,
            detached: Vec::new(),
            missed: Vec::new(),
        }
    }

    /// Create a registry using the process-wide [`ComponentTypes`], with room reserved for the
    /// configured number of entities.
    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::new();
        registry.signatures.reserve(config.entity_capacity);
        registry.alive.grow(config.entity_capacity);
        registry
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the component kind assignment used by this registry. Systems build their required
    /// signature against it.
    #[inline]
    pub fn component_types(&self) -> &ComponentTypes {
        &self.types
    }

    // ==================== Entities ====================

    /// Create a new entity with no components.
    ///
    /// The entity is enqueued for reconciliation and becomes visible to systems at the next
    /// [`update`](Self::update), never before.
    ///
    /// # Panics
    ///
    /// Panics if the registry has already handed out every `u32` entity id.
    pub fn create_entity(&mut self) -> Entity {
        let Some(id) = self.next_entity else {
            panic!("registry {} has exhausted the entity id space", self.id);
        };
        self.next_entity = id.next();

        let entity = Entity::new(id, self.id);
        self.signatures.push(Signature::new());
        self.alive.grow(self.signatures.len());
        self.alive.insert(entity.index());
        self.pending_refresh.insert(entity);

        log::debug!("created {entity}");
        entity
    }

    /// Kill an entity.
    ///
    /// The entity is dead immediately: its components can no longer be added, removed or
    /// mutated. At the next [`update`](Self::update) it leaves every system, its component values
    /// are dropped and its signature is cleared. Its id is never handed out again.
    ///
    /// Killing an already dead entity does nothing.
    pub fn kill_entity(&mut self, entity: Entity) -> Result<()> {
        self.check_known(entity)?;
        if !self.alive.contains(entity.index()) {
            log::warn!("{entity} is already dead");
            return Ok(());
        }

        self.alive.set(entity.index(), false);
        self.pending_refresh.remove(&entity);
        self.pending_kill.insert(entity);

        log::debug!("killed {entity}");
        Ok(())
    }

    /// Check whether `entity` was created by this registry and has not been killed.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        entity.registry() == self.id && self.alive.contains(entity.index())
    }

    /// Get the number of entities ever created, dead ones included.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.signatures.len()
    }

    /// Get the number of entities that have not been killed.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.alive.count_ones(..)
    }

    /// Check whether structural changes are waiting for the next [`update`](Self::update).
    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.pending_refresh.is_empty() || !self.pending_kill.is_empty()
    }

    /// Flush pending structural changes into system membership.
    ///
    /// Killed entities leave every system first. Then every pending entity is re-evaluated
    /// against every system in id order: it joins a system it now matches and leaves a system it
    /// no longer matches. Call this once per frame, after the mutation phase and before any
    /// system processes its members.
    pub fn update(&mut self) {
        let killed = mem::take(&mut self.pending_kill);
        let refreshed = mem::take(&mut self.pending_refresh);
        let recording = !self.detached.is_empty();

        for &entity in &killed {
            for system in self.systems.iter_mut() {
                Self::leave(system, entity);
            }
            self.pools.clear_slot(entity.index());
            self.signatures[entity.index()].reset();
            if recording {
                self.missed.push(Change::Leave(entity));
            }
        }

        for &entity in &refreshed {
            let signature = &self.signatures[entity.index()];
            for system in self.systems.iter_mut() {
                Self::reconcile(system, entity, signature);
            }
            if recording {
                self.missed.push(Change::Refresh(entity, signature.clone()));
            }
        }

        self.flushes += 1;
        log::debug!(
            "flush {}: {} killed, {} refreshed",
            self.flushes,
            killed.len(),
            refreshed.len()
        );
    }

    /// Bring one system's view of one entity in line with the entity's signature.
    fn reconcile(system: &mut dyn System, entity: Entity, signature: &Signature) {
        if !system.members().interested_in(signature) {
            Self::leave(system, entity);
        } else if system.members_mut().add_entity(entity) {
            log::trace!("{entity} joined '{}'", system.name());
        }
    }

    fn leave(system: &mut dyn System, entity: Entity) {
        if system.members_mut().remove_entity(entity) {
            log::trace!("{entity} left '{}'", system.name());
        }
    }

    /// Kill every entity and drop every component value, effective immediately.
    ///
    /// Every system is emptied and pending changes are discarded. Systems stay registered, and
    /// ids of the cleared entities are never handed out again.
    pub fn clear(&mut self) {
        let live = self.live_count();

        self.pools.clear();
        for signature in &mut self.signatures {
            signature.reset();
        }
        self.alive.clear();
        for system in self.systems.iter_mut() {
            system.members_mut().clear();
        }
        self.pending_refresh.clear();
        self.pending_kill.clear();
        if !self.detached.is_empty() {
            self.missed.push(Change::Clear);
        }

        log::debug!("cleared registry {}: {live} entities killed", self.id);
    }

    // ==================== Components ====================

    /// Attach `value` to `entity`, replacing any existing component of the same kind.
    ///
    /// Membership changes caused by the new kind apply at the next [`update`](Self::update).
    ///
    /// # Panics
    ///
    /// Panics if `C` is a new kind and every component kind id is taken.
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) -> Result<()> {
        self.check_alive(entity)?;

        let id = self.types.register::<C>();
        let count = self.entity_count();
        let pool = self.pools.get_or_create::<C>(id);
        pool.resize(count);
        pool.set(entity.index(), value);

        self.signatures[entity.index()].set(id);
        self.pending_refresh.insert(entity);
        Ok(())
    }

    /// Detach the component of kind `C` from `entity`.
    ///
    /// Only the signature bit is cleared; the stored value is dropped when it is overwritten or
    /// the entity is killed. Removing a kind the entity does not own does nothing.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Result<()> {
        self.check_alive(entity)?;

        let Some(id) = self.types.get::<C>() else {
            return Ok(());
        };
        let signature = &mut self.signatures[entity.index()];
        if signature.contains(id) {
            signature.clear(id);
            self.pending_refresh.insert(entity);
        }
        Ok(())
    }

    /// Check whether `entity` currently owns a component of kind `C`.
    ///
    /// Entities of other registries own nothing here.
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        match (self.signature(entity), self.types.get::<C>()) {
            (Some(signature), Some(id)) => signature.contains(id),
            _ => false,
        }
    }

    /// Get the component of kind `C` owned by `entity`.
    ///
    /// Returns [`RegistryError::MissingComponent`] if the entity does not own one.
    pub fn get_component<C: Component>(&self, entity: Entity) -> Result<&C> {
        self.check_known(entity)?;

        let id = self
            .types
            .get::<C>()
            .filter(|id| self.signatures[entity.index()].contains(*id))
            .ok_or_else(|| Self::missing::<C>(entity))?;
        self.pools
            .get::<C>(id)
            .and_then(|pool| pool.get(entity.index()))
            .ok_or_else(|| Self::missing::<C>(entity))
    }

    /// Get the component of kind `C` owned by `entity` mutably.
    ///
    /// Returns [`RegistryError::MissingComponent`] if the entity does not own one.
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C> {
        self.check_alive(entity)?;

        let id = self
            .types
            .get::<C>()
            .filter(|id| self.signatures[entity.index()].contains(*id))
            .ok_or_else(|| Self::missing::<C>(entity))?;
        self.pools
            .get_mut::<C>(id)
            .and_then(|pool| pool.get_mut(entity.index()))
            .ok_or_else(|| Self::missing::<C>(entity))
    }

    /// Get the signature of `entity`, or `None` if this registry did not create it.
    #[inline]
    pub fn signature(&self, entity: Entity) -> Option<&Signature> {
        if entity.registry() != self.id {
            return None;
        }
        self.signatures.get(entity.index())
    }

    // ==================== Systems ====================

    /// Register a system. Only one instance per system type may exist.
    ///
    /// Whatever members the system already holds are dropped and every live entity is enqueued,
    /// so the system is populated from scratch at the next [`update`](Self::update). Returns
    /// [`RegistryError::DuplicateSystem`] if a system of the same type is registered or is
    /// currently detached by [`with_system`](Self::with_system).
    pub fn add_system<S: System>(&mut self, mut system: S) -> Result<()> {
        if self.systems.contains::<S>() || self.detached.contains(&TypeId::of::<S>()) {
            return Err(RegistryError::DuplicateSystem(type_name::<S>()));
        }

        system.members_mut().clear();
        log::debug!(
            "added system '{}' requiring {:?}",
            system.name(),
            system.members().signature()
        );
        self.systems.insert(system);

        let registry = self.id;
        self.pending_refresh.extend(
            self.alive
                .ones()
                .map(|index| Entity::new(entity::Id::new(index as u32), registry)),
        );
        Ok(())
    }

    /// Unregister the system of type `S` and hand it back.
    pub fn remove_system<S: System>(&mut self) -> Option<S> {
        let system = self.systems.remove::<S>()?;
        log::debug!("removed system '{}'", system.name());
        Some(system)
    }

    /// Check whether a system of type `S` is registered. A system detached by
    /// [`with_system`](Self::with_system) is not, until its closure returns.
    #[inline]
    pub fn has_system<S: System>(&self) -> bool {
        self.systems.contains::<S>()
    }

    /// Get the system of type `S`.
    pub fn get_system<S: System>(&self) -> Result<&S> {
        self.systems
            .get::<S>()
            .ok_or(RegistryError::MissingSystem(type_name::<S>()))
    }

    /// Get the system of type `S` mutably.
    pub fn get_system_mut<S: System>(&mut self) -> Result<&mut S> {
        self.systems
            .get_mut::<S>()
            .ok_or(RegistryError::MissingSystem(type_name::<S>()))
    }

    /// Run `f` with the system of type `S` and the registry both mutably borrowed.
    ///
    /// This is how a system processes its members: it can read and write their components
    /// through the registry while iterating its own member list. The system is detached from the
    /// registry while `f` runs. Flushes and clears run by `f` are replayed onto it when it is
    /// attached again; changes still pending at that point wait for the next flush as usual.
    pub fn with_system<S: System, R>(
        &mut self,
        f: impl FnOnce(&mut S, &mut Registry) -> R,
    ) -> Result<R> {
        let mut system = self
            .systems
            .remove::<S>()
            .ok_or(RegistryError::MissingSystem(type_name::<S>()))?;

        let start = self.missed.len();
        self.detached.push(TypeId::of::<S>());
        let result = f(&mut system, self);
        self.detached.retain(|id| *id != TypeId::of::<S>());

        self.replay(&mut system, start);
        if self.detached.is_empty() {
            self.missed.clear();
        }
        self.systems.insert(system);
        Ok(result)
    }

    /// Apply the changes recorded since `start` to a system that was detached.
    fn replay(&self, system: &mut dyn System, start: usize) {
        for change in &self.missed[start..] {
            match change {
                Change::Leave(entity) => Self::leave(system, *entity),
                Change::Refresh(entity, signature) => Self::reconcile(system, *entity, signature),
                Change::Clear => system.members_mut().clear(),
            }
        }
    }

    // ==================== Facades ====================

    /// Get a read-only facade over `entity`.
    pub fn entity(&self, entity: Entity) -> Result<EntityRef<'_>> {
        self.check_known(entity)?;
        Ok(EntityRef::new(entity, self))
    }

    /// Get a mutable facade over `entity`. The entity must be alive.
    pub fn entity_mut(&mut self, entity: Entity) -> Result<EntityMut<'_>> {
        self.check_alive(entity)?;
        Ok(EntityMut::new(entity, self))
    }

    // ==================== Validation ====================

    /// Verify that `entity` was created by this registry.
    fn check_known(&self, entity: Entity) -> Result<()> {
        if entity.registry() != self.id {
            return Err(RegistryError::ForeignEntity {
                entity,
                owner: entity.registry(),
                registry: self.id,
            });
        }
        if entity.index() >= self.signatures.len() {
            return Err(RegistryError::UnknownEntity(entity));
        }
        Ok(())
    }

    /// Verify that `entity` was created by this registry and is still alive.
    fn check_alive(&self, entity: Entity) -> Result<()> {
        self.check_known(entity)?;
        if !self.alive.contains(entity.index()) {
            return Err(RegistryError::DeadEntity(entity));
        }
        Ok(())
    }

    fn missing<C: Component>(entity: Entity) -> RegistryError {
        RegistryError::MissingComponent {
            entity,
            component: type_name::<C>(),
        }
    }
}
