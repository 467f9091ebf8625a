//! Registry of component kinds.
//!
//! [`ComponentTypes`] hands out a small, stable [`Id`] for every distinct component kind the first
//! time the kind is used. Ids are sequential from [`ComponentTypes::BASE`] in first-use order, so
//! they are deterministic within one run but must not be persisted or compared across runs.
//!
//! Because an id doubles as a bit position in a [`Signature`](super::Signature), at most
//! [`MAX_COMPONENTS`] kinds can ever be registered. Registering one more is a configuration error:
//! [`ComponentTypes::register`] panics and [`ComponentTypes::try_register`] reports
//! [`RegistryError::TooManyComponentKinds`].
//!
//! # Thread Safety
//!
//! The registry uses lock-free reads via `DashMap` and a lock only when a new kind is first
//! registered. A single process-wide instance is available through [`ComponentTypes::global`];
//! registries that need isolated ids (tests, tools) can share their own instance instead.
//!
//! # Example
//!
//! ```rust,ignore
//! let types = ComponentTypes::new();
//!
//! let position = types.register::<Position>();
//! let velocity = types.register::<Velocity>();
//!
//! assert_eq!(types.register::<Position>(), position);
//! assert_ne!(position, velocity);
//! ```

use std::{
    any::{TypeId as StdTypeId, type_name},
    sync::{Arc, LazyLock, RwLock},
};

use dashmap::DashMap;

use crate::ecs::{
    RegistryError, Result,
    component::{Component, Id, MAX_COMPONENTS},
};

/// The process-wide component kind registry.
static GLOBAL: LazyLock<Arc<ComponentTypes>> = LazyLock::new(|| Arc::new(ComponentTypes::new()));

/// Metadata about a registered component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Info {
    /// The component kind id.
    id: Id,

    /// The Rust type name, used in diagnostics.
    name: &'static str,

    /// The Rust TypeId for runtime type checking.
    type_id: StdTypeId,
}

impl Info {
    /// Construct the info for kind `C`.
    fn new<C: Component>(id: Id) -> Self {
        Self {
            id,
            name: type_name::<C>(),
            type_id: StdTypeId::of::<C>(),
        }
    }

    /// Get the component kind id.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the Rust type name of the kind.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the Rust TypeId of the kind.
    #[inline]
    pub fn type_id(&self) -> StdTypeId {
        self.type_id
    }
}

/// A thread-safe registry assigning ids to component kinds.
pub struct ComponentTypes {
    /// Map from Rust TypeId to our Id. Lock-free reads via sharded concurrent hashmap.
    type_map: DashMap<StdTypeId, Id>,

    /// Registered kinds, indexed by id. Protected by RwLock for rare writes.
    types: RwLock<Vec<Info>>,
}

impl Default for ComponentTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTypes {
    /// The id given to the first registered kind.
    pub const BASE: Id = Id::new(0);

    /// Create a new, empty registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            types: RwLock::new(Vec::with_capacity(MAX_COMPONENTS)),
        }
    }

    /// Get the process-wide registry shared by every [`Registry`](crate::ecs::registry::Registry)
    /// created with [`Registry::new`](crate::ecs::registry::Registry::new).
    #[inline]
    pub fn global() -> Arc<ComponentTypes> {
        Arc::clone(&GLOBAL)
    }

    /// Get the id of kind `C`, registering it on first use.
    ///
    /// # Panics
    ///
    /// Panics if `C` is new and [`MAX_COMPONENTS`] kinds are already registered.
    pub fn register<C: Component>(&self) -> Id {
        match self.try_register::<C>() {
            Ok(id) => id,
            Err(error) => panic!("{error}"),
        }
    }

    /// Get the id of kind `C`, registering it on first use.
    ///
    /// Returns [`RegistryError::TooManyComponentKinds`] if `C` is new and no id is left.
    pub fn try_register<C: Component>(&self) -> Result<Id> {
        let std_type_id = StdTypeId::of::<C>();

        // Fast path: check if already registered (lock-free read)
        if let Some(existing) = self.type_map.get(&std_type_id) {
            return Ok(*existing);
        }

        // Slow path: the entry API serializes racing registrations of the same kind.
        match self.type_map.entry(std_type_id) {
            dashmap::Entry::Occupied(occupied) => Ok(*occupied.get()),
            dashmap::Entry::Vacant(vacant) => {
                let mut types = self.types.write().unwrap();
                if types.len() >= MAX_COMPONENTS {
                    return Err(RegistryError::TooManyComponentKinds {
                        limit: MAX_COMPONENTS,
                        kind: type_name::<C>(),
                    });
                }

                let id = Id::new(Self::BASE.value() + types.len() as u32);
                types.push(Info::new::<C>(id));
                vacant.insert(id);

                log::trace!("registered component kind '{}' as {:?}", type_name::<C>(), id);
                Ok(id)
            }
        }
    }

    /// Get the id of kind `C`, if registered.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<Id> {
        self.type_map
            .get(&StdTypeId::of::<C>())
            .map(|entry| *entry.value())
    }

    /// Get the info of a registered kind by id.
    #[inline]
    pub fn info(&self, id: Id) -> Option<Info> {
        let types = self.types.read().unwrap();
        types.get(id.index() - Self::BASE.index()).copied()
    }

    /// Get the info for kind `C`, if registered.
    #[inline]
    pub fn info_of<C: Component>(&self) -> Option<Info> {
        self.info(self.get::<C>()?)
    }

    /// Get the number of registered kinds.
    #[inline]
    pub fn len(&self) -> usize {
        self.types.read().unwrap().len()
    }

    /// Check if no kind has been registered yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
