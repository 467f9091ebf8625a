//! Type-erased, entity-indexed component storage for the ECS.
//!
//! Every component kind gets its own [`Pool`]: a dense array indexed directly by entity id. This
//! is the classic "sparse array per component kind" layout. It gives O(1) set/get with no
//! indirection, paid for with empty slots for entities that lack the kind.
//!
//! ```text
//! entity id:        0        1        2        3
//!                ┌────────┬────────┬────────┬────────┐
//! Pool<Position> │ (1, 2) │  ----  │ (5, 6) │  ----  │
//!                ├────────┼────────┼────────┼────────┤
//! Pool<Velocity> │ (0, 1) │ (3, 0) │  ----  │  ----  │
//!                └────────┴────────┴────────┴────────┘
//! ```
//!
//! # Type Erasure
//!
//! [`Pools`] keeps all pools in one homogeneous `Vec<Option<Box<dyn AnyPool>>>` indexed by
//! component kind id. [`AnyPool`] only exposes operations that do not need the concrete kind,
//! which is teardown of one slot or of everything. The concrete `Pool<C>` is recovered with a checked downcast, and
//! only by callers that name the kind `C`. The id → kind binding is made in exactly one place,
//! [`Pools::get_or_create`], so a pool can never be fetched as the wrong kind.

mod pool;

use std::any::{Any, type_name};

pub use pool::Pool;

use crate::ecs::component::{self, Component};

/// Operations on a pool that do not need to know its component kind.
pub trait AnyPool: Any {
    /// Drop the value stored for the entity at `index`, if any.
    fn clear_slot(&mut self, index: usize);

    /// Drop every slot.
    fn clear(&mut self);

    /// The Rust type name of the stored component kind.
    fn component_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete pool.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting to the concrete pool mutably.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> AnyPool for Pool<C> {
    #[inline]
    fn clear_slot(&mut self, index: usize) {
        self.take(index);
    }

    #[inline]
    fn clear(&mut self) {
        Pool::clear(self)
    }

    #[inline]
    fn component_name(&self) -> &'static str {
        type_name::<C>()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The collection of all component pools, one per component kind id, created lazily.
#[derive(Default)]
pub struct Pools {
    /// Pools indexed by component kind id. `None` until the kind is first stored.
    pools: Vec<Option<Box<dyn AnyPool>>>,
}

impl Pools {
    /// Create an empty pool collection.
    #[inline]
    pub const fn new() -> Self {
        Self { pools: Vec::new() }
    }

    /// Get the pool for kind `C` stored under `id`, creating it if absent.
    ///
    /// # Panics
    ///
    /// Panics if a pool of a different kind already lives under `id`. Ids come from
    /// [`ComponentTypes`](component::ComponentTypes), which binds each id to one kind, so this
    /// only happens if ids from two different type registries are mixed.
    pub fn get_or_create<C: Component>(&mut self, id: component::Id) -> &mut Pool<C> {
        let index = id.index();
        if index >= self.pools.len() {
            self.pools.resize_with(index + 1, || None);
        }

        let pool = self.pools[index].get_or_insert_with(|| {
            log::trace!("creating pool for '{}' under {:?}", type_name::<C>(), id);
            Box::new(Pool::<C>::new())
        });
        let stored = pool.component_name();
        match pool.as_any_mut().downcast_mut::<Pool<C>>() {
            Some(pool) => pool,
            None => panic!(
                "{:?} holds a pool of '{}', not '{}'",
                id,
                stored,
                type_name::<C>()
            ),
        }
    }

    /// Get the pool for kind `C` stored under `id`, if it exists and holds `C`.
    #[inline]
    pub fn get<C: Component>(&self, id: component::Id) -> Option<&Pool<C>> {
        self.pools
            .get(id.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<Pool<C>>()
    }

    /// Get the pool for kind `C` stored under `id` mutably, if it exists and holds `C`.
    #[inline]
    pub fn get_mut<C: Component>(&mut self, id: component::Id) -> Option<&mut Pool<C>> {
        self.pools
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<Pool<C>>()
    }

    /// Drop whatever every pool holds for the entity at `index`.
    pub fn clear_slot(&mut self, index: usize) {
        for pool in self.pools.iter_mut().flatten() {
            pool.clear_slot(index);
        }
    }

    /// Drop the contents of every pool. The pools themselves stay bound to their kinds.
    pub fn clear(&mut self) {
        for pool in self.pools.iter_mut().flatten() {
            pool.clear();
        }
    }
}
