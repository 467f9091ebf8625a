use crate::ecs::{
    Result,
    component::{Component, Signature},
    entity::Entity,
    registry::Registry,
};

/// A reference to an entity with read-only access to its components.
///
/// The lifetime `'r` ties the reference to the registry that created the entity, so the facade
/// can never outlive the storage it forwards to.
pub struct EntityRef<'r> {
    /// The entity this reference points to.
    entity: Entity,
    /// The registry holding the entity's components.
    registry: &'r Registry,
}

impl<'r> EntityRef<'r> {
    /// Create a new reference for an entity in the given registry.
    #[inline]
    pub(crate) const fn new(entity: Entity, registry: &'r Registry) -> Self {
        Self { entity, registry }
    }

    /// Get the entity this reference points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Check whether the entity currently owns a component of kind `C`.
    #[inline]
    pub fn has_component<C: Component>(&self) -> bool {
        self.registry.has_component::<C>(self.entity)
    }

    /// Get a reference to a component on this entity.
    pub fn get_component<C: Component>(&self) -> Result<&'r C> {
        self.registry.get_component::<C>(self.entity)
    }

    /// Get the signature of the referenced entity.
    #[inline]
    pub fn signature(&self) -> Option<&'r Signature> {
        self.registry.signature(self.entity)
    }
}

/// A mutable reference to an entity, forwarding component operations to its registry.
///
/// This holds a mutable borrow of the whole registry while it is alive. Drop it before calling
/// anything else on the registry.
pub struct EntityMut<'r> {
    /// The entity this reference points to.
    entity: Entity,
    /// The registry holding the entity's components.
    registry: &'r mut Registry,
}

impl<'r> EntityMut<'r> {
    /// Create a new mutable reference for an entity in the given registry.
    #[inline]
    pub(crate) fn new(entity: Entity, registry: &'r mut Registry) -> Self {
        Self { entity, registry }
    }

    /// Get the entity this reference points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Attach a component to this entity, replacing any existing value of the same kind.
    ///
    /// Returns `self` so several components can be attached in one expression.
    pub fn add_component<C: Component>(&mut self, value: C) -> Result<&mut Self> {
        self.registry.add_component(self.entity, value)?;
        Ok(self)
    }

    /// Detach the component of kind `C` from this entity.
    pub fn remove_component<C: Component>(&mut self) -> Result<&mut Self> {
        self.registry.remove_component::<C>(self.entity)?;
        Ok(self)
    }

    /// Check whether the entity currently owns a component of kind `C`.
    #[inline]
    pub fn has_component<C: Component>(&self) -> bool {
        self.registry.has_component::<C>(self.entity)
    }

    /// Get a reference to a component on this entity.
    pub fn get_component<C: Component>(&self) -> Result<&C> {
        self.registry.get_component::<C>(self.entity)
    }

    /// Get a mutable reference to a component on this entity.
    pub fn get_component_mut<C: Component>(&mut self) -> Result<&mut C> {
        self.registry.get_component_mut::<C>(self.entity)
    }

    /// Get the signature of the referenced entity.
    #[inline]
    pub fn signature(&self) -> Option<&Signature> {
        self.registry.signature(self.entity)
    }
}
