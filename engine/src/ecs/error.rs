//! Errors surfaced by the entity registry.
//!
//! Fatal configuration problems (running out of signature bits, exhausting the entity id space)
//! panic at the point of detection. Everything a caller can reasonably guard against is reported
//! through [`RegistryError`] instead.

use thiserror::Error;

use crate::ecs::{entity, registry};

/// Errors that can occur while operating on a [`Registry`](registry::Registry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// More distinct component kinds were registered than a signature can represent.
    #[error("cannot register component kind '{kind}': the limit of {limit} component kinds is reached")]
    TooManyComponentKinds {
        /// The signature width.
        limit: usize,
        /// The Rust type name of the rejected kind.
        kind: &'static str,
    },

    /// The entity was created by a different registry.
    #[error("{entity} belongs to registry {owner}, not registry {registry}")]
    ForeignEntity {
        /// The offending entity.
        entity: entity::Entity,
        /// The registry that created the entity.
        owner: registry::Id,
        /// The registry the entity was used with.
        registry: registry::Id,
    },

    /// The entity id was never allocated by this registry.
    #[error("{0} was never created by this registry")]
    UnknownEntity(entity::Entity),

    /// The entity has been killed and can no longer be mutated.
    #[error("{0} has been killed")]
    DeadEntity(entity::Entity),

    /// The entity does not currently own a component of the requested kind.
    #[error("{entity} has no '{component}' component")]
    MissingComponent {
        /// The entity that was queried.
        entity: entity::Entity,
        /// The Rust type name of the component kind.
        component: &'static str,
    },

    /// No system of the requested type is registered.
    #[error("system '{0}' is not registered")]
    MissingSystem(&'static str),

    /// A system of the same type is already registered.
    #[error("system '{0}' is already registered")]
    DuplicateSystem(&'static str),
}

/// Convenience result alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
