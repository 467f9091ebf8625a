//! System registry for storing and retrieving ECS systems by type.
//!
//! The [`Registry`] holds at most one instance of every system type. Systems are stored
//! type-erased so the collection stays homogeneous, and recovered by naming their type.

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
};

use crate::ecs::system::System;

/// Object-safe view of a system that can also be downcast to its concrete type.
pub(crate) trait AnySystem: System {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_system_mut(&mut self) -> &mut dyn System;
}

impl<S: System> AnySystem for S {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    #[inline]
    fn as_system_mut(&mut self) -> &mut dyn System {
        self
    }
}

/// A registry for storing and managing ECS systems, keyed by system type.
///
/// # Examples
///
/// ```rust,ignore
/// let mut systems = system::Registry::new();
///
/// assert!(systems.insert(Movement::new(&types)).is_none());
/// assert!(systems.contains::<Movement>());
///
/// let movement = systems.get::<Movement>().unwrap();
/// println!("{} members", movement.members().len());
/// ```
#[derive(Default)]
pub struct Registry {
    /// All registered systems, keyed by their Rust type.
    systems: HashMap<TypeId, Box<dyn AnySystem>>,
}

impl Registry {
    /// Create a new, empty system registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            systems: HashMap::new(),
        }
    }

    /// Store `system`, returning the instance of the same type it replaced, if any.
    pub fn insert<S: System>(&mut self, system: S) -> Option<S> {
        let previous = self.systems.insert(TypeId::of::<S>(), Box::new(system))?;
        Self::unbox(previous)
    }

    /// Take the system of type `S` out of the registry.
    pub fn remove<S: System>(&mut self) -> Option<S> {
        let system = self.systems.remove(&TypeId::of::<S>())?;
        Self::unbox(system)
    }

    /// Check whether a system of type `S` is registered.
    #[inline]
    pub fn contains<S: System>(&self) -> bool {
        self.systems.contains_key(&TypeId::of::<S>())
    }

    /// Get the system of type `S`.
    #[inline]
    pub fn get<S: System>(&self) -> Option<&S> {
        self.systems
            .get(&TypeId::of::<S>())?
            .as_any()
            .downcast_ref::<S>()
    }

    /// Get the system of type `S` mutably.
    #[inline]
    pub fn get_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems
            .get_mut(&TypeId::of::<S>())?
            .as_any_mut()
            .downcast_mut::<S>()
    }

    /// Get the number of registered systems.
    #[inline]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Check if no system is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Iterate over every system without knowing its type. The order is unspecified.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut dyn System> {
        self.systems
            .values_mut()
            .map(|system| system.as_system_mut())
    }

    fn unbox<S: System>(system: Box<dyn AnySystem>) -> Option<S> {
        match system.into_any().downcast::<S>() {
            Ok(system) => Some(*system),
            Err(_) => {
                log::error!("system slot for '{}' held another type", type_name::<S>());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ember_macros::System;

    use super::*;
    use crate::ecs::system::Members;

    #[derive(System)]
    struct Movement {
        members: Members,
        speed: u32,
    }

    #[derive(System)]
    struct Render {
        members: Members,
    }

    fn movement(speed: u32) -> Movement {
        Movement {
            members: Members::new(),
            speed,
        }
    }

    #[test]
    fn insert_and_get() {
        // Given
        let mut systems = Registry::new();

        // When
        let replaced = systems.insert(movement(3));

        // Then
        assert!(replaced.is_none());
        assert!(systems.contains::<Movement>());
        assert!(!systems.contains::<Render>());
        assert_eq!(systems.get::<Movement>().map(|m| m.speed), Some(3));
        assert!(systems.get::<Render>().is_none());
    }

    #[test]
    fn insert_replaces_same_type() {
        // Given
        let mut systems = Registry::new();
        systems.insert(movement(1));

        // When
        let replaced = systems.insert(movement(2));

        // Then
        assert_eq!(replaced.map(|m| m.speed), Some(1));
        assert_eq!(systems.len(), 1);
        assert_eq!(systems.get::<Movement>().map(|m| m.speed), Some(2));
    }

    #[test]
    fn get_mut_writes_through() {
        // Given
        let mut systems = Registry::new();
        systems.insert(movement(1));

        // When
        if let Some(movement) = systems.get_mut::<Movement>() {
            movement.speed = 9;
        }

        // Then
        assert_eq!(systems.get::<Movement>().map(|m| m.speed), Some(9));
    }

    #[test]
    fn remove_returns_instance() {
        // Given
        let mut systems = Registry::new();
        systems.insert(movement(5));
        systems.insert(Render {
            members: Members::new(),
        });

        // When
        let removed = systems.remove::<Movement>();

        // Then
        assert_eq!(removed.map(|m| m.speed), Some(5));
        assert!(systems.remove::<Movement>().is_none());
        assert_eq!(systems.len(), 1);
    }

    #[test]
    fn iter_mut_visits_every_system() {
        // Given
        let mut systems = Registry::new();
        systems.insert(movement(0));
        systems.insert(Render {
            members: Members::new(),
        });

        // When
        let mut names: Vec<_> = systems.iter_mut().map(|system| system.name()).collect();
        names.sort();

        // Then
        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|name| name.ends_with("Movement")));
        assert!(names.iter().any(|name| name.ends_with("Render")));
    }
}
