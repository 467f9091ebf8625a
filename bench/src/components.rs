//! Component and system types shared by the benchmarks.

use ember_engine::ecs::{Registry, Result, component::ComponentTypes, system::Members};
use ember_macros::{Component, System};

/// 2D position component (8 bytes).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// 2D velocity component (8 bytes).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// Seconds left before the entity is killed.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Lifetime {
    pub remaining: f32,
}

/// Health component for damageable entities.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Moves every entity with a position and a velocity.
#[derive(System)]
pub struct MovementSystem {
    members: Members,
}

impl MovementSystem {
    pub fn new(types: &ComponentTypes) -> Self {
        Self {
            members: Members::requiring::<(Position, Velocity)>(types),
        }
    }

    pub fn update(&mut self, registry: &mut Registry, dt: f32) -> Result<()> {
        for &entity in self.members.entities() {
            let velocity = *registry.get_component::<Velocity>(entity)?;
            let position = registry.get_component_mut::<Position>(entity)?;
            position.x += velocity.x * dt;
            position.y += velocity.y * dt;
        }
        Ok(())
    }
}

/// Counts down lifetimes and kills expired entities.
#[derive(System)]
pub struct DecaySystem {
    members: Members,
}

impl DecaySystem {
    pub fn new(types: &ComponentTypes) -> Self {
        Self {
            members: Members::requiring::<Lifetime>(types),
        }
    }

    /// Returns the number of entities killed.
    pub fn update(&mut self, registry: &mut Registry, dt: f32) -> Result<usize> {
        let mut killed = 0;
        for &entity in self.members.entities() {
            let lifetime = registry.get_component_mut::<Lifetime>(entity)?;
            lifetime.remaining -= dt;
            if lifetime.remaining <= 0.0 {
                registry.kill_entity(entity)?;
                killed += 1;
            }
        }
        Ok(killed)
    }
}

/// Requires a kind no benchmark entity owns, so flushes pay for the check but never admit.
/// `N` only tells instances apart, since a registry holds one system per type.
#[derive(System)]
pub struct IdleSystem<const N: usize> {
    members: Members,
}

impl<const N: usize> IdleSystem<N> {
    pub fn new(types: &ComponentTypes) -> Self {
        Self {
            members: Members::requiring::<(Health, Velocity)>(types),
        }
    }
}
