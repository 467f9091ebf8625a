//! Particle benchmark scenario.
//!
//! Keeps a fixed population of short-lived particles alive:
//! - Components: Position, Velocity, Lifetime
//! - Systems: movement, lifetime decay (kills expired particles)
//! - Every frame respawns as many particles as died in the previous one
//!
//! This exercises flush throughput under constant create/kill churn as well as plain member
//! iteration.

use ember_engine::ecs::{Entity, Registry, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::components::{DecaySystem, Lifetime, MovementSystem, Position, Velocity};

/// Configuration for the particle benchmark.
pub struct ParticleConfig {
    /// Number of particles to maintain.
    pub particle_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 10_000,
            delta_time: 1.0 / 60.0,
            seed: 12345,
        }
    }
}

/// A running particle simulation.
pub struct Particles {
    config: ParticleConfig,
    registry: Registry,
    rng: ChaCha8Rng,
    /// Particles killed during the last frame, respawned at the start of the next.
    dead: usize,
}

impl Particles {
    /// Build the registry and spawn the initial population. Nothing is a system member until the
    /// first [`frame`](Self::frame).
    pub fn new(config: ParticleConfig) -> Result<Self> {
        let mut registry = Registry::new();
        let movement = MovementSystem::new(registry.component_types());
        let decay = DecaySystem::new(registry.component_types());
        registry.add_system(movement)?;
        registry.add_system(decay)?;

        let mut particles = Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            dead: config.particle_count,
            config,
            registry,
        };
        particles.respawn()?;
        Ok(particles)
    }

    /// Run one frame: respawn, flush, move, decay.
    pub fn frame(&mut self) -> Result<()> {
        self.respawn()?;
        self.registry.update();

        let dt = self.config.delta_time;
        self.registry
            .with_system(|movement: &mut MovementSystem, registry| movement.update(registry, dt))??;
        self.dead = self
            .registry
            .with_system(|decay: &mut DecaySystem, registry| decay.update(registry, dt))??;
        Ok(())
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn respawn(&mut self) -> Result<()> {
        for _ in 0..self.dead {
            self.spawn()?;
        }
        self.dead = 0;
        Ok(())
    }

    fn spawn(&mut self) -> Result<Entity> {
        let rng = &mut self.rng;
        let position = Position {
            x: rng.gen_range(-100.0..100.0),
            y: rng.gen_range(-100.0..100.0),
        };
        let velocity = Velocity {
            x: rng.gen_range(-10.0..10.0),
            y: rng.gen_range(-10.0..10.0),
        };
        let lifetime = Lifetime {
            remaining: rng.gen_range(0.05..0.5),
        };

        let entity = self.registry.create_entity();
        self.registry
            .entity_mut(entity)?
            .add_component(position)?
            .add_component(velocity)?
            .add_component(lifetime)?;
        Ok(entity)
    }
}
