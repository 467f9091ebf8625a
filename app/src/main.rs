mod components;
mod systems;
mod time;

use std::{env, thread, time::Duration};

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use ember_engine::{
    core::{
        config::Config,
        log::{self as logging, LogMessage},
    },
    ecs::{Entity, Registry},
};

use crate::{
    components::{RigidBody, Sprite, Transform},
    systems::{Canvas, MovementSystem, RenderSystem},
    time::Time,
};

const CANVAS_WIDTH: usize = 48;
const CANVAS_HEIGHT: usize = 12;

fn main() -> Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => Config::load(&path).with_context(|| format!("loading {path}"))?,
        None => Config::default(),
    };
    let logs = logging::init(config.log.level_filter()?).context("installing the logger")?;

    let mut registry = Registry::from_config(&config.registry);
    let movement = MovementSystem::new(registry.component_types());
    let render = RenderSystem::new(registry.component_types());
    registry.add_system(movement)?;
    registry.add_system(render)?;

    let scene = Scene::spawn(&mut registry)?;
    let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let mut time = Time::new(Duration::from_millis(config.frame.fixed_time_step_ms));

    let mut frame = 0;
    while config.frame.frames == 0 || frame < config.frame.frames {
        time = time.next();

        // Mutation phase
        scene.script(&mut registry, frame)?;

        // Flush
        registry.update();

        // Processing phase
        if time.fixed_time_step.is_zero() {
            let dt = time.delta_secs();
            registry.with_system(|s: &mut MovementSystem, r| s.update(r, dt))??;
        }
        while time.has_fixed() {
            time.increment_fixed();
            let dt = time.fixed_secs();
            registry.with_system(|s: &mut MovementSystem, r| s.update(r, dt))??;
        }
        registry.with_system(|s: &mut RenderSystem, r| s.update(r, &mut canvas))??;

        log::info!(target: "frame", "frame {frame}: {} live entities", registry.live_count());
        drain(&logs);

        frame += 1;
        thread::sleep(Duration::from_millis(1));
    }

    print!("{canvas}");
    drain(&logs);
    Ok(())
}

/// Print every pending log message.
fn drain(logs: &Receiver<LogMessage>) {
    for message in logs.try_iter() {
        println!("{}", message.render());
    }
}

/// The demo entities and what happens to them over time.
struct Scene {
    tank: Entity,
    truck: Entity,
    scenery: Entity,
}

impl Scene {
    fn spawn(registry: &mut Registry) -> Result<Self> {
        let tank = registry.create_entity();
        registry
            .entity_mut(tank)?
            .add_component(Transform { x: 2.0, y: 2.0 })?
            .add_component(RigidBody { vx: 8.0, vy: 0.0 })?
            .add_component(Sprite {
                width: 3,
                height: 2,
                glyph: 'T',
            })?;

        // Moves, but stays invisible until it gets a sprite.
        let truck = registry.create_entity();
        registry
            .entity_mut(truck)?
            .add_component(Transform { x: 2.0, y: 7.0 })?
            .add_component(RigidBody { vx: 4.0, vy: -1.0 })?;

        // Drawn, but never moves.
        let scenery = registry.create_entity();
        registry
            .entity_mut(scenery)?
            .add_component(Transform { x: 40.0, y: 8.0 })?
            .add_component(Sprite {
                width: 4,
                height: 3,
                glyph: '^',
            })?;

        Ok(Self {
            tank,
            truck,
            scenery,
        })
    }

    fn script(&self, registry: &mut Registry, frame: u32) -> Result<()> {
        match frame {
            10 => {
                registry.add_component(
                    self.truck,
                    Sprite {
                        width: 2,
                        height: 1,
                        glyph: 'U',
                    },
                )?;
            }
            30 => registry.remove_component::<RigidBody>(self.tank)?,
            45 if registry.is_alive(self.scenery) => registry.kill_entity(self.scenery)?,
            _ => {}
        }
        Ok(())
    }
}
