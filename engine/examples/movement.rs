use ember_engine::{
    core::log,
    ecs::{Registry, component::ComponentTypes, system::Members},
};
use ember_macros::{Component, System};

#[derive(Component, Debug, Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Debug, Clone, Copy)]
struct Velocity {
    x: f32,
    y: f32,
}

#[derive(System)]
struct Movement {
    members: Members,
}

impl Movement {
    fn new(types: &ComponentTypes) -> Self {
        Self {
            members: Members::requiring::<(Position, Velocity)>(types),
        }
    }

    fn update(&mut self, registry: &mut Registry, dt: f32) -> ember_engine::ecs::Result<()> {
        for &entity in self.members.entities() {
            let velocity = *registry.get_component::<Velocity>(entity)?;
            let position = registry.get_component_mut::<Position>(entity)?;
            position.x += velocity.x * dt;
            position.y += velocity.y * dt;
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logs = log::init(::log::LevelFilter::Trace)?;

    let mut registry = Registry::new();
    let movement = Movement::new(registry.component_types());
    registry.add_system(movement)?;

    let mover = registry.create_entity();
    registry.add_component(mover, Position { x: 10.0, y: 20.0 })?;
    registry.add_component(mover, Velocity { x: 5.0, y: 0.0 })?;

    // Never joins: no position.
    let drifter = registry.create_entity();
    registry.add_component(drifter, Velocity { x: 1.0, y: 1.0 })?;

    for _ in 0..3 {
        registry.update();
        registry.with_system(|movement: &mut Movement, registry| movement.update(registry, 1.0))??;
    }

    let position = registry.get_component::<Position>(mover)?;
    println!("{mover} ended at ({}, {})", position.x, position.y);

    for message in logs.try_iter() {
        println!("{}", message.render());
    }
    Ok(())
}
