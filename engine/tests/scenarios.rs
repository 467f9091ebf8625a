//! Frame-level scenarios driven through the public API only.

use std::sync::Arc;

use ember_engine::ecs::{
    Registry, RegistryError, System, component::ComponentTypes, system::Members,
};
use ember_macros::{Component, System};

#[derive(Component, Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}

#[derive(Component, Debug, PartialEq)]
struct Health(i32);

#[derive(System)]
struct MovementSystem {
    members: Members,
}

impl MovementSystem {
    fn new(types: &ComponentTypes) -> Self {
        Self {
            members: Members::new()
                .require::<Position>(types)
                .require::<Velocity>(types),
        }
    }

    fn update(&mut self, registry: &mut Registry, dt: f32) -> Result<(), RegistryError> {
        for &entity in self.members.entities() {
            let velocity = *registry.get_component::<Velocity>(entity)?;
            let position = registry.get_component_mut::<Position>(entity)?;
            position.x += velocity.x * dt;
            position.y += velocity.y * dt;
        }
        Ok(())
    }
}

/// Kills every member whose health dropped to zero.
#[derive(System)]
struct ReaperSystem {
    #[members]
    mortal: Members,
}

impl ReaperSystem {
    fn new(types: &ComponentTypes) -> Self {
        Self {
            mortal: Members::requiring::<Health>(types),
        }
    }

    fn update(&mut self, registry: &mut Registry) -> Result<usize, RegistryError> {
        let mut reaped = 0;
        for &entity in self.mortal.entities() {
            if registry.get_component::<Health>(entity)?.0 <= 0 {
                registry.kill_entity(entity)?;
                reaped += 1;
            }
        }
        Ok(reaped)
    }
}

fn registry() -> Registry {
    Registry::with_types(Arc::new(ComponentTypes::new()))
}

fn members<S: System>(registry: &Registry) -> Vec<u32> {
    registry
        .get_system::<S>()
        .map(|system| {
            system
                .members()
                .entities()
                .iter()
                .map(|entity| entity.id().value())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn movement_scenario() {
    // Given
    let mut registry = registry();
    let a = registry.create_entity();
    registry
        .add_component(a, Position { x: 10.0, y: 20.0 })
        .unwrap();
    registry
        .add_component(a, Velocity { x: 5.0, y: 0.0 })
        .unwrap();
    let movement = MovementSystem::new(registry.component_types());
    registry.add_system(movement).unwrap();

    // Then - Nothing is visible before the flush
    assert!(members::<MovementSystem>(&registry).is_empty());

    // When
    registry.update();

    // Then
    assert_eq!(members::<MovementSystem>(&registry), vec![a.id().value()]);

    // When
    registry
        .with_system(|movement: &mut MovementSystem, registry| movement.update(registry, 1.0))
        .unwrap()
        .unwrap();

    // Then
    assert_eq!(
        registry.get_component::<Position>(a),
        Ok(&Position { x: 15.0, y: 20.0 })
    );
}

#[test]
fn velocity_only_entity_never_joins() {
    // Given
    let mut registry = registry();
    let b = registry.create_entity();
    registry
        .add_component(b, Velocity { x: 1.0, y: 1.0 })
        .unwrap();
    let movement = MovementSystem::new(registry.component_types());
    registry.add_system(movement).unwrap();

    // When
    for _ in 0..3 {
        registry.update();
    }

    // Then
    assert!(members::<MovementSystem>(&registry).is_empty());
    assert_eq!(
        registry.get_component::<Velocity>(b),
        Ok(&Velocity { x: 1.0, y: 1.0 })
    );
}

#[test]
fn frames_with_spawning_and_reaping() {
    // Given
    let mut registry = registry();
    let movement = MovementSystem::new(registry.component_types());
    let reaper = ReaperSystem::new(registry.component_types());
    registry.add_system(movement).unwrap();
    registry.add_system(reaper).unwrap();

    let mut spawned = Vec::new();
    for frame in 0..3 {
        // Mutation phase: one new mover per frame, the first one is mortally wounded
        let entity = registry.create_entity();
        let mut facade = registry.entity_mut(entity).unwrap();
        facade
            .add_component(Position { x: 0.0, y: 0.0 })
            .unwrap()
            .add_component(Velocity { x: 1.0, y: 2.0 })
            .unwrap()
            .add_component(Health(if frame == 0 { 0 } else { 10 }))
            .unwrap();
        spawned.push(entity);

        // Flush
        registry.update();

        // Processing phase
        registry
            .with_system(|movement: &mut MovementSystem, registry| movement.update(registry, 0.5))
            .unwrap()
            .unwrap();
        registry
            .with_system(|reaper: &mut ReaperSystem, registry| reaper.update(registry))
            .unwrap()
            .unwrap();
    }
    registry.update();

    // Then - The wounded entity left at the flush after it was reaped
    assert!(!registry.is_alive(spawned[0]));
    assert_eq!(
        members::<MovementSystem>(&registry),
        vec![spawned[1].id().value(), spawned[2].id().value()]
    );
    assert_eq!(
        registry.get_component::<Position>(spawned[1]),
        Ok(&Position { x: 1.0, y: 2.0 })
    );
    assert_eq!(
        registry.get_component::<Position>(spawned[2]),
        Ok(&Position { x: 0.5, y: 1.0 })
    );
    assert_eq!(registry.entity_count(), 3);
    assert_eq!(registry.live_count(), 2);
}

#[test]
fn registries_sharing_types_agree_on_signatures() {
    // Given
    let types = Arc::new(ComponentTypes::new());
    let mut first = Registry::with_types(Arc::clone(&types));
    let mut second = Registry::with_types(Arc::clone(&types));
    let a = first.create_entity();
    let b = second.create_entity();

    // When
    first.add_component(a, Health(1)).unwrap();
    second.add_component(b, Health(2)).unwrap();

    // Then
    assert_eq!(first.signature(a), second.signature(b));
    assert!(matches!(
        first.get_component::<Health>(b),
        Err(RegistryError::ForeignEntity { .. })
    ));
}
