use std::fmt;

use ember_engine::ecs::{Registry, Result, component::ComponentTypes, system::Members};
use ember_macros::System;

use crate::components::{RigidBody, Sprite, Transform};

/// Integrates velocity into position.
#[derive(System)]
pub struct MovementSystem {
    members: Members,
}

impl MovementSystem {
    pub fn new(types: &ComponentTypes) -> Self {
        Self {
            members: Members::new()
                .require::<Transform>(types)
                .require::<RigidBody>(types),
        }
    }

    pub fn update(&mut self, registry: &mut Registry, dt: f32) -> Result<()> {
        for &entity in self.members.entities() {
            let body = *registry.get_component::<RigidBody>(entity)?;
            let transform = registry.get_component_mut::<Transform>(entity)?;
            transform.x += body.vx * dt;
            transform.y += body.vy * dt;
        }
        Ok(())
    }
}

/// Draws every sprite at its transform.
#[derive(System)]
pub struct RenderSystem {
    members: Members,
}

impl RenderSystem {
    pub fn new(types: &ComponentTypes) -> Self {
        Self {
            members: Members::requiring::<(Transform, Sprite)>(types),
        }
    }

    pub fn update(&mut self, registry: &mut Registry, canvas: &mut Canvas) -> Result<()> {
        canvas.clear();
        for &entity in self.members.entities() {
            let transform = registry.get_component::<Transform>(entity)?;
            let sprite = registry.get_component::<Sprite>(entity)?;
            canvas.fill_rect(
                transform.x.round() as i64,
                transform.y.round() as i64,
                sprite,
            );
        }
        Ok(())
    }
}

/// A character grid standing in for a window surface.
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    const BLANK: char = '.';

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Self::BLANK; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Self::BLANK);
    }

    /// Fill the sprite's rectangle with its top-left corner at `(x, y)`, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i64, y: i64, sprite: &Sprite) {
        for dy in 0..sprite.height as i64 {
            for dx in 0..sprite.width as i64 {
                let (cx, cy) = (x + dx, y + dy);
                if cx < 0 || cy < 0 || cx >= self.width as i64 || cy >= self.height as i64 {
                    continue;
                }
                self.cells[cy as usize * self.width + cx as usize] = sprite.glyph;
            }
        }
    }

    #[cfg(test)]
    fn get(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            writeln!(f, "{}", row.iter().collect::<String>())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn registry() -> Registry {
        Registry::with_types(Arc::new(ComponentTypes::new()))
    }

    #[test]
    fn movement_integrates_velocity() {
        // Given
        let mut registry = registry();
        let movement = MovementSystem::new(registry.component_types());
        registry.add_system(movement).unwrap();
        let entity = registry.create_entity();
        registry
            .add_component(entity, Transform { x: 10.0, y: 20.0 })
            .unwrap();
        registry
            .add_component(entity, RigidBody { vx: 5.0, vy: 0.0 })
            .unwrap();
        registry.update();

        // When
        registry
            .with_system(|movement: &mut MovementSystem, registry| movement.update(registry, 1.0))
            .unwrap()
            .unwrap();

        // Then
        assert_eq!(
            registry.get_component::<Transform>(entity),
            Ok(&Transform { x: 15.0, y: 20.0 })
        );
    }

    #[test]
    fn render_draws_clipped_sprites() {
        // Given
        let mut registry = registry();
        let render = RenderSystem::new(registry.component_types());
        registry.add_system(render).unwrap();
        let entity = registry.create_entity();
        registry
            .add_component(entity, Transform { x: 3.0, y: 1.0 })
            .unwrap();
        registry
            .add_component(
                entity,
                Sprite {
                    width: 2,
                    height: 2,
                    glyph: '#',
                },
            )
            .unwrap();
        registry.update();
        let mut canvas = Canvas::new(4, 2);

        // When
        registry
            .with_system(|render: &mut RenderSystem, registry| render.update(registry, &mut canvas))
            .unwrap()
            .unwrap();

        // Then
        assert_eq!(canvas.to_string(), "....\n...#\n");
        assert_eq!(canvas.get(3, 1), Some('#'));
        assert_eq!(canvas.get(4, 1), None);
    }
}
