use ember_macros::Component;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub vx: f32,
    pub vy: f32,
}

/// A filled rectangle drawn with one glyph.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub width: usize,
    pub height: usize,
    pub glyph: char,
}
