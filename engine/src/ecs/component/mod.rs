//! Component kinds for the ECS.
//!
//! Components are plain data attached to entities. Every distinct component kind is assigned a
//! small numeric [`Id`] on first use by [`ComponentTypes`], and an entity's set of kinds is
//! recorded as a fixed-width [`Signature`].
//!
//! ## Architecture
//!
//! - [`Component`]: The marker trait all component kinds implement
//! - [`Id`]: The id of a component kind, which is also its bit in a [`Signature`]
//! - [`ComponentTypes`]: Thread-safe assignment and lookup of kind ids
//! - [`Signature`]: A 32-bit set of kind ids
//! - [`IntoSignature`]: Builds a signature from a kind or a tuple of kinds
//!
//! ## Usage
//!
//! ```ignore
//! use ember_engine::ecs::component::{Component, ComponentTypes, IntoSignature};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Component)]
//! struct Velocity { x: f32, y: f32 }
//!
//! let types = ComponentTypes::new();
//! let required = <(Position, Velocity)>::into_signature(&types);
//! ```

mod signature;
mod types;

pub use signature::{IntoSignature, Signature};
pub use types::{ComponentTypes, Info};

/// The number of distinct component kinds a [`Signature`] can represent.
pub const MAX_COMPONENTS: usize = 32;

/// A component kind identifier, assigned in first-use order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Get the index of this component if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// A trait representing a component in the ECS.
///
/// At present this only sets the required trait bounds for a type to be used as a component. Use
/// `#[derive(Component)]` to implement it.
pub trait Component: 'static + Sized {}
