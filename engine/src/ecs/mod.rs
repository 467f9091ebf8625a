//! The entity component system.
//!
//! - [`entity`]: entity handles and the borrowed entity facades
//! - [`component`]: component kinds, kind ids and signatures
//! - [`system`]: the system trait, member lists and the system map
//! - [`registry`]: the [`Registry`] tying entities, components and systems together

pub mod component;
pub mod entity;
pub mod error;
pub mod registry;
pub(crate) mod storage;
pub mod system;
pub(crate) mod util;

pub use component::{Component, Signature};
pub use entity::Entity;
pub use error::{RegistryError, Result};
pub use registry::Registry;
pub use system::System;
