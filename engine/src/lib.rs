//! Ember engine core.
//!
//! The [`ecs`] module holds the entity registry: entity identities, type-segregated component
//! pools, per-entity signatures and signature-matched system membership. The [`core`] module
//! carries the ambient pieces the surrounding frame loop needs (configuration and logging).

// Allow the derive macros to refer to `::ember_engine` from inside this crate.
extern crate self as ember_engine;

pub mod core;
pub mod ecs;
