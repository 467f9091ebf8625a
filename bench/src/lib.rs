//! Benchmark utilities for the Ember registry.
//!
//! - **Microbenchmarks**: entity creation, component add, flush, member iteration
//! - **Particle scenario**: a steady-state churn of short-lived moving entities
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p ember_bench
//!
//! # Run specific benchmark group
//! cargo bench -p ember_bench -- flush
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod particles;
