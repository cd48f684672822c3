//! Simulated game world for testing and demo runs.
//!
//! Stands in for the real emulator behind the same [`GameInterface`]
//! boundary, with deterministic seeding so runs are reproducible.

mod world;

pub use world::{MockWorld, MockWorldConfig, MockWorldSpawner};
