//! Directed graph of discovered world cells and confirmed movement edges.

mod graph;

pub use graph::{EdgeConflict, Navmesh};
