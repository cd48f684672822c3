//! Pathfinding over the navmesh.

mod bfs;

pub use bfs::route;
