//! Navmesh persistence.

mod format;

pub use format::{deserialize_navmesh, load_navmesh, save_navmesh, serialize_navmesh};
