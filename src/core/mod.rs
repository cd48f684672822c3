//! Fundamental value types: world cells and movement directions.

mod position;

pub use position::{Direction, Position};
