//! Error types for Cartographer.

use crate::navmesh::EdgeConflict;
use thiserror::Error;

/// Cartographer error type.
///
/// Only `Config` is fatal to a run. Everything else is recoverable at some
/// level: conflicts are resolved by the merge policy, a missing route makes
/// the caller pick a new target, and game-interface failures end a single
/// session while its partial result is still salvaged.
#[derive(Error, Debug)]
pub enum CartographerError {
    #[error("edge conflict: {0}")]
    Conflict(EdgeConflict),

    #[error("no route from {from} to {to}")]
    RouteNotFound {
        from: crate::core::Position,
        to: crate::core::Position,
    },

    #[error("game interface timed out: {0}")]
    GameTimeout(String),

    #[error("game interface disconnected: {0}")]
    GameDisconnect(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid navmesh data: {0}")]
    Format(String),
}

impl From<toml::de::Error> for CartographerError {
    fn from(e: toml::de::Error) -> Self {
        CartographerError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CartographerError>;
