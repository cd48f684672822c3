//! Configuration loading for Cartographer.

use crate::error::{CartographerError, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure.
#[derive(Clone, Debug, Deserialize)]
pub struct CartographerConfig {
    /// Rom/save-state identifiers to explore. Required.
    pub roms: Vec<String>,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub session: SessionTuning,

    #[serde(default)]
    pub sim: SimConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Run-level scheduling parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    /// Parallel workers per batch (default: 4)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Movement-attempt budget per worker session (default: 500)
    #[serde(default = "default_steps_per_worker")]
    pub steps_per_worker: usize,

    /// Global wall-clock budget in seconds (default: 60)
    #[serde(default = "default_time_budget_secs")]
    pub time_budget_secs: u64,

    /// Random seed; 0 uses entropy (default: 0)
    #[serde(default)]
    pub seed: u64,
}

/// Per-session behavior tuning.
#[derive(Clone, Debug, Deserialize)]
pub struct SessionTuning {
    /// Random steps after reaching the target (default: 32)
    #[serde(default = "default_wander_steps")]
    pub wander_steps: usize,

    /// Re-route attempts before giving up on a target (default: 8)
    #[serde(default = "default_reroute_limit")]
    pub reroute_limit: usize,
}

/// Simulated-world parameters for the bundled mock game.
#[derive(Clone, Debug, Deserialize)]
pub struct SimConfig {
    /// Overworld width in cells (default: 16)
    #[serde(default = "default_world_size")]
    pub width: u8,

    /// Overworld height in cells (default: 16)
    #[serde(default = "default_world_size")]
    pub height: u8,

    /// Probability of a wall segment per cell (default: 0.08)
    #[serde(default = "default_wall_density")]
    pub wall_density: f32,

    /// Probability a free move fails once (default: 0.02)
    #[serde(default = "default_flake_chance")]
    pub flake_chance: f32,
}

/// Output configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Path to save the final navmesh
    #[serde(default = "default_navmesh_path")]
    pub navmesh_path: String,
}

fn default_workers() -> usize {
    4
}
fn default_steps_per_worker() -> usize {
    500
}
fn default_time_budget_secs() -> u64 {
    60
}
fn default_wander_steps() -> usize {
    32
}
fn default_reroute_limit() -> usize {
    8
}
fn default_world_size() -> u8 {
    16
}
fn default_wall_density() -> f32 {
    0.08
}
fn default_flake_chance() -> f32 {
    0.02
}
fn default_navmesh_path() -> String {
    "output/world.navmesh".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            steps_per_worker: default_steps_per_worker(),
            time_budget_secs: default_time_budget_secs(),
            seed: 0,
        }
    }
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            wander_steps: default_wander_steps(),
            reroute_limit: default_reroute_limit(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: default_world_size(),
            height: default_world_size(),
            wall_density: default_wall_density(),
            flake_chance: default_flake_chance(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            navmesh_path: default_navmesh_path(),
        }
    }
}

impl Default for CartographerConfig {
    fn default() -> Self {
        Self {
            roms: vec!["mock-blue".to_string()],
            run: RunConfig::default(),
            session: SessionTuning::default(),
            sim: SimConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl CartographerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CartographerError::Config(format!("failed to read config file: {e}")))?;
        let config: CartographerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that could never run. These are the only
    /// errors allowed to kill the process, and only at startup.
    pub fn validate(&self) -> Result<()> {
        if self.roms.is_empty() {
            return Err(CartographerError::Config("roms list is empty".into()));
        }
        if self.run.workers == 0 {
            return Err(CartographerError::Config("workers must be > 0".into()));
        }
        if self.run.steps_per_worker == 0 {
            return Err(CartographerError::Config(
                "steps_per_worker must be > 0".into(),
            ));
        }
        if self.sim.width == 0 || self.sim.height == 0 {
            return Err(CartographerError::Config(
                "sim world dimensions must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        CartographerConfig::default().validate().unwrap();
    }

    #[test]
    fn test_parse_minimal() {
        let config: CartographerConfig = toml::from_str(r#"roms = ["blue.gb"]"#).unwrap();
        assert_eq!(config.roms, vec!["blue.gb"]);
        assert_eq!(config.run.workers, 4);
        assert_eq!(config.session.wander_steps, 32);
    }

    #[test]
    fn test_parse_overrides() {
        let config: CartographerConfig = toml::from_str(
            r#"
            roms = ["red.gb", "blue.gb"]

            [run]
            workers = 8
            seed = 1234

            [output]
            navmesh_path = "maps/kanto.navmesh"
            "#,
        )
        .unwrap();
        assert_eq!(config.run.workers, 8);
        assert_eq!(config.run.seed, 1234);
        assert_eq!(config.output.navmesh_path, "maps/kanto.navmesh");
        // Untouched sections keep defaults.
        assert_eq!(config.run.steps_per_worker, 500);
    }

    #[test]
    fn test_empty_roms_rejected() {
        let config: CartographerConfig = toml::from_str("roms = []").unwrap();
        assert!(config.validate().is_err());
    }
}
