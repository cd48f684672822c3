//! Deterministic simulated world.
//!
//! Two maps: an overworld grid (map 0) with randomly placed walls and
//! one-way ledges, and a small annex (map 1) reached through warp tiles.
//! Everything is generated from a seed, so the same rom id always produces
//! the same world.

use std::collections::{HashMap, HashSet};
use std::hash::{DefaultHasher, Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{Direction, Position};
use crate::error::Result;
use crate::explore::{GameInterface, GameSpawner, MoveOutcome};

const OVERWORLD: u16 = 0;
const ANNEX: u16 = 1;

/// Simulated world generation parameters.
#[derive(Clone, Copy, Debug)]
pub struct MockWorldConfig {
    /// Overworld width in cells.
    pub width: u8,
    /// Overworld height in cells.
    pub height: u8,
    /// Side length of the annex map.
    pub annex_size: u8,
    /// Probability that a cell sprouts a wall segment.
    pub wall_density: f32,
    /// Number of warp tile pairs between overworld and annex.
    pub warp_count: usize,
    /// Probability that an otherwise-open move fails once, simulating a
    /// moving obstacle. Zero means fully deterministic movement.
    pub flake_chance: f32,
}

impl Default for MockWorldConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            annex_size: 6,
            wall_density: 0.08,
            warp_count: 2,
            flake_chance: 0.0,
        }
    }
}

/// Simulated game world implementing [`GameInterface`].
pub struct MockWorld {
    config: MockWorldConfig,
    pos: Position,
    start: Position,
    /// Blocked (cell, direction) pairs. Symmetric pairs are ordinary walls;
    /// a pair blocked in only one direction behaves like a ledge.
    walls: HashSet<(Position, Direction)>,
    /// Warp tiles: stepping `direction` from `cell` lands somewhere else
    /// entirely.
    warps: HashMap<(Position, Direction), Position>,
    rng: StdRng,
}

impl MockWorld {
    /// Generate a world from a seed.
    pub fn generate(config: MockWorldConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut walls = HashSet::new();

        for x in 0..config.width {
            for y in 0..config.height {
                if rng.random::<f32>() >= config.wall_density {
                    continue;
                }
                let cell = Position::new(OVERWORLD, x, y);
                let dir = Direction::ALL[rng.random_range(0..4)];
                walls.insert((cell, dir));
                // Most walls block both sides; the rest are one-way ledges.
                if rng.random::<f32>() < 0.8
                    && let Some(neighbor) = adjacent(cell, dir, config)
                {
                    walls.insert((neighbor, dir.opposite()));
                }
            }
        }

        let mut warps = HashMap::new();
        for _ in 0..config.warp_count {
            let src = Position::new(
                OVERWORLD,
                rng.random_range(0..config.width),
                rng.random_range(0..config.height),
            );
            let dst = Position::new(
                ANNEX,
                rng.random_range(0..config.annex_size),
                rng.random_range(0..config.annex_size),
            );
            let dir = Direction::ALL[rng.random_range(0..4)];
            warps.insert((src, dir), dst);
            warps.insert((dst, dir.opposite()), src);
        }

        let start = Position::new(OVERWORLD, config.width / 2, config.height / 2);
        Self {
            config,
            pos: start,
            start,
            walls,
            warps,
            rng,
        }
    }

    /// The spawn cell, used to seed the master mesh.
    pub fn start(&self) -> Position {
        self.start
    }
}

impl GameInterface for MockWorld {
    fn current_position(&mut self) -> Result<Position> {
        Ok(self.pos)
    }

    fn attempt_move(&mut self, dir: Direction) -> Result<MoveOutcome> {
        let blocked = MoveOutcome {
            moved: false,
            position: self.pos,
        };

        if let Some(&dst) = self.warps.get(&(self.pos, dir)) {
            self.pos = dst;
            return Ok(MoveOutcome {
                moved: true,
                position: dst,
            });
        }
        if self.walls.contains(&(self.pos, dir)) {
            return Ok(blocked);
        }
        let Some(next) = adjacent(self.pos, dir, self.config) else {
            return Ok(blocked);
        };
        // Transient obstacle: the move would succeed, but not this time.
        if self.config.flake_chance > 0.0 && self.rng.random::<f32>() < self.config.flake_chance {
            return Ok(blocked);
        }
        self.pos = next;
        Ok(MoveOutcome {
            moved: true,
            position: next,
        })
    }
}

/// The cell one step in `dir`, or `None` at the map boundary.
fn adjacent(pos: Position, dir: Direction, config: MockWorldConfig) -> Option<Position> {
    let (width, height) = if pos.map == OVERWORLD {
        (config.width, config.height)
    } else {
        (config.annex_size, config.annex_size)
    };
    let (x, y) = match dir {
        Direction::Up => (Some(pos.x), pos.y.checked_sub(1)),
        Direction::Down => (Some(pos.x), pos.y.checked_add(1)),
        Direction::Left => (pos.x.checked_sub(1), Some(pos.y)),
        Direction::Right => (pos.x.checked_add(1), Some(pos.y)),
    };
    match (x, y) {
        (Some(x), Some(y)) if x < width && y < height => Some(Position::new(pos.map, x, y)),
        _ => None,
    }
}

/// Spawns a fresh simulated world per job, with the world seed derived from
/// the rom identifier so distinct roms get distinct worlds and the same rom
/// always gets the same one.
pub struct MockWorldSpawner {
    config: MockWorldConfig,
    base_seed: u64,
}

impl MockWorldSpawner {
    pub fn new(config: MockWorldConfig, base_seed: u64) -> Self {
        Self { config, base_seed }
    }
}

impl GameSpawner for MockWorldSpawner {
    type Game = MockWorld;

    fn spawn(&self, rom: &str) -> Result<MockWorld> {
        let mut hasher = DefaultHasher::new();
        rom.hash(&mut hasher);
        let seed = self.base_seed ^ hasher.finish();
        Ok(MockWorld::generate(self.config, seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_config() -> MockWorldConfig {
        MockWorldConfig {
            wall_density: 0.0,
            warp_count: 0,
            flake_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        let config = MockWorldConfig::default();
        let mut a = MockWorld::generate(config, 11);
        let mut b = MockWorld::generate(config, 11);
        for dir in [Direction::Up, Direction::Right, Direction::Right, Direction::Down] {
            assert_eq!(a.attempt_move(dir).unwrap(), b.attempt_move(dir).unwrap());
        }
    }

    #[test]
    fn test_boundary_blocks() {
        let mut world = MockWorld::generate(open_config(), 1);
        // Walk to the left edge, then one more step must block.
        for _ in 0..world.config.width {
            world.attempt_move(Direction::Left).unwrap();
        }
        let outcome = world.attempt_move(Direction::Left).unwrap();
        assert!(!outcome.moved);
        assert_eq!(outcome.position.x, 0);
    }

    #[test]
    fn test_open_world_moves() {
        let mut world = MockWorld::generate(open_config(), 1);
        let before = world.current_position().unwrap();
        let outcome = world.attempt_move(Direction::Right).unwrap();
        assert!(outcome.moved);
        assert_eq!(outcome.position.x, before.x + 1);
        assert_eq!(outcome.position.map, before.map);
    }

    #[test]
    fn test_warps_are_paired() {
        let config = MockWorldConfig {
            wall_density: 0.0,
            warp_count: 1,
            ..Default::default()
        };
        let world = MockWorld::generate(config, 3);
        // Every warp endpoint leads somewhere on the other map.
        for ((src, _), dst) in &world.warps {
            assert_ne!(src.map, dst.map);
        }
        assert_eq!(world.warps.len(), 2);
    }

    #[test]
    fn test_spawner_is_deterministic_per_rom() {
        let spawner = MockWorldSpawner::new(MockWorldConfig::default(), 42);
        let mut a = spawner.spawn("blue.gb").unwrap();
        let mut b = spawner.spawn("blue.gb").unwrap();
        assert_eq!(
            a.attempt_move(Direction::Up).unwrap(),
            b.attempt_move(Direction::Up).unwrap()
        );
    }
}
