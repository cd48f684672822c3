//! Frontier selection for exploration targeting.
//!
//! The frontier is the set of incomplete vertices (out-degree < 4). Picking
//! uniformly at random spreads parallel sessions across the known edge of
//! the world instead of piling them onto one spot.

use crate::core::Position;
use crate::navmesh::Navmesh;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Pick a random incomplete vertex as the next exploration target.
///
/// Falls back to a uniform choice from `fallback` (typically the positions
/// already visited this run) when every known vertex is complete, so a
/// locally saturated mesh still yields a target to wander from. Returns
/// `None` only when the mesh has no incomplete vertex *and* the fallback is
/// empty.
///
/// The random source is injected so seeded runs are reproducible.
pub fn random_incomplete<R: Rng + ?Sized>(
    mesh: &Navmesh,
    fallback: &[Position],
    rng: &mut R,
) -> Option<Position> {
    let frontier = mesh.incomplete_vertices();
    if let Some(target) = frontier.choose(rng) {
        return Some(*target);
    }
    fallback.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Direction;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn p(map: u16, x: u8, y: u8) -> Position {
        Position::new(map, x, y)
    }

    /// Mesh whose single vertex is complete (four self-edges).
    fn saturated_mesh() -> Navmesh {
        let origin = p(0, 0, 0);
        let mut mesh = Navmesh::with_origin(origin);
        for dir in Direction::ALL {
            mesh.add_edge(origin, dir, origin).unwrap();
        }
        mesh
    }

    #[test]
    fn test_picks_incomplete_vertex() {
        let mut mesh = Navmesh::with_origin(p(0, 0, 0));
        mesh.insert_vertex(p(0, 1, 0));
        let mut rng = StdRng::seed_from_u64(7);
        let target = random_incomplete(&mesh, &[], &mut rng).unwrap();
        assert!(mesh.incomplete_vertices().contains(&target));
    }

    #[test]
    fn test_fallback_when_saturated() {
        let mesh = saturated_mesh();
        let fallback = [p(1, 2, 3), p(1, 4, 5)];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            let target = random_incomplete(&mesh, &fallback, &mut rng).unwrap();
            assert!(fallback.contains(&target));
        }
    }

    #[test]
    fn test_none_when_nothing_to_pick() {
        let mesh = saturated_mesh();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_incomplete(&mesh, &[], &mut rng), None);
    }

    #[test]
    fn test_deterministic_under_seed() {
        let mut mesh = Navmesh::new();
        for x in 0..20 {
            mesh.insert_vertex(p(0, x, 0));
        }
        let a: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10)
                .map(|_| random_incomplete(&mesh, &[], &mut rng).unwrap())
                .collect()
        };
        let b: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10)
                .map(|_| random_incomplete(&mesh, &[], &mut rng).unwrap())
                .collect()
        };
        assert_eq!(a, b);
    }
}
