//! Breadth-first routing over the directed navmesh.
//!
//! BFS gives a shortest path by edge count, which is all steering needs —
//! any shortest path is physically equivalent. Expansion follows
//! [`Direction::ALL`] order, so a given mesh always yields the same route.

use crate::core::{Direction, Position};
use crate::error::{CartographerError, Result};
use crate::navmesh::Navmesh;
use std::collections::{HashMap, VecDeque};

/// Compute the direction sequence of a shortest path from `from` to `to`.
///
/// Only recorded edges are followed; the mesh being incomplete therefore
/// routinely makes targets unreachable. That is expected and surfaces as
/// [`CartographerError::RouteNotFound`] — the caller picks a new target
/// rather than treating it as fatal. Self-edges (confirmed-blocked markers)
/// are never traversed.
pub fn route(mesh: &Navmesh, from: Position, to: Position) -> Result<Vec<Direction>> {
    if from == to {
        return Ok(Vec::new());
    }
    if !mesh.has_vertex(from) || !mesh.has_vertex(to) {
        return Err(CartographerError::RouteNotFound { from, to });
    }

    let mut came_from: HashMap<Position, (Position, Direction)> = HashMap::new();
    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for (dir, next) in mesh.edges_from(current) {
            if next == current {
                // Blocked marker, not a traversable edge.
                continue;
            }
            if next == from || came_from.contains_key(&next) {
                continue;
            }
            came_from.insert(next, (current, dir));
            if next == to {
                return Ok(reconstruct(&came_from, from, to));
            }
            queue.push_back(next);
        }
    }

    Err(CartographerError::RouteNotFound { from, to })
}

fn reconstruct(
    came_from: &HashMap<Position, (Position, Direction)>,
    from: Position,
    to: Position,
) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut current = to;
    while current != from {
        let (prev, dir) = came_from[&current];
        path.push(dir);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(map: u16, x: u8, y: u8) -> Position {
        Position::new(map, x, y)
    }

    /// A -> B -> C -> D chain, East only.
    fn chain() -> (Navmesh, [Position; 4]) {
        let cells = [p(0, 0, 0), p(0, 1, 0), p(0, 2, 0), p(0, 3, 0)];
        let mut mesh = Navmesh::new();
        for pair in cells.windows(2) {
            mesh.add_edge(pair[0], Direction::Right, pair[1]).unwrap();
        }
        (mesh, cells)
    }

    #[test]
    fn test_chain_forward() {
        let (mesh, cells) = chain();
        let path = route(&mesh, cells[0], cells[3]).unwrap();
        assert_eq!(path, vec![Direction::Right; 3]);
    }

    #[test]
    fn test_chain_not_reversible() {
        let (mesh, cells) = chain();
        let err = route(&mesh, cells[3], cells[0]).unwrap_err();
        assert!(matches!(err, CartographerError::RouteNotFound { .. }));
    }

    #[test]
    fn test_trivial_route() {
        let (mesh, cells) = chain();
        assert!(route(&mesh, cells[1], cells[1]).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_vertex() {
        let (mesh, cells) = chain();
        let err = route(&mesh, cells[0], p(9, 9, 9)).unwrap_err();
        assert!(matches!(err, CartographerError::RouteNotFound { .. }));
    }

    #[test]
    fn test_warp_shortcut() {
        // Long way around vs a warp edge jumping straight to the target map.
        let (mut mesh, cells) = chain();
        let far = p(7, 0, 0);
        mesh.add_edge(cells[3], Direction::Right, far).unwrap();
        mesh.add_edge(cells[0], Direction::Up, far).unwrap();
        let path = route(&mesh, cells[0], far).unwrap();
        assert_eq!(path, vec![Direction::Up]);
    }

    #[test]
    fn test_self_edges_not_traversed() {
        let a = p(0, 0, 0);
        let b = p(0, 1, 0);
        let mut mesh = Navmesh::new();
        mesh.add_edge(a, Direction::Up, a).unwrap();
        mesh.insert_vertex(b);
        let err = route(&mesh, a, b).unwrap_err();
        assert!(matches!(err, CartographerError::RouteNotFound { .. }));
    }

    #[test]
    fn test_shortest_of_two_routes() {
        // Square with a diagonal-ish shortcut: 0,0 -> 1,0 -> 1,1 and
        // 0,0 -> 0,1 -> 1,1; plus a longer detour. Any 2-step answer is valid.
        let mut mesh = Navmesh::new();
        mesh.add_edge(p(0, 0, 0), Direction::Right, p(0, 1, 0)).unwrap();
        mesh.add_edge(p(0, 1, 0), Direction::Down, p(0, 1, 1)).unwrap();
        mesh.add_edge(p(0, 0, 0), Direction::Down, p(0, 0, 1)).unwrap();
        mesh.add_edge(p(0, 0, 1), Direction::Right, p(0, 1, 1)).unwrap();
        mesh.add_edge(p(0, 1, 1), Direction::Down, p(0, 1, 2)).unwrap();
        let path = route(&mesh, p(0, 0, 0), p(0, 1, 1)).unwrap();
        assert_eq!(path.len(), 2);
    }
}
