//! The navmesh graph.
//!
//! Vertices are [`Position`]s discovered during play; each vertex carries at
//! most one outgoing edge per [`Direction`], pointing at the cell reached by
//! moving that way. Edges are directed because movement can be one-way
//! (ledges, warp tiles, one-way doors).
//!
//! A direction that was attempted and confirmed blocked is stored as a
//! self-edge (source == destination). That is what lets a walled-in cell
//! reach out-degree 4 and drop off the frontier; the router never follows
//! self-edges.
//!
//! ## Merge policy
//!
//! `merge` takes the union of vertices and edges. When both meshes record an
//! edge for the same (source, direction) with different destinations, the
//! edge already present in the receiving mesh wins ("first writer wins") and
//! the losing observation is returned as an [`EdgeConflict`] for audit
//! logging. Merging the same input twice is therefore a no-op, and merges of
//! non-conflicting meshes commute and associate, so folding worker results
//! in arrival order always produces the same graph for non-contested edges.

use crate::core::{Direction, Position};
use crate::error::{CartographerError, Result};
use std::collections::HashMap;
use std::fmt;

/// Two observations disagreeing about the destination of one edge.
///
/// Produced by [`Navmesh::merge`] and by rejected [`Navmesh::add_edge`]
/// calls. `kept` is the destination that remains in the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeConflict {
    pub src: Position,
    pub dir: Direction,
    pub kept: Position,
    pub discarded: Position,
}

impl fmt::Display for EdgeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> kept {}, discarded {}",
            self.src, self.dir, self.kept, self.discarded
        )
    }
}

/// Outgoing edges of one vertex, indexed by direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Edges([Option<Position>; 4]);

impl Edges {
    fn get(&self, dir: Direction) -> Option<Position> {
        self.0[dir.index()]
    }

    fn set(&mut self, dir: Direction, dst: Position) {
        self.0[dir.index()] = Some(dst);
    }

    fn out_degree(&self) -> usize {
        self.0.iter().filter(|e| e.is_some()).count()
    }
}

/// Directed graph of discovered cells, keyed by position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Navmesh {
    vertices: HashMap<Position, Edges>,
}

impl Navmesh {
    /// Empty mesh with no vertices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-vertex mesh seeded with the starting cell.
    pub fn with_origin(origin: Position) -> Self {
        let mut mesh = Self::new();
        mesh.insert_vertex(origin);
        mesh
    }

    pub fn has_vertex(&self, p: Position) -> bool {
        self.vertices.contains_key(&p)
    }

    /// Number of recorded outgoing edges, 0..=4. Unknown vertices report 0.
    pub fn out_degree(&self, p: Position) -> usize {
        self.vertices.get(&p).map_or(0, Edges::out_degree)
    }

    /// A vertex with all four directions recorded is complete and no longer
    /// a frontier candidate.
    pub fn is_complete(&self, p: Position) -> bool {
        self.out_degree(p) == 4
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.vertices.values().map(Edges::out_degree).sum()
    }

    /// Add a vertex with no edges. No-op if already present.
    pub fn insert_vertex(&mut self, p: Position) {
        self.vertices.entry(p).or_default();
    }

    /// Destination recorded for (src, dir), if any. A destination equal to
    /// `src` is a confirmed-blocked marker.
    pub fn edge(&self, src: Position, dir: Direction) -> Option<Position> {
        self.vertices.get(&src).and_then(|e| e.get(dir))
    }

    /// Record an observed edge. Inserts both endpoints as vertices.
    ///
    /// Re-inserting an identical edge is a no-op (`Ok(false)`). A different
    /// destination for an already-recorded (src, dir) is rejected with
    /// [`CartographerError::Conflict`]; the caller decides whether to log,
    /// drop, or escalate.
    pub fn add_edge(&mut self, src: Position, dir: Direction, dst: Position) -> Result<bool> {
        self.try_insert_edge(src, dir, dst)
            .map_err(CartographerError::Conflict)
    }

    fn try_insert_edge(
        &mut self,
        src: Position,
        dir: Direction,
        dst: Position,
    ) -> std::result::Result<bool, EdgeConflict> {
        let edges = self.vertices.entry(src).or_default();
        match edges.get(dir) {
            Some(existing) if existing == dst => Ok(false),
            Some(existing) => Err(EdgeConflict {
                src,
                dir,
                kept: existing,
                discarded: dst,
            }),
            None => {
                edges.set(dir, dst);
                self.insert_vertex(dst);
                Ok(true)
            }
        }
    }

    /// All vertices with out-degree < 4, sorted.
    ///
    /// The sort makes selection deterministic under a seeded rng even though
    /// the backing map iterates in arbitrary order.
    pub fn incomplete_vertices(&self) -> Vec<Position> {
        let mut incomplete: Vec<Position> = self
            .vertices
            .iter()
            .filter(|(_, e)| e.out_degree() < 4)
            .map(|(p, _)| *p)
            .collect();
        incomplete.sort_unstable();
        incomplete
    }

    /// Iterate all vertices in arbitrary order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.vertices.keys().copied()
    }

    /// Iterate outgoing edges of one vertex in direction order.
    pub fn edges_from(&self, src: Position) -> impl Iterator<Item = (Direction, Position)> + '_ {
        let edges = self.vertices.get(&src).copied().unwrap_or_default();
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| edges.get(dir).map(|dst| (dir, dst)))
    }

    /// All (src, dir, dst) triples sorted by source then direction.
    pub fn sorted_edges(&self) -> Vec<(Position, Direction, Position)> {
        let mut srcs: Vec<Position> = self.vertices.keys().copied().collect();
        srcs.sort_unstable();
        srcs.iter()
            .flat_map(|&src| self.edges_from(src).map(move |(dir, dst)| (src, dir, dst)))
            .collect()
    }

    /// Fold another mesh into this one.
    ///
    /// Union of vertices and edges; contested edges keep the destination
    /// already in `self` and the losing observation is returned. The other
    /// mesh's edges are visited in sorted order so the conflict list is
    /// deterministic for a given pair of inputs.
    pub fn merge(&mut self, other: &Navmesh) -> Vec<EdgeConflict> {
        let mut conflicts = Vec::new();
        let mut srcs: Vec<Position> = other.vertices.keys().copied().collect();
        srcs.sort_unstable();
        for src in srcs {
            self.insert_vertex(src);
            for (dir, dst) in other.edges_from(src) {
                if let Err(conflict) = self.try_insert_edge(src, dir, dst) {
                    conflicts.push(conflict);
                }
            }
        }
        conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(map: u16, x: u8, y: u8) -> Position {
        Position::new(map, x, y)
    }

    #[test]
    fn test_with_origin() {
        let mesh = Navmesh::with_origin(p(0, 1, 1));
        assert!(mesh.has_vertex(p(0, 1, 1)));
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.edge_count(), 0);
        assert_eq!(mesh.out_degree(p(0, 1, 1)), 0);
    }

    #[test]
    fn test_add_edge_inserts_destination() {
        let mut mesh = Navmesh::with_origin(p(0, 0, 0));
        assert!(mesh.add_edge(p(0, 0, 0), Direction::Right, p(0, 1, 0)).unwrap());
        assert!(mesh.has_vertex(p(0, 1, 0)));
        assert_eq!(mesh.edge(p(0, 0, 0), Direction::Right), Some(p(0, 1, 0)));
        assert_eq!(mesh.out_degree(p(0, 1, 0)), 0);
    }

    #[test]
    fn test_idempotent_insertion() {
        let mut once = Navmesh::new();
        once.add_edge(p(0, 0, 0), Direction::Up, p(0, 0, 1)).unwrap();

        let mut twice = Navmesh::new();
        twice.add_edge(p(0, 0, 0), Direction::Up, p(0, 0, 1)).unwrap();
        let inserted = twice.add_edge(p(0, 0, 0), Direction::Up, p(0, 0, 1)).unwrap();

        assert!(!inserted);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_conflicting_edge_rejected() {
        let mut mesh = Navmesh::new();
        mesh.add_edge(p(0, 0, 0), Direction::Right, p(0, 1, 0)).unwrap();
        let err = mesh
            .add_edge(p(0, 0, 0), Direction::Right, p(5, 9, 9))
            .unwrap_err();
        match err {
            CartographerError::Conflict(c) => {
                assert_eq!(c.kept, p(0, 1, 0));
                assert_eq!(c.discarded, p(5, 9, 9));
            }
            other => panic!("expected conflict, got {other}"),
        }
        // Original edge untouched.
        assert_eq!(mesh.edge(p(0, 0, 0), Direction::Right), Some(p(0, 1, 0)));
    }

    #[test]
    fn test_completeness_invariant() {
        let mut mesh = Navmesh::new();
        let src = p(0, 2, 2);
        mesh.add_edge(src, Direction::Up, p(0, 2, 1)).unwrap();
        mesh.add_edge(src, Direction::Down, p(0, 2, 3)).unwrap();
        mesh.add_edge(src, Direction::Left, p(0, 1, 2)).unwrap();
        assert!(!mesh.is_complete(src));
        assert!(mesh.incomplete_vertices().contains(&src));

        // Confirmed block recorded as a self-edge completes the vertex.
        mesh.add_edge(src, Direction::Right, src).unwrap();
        assert!(mesh.is_complete(src));
        assert_eq!(mesh.out_degree(src), 4);
        assert!(!mesh.incomplete_vertices().contains(&src));

        // Every vertex stays within 0..=4 and incomplete_vertices matches
        // exactly the out-degree predicate.
        for v in mesh.positions() {
            assert!(mesh.out_degree(v) <= 4);
            assert_eq!(
                mesh.incomplete_vertices().contains(&v),
                mesh.out_degree(v) < 4
            );
        }
    }

    #[test]
    fn test_incomplete_vertices_sorted() {
        let mut mesh = Navmesh::new();
        mesh.insert_vertex(p(2, 0, 0));
        mesh.insert_vertex(p(0, 5, 5));
        mesh.insert_vertex(p(1, 3, 3));
        let frontier = mesh.incomplete_vertices();
        assert_eq!(frontier, vec![p(0, 5, 5), p(1, 3, 3), p(2, 0, 0)]);
    }

    #[test]
    fn test_merge_union() {
        let mut a = Navmesh::with_origin(p(0, 0, 0));
        a.add_edge(p(0, 0, 0), Direction::Right, p(0, 1, 0)).unwrap();
        let mut b = Navmesh::with_origin(p(0, 1, 0));
        b.add_edge(p(0, 1, 0), Direction::Right, p(0, 2, 0)).unwrap();

        let conflicts = a.merge(&b);
        assert!(conflicts.is_empty());
        assert_eq!(a.vertex_count(), 3);
        assert_eq!(a.edge_count(), 2);
    }

    #[test]
    fn test_merge_commutative_without_conflicts() {
        let mut a = Navmesh::new();
        a.add_edge(p(0, 0, 0), Direction::Right, p(0, 1, 0)).unwrap();
        a.add_edge(p(0, 1, 0), Direction::Left, p(0, 0, 0)).unwrap();
        let mut b = Navmesh::new();
        b.add_edge(p(0, 1, 0), Direction::Right, p(0, 2, 0)).unwrap();
        b.insert_vertex(p(1, 7, 7));

        let mut ab = a.clone();
        assert!(ab.merge(&b).is_empty());
        let mut ba = b.clone();
        assert!(ba.merge(&a).is_empty());
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_merge_associative_without_conflicts() {
        let mut a = Navmesh::new();
        a.add_edge(p(0, 0, 0), Direction::Up, p(0, 0, 1)).unwrap();
        let mut b = Navmesh::new();
        b.add_edge(p(0, 0, 1), Direction::Up, p(0, 0, 2)).unwrap();
        let mut c = Navmesh::new();
        c.add_edge(p(0, 0, 2), Direction::Down, p(0, 0, 1)).unwrap();

        // merge(merge(A, B), C)
        let mut left = a.clone();
        left.merge(&b);
        left.merge(&c);

        // merge(A, merge(B, C))
        let mut bc = b.clone();
        bc.merge(&c);
        let mut right = a.clone();
        right.merge(&bc);

        assert_eq!(left, right);
    }

    #[test]
    fn test_merge_conflict_first_writer_wins() {
        let x = p(0, 4, 4);
        let mut a = Navmesh::new();
        a.add_edge(x, Direction::Right, p(0, 5, 4)).unwrap();
        let mut b = Navmesh::new();
        b.add_edge(x, Direction::Right, p(3, 0, 0)).unwrap();

        let conflicts = a.merge(&b);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].src, x);
        assert_eq!(conflicts[0].dir, Direction::Right);
        assert_eq!(conflicts[0].kept, p(0, 5, 4));
        assert_eq!(conflicts[0].discarded, p(3, 0, 0));
        // Exactly one edge remains for (x, Right) and it is the first one.
        assert_eq!(a.edge(x, Direction::Right), Some(p(0, 5, 4)));
    }

    #[test]
    fn test_merge_conflict_is_not_fatal() {
        let x = p(0, 4, 4);
        let mut a = Navmesh::new();
        a.add_edge(x, Direction::Right, p(0, 5, 4)).unwrap();
        let mut b = Navmesh::new();
        b.add_edge(x, Direction::Right, p(3, 0, 0)).unwrap();
        b.add_edge(x, Direction::Up, p(0, 4, 3)).unwrap();

        let conflicts = a.merge(&b);
        assert_eq!(conflicts.len(), 1);
        // The uncontested edge from b still merged.
        assert_eq!(a.edge(x, Direction::Up), Some(p(0, 4, 3)));
    }

    #[test]
    fn test_merge_idempotent() {
        let mut a = Navmesh::new();
        a.add_edge(p(0, 0, 0), Direction::Right, p(0, 1, 0)).unwrap();
        let b = a.clone();
        a.merge(&b);
        a.merge(&b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sorted_edges_order() {
        let mut mesh = Navmesh::new();
        mesh.add_edge(p(1, 0, 0), Direction::Up, p(1, 0, 1)).unwrap();
        mesh.add_edge(p(0, 0, 0), Direction::Down, p(0, 0, 1)).unwrap();
        mesh.add_edge(p(0, 0, 0), Direction::Up, p(0, 0, 2)).unwrap();
        let edges = mesh.sorted_edges();
        assert_eq!(
            edges,
            vec![
                (p(0, 0, 0), Direction::Up, p(0, 0, 2)),
                (p(0, 0, 0), Direction::Down, p(0, 0, 1)),
                (p(1, 0, 0), Direction::Up, p(1, 0, 1)),
            ]
        );
    }
}
