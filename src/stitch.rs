//! Stitching of an unordered boundary edge set into ordered loops.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::edges::{BoundaryEdges, Edge};

/// An ordered walk through boundary edges.
///
/// Consecutive edges share a point: the end of one edge is the start of the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryLoop {
    edges: Vec<Edge>,
    closed: bool,
}

impl BoundaryLoop {
    /// Edges in walk order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether the walk returned to its starting point.
    /// Open loops are chains that ran out of continuing edges.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the loop has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Point indices visited by the walk.
    ///
    /// A closed loop lists each corner once; an open chain also includes its final end point.
    pub fn vertices(&self) -> Vec<usize> {
        let mut vertices: Vec<usize> = self.edges.iter().map(|e| e.from).collect();
        if let (false, Some(last)) = (self.closed, self.edges.last()) {
            vertices.push(last.to);
        }
        vertices
    }
}

/// Take the first unused edge in `adjacent[point]`.
fn take_unused(
    adjacent: &HashMap<usize, Vec<usize>>,
    point: usize,
    used: &mut [bool],
) -> Option<usize> {
    let id = adjacent
        .get(&point)?
        .iter()
        .copied()
        .find(|id| !used[*id])?;
    used[id] = true;
    Some(id)
}

/// Reconstruct ordered loops from a set of boundary edges.
///
/// See [`stitch_edges`].
pub fn stitch(edges: &BoundaryEdges) -> Vec<BoundaryLoop> {
    stitch_edges(&edges.edges())
}

/// Reconstruct ordered loops from directed edges.
///
/// The first unused edge seeds a loop. From the current end point, the walk continues along
/// an unused edge starting there, or else along an unused edge ending there, which is flipped.
/// A loop ends when it returns to the start of its seed or when no edge continues it.
///
/// Loops are returned in the order their seeds appear in `edges`,
/// and every input edge is part of exactly one loop.
pub fn stitch_edges(edges: &[Edge]) -> Vec<BoundaryLoop> {
    let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut incoming: HashMap<usize, Vec<usize>> = HashMap::new();
    for (id, edge) in edges.iter().enumerate() {
        outgoing.entry(edge.from).or_default().push(id);
        incoming.entry(edge.to).or_default().push(id);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();

    for seed_id in 0..edges.len() {
        if used[seed_id] {
            continue;
        }
        used[seed_id] = true;

        let seed = edges[seed_id];
        let mut walk = vec![seed];
        let mut current = seed.to;
        while current != seed.from {
            let next = take_unused(&outgoing, current, &mut used)
                .map(|id| edges[id])
                .or_else(|| take_unused(&incoming, current, &mut used).map(|id| edges[id].reversed()));
            let Some(edge) = next else {
                break;
            };
            walk.push(edge);
            current = edge.to;
        }

        loops.push(BoundaryLoop {
            edges: walk,
            closed: current == seed.from,
        });
    }

    debug!(
        "Stitched {} edges into {} loops, {} open.",
        edges.len(),
        loops.len(),
        loops.iter().filter(|l| !l.closed).count()
    );

    loops
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ndarray::Array2;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    use super::*;
    use crate::edges::filter_edges;
    use crate::triangles::triangulate;

    fn edges(pairs: &[(usize, usize)]) -> Vec<Edge> {
        pairs.iter().copied().map(Edge::from).collect()
    }

    fn undirected(edge: Edge) -> (usize, usize) {
        (edge.from.min(edge.to), edge.from.max(edge.to))
    }

    #[test]
    fn shuffled_square() {
        let loops = stitch_edges(&edges(&[(2, 3), (0, 1), (3, 0), (1, 2)]));

        assert_eq!(loops.len(), 1);
        assert!(loops[0].is_closed());
        assert_eq!(loops[0].edges(), edges(&[(2, 3), (3, 0), (0, 1), (1, 2)]));
        assert_eq!(loops[0].vertices(), vec![2, 3, 0, 1]);
    }

    #[test]
    fn disjoint_triangles() {
        let loops = stitch_edges(&edges(&[(3, 4), (0, 1), (4, 5), (1, 2), (5, 3), (2, 0)]));

        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0].vertices(), vec![3, 4, 5]);
        assert_eq!(loops[1].vertices(), vec![0, 1, 2]);
        assert!(loops.iter().all(|l| l.is_closed()));
    }

    #[test]
    fn reversed_edges_are_flipped() {
        let loops = stitch_edges(&edges(&[(0, 1), (2, 1), (2, 0)]));

        assert_eq!(loops.len(), 1);
        assert!(loops[0].is_closed());
        assert_eq!(loops[0].edges(), edges(&[(0, 1), (1, 2), (2, 0)]));
    }

    #[test]
    fn open_chain() {
        let loops = stitch_edges(&edges(&[(0, 1), (2, 1), (2, 3)]));

        assert_eq!(loops.len(), 1);
        assert!(!loops[0].is_closed());
        assert_eq!(loops[0].vertices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn forward_edges_are_preferred() {
        // at point 1, (1, 2) is taken before flipping (3, 1)
        let loops = stitch_edges(&edges(&[(0, 1), (3, 1), (1, 2), (2, 0)]));

        assert_eq!(loops[0].edges(), edges(&[(0, 1), (1, 2), (2, 0)]));
        assert_eq!(loops[1].edges(), edges(&[(3, 1)]));
        assert!(!loops[1].is_closed());
    }

    #[test]
    fn empty() {
        assert!(stitch(&BoundaryEdges::new(true)).is_empty());
    }

    #[test]
    fn covers_every_edge_once() {
        let points = Array2::random((300, 2), Uniform::new(0., 10.));
        let triangles = triangulate(points.view()).unwrap();
        let boundary = filter_edges(&triangles, points.view(), 0.8, true).unwrap();
        let loops = stitch(&boundary);

        let stitched: Vec<(usize, usize)> = loops
            .iter()
            .flat_map(|l| l.edges().iter().copied().map(undirected))
            .collect();
        let unique: HashSet<(usize, usize)> = stitched.iter().copied().collect();
        let expected: HashSet<(usize, usize)> =
            boundary.edges().into_iter().map(undirected).collect();

        assert_eq!(stitched.len(), boundary.len());
        assert_eq!(unique, expected);
    }

    #[test]
    fn closed_loops_return_to_start() {
        let points = Array2::random((300, 2), Uniform::new(0., 10.));
        let triangles = triangulate(points.view()).unwrap();
        let boundary = filter_edges(&triangles, points.view(), 1., true).unwrap();

        for boundary_loop in stitch(&boundary) {
            for (a, b) in boundary_loop.edges().iter().zip(&boundary_loop.edges()[1..]) {
                assert_eq!(a.to, b.from);
            }
            if boundary_loop.is_closed() && boundary_loop.len() > 1 {
                let first = boundary_loop.edges()[0];
                let last = boundary_loop.edges()[boundary_loop.len() - 1];
                assert_eq!(last.to, first.from);
            }
        }
    }

    #[test]
    fn idempotent() {
        let points = Array2::random((150, 2), Uniform::new(0., 5.));
        let triangles = triangulate(points.view()).unwrap();
        let boundary = filter_edges(&triangles, points.view(), 0.7, true).unwrap();

        assert_eq!(stitch(&boundary), stitch(&boundary));
    }
}
