//! Circumradius filtering of triangle sides into the boundary of an alpha shape.

use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, warn};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::ndarray_utils::to_vectors;
use crate::triangles::Triangle;
use crate::{Error, Result};

/// A directed side between two points, referenced by index.
///
/// `(i, j)` and `(j, i)` are distinct edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    /// Index of the start point.
    pub from: usize,
    /// Index of the end point.
    pub to: usize,
}

impl Edge {
    /// Create the edge `from -> to`.
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// The same side traversed the other way.
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl From<(usize, usize)> for Edge {
    fn from((from, to): (usize, usize)) -> Self {
        Self::new(from, to)
    }
}

/// Set of directed edges describing the boundary of an alpha shape.
///
/// Edges remember their insertion order, which is the order [`BoundaryEdges::edges`]
/// returns them in and the order the stitcher draws loop seeds from.
#[derive(Debug, Clone, Default)]
pub struct BoundaryEdges {
    only_outer: bool,
    /// Edge to insertion sequence number.
    edges: HashMap<Edge, u64>,
    next: u64,
    degenerate: usize,
}

impl BoundaryEdges {
    /// Create an empty set.
    ///
    /// With `only_outer`, a side proposed by two triangles cancels out, leaving the outer border.
    /// Otherwise both directions of such inner sides are kept.
    pub fn new(only_outer: bool) -> Self {
        Self {
            only_outer,
            ..Default::default()
        }
    }

    /// Propose `edge` for the boundary.
    ///
    /// Fails if the very same directed edge is already present; a well-formed
    /// triangulation never traverses a side twice in the same direction.
    pub fn insert(&mut self, edge: impl Into<Edge>) -> Result<()> {
        let edge = edge.into();
        if self.edges.contains_key(&edge) {
            return Err(Error::InternalConsistency {
                from: edge.from,
                to: edge.to,
            });
        }

        if self.only_outer && self.edges.remove(&edge.reversed()).is_some() {
            // shared by two accepted triangles
            return Ok(());
        }

        self.edges.insert(edge, self.next);
        self.next += 1;
        Ok(())
    }

    /// Whether the directed edge is part of the set.
    pub fn contains(&self, edge: impl Into<Edge>) -> bool {
        self.edges.contains_key(&edge.into())
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the set has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Whether inner sides cancel out.
    pub fn only_outer(&self) -> bool {
        self.only_outer
    }

    /// Number of zero-area triangles skipped while filtering.
    pub fn degenerate_triangles(&self) -> usize {
        self.degenerate
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.edges
            .iter()
            .sorted_unstable_by_key(|(_, seq)| **seq)
            .map(|(e, _)| *e)
            .collect()
    }
}

/// Keep the sides of all triangles whose circumradius is below `alpha`.
///
/// Smaller `alpha` follows the point density more tightly, larger `alpha` approaches the convex hull.
/// Degenerate triangles have an infinite circumradius and never pass.
///
/// # Arguments
/// - `triangles`: Triangles of a triangulation of `points`, e.g. from [`triangulate`](crate::triangulate).
/// - `points`: Shape `(n_points, 2)`.
/// - `alpha`: Circumradius threshold.
/// - `only_outer`: Whether to drop sides shared by two accepted triangles.
pub fn filter_edges(
    triangles: &[Triangle],
    points: ArrayView2<f64>,
    alpha: f64,
    only_outer: bool,
) -> Result<BoundaryEdges> {
    let vectors = to_vectors(points)?;
    let mut boundary = BoundaryEdges::new(only_outer);
    let mut accepted = 0;

    for triangle in triangles {
        let radius = triangle.circumradius(&vectors);
        if radius.is_infinite() {
            boundary.degenerate += 1;
            continue;
        }
        if radius < alpha {
            accepted += 1;
            for edge in triangle.edges() {
                boundary.insert(edge)?;
            }
        }
    }

    if boundary.degenerate > 0 {
        warn!(
            "Skipped {} degenerate triangles with zero area.",
            boundary.degenerate
        );
    }
    debug!(
        "{} of {} triangles below alpha = {}, {} boundary edges.",
        accepted,
        triangles.len(),
        alpha,
        boundary.len()
    );

    Ok(boundary)
}
