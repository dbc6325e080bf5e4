//! Delaunay triangulation of a point set.

use std::array;
use std::ops::{Deref, Index};

use log::debug;
use nalgebra::Vector2;
use ndarray::ArrayView2;
use spade::{DelaunayTriangulation, HasPosition, Point2, Triangulation};

use crate::edges::Edge;
use crate::geometry::circumradius;
use crate::ndarray_utils::check_points;
use crate::{Error, Result};

/// A triangle of a triangulation, referencing its corners by point index.
///
/// Corners are stored in counterclockwise order, so that two adjacent triangles
/// traverse their shared side in opposite directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    vertices: [usize; 3],
}

impl Triangle {
    pub(crate) fn new(vertex1: usize, vertex2: usize, vertex3: usize) -> Self {
        Self {
            vertices: [vertex1, vertex2, vertex3],
        }
    }

    /// The three directed sides `(a, b)`, `(b, c)`, `(c, a)`.
    pub fn edges(&self) -> [Edge; 3] {
        let [a, b, c] = self.vertices;
        [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]
    }

    /// Radius of the circumcircle, `f64::INFINITY` for degenerate triangles.
    pub fn circumradius(&self, points: &[Vector2<f64>]) -> f64 {
        let [a, b, c] = self.vertices;
        circumradius(&points[a], &points[b], &points[c])
    }
}

impl Deref for Triangle {
    type Target = [usize; 3];

    fn deref(&self) -> &Self::Target {
        &self.vertices
    }
}

impl Index<usize> for Triangle {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.vertices[index]
    }
}

impl IntoIterator for Triangle {
    type Item = usize;

    type IntoIter = array::IntoIter<usize, 3>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices.into_iter()
    }
}

/// A triangulation vertex remembering the row it came from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexedVertex {
    position: Point2<f64>,
    pub(crate) index: usize,
}

impl HasPosition for IndexedVertex {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Insert every row of `points` into a Delaunay triangulation.
///
/// Rows are inserted in order, so the result only depends on the input order.
/// A row that coincides with an earlier one replaces it.
pub(crate) fn delaunay(points: ArrayView2<f64>) -> Result<DelaunayTriangulation<IndexedVertex>> {
    check_points(points)?;

    let mut triangulation = DelaunayTriangulation::<IndexedVertex>::new();
    for (index, row) in points.rows().into_iter().enumerate() {
        let vertex = IndexedVertex {
            position: Point2::new(row[0], row[1]),
            index,
        };
        triangulation
            .insert(vertex)
            .map_err(|e| Error::Triangulation(format!("point {index}: {e:?}")))?;
    }

    let merged = points.nrows() - triangulation.num_vertices();
    if merged > 0 {
        debug!("Merged {merged} duplicate points.");
    }

    Ok(triangulation)
}

/// Compute the Delaunay triangulation of `points`.
///
/// No point lies strictly inside the circumcircle of any returned triangle.
/// Collinear inputs produce no triangles.
///
/// # Arguments
/// - `points`: A matrix of shape (n_points, 2) representing the x and y coordinates of each point.
///   At least four points are required.
pub fn triangulate(points: ArrayView2<f64>) -> Result<Vec<Triangle>> {
    check_points(points)?;
    if points.nrows() <= 3 {
        return Err(Error::InsufficientPoints {
            required: 4,
            found: points.nrows(),
        });
    }

    let triangulation = delaunay(points)?;
    let triangles: Vec<Triangle> = triangulation
        .inner_faces()
        .map(|face| {
            let [a, b, c] = face.vertices();
            Triangle::new(a.data().index, b.data().index, c.data().index)
        })
        .collect();
    debug!(
        "Triangulated {} points into {} triangles.",
        points.nrows(),
        triangles.len()
    );

    Ok(triangles)
}
