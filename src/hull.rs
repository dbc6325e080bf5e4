//! Convex and concave hulls of point sets.

use ndarray::{Array2, ArrayView2};
use rand::Rng;
use spade::Triangulation;

use crate::edges::{filter_edges, BoundaryEdges};
use crate::geometry::signed_area;
use crate::ndarray_utils::{check_points, select_rows, IntoNdarray2};
use crate::sampling::bernoulli_subsample;
use crate::stitch::{stitch, BoundaryLoop};
use crate::triangles::{delaunay, triangulate};
use crate::{Error, Result};

/// Coordinates of the points visited by `boundary_loop`, shape `(n_vertices, 2)`.
pub fn loop_coordinates(points: ArrayView2<f64>, boundary_loop: &BoundaryLoop) -> Array2<f64> {
    select_rows(points, &boundary_loop.vertices())
}

/// Compute the boundary edges of the alpha shape of `points`.
pub fn alpha_shape_edges(points: ArrayView2<f64>, alpha: f64, only_outer: bool) -> Result<BoundaryEdges> {
    let triangles = triangulate(points)?;
    filter_edges(&triangles, points, alpha, only_outer)
}

/// Compute the alpha shape (concave hull) of `points` as stitched loops of point indices.
///
/// # Arguments
/// - `points`: Shape `(n_points, 2)`, at least four points.
/// - `alpha`: Circumradius threshold of the accepted triangles.
/// - `only_outer`: Whether to keep only the outer border or also the inner edges.
pub fn alpha_shape(points: ArrayView2<f64>, alpha: f64, only_outer: bool) -> Result<Vec<BoundaryLoop>> {
    Ok(stitch(&alpha_shape_edges(points, alpha, only_outer)?))
}

/// All outer boundaries of the alpha shape of `points`, as coordinates.
///
/// Multi-component inputs produce one loop per component (and per hole).
pub fn concave_hulls(points: ArrayView2<f64>, alpha: f64) -> Result<Vec<Array2<f64>>> {
    let loops = alpha_shape(points, alpha, true)?;
    if loops.is_empty() {
        return Err(Error::EmptyShape { alpha });
    }
    Ok(loops
        .iter()
        .map(|l| loop_coordinates(points, l))
        .collect())
}

/// The first boundary of the alpha shape of `points`, as coordinates.
///
/// Use [`concave_hulls`] to get every boundary of a multi-component shape.
///
/// # Example:
/// ```
/// # use ndarray::array;
/// # use damascus::concave_hull;
/// let points = array![[0., 0.], [1., 0.], [1., 1.], [0., 1.], [0.5, 0.5]];
/// let hull = concave_hull(points.view(), 10.).unwrap();
/// assert_eq!(hull.nrows(), 4);
/// ```
pub fn concave_hull(points: ArrayView2<f64>, alpha: f64) -> Result<Array2<f64>> {
    let loops = alpha_shape(points, alpha, true)?;
    let first = loops.first().ok_or(Error::EmptyShape { alpha })?;
    Ok(loop_coordinates(points, first))
}

/// Concave hull of a random subsample of at most about `max_points` points.
///
/// Keeps hull computations on large point sets bounded. See [`bernoulli_subsample`].
pub fn concave_hull_sampled<R: Rng + ?Sized>(
    points: ArrayView2<f64>,
    alpha: f64,
    max_points: usize,
    rng: &mut R,
) -> Result<Array2<f64>> {
    check_points(points)?;
    let keep = bernoulli_subsample(points.nrows(), max_points, rng);
    let sample = select_rows(points, &keep);
    concave_hull(sample.view(), alpha)
}

/// Convex hull of `points` in counterclockwise order.
///
/// Points lying on a side of the hull are included as vertices.
pub fn convex_hull(points: ArrayView2<f64>) -> Result<Array2<f64>> {
    check_points(points)?;
    if points.nrows() < 3 {
        return Err(Error::InsufficientPoints {
            required: 3,
            found: points.nrows(),
        });
    }

    let triangulation = delaunay(points)?;
    if triangulation.num_inner_faces() == 0 {
        return Err(Error::Collinear);
    }

    let mut indices: Vec<usize> = triangulation
        .convex_hull()
        .map(|edge| edge.from().data().index)
        .collect();
    let hull = select_rows(points, &indices);
    if signed_area(hull.view()) >= 0. {
        return Ok(hull);
    }
    indices.reverse();
    Ok(select_rows(points, &indices))
}

/// Builder for alpha shapes of a fixed point set.
///
/// Example:
/// ```rust
/// # use damascus::AlphaShape;
/// let points = vec![[0., 0.], [1., 0.], [1., 1.], [0., 1.], [0.5, 0.5]];
/// let hulls = AlphaShape::new(points, 10.)
///     .with_only_outer(true)
///     .hulls()
///     .unwrap();
/// assert_eq!(hulls.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct AlphaShape {
    /// Shape `(n_points, 2)`.
    points: Array2<f64>,
    /// Circumradius threshold.
    alpha: f64,
    /// Whether inner edges cancel out.
    only_outer: bool,
}

impl AlphaShape {
    /// Use `points` with circumradius threshold `alpha`, keeping only the outer border.
    /// Use `with_` functions to set parameters.
    pub fn new<A>(points: A, alpha: f64) -> Self
    where
        A: IntoNdarray2<Out = Array2<f64>>,
    {
        Self {
            points: points.into_ndarray2(),
            alpha,
            only_outer: true,
        }
    }

    /// Set the circumradius threshold.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set whether only the outer border is kept.
    pub fn with_only_outer(mut self, only_outer: bool) -> Self {
        self.only_outer = only_outer;
        self
    }

    /// The point set.
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Boundary edges surviving the circumradius filter.
    pub fn boundary_edges(&self) -> Result<BoundaryEdges> {
        alpha_shape_edges(self.points.view(), self.alpha, self.only_outer)
    }

    /// All stitched loops, as point indices.
    pub fn loops(&self) -> Result<Vec<BoundaryLoop>> {
        alpha_shape(self.points.view(), self.alpha, self.only_outer)
    }

    /// All stitched loops, as coordinates.
    pub fn hulls(&self) -> Result<Vec<Array2<f64>>> {
        let loops = self.loops()?;
        if loops.is_empty() {
            return Err(Error::EmptyShape { alpha: self.alpha });
        }
        Ok(loops
            .iter()
            .map(|l| loop_coordinates(self.points.view(), l))
            .collect())
    }

    /// The first stitched loop, as coordinates.
    pub fn hull(&self) -> Result<Array2<f64>> {
        let loops = self.loops()?;
        let first = loops.first().ok_or(Error::EmptyShape { alpha: self.alpha })?;
        Ok(loop_coordinates(self.points.view(), first))
    }
}
