//! Point sets as `(n_points, 2)` arrays: conversions into that layout and row helpers.

use nalgebra::{MatrixXx2, Scalar, Vector2};
use ndarray::{Array, Array2, ArrayView, ArrayView2, Axis, Dimension, RemoveAxis};

use crate::{Error, Result};

/// Conversion into an owned `(n_points, 2)` array.
pub trait IntoNdarray2 {
    /// Output array type.
    type Out;

    /// Perform the conversion.
    fn into_ndarray2(self) -> Self::Out;
}

impl<N: Scalar> IntoNdarray2 for Array2<N> {
    type Out = Array2<N>;

    fn into_ndarray2(self) -> Self::Out {
        self
    }
}

impl<N: Scalar> IntoNdarray2 for ArrayView2<'_, N> {
    type Out = Array2<N>;

    fn into_ndarray2(self) -> Self::Out {
        self.to_owned()
    }
}

impl IntoNdarray2 for MatrixXx2<f64> {
    type Out = Array2<f64>;

    fn into_ndarray2(self) -> Self::Out {
        Array2::from_shape_fn((self.nrows(), 2), |(i, j)| self[(i, j)])
    }
}

impl IntoNdarray2 for Vec<[f64; 2]> {
    type Out = Array2<f64>;

    fn into_ndarray2(self) -> Self::Out {
        Array2::from(self)
    }
}

impl IntoNdarray2 for Vec<Vector2<f64>> {
    type Out = Array2<f64>;

    fn into_ndarray2(self) -> Self::Out {
        self.into_iter()
            .map(|v| [v.x, v.y])
            .collect::<Vec<_>>()
            .into_ndarray2()
    }
}

/// Ensure the array holds `(x, y)` rows.
pub(crate) fn check_points(points: ArrayView2<f64>) -> Result<()> {
    if points.ncols() != 2 {
        return Err(Error::InvalidShape(points.shape().to_vec()));
    }
    Ok(())
}

/// Rows of a `(n_points, 2)` array as vectors.
pub(crate) fn to_vectors(points: ArrayView2<f64>) -> Result<Vec<Vector2<f64>>> {
    check_points(points)?;
    Ok(points
        .rows()
        .into_iter()
        .map(|r| Vector2::new(r[0], r[1]))
        .collect())
}

/// Copy the rows given by `indices`, in that order.
pub(crate) fn select_rows(points: ArrayView2<f64>, indices: &[usize]) -> Array2<f64> {
    points.select(Axis(0), indices)
}

pub(crate) fn min_axis<D, Di>(arr: ArrayView<'_, f64, Di>, axis: Axis) -> Array<f64, D>
where
    D: Dimension,
    Di: RemoveAxis<Smaller = D>,
{
    arr.fold_axis(axis, f64::INFINITY, |acc, x| acc.min(*x))
}

pub(crate) fn max_axis<D, Di>(arr: ArrayView<'_, f64, Di>, axis: Axis) -> Array<f64, D>
where
    D: Dimension,
    Di: RemoveAxis<Smaller = D>,
{
    arr.fold_axis(axis, f64::NEG_INFINITY, |acc, x| acc.max(*x))
}
