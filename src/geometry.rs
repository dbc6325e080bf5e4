//! Planar geometry helpers: circumradius, polygon area and bounding boxes.

use nalgebra::Vector2;
use ndarray::{ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::ndarray_utils::{check_points, max_axis, min_axis};
use crate::Result;

/// Radius of the circle through `pa`, `pb` and `pc`, using Heron's formula for the area.
///
/// Degenerate (collinear or coincident) triangles have no finite circumcircle
/// and return `f64::INFINITY`.
pub(crate) fn circumradius(pa: &Vector2<f64>, pb: &Vector2<f64>, pc: &Vector2<f64>) -> f64 {
    let a = (pa - pb).norm();
    let b = (pb - pc).norm();
    let c = (pc - pa).norm();
    let s = (a + b + c) / 2.;
    // can turn slightly negative through rounding for slivers
    let area_sq = s * (s - a) * (s - b) * (s - c);
    if area_sq.is_nan() || area_sq <= 0. {
        return f64::INFINITY;
    }

    let r = a * b * c / (4. * area_sq.sqrt());
    if r.is_finite() { r } else { f64::INFINITY }
}

/// Signed area of a polygon given as rows of `(x, y)`, positive for counterclockwise vertex order.
pub(crate) fn signed_area(polygon: ArrayView2<f64>) -> f64 {
    let n = polygon.nrows();
    let twice = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            polygon[[i, 0]] * polygon[[j, 1]] - polygon[[j, 0]] * polygon[[i, 1]]
        })
        .sum::<f64>();
    twice / 2.
}

/// Axis-aligned extent of a point set in the (RA, Dec) plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum RA.
    pub ra_min: f64,
    /// Maximum RA.
    pub ra_max: f64,
    /// Minimum Dec.
    pub dec_min: f64,
    /// Maximum Dec.
    pub dec_max: f64,
}

impl BoundingBox {
    /// Extent of `points`, shape `(n_points, 2)`.
    ///
    /// Returns `None` for an empty point set.
    pub fn from_points(points: ArrayView2<f64>) -> Result<Option<Self>> {
        check_points(points)?;
        if points.nrows() == 0 {
            return Ok(None);
        }

        let min = min_axis(points, Axis(0));
        let max = max_axis(points, Axis(0));
        Ok(Some(Self {
            ra_min: min[0],
            ra_max: max[0],
            dec_min: min[1],
            dec_max: max[1],
        }))
    }

    /// Width and height of the box.
    pub fn size(&self) -> (f64, f64) {
        (self.ra_max - self.ra_min, self.dec_max - self.dec_min)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::vector;
    use ndarray::array;

    use super::*;

    #[test]
    fn circumradius_right_triangle() {
        // hypotenuse is a diameter
        let r = circumradius(&vector![0., 0.], &vector![4., 0.], &vector![0., 3.]);
        assert_abs_diff_eq!(r, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn circumradius_equilateral() {
        let h = 3f64.sqrt() / 2.;
        let r = circumradius(&vector![0., 0.], &vector![1., 0.], &vector![0.5, h]);
        assert_abs_diff_eq!(r, 1. / 3f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn circumradius_degenerate() {
        let collinear = circumradius(&vector![0., 0.], &vector![1., 1.], &vector![2., 2.]);
        assert_eq!(collinear, f64::INFINITY);

        let coincident = circumradius(&vector![1., 1.], &vector![1., 1.], &vector![3., 0.]);
        assert_eq!(coincident, f64::INFINITY);
    }

    #[test]
    fn polygon_orientation() {
        let ccw = array![[0., 0.], [1., 0.], [1., 1.], [0., 1.]];
        assert_abs_diff_eq!(signed_area(ccw.view()), 1.);

        let cw = array![[0., 0.], [0., 1.], [1., 1.], [1., 0.]];
        assert_abs_diff_eq!(signed_area(cw.view()), -1.);
    }

    #[test]
    fn bounding_box() {
        let points = array![[150.2, 2.1], [149.8, 2.5], [150.6, 1.9]];
        let bbox = BoundingBox::from_points(points.view()).unwrap().unwrap();

        assert_eq!(bbox.ra_min, 149.8);
        assert_eq!(bbox.ra_max, 150.6);
        assert_eq!(bbox.dec_min, 1.9);
        assert_eq!(bbox.dec_max, 2.5);
        let (w, h) = bbox.size();
        assert_abs_diff_eq!(w, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(h, 0.6, epsilon = 1e-12);

        let empty = ndarray::Array2::<f64>::zeros((0, 2));
        assert!(BoundingBox::from_points(empty.view()).unwrap().is_none());
    }
}
