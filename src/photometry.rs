//! Photometric unit conversions and galaxy shape parameters.

use serde::{Deserialize, Serialize};

/// Zeropoint of HSC fluxes, the default of the conversions.
pub const HSC_ZEROPOINT: f64 = 27.0;

/// Zeropoint of DECaLS fluxes (nanomaggies).
pub const DECALS_ZEROPOINT: f64 = 22.5;

/// Convert a magnitude into flux at `zeropoint`.
pub fn mag_to_flux(mag: f64, zeropoint: f64) -> f64 {
    10f64.powf((zeropoint - mag) / 2.5)
}

/// Convert a flux at `zeropoint` into a magnitude.
///
/// # Returns
///
/// * Finite magnitude for positive flux values
/// * `f64::INFINITY` for zero or negative flux
/// * `f64::NAN` for non-finite flux values
pub fn flux_to_mag(flux: f64, zeropoint: f64) -> f64 {
    if !flux.is_finite() {
        f64::NAN
    } else if flux <= 0. {
        f64::INFINITY
    } else {
        -2.5 * flux.log10() + zeropoint
    }
}

/// Which shape measure to derive from complex ellipticities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Axis ratio `b/a`.
    AxisRatio,
    /// Ellipticity `1 - b/a`.
    Ellipticity,
    /// Eccentricity `sqrt(1 - (b/a)^2)`.
    Eccentricity,
}

/// A shape measure with its position angle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Value of the requested [`ShapeKind`].
    pub value: f64,
    /// Position angle in radians.
    pub position_angle: f64,
}

/// Convert complex ellipticities `(e1, e2)` into a shape measure and position angle.
pub fn e1_e2_to_shape(e1: f64, e2: f64, kind: ShapeKind) -> Shape {
    let position_angle = 0.5 * e2.atan2(e1);

    let abs_e = e1.hypot(e2);
    let b_a = (1. - abs_e) / (1. + abs_e);
    let value = match kind {
        ShapeKind::AxisRatio => b_a,
        ShapeKind::Ellipticity => 1. - b_a,
        ShapeKind::Eccentricity => (1. - b_a * b_a).sqrt(),
    };

    Shape {
        value,
        position_angle,
    }
}

/// Convert an axis ratio and position angle (radians) into complex ellipticities.
pub fn shape_to_e1_e2(b_a: f64, position_angle: f64) -> (f64, f64) {
    let abs_e = (1. - b_a) / (1. + b_a);
    (
        abs_e * (2. * position_angle).cos(),
        abs_e * (2. * position_angle).sin(),
    )
}
