//! Binary sky-coverage masks on a hierarchical pixelization.

use std::collections::BTreeSet;

use log::info;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::Result;

/// Pixel indexing convention of a hierarchical equal-area pixelization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelOrdering {
    /// Nested ordering.
    #[default]
    Nest,
    /// Ring ordering.
    Ring,
}

/// Conversion between sky positions and pixel indices.
///
/// Angles follow the usual HEALPix convention: `theta` is the colatitude and `phi` the longitude,
/// both in radians.
pub trait SkyPixelization {
    /// Pixel containing the position `(theta, phi)`.
    fn ang2pix(&self, theta: f64, phi: f64, ordering: PixelOrdering) -> u64;

    /// Centre `(theta, phi)` of `pixel`.
    fn pix2ang(&self, pixel: u64, ordering: PixelOrdering) -> (f64, f64);
}

/// Colatitude and longitude in radians of a position given in degrees.
pub fn radec_to_ang(ra: f64, dec: f64) -> (f64, f64) {
    ((90. - dec).to_radians(), ra.to_radians())
}

/// RA and Dec in degrees of a position given as colatitude and longitude in radians.
pub fn ang_to_radec(theta: f64, phi: f64) -> (f64, f64) {
    (phi.to_degrees(), 90. - theta.to_degrees())
}

/// Set of pixels considered reliable, e.g. a full-depth full-colour footprint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealpixMask {
    pixels: BTreeSet<u64>,
    ordering: PixelOrdering,
}

impl HealpixMask {
    /// Mask of the pixels whose flag is set, as read from a map with one value per pixel.
    pub fn from_flags(flags: &[bool], ordering: PixelOrdering) -> Self {
        let pixels = flags
            .iter()
            .enumerate()
            .filter_map(|(pixel, inside)| inside.then_some(pixel as u64))
            .collect();
        Self { pixels, ordering }
    }

    /// Mask of the given pixel indices.
    pub fn from_pixels(pixels: impl IntoIterator<Item = u64>, ordering: PixelOrdering) -> Self {
        Self {
            pixels: pixels.into_iter().collect(),
            ordering,
        }
    }

    /// Ordering of the pixel indices.
    pub fn ordering(&self) -> PixelOrdering {
        self.ordering
    }

    /// Whether `pixel` is inside the mask.
    pub fn contains(&self, pixel: u64) -> bool {
        self.pixels.contains(&pixel)
    }

    /// Number of pixels inside the mask.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the mask is empty.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixels inside the mask, ascending.
    pub fn pixels(&self) -> impl Iterator<Item = u64> + '_ {
        self.pixels.iter().copied()
    }

    /// Whether the position `(ra, dec)` in degrees falls on the mask.
    pub fn covers<P: SkyPixelization + ?Sized>(&self, ra: f64, dec: f64, pixelization: &P) -> bool {
        let (theta, phi) = radec_to_ang(ra, dec);
        self.contains(pixelization.ang2pix(theta, phi, self.ordering))
    }

    /// Rows of `catalog` whose coordinates fall on the mask.
    pub fn filter<P: SkyPixelization + ?Sized>(
        &self,
        catalog: &Catalog,
        pixelization: &P,
    ) -> Result<Catalog> {
        let coordinates = catalog.coordinates()?;
        let inside: Vec<bool> = coordinates
            .rows()
            .into_iter()
            .map(|r| self.covers(r[0], r[1], pixelization))
            .collect();

        let selected = catalog.select(&inside)?;
        info!(
            "{}/{} objects are selected by the mask",
            selected.len(),
            catalog.len()
        );
        Ok(selected)
    }

    /// RA and Dec in degrees of the centre of every pixel in the mask, shape `(n_pixels, 2)`.
    ///
    /// These are the points handed to [`RegionClusterer`](crate::RegionClusterer).
    pub fn pixel_centers<P: SkyPixelization + ?Sized>(&self, pixelization: &P) -> Array2<f64> {
        let centers: Vec<[f64; 2]> = self
            .pixels()
            .map(|pixel| {
                let (theta, phi) = pixelization.pix2ang(pixel, self.ordering);
                let (ra, dec) = ang_to_radec(theta, phi);
                [ra, dec]
            })
            .collect();
        Array2::from(centers)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    /// Equal-angle grid, rows of constant colatitude.
    struct Grid {
        n_theta: u64,
        n_phi: u64,
    }

    impl Grid {
        fn cells(&self, pixel: u64, ordering: PixelOrdering) -> (u64, u64) {
            match ordering {
                PixelOrdering::Ring => (pixel / self.n_phi, pixel % self.n_phi),
                PixelOrdering::Nest => (pixel % self.n_theta, pixel / self.n_theta),
            }
        }
    }

    impl SkyPixelization for Grid {
        fn ang2pix(&self, theta: f64, phi: f64, ordering: PixelOrdering) -> u64 {
            let i = ((theta / PI * self.n_theta as f64) as u64).min(self.n_theta - 1);
            let j = ((phi.rem_euclid(2. * PI) / (2. * PI) * self.n_phi as f64) as u64)
                .min(self.n_phi - 1);
            match ordering {
                PixelOrdering::Ring => i * self.n_phi + j,
                PixelOrdering::Nest => j * self.n_theta + i,
            }
        }

        fn pix2ang(&self, pixel: u64, ordering: PixelOrdering) -> (f64, f64) {
            let (i, j) = self.cells(pixel, ordering);
            (
                (i as f64 + 0.5) * PI / self.n_theta as f64,
                (j as f64 + 0.5) * 2. * PI / self.n_phi as f64,
            )
        }
    }

    // 10 degree cells
    const GRID: Grid = Grid {
        n_theta: 18,
        n_phi: 36,
    };

    #[test]
    fn angle_conventions() {
        let (theta, phi) = radec_to_ang(180., 0.);
        assert_abs_diff_eq!(theta, PI / 2.);
        assert_abs_diff_eq!(phi, PI);

        let (ra, dec) = ang_to_radec(theta, phi);
        assert_abs_diff_eq!(ra, 180., epsilon = 1e-12);
        assert_abs_diff_eq!(dec, 0., epsilon = 1e-12);
    }

    #[test]
    fn flags_and_pixels() {
        let mask = HealpixMask::from_flags(&[false, true, true, false, true], PixelOrdering::Ring);
        assert_eq!(mask.pixels().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert!(mask.contains(4));
        assert!(!mask.contains(3));
        assert_eq!(mask, HealpixMask::from_pixels([4, 1, 2, 2], PixelOrdering::Ring));
    }

    #[test]
    fn filter_catalog() {
        let catalog = Catalog::new([
            ("ra", array![15., 25., 15., 200.]),
            ("dec", array![5., 5., -5., 5.]),
            ("id", array![0., 1., 2., 3.]),
        ])
        .unwrap();

        for ordering in [PixelOrdering::Ring, PixelOrdering::Nest] {
            // the cell spanning ra 10..20, dec 0..10
            let (theta, phi) = radec_to_ang(15., 5.);
            let pixel = GRID.ang2pix(theta, phi, ordering);
            let mask = HealpixMask::from_pixels([pixel], ordering);

            let selected = mask.filter(&catalog, &GRID).unwrap();
            assert_eq!(selected.column("id").unwrap(), array![0.]);
        }
    }

    #[test]
    fn pixel_centers() {
        let pixels = [(5., 5.), (15., 5.), (15., -25.)].map(|(ra, dec)| {
            let (theta, phi) = radec_to_ang(ra, dec);
            GRID.ang2pix(theta, phi, PixelOrdering::Nest)
        });
        let mask = HealpixMask::from_pixels(pixels, PixelOrdering::Nest);

        let mut centers: Vec<(f64, f64)> = mask
            .pixel_centers(&GRID)
            .rows()
            .into_iter()
            .map(|r| (r[0], r[1]))
            .collect();
        centers.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let expected = [(5., 5.), (15., -25.), (15., 5.)];
        for (center, expected) in centers.iter().zip(expected) {
            assert_abs_diff_eq!(center.0, expected.0, epsilon = 1e-9);
            assert_abs_diff_eq!(center.1, expected.1, epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_mask_selects_nothing() {
        let catalog = Catalog::new([("ra", array![1.]), ("dec", array![1.])]).unwrap();
        let mask = HealpixMask::from_flags(&[], PixelOrdering::Nest);
        assert!(mask.is_empty());
        assert!(mask.filter(&catalog, &GRID).unwrap().is_empty());
        assert_eq!(mask.pixel_centers(&GRID).dim(), (0, 2));
    }
}
