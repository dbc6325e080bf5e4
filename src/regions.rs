//! Splitting a sky mask into contiguous fields and computing their borders.
//!
//! The pixel centres of a mask are subsampled, clustered with [`Dbscan`], and every pixel
//! takes the field of its nearest sampled neighbor. Each field is then outlined with its
//! concave hull. Fields are keyed by `label + 1`, so the noise label maps to key `0`.

use std::collections::BTreeMap;

use log::{info, warn};
use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::clustering::{propagate_labels, Dbscan, NOISE};
use crate::config::RegionConfig;
use crate::hull::concave_hulls;
use crate::ndarray_utils::{check_points, select_rows};
use crate::sampling::bernoulli_subsample;
use crate::{Error, Result};

/// Map key of a cluster label, `label + 1`.
///
/// Noise maps to key `0`. Labels below [`NOISE`] count as noise.
pub fn field_key(label: isize) -> usize {
    (label.max(NOISE) - NOISE) as usize
}

/// Border of one field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldBorder {
    label: isize,
    members: Vec<usize>,
    loops: Vec<Array2<f64>>,
}

impl FieldBorder {
    /// Cluster label of the field, [`NOISE`] for unclustered pixels.
    pub fn label(&self) -> isize {
        self.label
    }

    /// Indices of the pixels in the field.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Every stitched boundary of the field.
    pub fn loops(&self) -> &[Array2<f64>] {
        &self.loops
    }

    /// The first stitched boundary of the field.
    pub fn border(&self) -> ArrayView2<'_, f64> {
        self.loops[0].view()
    }
}

/// Fields of a mask.
#[derive(Debug)]
pub struct Regions {
    labels: Vec<isize>,
    fields: BTreeMap<usize, Result<FieldBorder>>,
}

impl Regions {
    /// Cluster label of every input pixel.
    pub fn labels(&self) -> &[isize] {
        &self.labels
    }

    /// All fields by key, including those whose border could not be computed.
    pub fn fields(&self) -> &BTreeMap<usize, Result<FieldBorder>> {
        &self.fields
    }

    /// The field with key `key`.
    pub fn get(&self, key: usize) -> Option<&Result<FieldBorder>> {
        self.fields.get(&key)
    }

    /// First border of every field that could be hulled.
    pub fn borders(&self) -> BTreeMap<usize, ArrayView2<'_, f64>> {
        self.fields
            .iter()
            .filter_map(|(key, field)| Some((*key, field.as_ref().ok()?.border())))
            .collect()
    }

    /// Fields whose border could not be computed.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.fields
            .iter()
            .filter_map(|(key, field)| Some((*key, field.as_ref().err()?)))
    }
}

/// Builder for splitting pixel centres into fields.
///
/// Example:
/// ```rust
/// # use damascus::RegionClusterer;
/// # use rand::{rngs::StdRng, SeedableRng};
/// let pixels: Vec<[f64; 2]> = (0..100)
///     .map(|i| [(i % 10) as f64 * 0.1, (i / 10) as f64 * 0.1])
///     .collect();
/// let pixels = ndarray::Array2::from(pixels);
/// let regions = RegionClusterer::new(0.5, 10_000)
///     .cluster_regions(pixels.view(), &mut StdRng::seed_from_u64(0))
///     .unwrap();
/// assert_eq!(regions.borders().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct RegionClusterer {
    /// Clustering neighborhood radius.
    distance_threshold: f64,
    /// Expected number of sampled pixels.
    sample_size: usize,
    /// Neighbors required for a core pixel.
    min_samples: usize,
    /// Circumradius threshold of the borders.
    alpha: Option<f64>,
}

impl RegionClusterer {
    /// Cluster with neighborhood radius `distance_threshold` on about `sample_size` pixels.
    /// Use `with_` functions to set parameters.
    pub fn new(distance_threshold: f64, sample_size: usize) -> Self {
        Self {
            distance_threshold,
            sample_size,
            min_samples: 5,
            alpha: None,
        }
    }

    /// Use the parameters of `config`.
    pub fn from_config(config: &RegionConfig) -> Self {
        Self {
            distance_threshold: config.distance_threshold,
            sample_size: config.sample_size,
            min_samples: config.min_samples,
            alpha: config.alpha,
        }
    }

    /// Set the number of neighbors required for a core pixel.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Set the circumradius threshold of the field borders.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    fn alpha(&self) -> f64 {
        self.alpha.unwrap_or(self.distance_threshold)
    }

    /// Cluster label of every row of `points`.
    pub fn assign_fields<R: Rng + ?Sized>(
        &self,
        points: ArrayView2<f64>,
        rng: &mut R,
    ) -> Result<Vec<isize>> {
        check_points(points)?;

        let keep = bernoulli_subsample(points.nrows(), self.sample_size, rng);
        let sample = select_rows(points, &keep);
        info!(
            "Clustering {} of {} pixels.",
            sample.nrows(),
            points.nrows()
        );
        let sample_labels = Dbscan::new(self.distance_threshold)
            .with_min_samples(self.min_samples)
            .fit(sample.view())?;

        info!("Propagating field labels.");
        propagate_labels(sample.view(), &sample_labels, points)
    }

    /// Member indices of each label, ordered by label.
    fn group(labels: &[isize]) -> BTreeMap<isize, Vec<usize>> {
        let mut groups: BTreeMap<isize, Vec<usize>> = BTreeMap::new();
        for (i, label) in labels.iter().enumerate() {
            groups.entry(*label).or_default().push(i);
        }
        groups
    }

    fn hull_field(
        &self,
        points: ArrayView2<f64>,
        label: isize,
        members: Vec<usize>,
    ) -> (usize, Result<FieldBorder>) {
        let key = field_key(label);
        let field_points = select_rows(points, &members);
        let border = concave_hulls(field_points.view(), self.alpha()).map(|loops| FieldBorder {
            label,
            members,
            loops,
        });
        if let Err(e) = &border {
            warn!("Skipping border of field {key}: {e}");
        }
        (key, border)
    }

    /// Split `points` into fields and compute the border of each.
    ///
    /// # Arguments
    /// - `points`: Pixel centres, shape `(n_points, 2)`.
    /// - `rng`: Random source of the subsampling.
    pub fn cluster_regions<R: Rng + ?Sized>(
        &self,
        points: ArrayView2<f64>,
        rng: &mut R,
    ) -> Result<Regions> {
        let labels = self.assign_fields(points, rng)?;
        let groups = Self::group(&labels);

        info!("Computing borders of {} fields.", groups.len());
        let fields = groups
            .into_iter()
            .map(|(label, members)| self.hull_field(points, label, members))
            .collect();

        Ok(Regions { labels, fields })
    }
}

#[cfg(feature = "parallel")]
pub use parallel::*;

#[cfg(feature = "parallel")]
mod parallel {
    use super::*;
    use rayon::prelude::*;

    impl RegionClusterer {
        /// Split `points` into fields and compute the borders in parallel.
        ///
        /// Also see [`cluster_regions`](RegionClusterer::cluster_regions()) for more details.
        pub fn cluster_regions_par<R: Rng + ?Sized>(
            &self,
            points: ArrayView2<f64>,
            rng: &mut R,
        ) -> Result<Regions> {
            let labels = self.assign_fields(points, rng)?;
            let groups = Self::group(&labels);

            info!("Computing borders of {} fields.", groups.len());
            let fields = groups
                .into_par_iter()
                .map(|(label, members)| self.hull_field(points, label, members))
                .collect();

            Ok(Regions { labels, fields })
        }
    }
}
