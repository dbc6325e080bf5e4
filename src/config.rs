//! Parameters for batch runs, loadable from JSON.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::hull::AlphaShape;
use crate::ndarray_utils::IntoNdarray2;
use crate::photometry::HSC_ZEROPOINT;
use crate::Result;

/// Alpha shape parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    /// Circumradius threshold.
    pub alpha: f64,
    /// Whether inner edges cancel out.
    pub only_outer: bool,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            alpha: 1.,
            only_outer: true,
        }
    }
}

impl HullConfig {
    /// Alpha shape of `points` with these parameters.
    pub fn alpha_shape<A>(&self, points: A) -> AlphaShape
    where
        A: IntoNdarray2<Out = Array2<f64>>,
    {
        AlphaShape::new(points, self.alpha).with_only_outer(self.only_outer)
    }
}

/// Region clustering parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Neighborhood radius of the density clustering, in degrees.
    pub distance_threshold: f64,
    /// Expected number of pixels kept for clustering.
    pub sample_size: usize,
    /// Neighbors required for a core pixel.
    pub min_samples: usize,
    /// Circumradius threshold of the field borders. Defaults to `distance_threshold`.
    pub alpha: Option<f64>,
    /// Seed of the subsampling. Unseeded runs draw from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 1.,
            sample_size: 10_000,
            min_samples: 5,
            alpha: None,
            seed: None,
        }
    }
}

impl RegionConfig {
    /// Random source for the subsampling.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

/// All parameters of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Concave hull parameters.
    pub hull: HullConfig,
    /// Region clustering parameters.
    pub regions: RegionConfig,
    /// Photometric zeropoint of the catalog fluxes.
    pub zeropoint: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hull: HullConfig::default(),
            regions: RegionConfig::default(),
            zeropoint: HSC_ZEROPOINT,
        }
    }
}

/// Read a [`Config`] from a JSON file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
