//! Density-based clustering and nearest-neighbor label propagation.

use std::collections::VecDeque;

use kiddo::float::{distance::SquaredEuclidean, kdtree::KdTree};
use log::debug;
use ndarray::ArrayView2;

use crate::ndarray_utils::check_points;
use crate::{Error, Result};

/// Label of points that belong to no cluster.
pub const NOISE: isize = -1;

/// Pixel centres of a mask share coordinates along rings, so buckets need room for many equal values.
const BUCKET_SIZE: usize = 256;

type PointTree = KdTree<f64, usize, 2, BUCKET_SIZE, u32>;

fn build_tree(points: ArrayView2<f64>) -> PointTree {
    points
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, r)| ([r[0], r[1]], i))
        .collect()
}

/// DBSCAN clustering of 2D points.
///
/// A point with at least `min_samples` points (itself included) within `eps` is a core point.
/// Clusters are the sets of points reachable through chains of core points;
/// everything else is labelled [`NOISE`].
#[derive(Clone, Debug)]
pub struct Dbscan {
    /// Neighborhood radius.
    eps: f64,
    /// Neighbors required for a core point.
    min_samples: usize,
}

impl Dbscan {
    /// Cluster with neighborhood radius `eps` and the default of five samples per core point.
    pub fn new(eps: f64) -> Self {
        Self { eps, min_samples: 5 }
    }

    /// Set the number of neighbors required for a core point.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Label every row of `points`.
    ///
    /// Cluster labels are numbered from zero in the order of the first core point of each cluster.
    pub fn fit(&self, points: ArrayView2<f64>) -> Result<Vec<isize>> {
        check_points(points)?;
        let tree = build_tree(points);

        let neighbors: Vec<Vec<usize>> = points
            .rows()
            .into_iter()
            .map(|r| {
                tree.within_unsorted::<SquaredEuclidean>(&[r[0], r[1]], self.eps * self.eps)
                    .into_iter()
                    .map(|n| n.item)
                    .collect()
            })
            .collect();
        let core: Vec<bool> = neighbors
            .iter()
            .map(|n| n.len() >= self.min_samples)
            .collect();

        let mut labels = vec![NOISE; points.nrows()];
        let mut cluster = 0;
        for seed in 0..points.nrows() {
            if labels[seed] != NOISE || !core[seed] {
                continue;
            }

            labels[seed] = cluster;
            let mut queue = VecDeque::from([seed]);
            while let Some(point) = queue.pop_front() {
                for &neighbor in &neighbors[point] {
                    if labels[neighbor] != NOISE {
                        continue;
                    }
                    labels[neighbor] = cluster;
                    if core[neighbor] {
                        queue.push_back(neighbor);
                    }
                }
            }
            cluster += 1;
        }

        debug!(
            "Found {} clusters, {} of {} points are noise.",
            cluster,
            labels.iter().filter(|l| **l == NOISE).count(),
            labels.len()
        );

        Ok(labels)
    }
}

/// Give every row of `points` the label of its nearest row in `sample`.
///
/// # Arguments
/// - `sample`: Labelled points, shape `(n_sample, 2)`.
/// - `sample_labels`: One label per row of `sample`.
/// - `points`: Points to label, shape `(n_points, 2)`.
pub fn propagate_labels(
    sample: ArrayView2<f64>,
    sample_labels: &[isize],
    points: ArrayView2<f64>,
) -> Result<Vec<isize>> {
    check_points(sample)?;
    check_points(points)?;
    if sample.nrows() == 0 {
        return Err(Error::InsufficientPoints {
            required: 1,
            found: 0,
        });
    }
    if sample_labels.len() != sample.nrows() {
        return Err(Error::LengthMismatch {
            expected: sample.nrows(),
            found: sample_labels.len(),
        });
    }

    let tree = build_tree(sample);
    Ok(points
        .rows()
        .into_iter()
        .map(|r| sample_labels[tree.nearest_one::<SquaredEuclidean>(&[r[0], r[1]]).item])
        .collect())
}
