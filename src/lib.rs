#![warn(missing_docs)]

//! Sky-footprint geometry for survey catalogs and coverage masks. \
//! Point sets in the (RA, Dec) plane are outlined with alpha shapes (concave hulls): the points are
//! triangulated, triangles with a circumradius above `alpha` are dropped, and the remaining boundary
//! edges are stitched into loops. \
//! Masks split into several disjoint fields are handled by [`RegionClusterer`], which clusters the
//! pixel centres and outlines each field separately.
//!
//! ## Interface
//! The central struct of this library is [`AlphaShape`]. It holds the point set and the alpha
//! threshold, and gives access to the boundary edges, the stitched loops, and their coordinates.
//! Additional parameters are set via `AlphaShape::with_*()` functions.
//!
//! Example:
//! ```rust
//! # use damascus::AlphaShape;
//! let points = vec![[0., 0.], [1., 0.], [1., 1.], [0., 1.], [0.5, 0.5]];
//! let hull = AlphaShape::new(points, 10.)
//!     .with_only_outer(true)
//!     .hull()
//!     .unwrap();
//! assert_eq!(hull.nrows(), 4);
//! ```
//!
//! The same operations are also available as free functions, e.g. [`concave_hull()`],
//! [`convex_hull()`], [`triangulate()`], [`filter_edges()`] and [`stitch()`].
//!
//! Multi-field masks are split with [`RegionClusterer::cluster_regions()`], which can also be
//! executed in parallel.
//!
//! ## Parameters
//! - `alpha`: Maximum circumradius of the triangles forming the shape.
//!     Small values follow the point density closely, large values approach the convex hull.
//! - `only_outer`: Whether edges shared by two kept triangles cancel out.
//!     Otherwise, inner edges are reported in both directions.
//!
//! Only for region clustering:
//! - `distance_threshold`: Neighborhood radius of the density clustering.
//! - `sample_size`: Expected number of pixels used for clustering.
//!     Larger masks are subsampled, and every pixel takes the field of its nearest sampled pixel.
//! - `min_samples`: Neighbors required for a core pixel.
//!
//! Catalog cuts, footprint masks, photometric conversions, and the persistence of field borders
//! live in the [`catalog`], [`mask`], [`photometry`], and [`io`] modules.

pub(crate) mod clustering;
pub(crate) mod edges;
pub(crate) mod error;
pub(crate) mod geometry;
pub(crate) mod hull;
pub(crate) mod ndarray_utils;
pub(crate) mod regions;
pub(crate) mod sampling;
pub(crate) mod stitch;
pub(crate) mod triangles;

pub mod catalog;
pub mod config;
pub mod io;
pub mod mask;
pub mod photometry;

pub use clustering::{propagate_labels, Dbscan, NOISE};
pub use edges::{filter_edges, BoundaryEdges, Edge};
pub use error::{Error, Result};
pub use geometry::BoundingBox;
pub use hull::{
    alpha_shape, alpha_shape_edges, concave_hull, concave_hull_sampled, concave_hulls, convex_hull,
    loop_coordinates, AlphaShape,
};
pub use ndarray_utils::IntoNdarray2;
pub use regions::{field_key, FieldBorder, RegionClusterer, Regions};
pub use sampling::bernoulli_subsample;
pub use stitch::{stitch, stitch_edges, BoundaryLoop};
pub use triangles::{triangulate, Triangle};
