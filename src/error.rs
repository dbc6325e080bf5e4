//! Error type shared by all operations of this crate.

use thiserror::Error;

/// Errors that can occur while building hulls, clustering regions or handling catalogs.
#[derive(Error, Debug)]
pub enum Error {
    /// Too few points for the requested operation.
    #[error("need at least {required} points, found {found}")]
    InsufficientPoints {
        /// Minimum number of points.
        required: usize,
        /// Number of points supplied.
        found: usize,
    },

    /// The same directed edge was proposed twice by the triangulation.
    #[error("directed edge ({from}, {to}) proposed twice, the triangulation is malformed")]
    InternalConsistency {
        /// Start point index.
        from: usize,
        /// End point index.
        to: usize,
    },

    /// Two inputs that pair up element by element differ in length.
    #[error("expected {expected} entries, found {found}")]
    LengthMismatch {
        /// Required length.
        expected: usize,
        /// Supplied length.
        found: usize,
    },

    /// A file name pattern could not be parsed.
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// Point arrays must have shape `(n_points, 2)`.
    #[error("points must have shape (n_points, 2), found {0:?}")]
    InvalidShape(Vec<usize>),

    /// The Delaunay backend rejected a coordinate.
    #[error("triangulation failed: {0}")]
    Triangulation(String),

    /// All points lie on a single line.
    #[error("points are collinear, no hull can be built")]
    Collinear,

    /// No triangle passed the circumradius filter.
    #[error("no triangle has a circumradius below alpha = {alpha}")]
    EmptyShape {
        /// The alpha value used.
        alpha: f64,
    },

    /// A catalog column is missing.
    #[error("unknown column `{0}`")]
    MissingColumn(String),

    /// A catalog column does not match the catalog length.
    #[error("column `{column}` has {found} rows, expected {expected}")]
    ColumnLength {
        /// Column name.
        column: String,
        /// Number of rows of the catalog.
        expected: usize,
        /// Number of rows of the column.
        found: usize,
    },

    /// File system error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// (De)serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type of this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
