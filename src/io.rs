//! Finding input files and storing field borders.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use log::{debug, info, warn};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::regions::Regions;
use crate::Result;

/// Files in `dir` whose names match the glob `pattern`, sorted by path.
///
/// `pattern` supports `*`, `?` and `[...]`, e.g. `"sweep-*.fits"`. A missing `dir` yields no files.
pub fn find_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = Path::new(&Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let mut files: Vec<PathBuf> = glob(&full.to_string_lossy())?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Error accessing {}: {e}", e.path().display());
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    info!("Found {} {} files in {}", files.len(), pattern, dir.display());
    Ok(files)
}

/// Border of one field as written to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredField {
    /// Field key, `label + 1`.
    pub key: usize,
    /// Cluster label.
    pub label: isize,
    /// Number of pixels in the field.
    pub n_members: usize,
    /// All boundaries of the field, as (RA, Dec) vertices.
    pub loops: Vec<Vec<[f64; 2]>>,
}

impl StoredField {
    /// The boundaries as `(n, 2)` arrays.
    pub fn loop_arrays(&self) -> Vec<Array2<f64>> {
        self.loops.iter().map(|l| Array2::from(l.clone())).collect()
    }
}

/// Write the borders of all hulled fields in `regions` to `path` as JSON.
///
/// Fields without a border are left out.
pub fn write_regions(path: &Path, regions: &Regions) -> Result<()> {
    let fields: Vec<StoredField> = regions
        .fields()
        .iter()
        .filter_map(|(key, field)| {
            let field = field.as_ref().ok()?;
            Some(StoredField {
                key: *key,
                label: field.label(),
                n_members: field.members().len(),
                loops: field
                    .loops()
                    .iter()
                    .map(|l| l.rows().into_iter().map(|r| [r[0], r[1]]).collect())
                    .collect(),
            })
        })
        .collect();

    debug!("Writing {} field borders to {}", fields.len(), path.display());
    fs::write(path, serde_json::to_string(&fields)?)?;
    Ok(())
}

/// Read field borders written by [`write_regions`].
pub fn read_borders(path: &Path) -> Result<Vec<StoredField>> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
