//! Columnar source catalogs, column cuts and memoised sky geometry.

use std::collections::BTreeMap;

use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;
use crate::hull::{concave_hull, convex_hull};
use crate::photometry::mag_to_flux;
use crate::{Error, Result};

/// Comparison between a column value and a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl Comparison {
    /// Evaluate `lhs <op> rhs`.
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Gt => lhs > rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
        }
    }
}

/// A predicate on one catalog column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnCut {
    /// Column name.
    pub column: String,
    /// How to compare.
    pub comparison: Comparison,
    /// Threshold.
    pub value: f64,
}

impl ColumnCut {
    /// Keep rows where `column <comparison> value`.
    pub fn new(column: impl Into<String>, comparison: Comparison, value: f64) -> Self {
        Self {
            column: column.into(),
            comparison,
            value,
        }
    }

    /// Keep rows whose flux in `flux_column` is brighter than magnitude `mag`.
    pub fn brighter_than(flux_column: impl Into<String>, mag: f64, zeropoint: f64) -> Self {
        Self::new(flux_column, Comparison::Gt, mag_to_flux(mag, zeropoint))
    }

    /// Evaluate the cut on every row of `catalog`.
    pub fn evaluate(&self, catalog: &Catalog) -> Result<Vec<bool>> {
        let column = catalog.column(&self.column)?;
        Ok(column
            .iter()
            .map(|v| self.comparison.apply(*v, self.value))
            .collect())
    }
}

/// An immutable table of equally long `f64` columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    columns: BTreeMap<String, Array1<f64>>,
    len: usize,
    ra: String,
    dec: String,
}

impl Catalog {
    /// Build a catalog from named columns. Coordinates are read from `ra` and `dec`.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Array1<f64>)>,
        S: Into<String>,
    {
        let columns: BTreeMap<String, Array1<f64>> =
            columns.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let len = columns.values().next().map_or(0, |c| c.len());
        if let Some((name, column)) = columns.iter().find(|(_, c)| c.len() != len) {
            return Err(Error::ColumnLength {
                column: name.clone(),
                expected: len,
                found: column.len(),
            });
        }

        Ok(Self {
            columns,
            len,
            ra: "ra".into(),
            dec: "dec".into(),
        })
    }

    /// Read coordinates from the columns `ra` and `dec` instead.
    pub fn with_coordinates(mut self, ra: impl Into<String>, dec: impl Into<String>) -> Self {
        self.ra = ra.into();
        self.dec = dec.into();
        self
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the catalog has no rows.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Names of all columns, sorted.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// The column `name`.
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        self.columns
            .get(name)
            .map(|c| c.view())
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Keep the rows where `mask` is true. `mask` needs one entry per row.
    pub fn select(&self, mask: &[bool]) -> Result<Catalog> {
        if mask.len() != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                found: mask.len(),
            });
        }
        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, keep)| keep.then_some(i))
            .collect();

        Ok(Catalog {
            columns: self
                .columns
                .iter()
                .map(|(name, c)| (name.clone(), c.select(Axis(0), &rows)))
                .collect(),
            len: rows.len(),
            ra: self.ra.clone(),
            dec: self.dec.clone(),
        })
    }

    /// Keep the rows passing all `cuts`.
    pub fn filter(&self, cuts: &[ColumnCut]) -> Result<Catalog> {
        let mut mask = vec![true; self.len];
        for cut in cuts {
            for (keep, pass) in mask.iter_mut().zip(cut.evaluate(self)?) {
                *keep &= pass;
            }
        }

        let selected = self.select(&mask)?;
        debug!(
            "{}/{} objects pass {} cuts.",
            selected.len(),
            self.len,
            cuts.len()
        );
        Ok(selected)
    }

    /// RA and Dec of every row, shape `(n_rows, 2)`.
    pub fn coordinates(&self) -> Result<Array2<f64>> {
        let ra = self.column(&self.ra)?;
        let dec = self.column(&self.dec)?;
        Ok(ndarray::stack![Axis(1), ra, dec])
    }

    /// Extent of the coordinates, `None` for an empty catalog.
    pub fn bounding_box(&self) -> Result<Option<BoundingBox>> {
        BoundingBox::from_points(self.coordinates()?.view())
    }
}

/// Provider of catalogs, e.g. a reader of sweep FITS tables.
pub trait CatalogSource {
    /// Read the catalog.
    fn load(&self) -> Result<Catalog>;
}

impl CatalogSource for Catalog {
    fn load(&self) -> Result<Catalog> {
        Ok(self.clone())
    }
}

/// Memoised geometry of one catalog.
///
/// Values are only computed by the `ensure_*` functions; the plain getters never compute.
#[derive(Clone, Debug, Default)]
pub struct GeometryCache {
    bounding_box: Option<BoundingBox>,
    convex_hull: Option<Array2<f64>>,
    /// Concave hulls by alpha.
    concave_hulls: Vec<(f64, Array2<f64>)>,
}

impl GeometryCache {
    /// Cached bounding box.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }

    /// Cached convex hull.
    pub fn convex_hull(&self) -> Option<&Array2<f64>> {
        self.convex_hull.as_ref()
    }

    /// Cached concave hull for `alpha`.
    pub fn concave_hull(&self, alpha: f64) -> Option<&Array2<f64>> {
        self.concave_hulls
            .iter()
            .find(|(a, _)| *a == alpha)
            .map(|(_, hull)| hull)
    }

    /// Bounding box of `catalog`, computed on first use.
    pub fn ensure_bounding_box(&mut self, catalog: &Catalog) -> Result<BoundingBox> {
        if let Some(bbox) = self.bounding_box {
            return Ok(bbox);
        }
        let bbox = catalog
            .bounding_box()?
            .ok_or(Error::InsufficientPoints {
                required: 1,
                found: 0,
            })?;
        self.bounding_box = Some(bbox);
        Ok(bbox)
    }

    /// Convex hull of `catalog`, computed on first use.
    pub fn ensure_convex_hull(&mut self, catalog: &Catalog) -> Result<&Array2<f64>> {
        let hull = match self.convex_hull.take() {
            Some(hull) => hull,
            None => convex_hull(catalog.coordinates()?.view())?,
        };
        Ok(self.convex_hull.insert(hull))
    }

    /// Concave hull of `catalog` for `alpha`, computed on first use.
    pub fn ensure_concave_hull(&mut self, catalog: &Catalog, alpha: f64) -> Result<&Array2<f64>> {
        let index = match self.concave_hulls.iter().position(|(a, _)| *a == alpha) {
            Some(index) => index,
            None => {
                let hull = concave_hull(catalog.coordinates()?.view(), alpha)?;
                self.concave_hulls.push((alpha, hull));
                self.concave_hulls.len() - 1
            }
        };
        Ok(&self.concave_hulls[index].1)
    }

    /// Forget all cached values.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A sweep catalog that is loaded explicitly and caches its geometry.
#[derive(Debug)]
pub struct SweepCatalog<S: CatalogSource> {
    source: S,
    catalog: Option<Catalog>,
    geometry: GeometryCache,
}

impl<S: CatalogSource> SweepCatalog<S> {
    /// Wrap `source` without reading it.
    pub fn new(source: S) -> Self {
        Self {
            source,
            catalog: None,
            geometry: GeometryCache::default(),
        }
    }

    fn loaded<'a>(source: &S, slot: &'a mut Option<Catalog>) -> Result<&'a Catalog> {
        let catalog = match slot.take() {
            Some(catalog) => catalog,
            None => {
                let catalog = source.load()?;
                info!("Loaded catalog with {} objects.", catalog.len());
                catalog
            }
        };
        Ok(slot.insert(catalog))
    }

    /// Load the catalog unless it is loaded already.
    pub fn ensure_loaded(&mut self) -> Result<&Catalog> {
        Self::loaded(&self.source, &mut self.catalog)
    }

    /// The catalog, if loaded.
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Cached geometry.
    pub fn geometry(&self) -> &GeometryCache {
        &self.geometry
    }

    /// Load the catalog again and drop the cached geometry.
    pub fn reload(&mut self) -> Result<&Catalog> {
        self.catalog = None;
        self.geometry.clear();
        self.ensure_loaded()
    }

    /// Bounding box of the catalog coordinates.
    pub fn bounding_box(&mut self) -> Result<BoundingBox> {
        let catalog = Self::loaded(&self.source, &mut self.catalog)?;
        self.geometry.ensure_bounding_box(catalog)
    }

    /// Convex hull of the catalog coordinates.
    pub fn convex_hull(&mut self) -> Result<&Array2<f64>> {
        let catalog = Self::loaded(&self.source, &mut self.catalog)?;
        self.geometry.ensure_convex_hull(catalog)
    }

    /// Concave hull of the catalog coordinates for `alpha`.
    pub fn concave_hull(&mut self, alpha: f64) -> Result<&Array2<f64>> {
        let catalog = Self::loaded(&self.source, &mut self.catalog)?;
        self.geometry.ensure_concave_hull(catalog, alpha)
    }

    /// Rows of the catalog passing all `cuts`.
    pub fn filter(&mut self, cuts: &[ColumnCut]) -> Result<Catalog> {
        self.ensure_loaded()?.filter(cuts)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use ndarray::array;

    use super::*;
    use crate::photometry::DECALS_ZEROPOINT;

    fn sweep() -> Catalog {
        Catalog::new([
            ("ra", array![10., 11., 12., 10.5, 11.5, 11.]),
            ("dec", array![-1., -1., 0., 0.5, 0.5, -0.2]),
            ("flux_r", array![100., 0.5, 25., 8., -1., 60.]),
            ("type", array![1., 2., 1., 1., 3., 2.]),
        ])
        .unwrap()
    }

    struct CountingSource {
        catalog: Catalog,
        loads: Cell<usize>,
    }

    impl CatalogSource for CountingSource {
        fn load(&self) -> Result<Catalog> {
            self.loads.set(self.loads.get() + 1);
            Ok(self.catalog.clone())
        }
    }

    #[test]
    fn comparisons() {
        use Comparison::*;
        let expected = [
            (Gt, [false, false, true]),
            (Lt, [true, false, false]),
            (Ge, [false, true, true]),
            (Le, [true, true, false]),
            (Eq, [false, true, false]),
            (Ne, [true, false, true]),
        ];
        for (comparison, results) in expected {
            for (lhs, result) in [1., 2., 3.].into_iter().zip(results) {
                assert_eq!(comparison.apply(lhs, 2.), result, "{comparison:?} {lhs}");
            }
        }
    }

    #[test]
    fn filter_with_cuts() {
        let catalog = sweep();
        let cuts = [
            ColumnCut::new("type", Comparison::Ne, 3.),
            ColumnCut::brighter_than("flux_r", 20., DECALS_ZEROPOINT),
        ];
        let selected = catalog.filter(&cuts).unwrap();

        // flux above 10 nanomaggies, not type 3
        assert_eq!(selected.len(), 3);
        assert_eq!(selected.column("ra").unwrap(), array![10., 12., 11.]);
        assert_eq!(selected.column_names().collect::<Vec<_>>(), vec!["dec", "flux_r", "ra", "type"]);
    }

    #[test]
    fn missing_column() {
        let catalog = sweep();
        let cuts = [ColumnCut::new("flux_z", Comparison::Gt, 0.)];
        assert!(matches!(
            catalog.filter(&cuts),
            Err(Error::MissingColumn(name)) if name == "flux_z"
        ));
    }

    #[test]
    fn unequal_columns() {
        let result = Catalog::new([("ra", array![1., 2.]), ("dec", array![1.])]);
        assert!(matches!(
            result,
            Err(Error::ColumnLength { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn selection_needs_one_entry_per_row() {
        let catalog = sweep();
        assert!(matches!(
            catalog.select(&[true, false]),
            Err(Error::LengthMismatch {
                expected: 6,
                found: 2
            })
        ));
        assert_eq!(catalog.select(&[true; 6]).unwrap(), catalog);
    }

    #[test]
    fn custom_coordinate_columns() {
        let catalog = Catalog::new([("RA", array![1., 2.]), ("DEC", array![3., 4.])]).unwrap();
        assert!(catalog.coordinates().is_err());

        let catalog = catalog.with_coordinates("RA", "DEC");
        assert_eq!(catalog.coordinates().unwrap(), array![[1., 3.], [2., 4.]]);
    }

    #[test]
    fn loads_once() {
        let mut sweep = SweepCatalog::new(CountingSource {
            catalog: sweep(),
            loads: Cell::new(0),
        });
        assert!(sweep.catalog().is_none());

        assert_eq!(sweep.ensure_loaded().unwrap().len(), 6);
        sweep.ensure_loaded().unwrap();
        sweep.bounding_box().unwrap();
        assert_eq!(sweep.source.loads.get(), 1);

        sweep.reload().unwrap();
        assert_eq!(sweep.source.loads.get(), 2);
        assert!(sweep.geometry().bounding_box().is_none());
    }

    #[test]
    fn geometry_is_cached() {
        let mut sweep = SweepCatalog::new(sweep());
        assert!(sweep.geometry().convex_hull().is_none());

        let bbox = sweep.bounding_box().unwrap();
        assert_eq!((bbox.ra_min, bbox.ra_max, bbox.dec_min, bbox.dec_max), (10., 12., -1., 0.5));

        let convex = sweep.convex_hull().unwrap().clone();
        assert_eq!(sweep.geometry().convex_hull(), Some(&convex));

        let concave = sweep.concave_hull(100.).unwrap().clone();
        assert_eq!(sweep.geometry().concave_hull(100.), Some(&concave));
        assert!(sweep.geometry().concave_hull(1.).is_none());
        assert_eq!(concave.nrows(), convex.nrows());
    }

    #[test]
    fn empty_catalog_has_no_box() {
        let mut sweep = SweepCatalog::new(sweep().select(&[false; 6]).unwrap());
        assert!(matches!(
            sweep.bounding_box(),
            Err(Error::InsufficientPoints { found: 0, .. })
        ));
    }
}
