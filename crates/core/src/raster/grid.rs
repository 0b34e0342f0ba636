//! Main Raster type

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::raster::{GeoTransform, RasterElement};
use ndarray::Array2;

/// A georeferenced 2D raster grid, one spectral band per raster.
///
/// `Raster<T>` stores values of type `T` in a row-major grid with associated
/// geographic metadata (transform and CRS).
///
/// # Example
///
/// ```ignore
/// use verdex_core::Raster;
///
/// let mut red: Raster<u16> = Raster::new(2, 3);
/// red.set(1, 2, 1200)?;
/// assert_eq!(red.get(1, 2)?, 1200);
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
    transform: GeoTransform,
    crs: Option<CRS>,
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_array(Array2::zeros((rows, cols)))
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Create a raster from a flat row-major buffer
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self::from_array(array))
    }

    /// Create a raster from nested rows, e.g. `[[0.0, 5.0]]`.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if rows.iter().any(|r| r.as_ref().len() != n_cols) {
            return Err(Error::InvalidDimensions {
                width: n_cols,
                height: n_rows,
            });
        }
        let flat = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::from_vec(flat, n_rows, n_cols)
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self {
            data,
            transform: GeoTransform::default(),
            crs: None,
            nodata: None,
        }
    }

    /// Wrap `data` in this raster's georeferencing (transform and CRS).
    ///
    /// The nodata value is not carried over since the element type may differ.
    pub fn with_same_meta<U: RasterElement>(&self, data: Array2<U>) -> Result<Raster<U>> {
        if data.dim() != self.shape() {
            let (ar, ac) = data.dim();
            return Err(Error::ShapeMismatch {
                er: self.rows(),
                ec: self.cols(),
                ar,
                ac,
            });
        }
        Ok(Raster {
            data,
            transform: self.transform,
            crs: self.crs.clone(),
            nodata: None,
        })
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (rows, cols) = self.shape();
        match self.data.get_mut((row, col)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds { row, col, rows, cols }),
        }
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Consume the raster and return the underlying array
    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    // Metadata

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: Option<CRS>) {
        self.crs = crs;
    }

    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Geographic footprint of the grid
    pub fn bounds(&self) -> BoundingBox {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Check if a value is no-data
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    // Statistics

    /// Calculate basic statistics (min, max, mean, count of valid cells)
    pub fn statistics(&self) -> RasterStatistics {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for v in self
            .data
            .iter()
            .filter(|&&value| !self.is_nodata(value))
            .filter_map(|&value| value.to_f64())
        {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        let (min, max, mean) = if count > 0 {
            (Some(min), Some(max), Some(sum / count as f64))
        } else {
            (None, None, None)
        };

        RasterStatistics {
            min,
            max,
            mean,
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a raster, in `f64` regardless of cell type
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<f32> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
    }

    #[test]
    fn test_raster_access() {
        let mut raster: Raster<u16> = Raster::new(10, 10);
        raster.set(5, 5, 4200).unwrap();
        assert_eq!(raster.get(5, 5).unwrap(), 4200);
        assert!(raster.set(10, 0, 1).is_err());
        assert!(matches!(
            raster.get(0, 10),
            Err(Error::IndexOutOfBounds { rows: 10, cols: 10, .. })
        ));
    }

    #[test]
    fn test_from_rows() {
        let raster = Raster::from_rows(&[[0.0, 5.0], [1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(raster.shape(), (3, 2));
        assert_eq!(raster.get(0, 1).unwrap(), 5.0);
        assert_eq!(raster.get(2, 0).unwrap(), 3.0);

        let ragged: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Raster::from_rows(ragged.as_slice()).is_err());
    }

    #[test]
    fn test_with_same_meta_keeps_georeferencing() {
        let mut red: Raster<u16> = Raster::new(4, 3);
        red.set_transform(GeoTransform::new(500_000.0, 4_200_000.0, 10.0, -10.0));
        red.set_crs(Some(CRS::from_epsg(32630)));
        red.set_nodata(Some(0));

        let out = red.with_same_meta(Array2::<f32>::zeros((4, 3))).unwrap();
        assert_eq!(out.transform(), red.transform());
        assert_eq!(out.crs().map(CRS::epsg), Some(32630));
        assert_eq!(out.nodata(), None);

        assert!(matches!(
            red.with_same_meta(Array2::<f32>::zeros((3, 4))),
            Err(Error::ShapeMismatch { er: 4, ec: 3, ar: 3, ac: 4 })
        ));
    }

    #[test]
    fn test_raster_statistics() {
        let mut raster: Raster<f32> = Raster::new(10, 10);
        for i in 0..10 {
            for j in 0..10 {
                raster.set(i, j, (i * 10 + j) as f32).unwrap();
            }
        }
        raster.set(0, 0, f32::NAN).unwrap();

        let stats = raster.statistics();
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(99.0));
        assert_eq!(stats.valid_count, 99);
        assert_eq!(stats.nodata_count, 1);
    }
}
