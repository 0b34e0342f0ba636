//! Normalized-difference spectral indices
//!
//! Indices operate on single-band rasters (one band per raster) sharing
//! the same grid.

use crate::maybe_rayon::*;
use ndarray::Array2;
use verdex_core::raster::{Raster, RasterElement};
use verdex_core::{Error, Result};

/// Normalized difference of two cell values.
///
/// `(a - b) / (a + b)`, except that a cell whose sum is exactly zero
/// yields exactly `0.0`: no signal in either band carries no index signal.
/// The zero test is exact equality, with no epsilon.
#[inline]
pub fn normalized_difference_value(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum == 0.0 {
        0.0
    } else {
        (a - b) / sum
    }
}

// ---------------------------------------------------------------------------
// Generic normalized difference
// ---------------------------------------------------------------------------

/// Compute the normalized difference between two bands:
///
/// `(band_a - band_b) / (band_a + band_b)`
///
/// Cells are widened to `f64` for the division and the result is narrowed
/// to `f32`. For non-negative reflectances the result is in `[-1, 1]`;
/// negative inputs are not rejected and may fall outside that range.
/// Nodata markers on the inputs are not consulted.
///
/// The output carries `band_a`'s transform and CRS.
///
/// # Errors
///
/// [`Error::ShapeMismatch`] if the bands differ in shape.
pub fn normalized_difference<T: RasterElement>(
    band_a: &Raster<T>,
    band_b: &Raster<T>,
) -> Result<Raster<f32>> {
    check_dimensions(band_a, band_b)?;

    let (rows, cols) = band_a.shape();
    let a = band_a.data();
    let b = band_b.data();

    let data: Vec<f32> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            a.row(row)
                .iter()
                .zip(b.row(row).iter())
                .map(|(&va, &vb)| normalized_difference_value(widen(va), widen(vb)) as f32)
                .collect::<Vec<f32>>()
        })
        .collect();

    let array =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    band_a.with_same_meta(array)
}

// ---------------------------------------------------------------------------
// NDVI
// ---------------------------------------------------------------------------

/// Normalized Difference Vegetation Index
///
/// `NDVI = (NIR - Red) / (NIR + Red)`
///
/// Values range from -1 to 1:
/// - Dense vegetation: 0.6 to 0.9
/// - Sparse vegetation: 0.2 to 0.5
/// - Bare soil: 0.1 to 0.2
/// - Water/clouds: -1.0 to 0.0
///
/// # Arguments
/// * `nir` - Near-infrared band
/// * `red` - Red band
pub fn ndvi<T: RasterElement>(nir: &Raster<T>, red: &Raster<T>) -> Result<Raster<f32>> {
    normalized_difference(nir, red)
}

fn widen<T: RasterElement>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

fn check_dimensions<T: RasterElement>(a: &Raster<T>, b: &Raster<T>) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(Error::ShapeMismatch {
            er: a.rows(),
            ec: a.cols(),
            ar: b.rows(),
            ac: b.cols(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
