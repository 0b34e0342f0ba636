//! Raster-to-RGBA rendering using color schemes.

use crate::scheme::{evaluate, ColorScheme, Rgb};
use verdex_core::raster::{Raster, RasterElement};

/// Parameters for colormap rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ColormapParams {
    /// Color scheme to use.
    pub scheme: ColorScheme,
    /// Minimum value for normalization. Values below this are clamped.
    pub min: f64,
    /// Maximum value for normalization. Values above this are clamped.
    pub max: f64,
    /// Color for nodata and non-finite pixels (RGBA). Default: fully transparent.
    pub nodata_color: [u8; 4],
}

impl ColormapParams {
    /// Params with the given scheme over `[0, 1]`; use [`with_range`]
    /// or [`auto_params`] for other ranges.
    ///
    /// [`with_range`]: ColormapParams::with_range
    pub fn new(scheme: ColorScheme) -> Self {
        Self::with_range(scheme, 0.0, 1.0)
    }

    /// Create params with explicit min/max range.
    pub fn with_range(scheme: ColorScheme, min: f64, max: f64) -> Self {
        Self {
            scheme,
            min,
            max,
            nodata_color: [0, 0, 0, 0],
        }
    }

    /// `RdYlGn` over the full normalized-difference range `[-1, 1]`.
    pub fn ndvi() -> Self {
        Self::with_range(ColorScheme::RdYlGn, -1.0, 1.0)
    }

    /// Color for a single value, `nodata_color` when it is not finite.
    pub fn color_of(&self, v: f64) -> [u8; 4] {
        if !v.is_finite() {
            return self.nodata_color;
        }
        let range = self.max - self.min;
        let t = if range.abs() > f64::EPSILON {
            (v - self.min) / range
        } else {
            0.5
        };
        let Rgb { r, g, b } = evaluate(self.scheme, t);
        [r, g, b, 255]
    }
}

impl Default for ColormapParams {
    fn default() -> Self {
        Self::ndvi()
    }
}

/// Auto-detect min/max from a raster, returning `ColormapParams` ready to use.
///
/// Scans all valid (non-nodata, finite) cells to find the data range.
pub fn auto_params<T: RasterElement>(raster: &Raster<T>, scheme: ColorScheme) -> ColormapParams {
    let stats = raster.statistics();
    let (min, max) = match (stats.min, stats.max) {
        (Some(min), Some(max)) if min.is_finite() && max.is_finite() => {
            if (max - min).abs() < f64::EPSILON {
                (min, min + 1.0)
            } else {
                (min, max)
            }
        }
        // All nodata
        _ => (0.0, 1.0),
    };
    ColormapParams::with_range(scheme, min, max)
}

/// Convert a raster to an RGBA pixel buffer.
///
/// Returns a `Vec<u8>` of length `rows * cols * 4` in row-major order.
/// Nodata and non-finite pixels get `params.nodata_color`.
pub fn raster_to_rgba<T: RasterElement>(raster: &Raster<T>, params: &ColormapParams) -> Vec<u8> {
    let mut rgba = vec![0u8; raster.len() * 4];

    for (px, &val) in rgba.chunks_exact_mut(4).zip(raster.data().iter()) {
        let color = if raster.is_nodata(val) {
            params.nodata_color
        } else {
            params.color_of(val.to_f64().unwrap_or(f64::NAN))
        };
        px.copy_from_slice(&color);
    }

    rgba
}
