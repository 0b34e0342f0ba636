//! PNG output of colormapped rasters.

use std::path::Path;

use image::{Rgba, RgbaImage};
use verdex_core::raster::{Raster, RasterElement};

use crate::error::{RenderError, Result};
use crate::render::{raster_to_rgba, ColormapParams};

/// Layout options for [`write_png`].
#[derive(Debug, Clone, PartialEq)]
pub struct PngOptions {
    /// Append a vertical color ramp to the right of the image,
    /// `params.max` at the top.
    pub colorbar: bool,
    /// Colorbar width in pixels; `None` picks one from the image width.
    pub colorbar_width: Option<u32>,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            colorbar: true,
            colorbar_width: None,
        }
    }
}

/// Transparent columns between the image and the colorbar.
const COLORBAR_GAP: u32 = 2;

/// Render a raster into an RGBA image (one pixel per cell).
pub fn render_image<T: RasterElement>(raster: &Raster<T>, params: &ColormapParams) -> Result<RgbaImage> {
    let (rows, cols) = raster.shape();
    let dims_err = || RenderError::Dimensions { rows, cols };
    if rows == 0 || cols == 0 {
        return Err(dims_err());
    }
    let width = u32::try_from(cols).map_err(|_| dims_err())?;
    let height = u32::try_from(rows).map_err(|_| dims_err())?;

    RgbaImage::from_raw(width, height, raster_to_rgba(raster, params)).ok_or_else(dims_err)
}

/// Widen `image` with a vertical colorbar for `params`.
pub fn with_colorbar(image: &RgbaImage, params: &ColormapParams, bar_width: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let bar_x = width + COLORBAR_GAP;
    let mut out = RgbaImage::new(bar_x + bar_width, height);

    image::imageops::replace(&mut out, image, 0, 0);

    let span = (height.max(2) - 1) as f64;
    for y in 0..height {
        // Top row is max, bottom row is min
        let frac = 1.0 - y as f64 / span;
        let value = params.min + frac * (params.max - params.min);
        let color = Rgba(params.color_of(value));
        for x in bar_x..bar_x + bar_width {
            out.put_pixel(x, y, color);
        }
    }
    out
}

/// Render `raster` with `params` and save it as a PNG at `path`.
pub fn write_png<T, P>(
    raster: &Raster<T>,
    params: &ColormapParams,
    options: &PngOptions,
    path: P,
) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let image = render_image(raster, params)?;
    let image = if options.colorbar {
        let bar_width = options
            .colorbar_width
            .unwrap_or_else(|| (image.width() / 25).max(4));
        with_colorbar(&image, params, bar_width)
    } else {
        image
    };
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
