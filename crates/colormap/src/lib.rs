//! # Verdex Colormap
//!
//! Color mapping and PNG rendering for index rasters.
//!
//! [`raster_to_rgba`] turns a `Raster<T>` into an RGBA buffer through a
//! multi-stop color ramp; [`write_png`] saves it, optionally with a
//! colorbar. NDVI plots default to `RdYlGn` over `[-1, 1]`.
//!
//! ## Usage
//!
//! ```ignore
//! use verdex_colormap::{write_png, ColormapParams, PngOptions};
//!
//! write_png(&ndvi, &ColormapParams::ndvi(), &PngOptions::default(), "ndvi.png")?;
//! ```

mod error;
mod png;
mod render;
mod scheme;

pub use error::{RenderError, Result};
pub use png::{render_image, with_colorbar, write_png, PngOptions};
pub use render::{auto_params, raster_to_rgba, ColormapParams};
pub use scheme::{evaluate, ColorScheme, ColorStop, Rgb};
