//! # Verdex Core
//!
//! Core types and I/O shared by the Verdex crates.
//!
//! This crate provides:
//! - `BoundingBox`: validated axis-aligned rectangle with overlap arithmetic
//! - `Scene`: an immutable catalog record (footprint, cloud cover, assets)
//! - `Raster<T>`: Generic raster grid type
//! - `GeoTransform` and `CRS`: georeferencing carried through I/O
//! - Native GeoTIFF reading and writing

pub mod crs;
pub mod error;
pub mod geometry;
pub mod io;
pub mod raster;
pub mod scene;

pub use crs::CRS;
pub use error::{Error, Result};
pub use geometry::BoundingBox;
pub use raster::{GeoTransform, Raster, RasterElement};
pub use scene::Scene;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::BoundingBox;
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::scene::Scene;
}
