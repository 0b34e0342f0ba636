//! Reading and writing single-band GeoTIFF rasters

mod native;

pub use native::{read_geotiff, write_geotiff, GeoTiffOptions};
