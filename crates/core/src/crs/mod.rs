//! Coordinate Reference System handling
//!
//! Verdex never reprojects: a CRS is metadata carried from input bands to
//! the index raster so the output lands on the same grid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System, identified by its EPSG code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CRS {
    epsg: u32,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Whether the EPSG code falls in a geographic (lat/lon) range.
    ///
    /// Only the common 4xxx codes are recognised; everything else is
    /// written as a projected CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self.epsg, 4000..=4999)
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = CRS::from_epsg(32630);
        assert_eq!(crs.epsg(), 32630);
        assert_eq!(crs.to_string(), "EPSG:32630");
        assert!(!crs.is_geographic());
        assert!(CRS::from_epsg(4326).is_geographic());
    }
}
