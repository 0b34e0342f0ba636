//! Axis-aligned bounding boxes

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle `(min_x, min_y, max_x, max_y)`.
///
/// A box is valid when `min_x <= max_x` and `min_y <= max_y`. NaN
/// coordinates fail both comparisons and therefore make a box invalid.
/// The fields are public so boxes can be built literally; anything that
/// depends on the invariant calls [`BoundingBox::validate`] first.
///
/// Serialized as a STAC-style `[min_x, min_y, max_x, max_y]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box, rejecting degenerate input.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        let bbox = Self {
            min_x,
            min_y,
            max_x,
            max_y,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Create a bounding box from two opposite corners in any order.
    ///
    /// Inverted axes are swapped; only NaN coordinates are rejected.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        if [x1, y1, x2, y2].iter().any(|v| v.is_nan()) {
            return Err(Error::InvalidBoundingBox {
                min_x: x1,
                min_y: y1,
                max_x: x2,
                max_y: y2,
            });
        }
        Ok(Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        })
    }

    /// Bounding box of a polygon vertex ring (coordinate-wise extrema).
    pub fn from_ring(ring: &[(f64, f64)]) -> Result<Self> {
        let (first, rest) = ring.split_first().ok_or(Error::InvalidParameter {
            name: "ring",
            value: "[]".to_string(),
            reason: "a ring needs at least one vertex".to_string(),
        })?;

        let init = Self {
            min_x: first.0,
            min_y: first.1,
            max_x: first.0,
            max_y: first.1,
        };
        let bbox = rest.iter().fold(init, |acc, &(x, y)| Self {
            min_x: acc.min_x.min(x),
            min_y: acc.min_y.min(y),
            max_x: acc.max_x.max(x),
            max_y: acc.max_y.max(y),
        });

        bbox.validate()?;
        Ok(bbox)
    }

    /// Parse a STAC `bbox` array.
    ///
    /// Accepts 2D `[west, south, east, north]` and 3D
    /// `[west, south, zmin, east, north, zmax]` layouts.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            &[w, s, e, n] | &[w, s, _, e, n, _] => Self::new(w, s, e, n),
            _ => Err(Error::InvalidParameter {
                name: "bbox",
                value: format!("{:?}", values),
                reason: "expected 4 or 6 values".to_string(),
            }),
        }
    }

    /// Check the `min <= max` invariant on both axes.
    pub fn validate(&self) -> Result<()> {
        if self.min_x <= self.max_x && self.min_y <= self.max_y {
            Ok(())
        } else {
            Err(Error::InvalidBoundingBox {
                min_x: self.min_x,
                min_y: self.min_y,
                max_x: self.max_x,
                max_y: self.max_y,
            })
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Area of the axis-aligned overlap between two boxes.
    ///
    /// Each axis extent is clamped at zero before multiplying, so disjoint
    /// boxes give exactly `0.0` and never the product of two negative
    /// extents.
    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        let ix1 = self.min_x.max(other.min_x);
        let iy1 = self.min_y.max(other.min_y);
        let ix2 = self.max_x.min(other.max_x);
        let iy2 = self.max_y.min(other.max_y);

        let width = (ix2 - ix1).max(0.0);
        let height = (iy2 - iy1).max(0.0);
        width * height
    }

    /// `[min_x, min_y, max_x, max_y]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = Error;

    fn try_from(v: [f64; 4]) -> Result<Self> {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox {
        BoundingBox::new(min_x, min_y, max_x, max_y).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_axes() {
        assert!(matches!(
            BoundingBox::new(10.0, 0.0, 0.0, 10.0),
            Err(Error::InvalidBoundingBox { .. })
        ));
        assert!(BoundingBox::new(0.0, 10.0, 10.0, 0.0).is_err());
        assert!(BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_zero_extent_is_valid() {
        let point = bbox(3.0, 4.0, 3.0, 4.0);
        assert_eq!(point.area(), 0.0);
    }

    #[test]
    fn test_from_corners_normalizes() {
        let b = BoundingBox::from_corners(10.0, 8.0, 2.0, 1.0).unwrap();
        assert_eq!(b.to_array(), [2.0, 1.0, 10.0, 8.0]);
        assert!(BoundingBox::from_corners(0.0, f64::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_from_ring_takes_extrema() {
        let ring = [
            (-3.95, 40.22),
            (-2.84, 40.22),
            (-2.84, 41.21),
            (-3.95, 41.21),
            (-3.95, 40.22),
        ];
        let b = BoundingBox::from_ring(&ring).unwrap();
        assert_eq!(b.to_array(), [-3.95, 40.22, -2.84, 41.21]);
        assert!(BoundingBox::from_ring(&[]).is_err());
    }

    #[test]
    fn test_from_slice_2d_and_3d() {
        let b2 = BoundingBox::from_slice(&[0.0, 1.0, 2.0, 3.0]).unwrap();
        let b3 = BoundingBox::from_slice(&[0.0, 1.0, -5.0, 2.0, 3.0, 5.0]).unwrap();
        assert_eq!(b2, b3);
        assert!(BoundingBox::from_slice(&[0.0, 1.0, 2.0]).is_err());
    }

    #[test]
    fn test_intersection_area_partial_overlap() {
        let target = bbox(0.0, 0.0, 10.0, 10.0);
        assert_eq!(target.intersection_area(&bbox(5.0, 5.0, 15.0, 15.0)), 25.0);
        assert_eq!(target.intersection_area(&bbox(0.0, 0.0, 10.0, 10.0)), 100.0);
        assert_eq!(target.intersection_area(&bbox(-5.0, -5.0, 20.0, 20.0)), 100.0);
    }

    #[test]
    fn test_intersection_area_disjoint_is_zero() {
        let target = bbox(0.0, 0.0, 10.0, 10.0);
        // Disjoint on both axes: unclamped extents would be -10 * -10 = 100
        let far = bbox(20.0, 20.0, 30.0, 30.0);
        assert_eq!(target.intersection_area(&far), 0.0);
        assert_eq!(far.intersection_area(&target), 0.0);

        // Disjoint on one axis only
        let beside = bbox(12.0, 0.0, 20.0, 10.0);
        assert_eq!(target.intersection_area(&beside), 0.0);

        // Touching edges share no area
        let touching = bbox(10.0, 0.0, 20.0, 10.0);
        assert_eq!(target.intersection_area(&touching), 0.0);
    }

    #[test]
    fn test_intersection_area_is_symmetric() {
        let a = bbox(-3.75, 40.38, -3.65, 40.45);
        let b = bbox(-3.95, 40.22, -2.84, 41.21);
        assert_eq!(a.intersection_area(&b), b.intersection_area(&a));
        assert!((a.intersection_area(&b) - a.area()).abs() < 1e-12);
    }

    #[test]
    fn test_serde_as_array() {
        let b = bbox(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");

        let back: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);

        let bad: std::result::Result<BoundingBox, _> = serde_json::from_str("[3.0,2.0,1.0,4.0]");
        assert!(bad.is_err());
    }
}
