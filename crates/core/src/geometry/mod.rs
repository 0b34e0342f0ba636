//! Planar geometry used for scene footprints and search areas

mod bbox;

pub use bbox::BoundingBox;
