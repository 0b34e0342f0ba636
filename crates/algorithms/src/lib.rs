//! # Verdex Algorithms
//!
//! Pure computations over catalog scenes and rasters.
//!
//! ## Modules
//!
//! - **selection**: pick the catalog scene that best covers an area of interest
//! - **imagery**: normalized-difference spectral indices (NDVI)

mod maybe_rayon;

pub mod imagery;
pub mod selection;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::imagery::{ndvi, normalized_difference, normalized_difference_value};
    pub use crate::selection::{
        overlap_area, rank_scenes, select_best_scene, SceneSelection, ScoredScene,
    };
    pub use verdex_core::prelude::*;
}
