//! Scene selection
//!
//! Picks the catalog scene whose footprint best covers a target area:
//! largest intersection area first, lowest cloud cover on exact ties.

mod best_scene;

pub use best_scene::{overlap_area, rank_scenes, select_best_scene, SceneSelection, ScoredScene};
