//! # Verdex Cloud
//!
//! Scene acquisition from STAC catalogs.
//!
//! Searches a catalog for scenes over a bounding box and date range,
//! converts the hits into [`verdex_core::Scene`] records, picks the best one
//! with [`verdex_algorithms::selection`], and downloads its metadata and
//! band assets. [`blocking`] runs the same pipeline on a current-thread
//! tokio runtime.

pub mod acquire;
pub mod error;
pub mod http;
pub mod stac_client;
pub mod stac_models;
mod sync_api;

pub use acquire::{FetchAssets, FetchOptions, FetchedScene, SceneFetcher};
pub use error::{CloudError, Result};
pub use stac_client::{StacCatalog, StacClient, StacClientOptions};
pub use stac_models::{StacItem, StacItemCollection, StacSearchParams};

/// Blocking API.
pub mod blocking {
    pub use crate::sync_api::SceneFetcherBlocking;
}
