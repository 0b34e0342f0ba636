//! Blocking (synchronous) API.
//!
//! Wraps the async [`SceneFetcher`] with a Tokio runtime so callers don't
//! need to manage their own async runtime.

use verdex_core::{BoundingBox, Scene};

use crate::acquire::{FetchOptions, FetchedScene, SceneFetcher};
use crate::error::{CloudError, Result};
use crate::stac_client::{StacCatalog, StacClientOptions};

/// Blocking wrapper around [`SceneFetcher`].
///
/// Uses an internal single-threaded Tokio runtime.
pub struct SceneFetcherBlocking {
    rt: tokio::runtime::Runtime,
    inner: SceneFetcher,
}

impl SceneFetcherBlocking {
    pub fn new(
        catalog: StacCatalog,
        client_options: StacClientOptions,
        options: FetchOptions,
    ) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CloudError::Network(format!("failed to start runtime: {e}")))?;
        // reqwest clients must be built inside the runtime they run on
        let inner = rt.block_on(async { SceneFetcher::new(catalog, client_options, options) })?;
        Ok(Self { rt, inner })
    }

    /// Candidate scenes for `target` over `datetime` (blocking).
    pub fn search(&self, target: &BoundingBox, datetime: &str) -> Result<Vec<Scene>> {
        self.rt.block_on(self.inner.search(target, datetime))
    }

    /// Search, select and download the best scene (blocking).
    pub fn fetch(&self, target: &BoundingBox, datetime: &str) -> Result<Option<FetchedScene>> {
        self.rt.block_on(self.inner.fetch(target, datetime))
    }
}
