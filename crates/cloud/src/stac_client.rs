//! Async STAC client for searching spatio-temporal asset catalogs.
//!
//! Earth Search (the default) and Planetary Computer are known by
//! shorthand; any other STAC API endpoint is reached via
//! [`StacCatalog::Custom`].

use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{CloudError, Result};
use crate::http::send_with_retry;
use crate::stac_models::{StacItem, StacItemCollection, StacLink, StacSearchParams};

const PC_SIGN_URL: &str = "https://planetarycomputer.microsoft.com/api/sas/v1/sign";

// ---------------------------------------------------------------------------
// Catalog enum
// ---------------------------------------------------------------------------

/// Well-known STAC catalogs plus custom endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StacCatalog {
    /// Microsoft Planetary Computer STAC API.
    PlanetaryComputer,
    /// AWS Earth Search (Element 84), v1 API.
    #[default]
    EarthSearch,
    /// Any STAC API endpoint (provide the root URL, e.g.
    /// `"https://my-stac.example.com/api/v1"`).
    Custom(String),
}

impl StacCatalog {
    /// Return the full POST `/search` URL for this catalog.
    pub fn search_url(&self) -> String {
        match self {
            Self::PlanetaryComputer => {
                "https://planetarycomputer.microsoft.com/api/stac/v1/search".to_string()
            }
            Self::EarthSearch => {
                "https://earth-search.aws.element84.com/v1/search".to_string()
            }
            Self::Custom(base) => {
                let base = base.trim_end_matches('/');
                if base.ends_with("/search") {
                    base.to_string()
                } else {
                    format!("{}/search", base)
                }
            }
        }
    }

    /// Parse a shorthand string into a catalog.
    ///
    /// Recognized shorthands: `"pc"`, `"planetary-computer"`, `"es"`,
    /// `"earth-search"`. Anything else is treated as a custom URL.
    pub fn from_str_or_url(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pc" | "planetary-computer" | "planetarycomputer" => Self::PlanetaryComputer,
            "es" | "earth-search" | "earthsearch" => Self::EarthSearch,
            _ => Self::Custom(s.to_string()),
        }
    }

    /// Whether this catalog requires SAS token signing for asset access.
    pub fn needs_signing(&self) -> bool {
        matches!(self, Self::PlanetaryComputer)
    }
}

impl FromStr for StacCatalog {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_str_or_url(s))
    }
}

impl std::fmt::Display for StacCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlanetaryComputer => write!(f, "planetary-computer"),
            Self::EarthSearch => write!(f, "earth-search"),
            Self::Custom(url) => write!(f, "{url}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for [`StacClient`].
#[derive(Debug, Clone)]
pub struct StacClientOptions {
    /// Per-request timeout (default 30 s).
    pub request_timeout: Duration,
    /// Maximum retries on transient failures (default 3).
    pub max_retries: u32,
    /// Maximum total items to fetch across pages (default 100).
    pub max_items: usize,
}

impl Default for StacClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            max_items: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Async client for STAC Item Search.
pub struct StacClient {
    catalog: StacCatalog,
    client: reqwest::Client,
    options: StacClientOptions,
}

impl StacClient {
    /// Create a new STAC client.
    pub fn new(catalog: StacCatalog, options: StacClientOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| CloudError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            catalog,
            client,
            options,
        })
    }

    // ── Single-page search ──────────────────────────────────────────

    /// Execute a single search request and return one page of results.
    pub async fn search(&self, params: &StacSearchParams) -> Result<StacItemCollection> {
        let url = self.catalog.search_url();
        debug!(%url, ?params, "STAC search");
        self.post_search(&url, params).await
    }

    // ── Paginated search ────────────────────────────────────────────

    /// Search with automatic pagination, collecting up to `max_items` items.
    pub async fn search_all(&self, params: &StacSearchParams) -> Result<Vec<StacItem>> {
        let mut all_items: Vec<StacItem> = Vec::new();
        let max = self.options.max_items;

        // First page
        let mut page = self.search(params).await?;
        let mut truncated = false;

        loop {
            let next = page.next_link().cloned();
            all_items.extend(page.features.drain(..));

            if all_items.len() >= max {
                truncated = drops_items(all_items.len(), max, next.is_some());
                break;
            }

            match next {
                Some(link) => {
                    page = self.follow_next(&link, params).await?;
                    if page.is_empty() {
                        break;
                    }
                }
                None => break,
            }
        }

        if truncated {
            warn!(
                max_items = max,
                "STAC search truncated; later pages were not considered"
            );
        }
        all_items.truncate(max);
        info!(catalog = %self.catalog, items = all_items.len(), "STAC search complete");
        Ok(all_items)
    }

    // ── Planetary Computer SAS token signing ────────────────────────

    /// Sign an asset href for Planetary Computer via the `/sign` endpoint.
    ///
    /// For non-PC catalogs this is a no-op and returns the href unchanged.
    pub async fn sign_asset_href(&self, href: &str) -> Result<String> {
        if !self.catalog.needs_signing() {
            return Ok(href.to_string());
        }
        self.sign_pc_href(href).await
    }

    // ── Private helpers ─────────────────────────────────────────────

    async fn post_search(
        &self,
        url: &str,
        params: &StacSearchParams,
    ) -> Result<StacItemCollection> {
        let request = self.client.post(url).json(params);
        let resp = send_with_retry(request, self.options.max_retries, "STAC search").await?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Follow a pagination link. Handles both POST (body/merge) and GET links.
    async fn follow_next(
        &self,
        link: &StacLink,
        original_params: &StacSearchParams,
    ) -> Result<StacItemCollection> {
        let method = link
            .method
            .as_deref()
            .unwrap_or("GET")
            .to_uppercase();

        if method == "POST" {
            let next = next_page_params(link, original_params)?;
            self.post_search(&link.href, &next).await
        } else {
            let request = self.client.get(&link.href);
            let resp =
                send_with_retry(request, self.options.max_retries, "STAC pagination").await?;
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        }
    }

    /// Sign a single href via the Planetary Computer `/api/sas/v1/sign` endpoint.
    ///
    /// Returns the fully-signed URL ready for download.
    async fn sign_pc_href(&self, href: &str) -> Result<String> {
        let resp = self
            .client
            .get(PC_SIGN_URL)
            .query(&[("href", href)])
            .send()
            .await
            .map_err(|e| CloudError::Auth(format!("PC sign request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CloudError::Auth(format!(
                "PC sign returned HTTP {}: {}",
                status,
                body.chars().take(300).collect::<String>()
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CloudError::Auth(format!("parsing PC sign response: {e}")))?;

        body["href"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CloudError::Auth("PC sign response missing 'href' field".into()))
    }
}

/// Whether capping `collected` items at `max` leaves catalog matches unseen.
fn drops_items(collected: usize, max: usize, has_next_page: bool) -> bool {
    collected > max || (collected == max && has_next_page)
}

/// Request body for a POST pagination link.
///
/// With `merge` the link body overlays the original search; otherwise the
/// link body replaces it. Keys the model does not name survive in
/// [`StacSearchParams::extra`].
fn next_page_params(link: &StacLink, original: &StacSearchParams) -> Result<StacSearchParams> {
    let body = match (&link.body, link.merge.unwrap_or(false)) {
        (Some(link_body), true) => {
            let mut base = serde_json::to_value(original)?;
            if let (Some(base_obj), Some(link_obj)) = (base.as_object_mut(), link_body.as_object())
            {
                for (k, v) in link_obj {
                    base_obj.insert(k.clone(), v.clone());
                }
            }
            base
        }
        (Some(link_body), false) => link_body.clone(),
        (None, _) => return Ok(original.clone()),
    };
    Ok(serde_json::from_value(body)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
