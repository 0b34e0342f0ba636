//! STAC (SpatioTemporal Asset Catalog) data types.
//!
//! Serde models for STAC Item Search (POST /search) requests and responses,
//! covering what scene acquisition needs: bbox, datetime, collection and
//! cloud-cover filtering, pagination via `links`, asset hrefs, and the
//! conversion of an item into a [`Scene`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use verdex_core::{BoundingBox, Scene};

use crate::error::{CloudError, Result};

// ---------------------------------------------------------------------------
// Search request
// ---------------------------------------------------------------------------

/// Body for `POST /search` (STAC API – Item Search).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StacSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// STAC API query extension, e.g. `{"eo:cloud_cover": {"lt": 5}}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<serde_json::Value>,

    /// Pagination token (next page).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Server-specific keys, such as stac-server's `next` cursor, carried
    /// through from pagination link bodies.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl StacSearchParams {
    /// Create empty search params.
    pub fn new() -> Self {
        Self {
            bbox: None,
            datetime: None,
            collections: None,
            limit: None,
            query: None,
            token: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set the bounding box `[west, south, east, north]`.
    pub fn bbox(mut self, west: f64, south: f64, east: f64, north: f64) -> Self {
        self.bbox = Some(vec![west, south, east, north]);
        self
    }

    /// Set datetime or datetime range (e.g. `"2024-06-01/2024-06-30"`).
    pub fn datetime(mut self, dt: &str) -> Self {
        self.datetime = Some(dt.to_string());
        self
    }

    /// Set collection filter.
    pub fn collections(mut self, cols: &[&str]) -> Self {
        self.collections = Some(cols.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Set maximum items per page.
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    /// Only match items whose `eo:cloud_cover` is strictly below `percent`.
    ///
    /// Other `query` clauses already set are kept.
    pub fn cloud_cover_below(mut self, percent: f64) -> Self {
        let clause = serde_json::json!({ "lt": percent });
        match self.query.as_mut().and_then(|q| q.as_object_mut()) {
            Some(obj) => {
                obj.insert("eo:cloud_cover".to_string(), clause);
            }
            None => self.query = Some(serde_json::json!({ "eo:cloud_cover": clause })),
        }
        self
    }

    /// Set pagination token.
    pub fn token(mut self, tok: &str) -> Self {
        self.token = Some(tok.to_string());
        self
    }
}

impl Default for StacSearchParams {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A STAC Item Collection (GeoJSON FeatureCollection).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacItemCollection {
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<StacItem>,

    #[serde(default)]
    pub links: Vec<StacLink>,

    /// Some catalogs return `numberMatched` or `context.matched`.
    #[serde(rename = "numberMatched", skip_serializing_if = "Option::is_none")]
    pub number_matched: Option<u64>,

    /// Some catalogs return `numberReturned` or `context.returned`.
    #[serde(rename = "numberReturned", skip_serializing_if = "Option::is_none")]
    pub number_returned: Option<u64>,

    /// Earth Search / some catalogs use `context` instead of numberMatched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl StacItemCollection {
    /// Find the `"next"` pagination link, if any.
    pub fn next_link(&self) -> Option<&StacLink> {
        self.links.iter().find(|l| l.rel == "next")
    }

    /// Total number of items in this page.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A single STAC Item (GeoJSON Feature).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacItem {
    #[serde(rename = "type")]
    pub type_: String,

    /// Unique item identifier.
    pub id: String,

    /// GeoJSON geometry, kept raw; only its outer ring is ever read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,

    /// Bounding box `[west, south, east, north]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    pub properties: StacItemProperties,

    pub assets: BTreeMap<String, StacAsset>,

    /// Collection this item belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(default)]
    pub links: Vec<StacLink>,
}

impl StacItem {
    /// Get an asset by key.
    pub fn asset(&self, key: &str) -> Option<&StacAsset> {
        self.assets.get(key)
    }

    /// Item footprint.
    ///
    /// Taken from `bbox` (2D or 3D) when present, otherwise from the extrema
    /// of the first ring of a `Polygon` or `MultiPolygon` geometry.
    pub fn footprint(&self) -> Result<BoundingBox> {
        if let Some(bbox) = &self.bbox {
            return Ok(BoundingBox::from_slice(bbox)?);
        }

        let geometry = self.geometry.as_ref().ok_or_else(|| self.invalid("no bbox or geometry"))?;
        let coordinates = &geometry["coordinates"];
        let ring = match geometry["type"].as_str() {
            Some("Polygon") => &coordinates[0],
            Some("MultiPolygon") => &coordinates[0][0],
            other => {
                return Err(self.invalid(&format!("unsupported geometry type {other:?}")));
            }
        };

        let points = ring
            .as_array()
            .ok_or_else(|| self.invalid("geometry has no coordinate ring"))?
            .iter()
            .map(|p| match (p[0].as_f64(), p[1].as_f64()) {
                (Some(x), Some(y)) => Ok((x, y)),
                _ => Err(self.invalid("non-numeric coordinate in geometry")),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BoundingBox::from_ring(&points)?)
    }

    /// Acquisition time from the `datetime` property.
    pub fn acquired(&self) -> Result<DateTime<Utc>> {
        let raw = self
            .properties
            .datetime
            .as_deref()
            .ok_or_else(|| self.invalid("missing datetime"))?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| self.invalid(&format!("datetime '{raw}': {e}")))
    }

    /// Convert into a [`Scene`] record.
    ///
    /// Requires an id usable as a single path component, a footprint, an
    /// `eo:cloud_cover` and an RFC 3339 `datetime`. Every asset href is kept,
    /// and the raw properties are carried for the metadata sidecar.
    pub fn to_scene(&self) -> Result<Scene> {
        self.check_id()?;
        let bbox = self.footprint()?;
        let cloud_cover = self
            .properties
            .eo_cloud_cover
            .ok_or_else(|| self.invalid("missing eo:cloud_cover"))?;
        let acquired = self.acquired()?;

        let properties = match serde_json::to_value(&self.properties)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        let scene = self
            .assets
            .iter()
            .fold(Scene::new(&self.id, bbox, cloud_cover, acquired), |scene, (key, asset)| {
                scene.with_asset(key, &asset.href)
            })
            .with_properties(properties);
        Ok(scene)
    }

    /// Scene ids name directories and files under the output root.
    fn check_id(&self) -> Result<()> {
        let id = self.id.as_str();
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
            return Err(self.invalid("id is not a valid file name"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> CloudError {
        CloudError::InvalidItem {
            id: self.id.clone(),
            reason: reason.to_string(),
        }
    }
}

/// STAC Item properties.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacItemProperties {
    /// ISO 8601 datetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    /// Cloud cover percentage (EO extension).
    #[serde(rename = "eo:cloud_cover", skip_serializing_if = "Option::is_none")]
    pub eo_cloud_cover: Option<f64>,

    /// Platform name (e.g., "sentinel-2a").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// Constellation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constellation: Option<String>,

    /// GSD (ground sample distance).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gsd: Option<f64>,

    /// All other properties we don't model explicitly.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A single STAC Asset (file reference).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacAsset {
    /// URL to the asset file.
    pub href: String,

    /// Media type (e.g., `"image/tiff; application=geotiff; profile=cloud-optimized"`).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Roles: `["data"]`, `["thumbnail"]`, `["overview"]`, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// All other asset fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A STAC Link (used for pagination and related resources).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StacLink {
    /// Relationship: `"self"`, `"root"`, `"next"`, `"prev"`, etc.
    pub rel: String,

    /// Target URL.
    pub href: String,

    /// HTTP method for the link (default GET, but `"next"` often uses POST).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Request body for POST-based pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,

    /// Merge mode: if true, merge body with previous request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,

    /// Media type of the linked resource.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
