//! Catalog scene records

use crate::geometry::BoundingBox;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One acquisition offered by a scene catalog.
///
/// Scenes are produced by the catalog client and only read afterwards:
/// selection borrows them, downloads look up their asset hrefs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Catalog identifier (opaque).
    pub id: String,
    /// Footprint of the scene.
    pub bbox: BoundingBox,
    /// Percentage of the scene obscured by cloud, 0–100.
    pub cloud_cover: f64,
    /// Acquisition timestamp.
    pub acquired: DateTime<Utc>,
    /// Asset key (e.g. `"red"`, `"nir"`, `"thumbnail"`) to href.
    #[serde(default)]
    pub assets: BTreeMap<String, String>,
    /// Raw catalog properties, kept for the metadata sidecar.
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Scene {
    pub fn new(
        id: impl Into<String>,
        bbox: BoundingBox,
        cloud_cover: f64,
        acquired: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            bbox,
            cloud_cover,
            acquired,
            assets: BTreeMap::new(),
            properties: serde_json::Map::new(),
        }
    }

    /// Add an asset reference.
    pub fn with_asset(mut self, key: impl Into<String>, href: impl Into<String>) -> Self {
        self.assets.insert(key.into(), href.into());
        self
    }

    /// Attach the raw catalog properties.
    pub fn with_properties(mut self, properties: serde_json::Map<String, serde_json::Value>) -> Self {
        self.properties = properties;
        self
    }

    /// Href of an asset, if the scene carries it.
    pub fn asset(&self, key: &str) -> Option<&str> {
        self.assets.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scene_assets() {
        let acquired = Utc.with_ymd_and_hms(2024, 6, 15, 10, 56, 21).unwrap();
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let scene = Scene::new("s1", bbox, 4.5, acquired)
            .with_asset("red", "https://example.com/B04.tif")
            .with_asset("nir", "https://example.com/B08.tif");

        assert_eq!(scene.asset("red"), Some("https://example.com/B04.tif"));
        assert_eq!(scene.asset("thumbnail"), None);
        assert_eq!(scene.assets.len(), 2);
    }

    #[test]
    fn test_scene_serde() {
        let acquired = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let bbox = BoundingBox::new(-1.0, -1.0, 1.0, 1.0).unwrap();
        let scene = Scene::new("s2", bbox, 12.0, acquired);

        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["bbox"], serde_json::json!([-1.0, -1.0, 1.0, 1.0]));
        assert_eq!(json["cloud_cover"], 12.0);

        let back: Scene = serde_json::from_value(json).unwrap();
        assert_eq!(back, scene);
    }
}
