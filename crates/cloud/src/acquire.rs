//! Scene acquisition: search a catalog, pick the best scene for a target
//! area, and store its metadata and assets on disk.
//!
//! Layout under `output_root`:
//!
//! ```text
//! <output_root>/<id>/<id>_metadata.json
//! <output_root>/<id>/<id>_<asset key>.tif
//! <output_root>/<id>/<id>_thumbnail.<ext>
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};
use verdex_algorithms::selection::{select_best_scene, SceneSelection};
use verdex_core::{BoundingBox, Scene};

use crate::error::Result;
use crate::http::HttpClient;
use crate::stac_client::{StacCatalog, StacClient, StacClientOptions};
use crate::stac_models::{StacItem, StacSearchParams};

/// Asset keys to download for the selected scene.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchAssets {
    /// Red band key (default `"red"`).
    pub red: String,
    /// Near-infrared band key (default `"nir"`).
    pub nir: String,
    /// Preview image key (default `"thumbnail"`); `None` skips it.
    pub thumbnail: Option<String>,
}

impl Default for FetchAssets {
    fn default() -> Self {
        Self {
            red: "red".to_string(),
            nir: "nir".to_string(),
            thumbnail: Some("thumbnail".to_string()),
        }
    }
}

impl FetchAssets {
    /// Keys in download order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = vec![self.red.as_str(), self.nir.as_str()];
        keys.extend(self.thumbnail.as_deref());
        keys
    }

    fn is_thumbnail(&self, key: &str) -> bool {
        self.thumbnail.as_deref() == Some(key)
    }
}

/// Configuration for [`SceneFetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Collections to search (default `["sentinel-2-l2a"]`).
    pub collections: Vec<String>,
    /// Only scenes with `eo:cloud_cover` strictly below this percentage (default 5).
    pub cloud_tolerance: f64,
    /// Items requested per catalog page (default 100).
    pub page_limit: u32,
    /// Root directory for downloaded scenes (default `EO_data`).
    pub output_root: PathBuf,
    pub assets: FetchAssets,
    /// Per-asset download timeout (default 120 s).
    pub download_timeout: Duration,
    /// Retries per asset download (default 3).
    pub max_retries: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            collections: vec!["sentinel-2-l2a".to_string()],
            cloud_tolerance: 5.0,
            page_limit: 100,
            output_root: PathBuf::from("EO_data"),
            assets: FetchAssets::default(),
            download_timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }
}

impl FetchOptions {
    /// The STAC search body for `target` over `datetime`.
    pub fn search_params(&self, target: &BoundingBox, datetime: &str) -> StacSearchParams {
        let collections: Vec<&str> = self.collections.iter().map(String::as_str).collect();
        StacSearchParams::new()
            .bbox(target.min_x, target.min_y, target.max_x, target.max_y)
            .datetime(datetime)
            .collections(&collections)
            .limit(self.page_limit)
            .cloud_cover_below(self.cloud_tolerance)
    }
}

/// A scene stored on disk.
#[derive(Debug, Clone)]
pub struct FetchedScene {
    pub scene: Scene,
    /// Intersection area with the search target.
    pub overlap_area: f64,
    /// `<output_root>/<id>`
    pub dir: PathBuf,
    pub metadata_path: PathBuf,
    /// `(asset key, path)` for every downloaded asset, in request order.
    pub assets: Vec<(String, PathBuf)>,
}

/// Convert catalog items into scenes, skipping (and logging) items that lack
/// a footprint, cloud cover or datetime.
pub fn items_to_scenes(items: &[StacItem]) -> Vec<Scene> {
    items
        .iter()
        .filter_map(|item| match item.to_scene() {
            Ok(scene) => Some(scene),
            Err(e) => {
                warn!(id = %item.id, error = %e, "skipping STAC item");
                None
            }
        })
        .collect()
}

/// `<root>/<id>`
pub fn scene_dir(root: &Path, scene_id: &str) -> PathBuf {
    root.join(scene_id)
}

/// File name for one asset of a scene.
///
/// Raster assets are stored as `<id>_<key>.tif`; the preview keeps the
/// extension of its href (default `jpg`) under `<id>_thumbnail.<ext>`.
pub fn asset_file_name(scene_id: &str, key: &str, href: &str, is_thumbnail: bool) -> String {
    if is_thumbnail {
        format!("{scene_id}_thumbnail.{}", href_extension(href).unwrap_or("jpg"))
    } else {
        format!("{scene_id}_{key}.tif")
    }
}

/// Extension of the last path segment of a URL, ignoring query and fragment.
fn href_extension(href: &str) -> Option<&str> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let segment = path.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    let plausible = !stem.is_empty()
        && (1..=4).contains(&ext.len())
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    plausible.then_some(ext)
}

/// Write the scene's raw catalog properties as pretty-printed JSON.
pub async fn write_metadata(scene: &Scene, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}_metadata.json", scene.id));
    let json = serde_json::to_string_pretty(&scene.properties)?;
    tokio::fs::write(&path, json).await?;
    Ok(path)
}

/// Search, select and download in one place.
pub struct SceneFetcher {
    stac: StacClient,
    http: HttpClient,
    options: FetchOptions,
}

impl SceneFetcher {
    pub fn new(
        catalog: StacCatalog,
        client_options: StacClientOptions,
        options: FetchOptions,
    ) -> Result<Self> {
        let stac = StacClient::new(catalog, client_options)?;
        let http = HttpClient::new(options.download_timeout, options.max_retries)?;
        Ok(Self {
            stac,
            http,
            options,
        })
    }

    /// Search the catalog and convert the hits into scenes.
    pub async fn search(&self, target: &BoundingBox, datetime: &str) -> Result<Vec<Scene>> {
        target.validate()?;
        let params = self.options.search_params(target, datetime);
        let items = self.stac.search_all(&params).await?;
        let scenes = items_to_scenes(&items);
        info!(items = items.len(), scenes = scenes.len(), "found candidate scenes");
        Ok(scenes)
    }

    /// Search, pick the best scene and download it.
    ///
    /// Returns `Ok(None)` when the catalog has no candidate scene.
    pub async fn fetch(&self, target: &BoundingBox, datetime: &str) -> Result<Option<FetchedScene>> {
        let scenes = self.search(target, datetime).await?;

        let best = match select_best_scene(target, &scenes)? {
            SceneSelection::Best(scored) => scored,
            SceneSelection::NoMatch => {
                info!("no suitable scene found");
                return Ok(None);
            }
        };
        info!(
            id = %best.scene.id,
            cloud_cover = best.scene.cloud_cover,
            overlap_area = best.overlap_area,
            "selected scene"
        );

        let fetched = self.download_scene(best.scene, best.overlap_area).await?;
        Ok(Some(fetched))
    }

    /// Store metadata and the configured assets of `scene`.
    ///
    /// Asset keys the scene does not carry are skipped. The first failed
    /// download fails the whole call.
    pub async fn download_scene(&self, scene: &Scene, overlap_area: f64) -> Result<FetchedScene> {
        let dir = scene_dir(&self.options.output_root, &scene.id);
        tokio::fs::create_dir_all(&dir).await?;

        let metadata_path = write_metadata(scene, &dir).await?;
        info!(path = %metadata_path.display(), "metadata saved");

        let mut keys = Vec::new();
        let mut jobs = Vec::new();
        for key in self.options.assets.keys() {
            let Some(href) = scene.asset(key) else {
                warn!(id = %scene.id, %key, "asset not present, skipping");
                continue;
            };
            let href = self.stac.sign_asset_href(href).await?;
            let file = asset_file_name(&scene.id, key, &href, self.options.assets.is_thumbnail(key));
            keys.push(key.to_string());
            jobs.push((href, dir.join(file)));
        }

        let results = self.http.download_all(&jobs).await;

        let mut assets = Vec::with_capacity(jobs.len());
        for ((key, (_, path)), result) in keys.into_iter().zip(jobs).zip(results) {
            let bytes = result?;
            info!(%key, path = %path.display(), bytes, "asset saved");
            assets.push((key, path));
        }

        Ok(FetchedScene {
            scene: scene.clone(),
            overlap_area,
            dir,
            metadata_path,
            assets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn scene() -> Scene {
        let acquired = Utc.with_ymd_and_hms(2024, 6, 15, 10, 56, 21).unwrap();
        let mut props = serde_json::Map::new();
        props.insert("eo:cloud_cover".into(), serde_json::json!(3.5));
        props.insert("platform".into(), serde_json::json!("sentinel-2b"));
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
        Scene::new("S2B_30TVK_20240615_0_L2A", bbox, 3.5, acquired)
            .with_asset("red", "https://example.com/B04.tif")
            .with_properties(props)
    }

    #[test]
    fn default_assets() {
        let assets = FetchAssets::default();
        assert_eq!(assets.keys(), ["red", "nir", "thumbnail"]);

        let no_thumb = FetchAssets {
            thumbnail: None,
            ..FetchAssets::default()
        };
        assert_eq!(no_thumb.keys(), ["red", "nir"]);
    }

    #[test]
    fn search_params_carry_cloud_filter() {
        let opts = FetchOptions::default();
        let target = BoundingBox::new(-3.75, 40.38, -3.65, 40.45).unwrap();
        let json = serde_json::to_value(opts.search_params(&target, "2024-06-01/2024-06-30")).unwrap();

        assert_eq!(json["bbox"], serde_json::json!([-3.75, 40.38, -3.65, 40.45]));
        assert_eq!(json["collections"], serde_json::json!(["sentinel-2-l2a"]));
        assert_eq!(json["query"]["eo:cloud_cover"]["lt"], 5.0);
        assert_eq!(json["limit"], 100);
    }

    #[test]
    fn asset_file_names() {
        let id = "S2A_T30TVK";
        assert_eq!(asset_file_name(id, "red", "https://x/B04.tif", false), "S2A_T30TVK_red.tif");
        assert_eq!(
            asset_file_name(id, "thumbnail", "https://x/preview.png?sig=abc", true),
            "S2A_T30TVK_thumbnail.png"
        );
        assert_eq!(
            asset_file_name(id, "thumbnail", "https://x/thumbnail", true),
            "S2A_T30TVK_thumbnail.jpg"
        );
        assert_eq!(
            asset_file_name(id, "thumbnail", "https://x.example.com/preview", true),
            "S2A_T30TVK_thumbnail.jpg"
        );
    }

    #[test]
    fn scene_dir_layout() {
        assert_eq!(
            scene_dir(Path::new("EO_data"), "abc"),
            PathBuf::from("EO_data").join("abc")
        );
    }

    #[tokio::test]
    async fn metadata_is_pretty_printed_properties() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_metadata(&scene(), dir.path()).await.unwrap();

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("S2B_30TVK_20240615_0_L2A_metadata.json")
        );
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"platform\": \"sentinel-2b\""));
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back["eo:cloud_cover"], 3.5);
    }
}
