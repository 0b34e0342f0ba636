//! Integration tests for catalog search and scene acquisition.
//!
//! Tests marked `#[ignore]` require network access to real STAC catalogs.
//! Run with: `cargo test -p verdex-cloud -- --ignored stac`

use verdex_algorithms::selection::{rank_scenes, select_best_scene};
use verdex_cloud::acquire::{items_to_scenes, FetchAssets, FetchOptions, SceneFetcher};
use verdex_cloud::stac_client::{StacCatalog, StacClient, StacClientOptions};
use verdex_cloud::stac_models::{StacItemCollection, StacSearchParams};
use verdex_core::BoundingBox;

/// A search page over Madrid: two full-cover scenes differing in cloud
/// cover, one partial scene, and one item without cloud cover.
const SEARCH_PAGE: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "id": "S2B_30TVK_20240612_0_L2A",
      "bbox": [-4.2, 40.0, -3.0, 41.0],
      "properties": {"datetime": "2024-06-12T11:06:19.024000Z", "eo:cloud_cover": 3.9},
      "assets": {"red": {"href": "https://example.com/a/B04.tif"}}
    },
    {
      "type": "Feature",
      "id": "S2A_30TVK_20240615_0_L2A",
      "bbox": [-4.2, 40.0, -3.0, 41.0],
      "properties": {"datetime": "2024-06-15T11:06:21Z", "eo:cloud_cover": 0.8},
      "assets": {"red": {"href": "https://example.com/b/B04.tif"}}
    },
    {
      "type": "Feature",
      "id": "S2A_30TWK_20240615_0_L2A",
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-3.7, 40.3], [-2.5, 40.3], [-2.5, 41.2], [-3.7, 41.2], [-3.7, 40.3]]]
      },
      "properties": {"datetime": "2024-06-15T11:06:35Z", "eo:cloud_cover": 0.0},
      "assets": {}
    },
    {
      "type": "Feature",
      "id": "S2B_30TVK_20240619_0_L2A",
      "bbox": [-4.2, 40.0, -3.0, 41.0],
      "properties": {"datetime": "2024-06-19T11:06:19Z"},
      "assets": {}
    }
  ],
  "links": []
}"#;

fn madrid() -> BoundingBox {
    BoundingBox::new(-3.75, 40.38, -3.65, 40.45).unwrap()
}

#[test]
fn search_page_to_best_scene() {
    let page: StacItemCollection = serde_json::from_str(SEARCH_PAGE).unwrap();
    let scenes = items_to_scenes(&page.features);

    // The item without eo:cloud_cover is skipped
    assert_eq!(scenes.len(), 3);

    let best = select_best_scene(&madrid(), &scenes).unwrap();
    assert_eq!(best.scene().map(|s| s.id.as_str()), Some("S2A_30TVK_20240615_0_L2A"));

    let ranked = rank_scenes(&madrid(), &scenes).unwrap();
    let ids: Vec<&str> = ranked.iter().map(|s| s.scene.id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "S2A_30TVK_20240615_0_L2A",
            "S2B_30TVK_20240612_0_L2A",
            "S2A_30TWK_20240615_0_L2A",
        ]
    );
    // Partial cover: x from -3.7 to -3.65, y fully inside
    assert!((ranked[2].overlap_area - 0.05 * 0.07).abs() < 1e-12);
}

/// Search Earth Search for Sentinel-2 data over Madrid.
#[tokio::test]
#[ignore]
async fn stac_earth_search_sentinel2() {
    let client = StacClient::new(StacCatalog::EarthSearch, StacClientOptions::default())
        .expect("failed to create client");

    let params = StacSearchParams::new()
        .bbox(-3.75, 40.38, -3.65, 40.45)
        .datetime("2024-06-01/2024-06-30")
        .collections(&["sentinel-2-l2a"])
        .limit(5)
        .cloud_cover_below(5.0);

    let results = client.search(&params).await.expect("search failed");

    println!("Found {} items", results.len());
    assert!(!results.is_empty(), "should find at least one item");

    for item in &results.features {
        let scene = item.to_scene().expect("Earth Search items convert to scenes");
        println!("  {} dt={} cc={}", scene.id, scene.acquired, scene.cloud_cover);
        assert!(scene.cloud_cover < 5.0);
        assert!(scene.asset("red").is_some() && scene.asset("nir").is_some());
    }
}

/// Full acquisition into a temporary directory.
#[tokio::test]
#[ignore]
async fn stac_fetch_best_scene() {
    let dir = tempfile::tempdir().unwrap();
    let options = FetchOptions {
        output_root: dir.path().to_path_buf(),
        assets: FetchAssets {
            thumbnail: Some("thumbnail".into()),
            ..FetchAssets::default()
        },
        ..FetchOptions::default()
    };
    let fetcher = SceneFetcher::new(StacCatalog::EarthSearch, StacClientOptions::default(), options)
        .expect("failed to create fetcher");

    let fetched = fetcher
        .fetch(&madrid(), "2024-06-01/2024-06-30")
        .await
        .expect("fetch failed")
        .expect("a scene over Madrid in June");

    assert!(fetched.metadata_path.exists());
    assert_eq!(fetched.dir, dir.path().join(&fetched.scene.id));
    for (key, path) in &fetched.assets {
        println!("  {key} -> {}", path.display());
        assert!(path.metadata().unwrap().len() > 0);
    }
}

/// Planetary Computer search with signed asset hrefs.
#[tokio::test]
#[ignore]
async fn stac_planetary_computer_sentinel2() {
    let client = StacClient::new(StacCatalog::PlanetaryComputer, StacClientOptions::default())
        .expect("failed to create client");

    let params = StacSearchParams::new()
        .bbox(-3.75, 40.38, -3.65, 40.45)
        .datetime("2024-06-01/2024-06-30")
        .collections(&["sentinel-2-l2a"])
        .limit(3);

    let results = client.search(&params).await.expect("search failed");
    assert!(!results.is_empty(), "should find at least one item");

    let item = &results.features[0];
    let red = item.asset("B04").expect("PC names bands by id");
    let signed = client.sign_asset_href(&red.href).await.expect("signing failed");
    assert!(signed.contains('?'), "signed href should carry a SAS token");
}
