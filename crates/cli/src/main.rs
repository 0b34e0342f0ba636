//! Verdex CLI - best-scene acquisition and NDVI analysis

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use verdex_algorithms::imagery::ndvi;
use verdex_algorithms::selection::rank_scenes;
use verdex_cloud::blocking::SceneFetcherBlocking;
use verdex_cloud::{FetchAssets, FetchOptions, StacCatalog, StacClientOptions};
use verdex_colormap::{auto_params, write_png, ColorScheme, ColormapParams, PngOptions};
use verdex_core::io::{read_geotiff, write_geotiff};
use verdex_core::{BoundingBox, Raster};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "verdex")]
#[command(author, version, about = "Best-scene acquisition and NDVI analysis", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// List candidate scenes ranked by coverage and cloud cover
    Search {
        #[command(flatten)]
        query: SceneQuery,
        /// Show at most this many scenes
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },
    /// Download the best-matching scene for an area and date range
    Fetch {
        #[command(flatten)]
        query: SceneQuery,
        /// Directory receiving one sub-directory per scene
        #[arg(short, long, default_value = "EO_data")]
        output_root: PathBuf,
        /// Skip the thumbnail asset
        #[arg(long)]
        no_thumbnail: bool,
    },
    /// Compute NDVI for a scene directory written by `fetch`
    Analyze {
        /// Scene directory (`<output_root>/<scene id>`)
        data_dir: PathBuf,
        #[command(flatten)]
        bands: BandKeys,
        #[command(flatten)]
        plot: PlotArgs,
    },
    /// Compute NDVI from explicit band files
    Ndvi {
        /// Near-infrared band
        nir: PathBuf,
        /// Red band
        red: PathBuf,
        /// Output GeoTIFF
        output: PathBuf,
        /// Also render a PNG plot to this path
        #[arg(long)]
        plot: Option<PathBuf>,
        #[command(flatten)]
        plot_args: PlotArgs,
    },
}

/// Area, time window and catalog filters shared by `search` and `fetch`.
#[derive(Args)]
struct SceneQuery {
    /// First corner X (longitude)
    #[arg(allow_hyphen_values = true)]
    x1: f64,
    /// First corner Y (latitude)
    #[arg(allow_hyphen_values = true)]
    y1: f64,
    /// Opposite corner X (longitude)
    #[arg(allow_hyphen_values = true)]
    x2: f64,
    /// Opposite corner Y (latitude)
    #[arg(allow_hyphen_values = true)]
    y2: f64,
    /// RFC 3339 datetime or range, e.g. 2024-06-01/2024-06-30
    date_range: String,
    /// Catalog: `es` (Earth Search), `pc` (Planetary Computer) or a STAC API URL
    #[arg(short, long, env = "VERDEX_CATALOG", default_value = "es")]
    catalog: String,
    /// Collection to search
    #[arg(long, default_value = "sentinel-2-l2a")]
    collection: String,
    /// Only scenes with cloud cover strictly below this percentage
    #[arg(long, default_value = "5")]
    cloud_tolerance: f64,
    /// Maximum catalog items to consider
    #[arg(long, default_value = "100")]
    max_items: usize,
    #[command(flatten)]
    bands: BandKeys,
}

#[derive(Args)]
struct BandKeys {
    /// Asset key of the red band
    #[arg(long, default_value = "red")]
    red_key: String,
    /// Asset key of the near-infrared band
    #[arg(long, default_value = "nir")]
    nir_key: String,
}

#[derive(Args)]
struct PlotArgs {
    /// Color scheme for the plot (RdYlGn, NDVI, Divergent, Grayscale)
    #[arg(long, default_value = "RdYlGn")]
    scheme: String,
    /// Leave the colorbar off the plot
    #[arg(long)]
    no_colorbar: bool,
    /// Stretch colors over the data range instead of [-1, 1]
    #[arg(long)]
    auto_range: bool,
}

impl SceneQuery {
    fn target(&self) -> Result<BoundingBox> {
        BoundingBox::from_corners(self.x1, self.y1, self.x2, self.y2)
            .context("Invalid bounding box")
    }

    fn fetcher(&self, output_root: PathBuf, thumbnail: bool) -> Result<SceneFetcherBlocking> {
        let catalog = StacCatalog::from_str_or_url(&self.catalog);
        let client_options = StacClientOptions {
            max_items: self.max_items,
            ..StacClientOptions::default()
        };
        let options = FetchOptions {
            collections: vec![self.collection.clone()],
            cloud_tolerance: self.cloud_tolerance,
            output_root,
            assets: FetchAssets {
                red: self.bands.red_key.clone(),
                nir: self.bands.nir_key.clone(),
                thumbnail: thumbnail.then(|| "thumbnail".to_string()),
            },
            ..FetchOptions::default()
        };
        info!("Catalog: {}", catalog);
        SceneFetcherBlocking::new(catalog, client_options, options)
            .context("Failed to create catalog client")
    }
}

impl PlotArgs {
    fn params(&self, index: &Raster<f32>) -> Result<ColormapParams> {
        let scheme = ColorScheme::from_name(&self.scheme)
            .with_context(|| format!("Unknown color scheme: {}", self.scheme))?;
        if self.auto_range {
            return Ok(auto_params(index, scheme));
        }
        Ok(ColormapParams {
            scheme,
            ..ColormapParams::ndvi()
        })
    }

    fn options(&self) -> PngOptions {
        PngOptions {
            colorbar: !self.no_colorbar,
            ..PngOptions::default()
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_band(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner(&format!("Reading {}...", path.display()));
    let raster: Raster<f64> = read_geotiff(path)
        .with_context(|| format!("Failed to read band {}", path.display()))?;
    pb.finish_and_clear();
    info!("Band {}: {} x {}", path.display(), raster.cols(), raster.rows());
    Ok(raster)
}

/// NDVI on the red band's grid.
fn compute_ndvi(nir: &Raster<f64>, red: &Raster<f64>) -> Result<Raster<f32>> {
    let pb = spinner("Computing NDVI...");
    let index = ndvi(nir, red).context("Failed to compute NDVI")?;
    let index = red.with_same_meta(index.into_array())?;
    pb.finish_and_clear();
    Ok(index)
}

fn write_outputs(
    index: &Raster<f32>,
    output: &Path,
    plot: Option<(&Path, &PlotArgs)>,
) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(index, output, None).context("Failed to write output")?;
    pb.finish_and_clear();
    println!("NDVI image saved to: {}", output.display());

    if let Some((plot_path, args)) = plot {
        let pb = spinner("Rendering plot...");
        write_png(index, &args.params(index)?, &args.options(), plot_path)
            .context("Failed to write plot")?;
        pb.finish_and_clear();
        println!("NDVI plot saved to: {}", plot_path.display());
    }
    Ok(())
}

fn print_index_summary(index: &Raster<f32>) {
    let stats = index.statistics();
    if let (Some(min), Some(max), Some(mean)) = (stats.min, stats.max, stats.mean) {
        println!("  NDVI range: [{:.4}, {:.4}], mean {:.4}", min, max, mean);
    }
}

fn done(elapsed: std::time::Duration) {
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let raster = read_band(&input)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
            );
            if let Some(crs) = raster.crs() {
                println!("CRS: {}", crs);
            }
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let (Some(min), Some(max), Some(mean)) = (stats.min, stats.max, stats.mean) {
                println!("  Min: {:.4}", min);
                println!("  Max: {:.4}", max);
                println!("  Mean: {:.4}", mean);
            }
            println!("  Valid cells: {}", stats.valid_count);
            println!("  NoData cells: {}", stats.nodata_count);
        }

        // ── Search ───────────────────────────────────────────────────
        Commands::Search { query, top } => {
            let target = query.target()?;
            let fetcher = query.fetcher(PathBuf::from("."), false)?;

            let pb = spinner("Searching catalog...");
            let scenes = fetcher
                .search(&target, &query.date_range)
                .context("Catalog search failed")?;
            pb.finish_and_clear();

            let ranked = rank_scenes(&target, &scenes)?;
            println!("Found {} scenes", ranked.len());
            for (rank, scored) in ranked.iter().take(top).enumerate() {
                println!(
                    "{:>3}. {}  {}  cloud {:>5.2}%  overlap {:.6}",
                    rank + 1,
                    scored.scene.id,
                    scored.scene.acquired.format("%Y-%m-%d %H:%M:%S"),
                    scored.scene.cloud_cover,
                    scored.overlap_area
                );
            }
        }

        // ── Fetch ────────────────────────────────────────────────────
        Commands::Fetch {
            query,
            output_root,
            no_thumbnail,
        } => {
            let target = query.target()?;
            let fetcher = query.fetcher(output_root, !no_thumbnail)?;
            let start = Instant::now();

            let pb = spinner("Searching and downloading...");
            let fetched = fetcher
                .fetch(&target, &query.date_range)
                .context("Scene acquisition failed")?;
            pb.finish_and_clear();

            match fetched {
                Some(fetched) => {
                    let scene = &fetched.scene;
                    println!("Best matching scene: {}", scene.id);
                    println!("  Datetime: {}", scene.acquired.to_rfc3339());
                    println!("  Cloud cover: {}", scene.cloud_cover);
                    println!("  Bounding box overlap: {}", fetched.overlap_area);
                    println!("  Metadata: {}", fetched.metadata_path.display());
                    for (key, path) in &fetched.assets {
                        println!("  {}: {}", key, path.display());
                    }
                    println!("Data saved in directory: {}", fetched.dir.display());
                    done(start.elapsed());
                }
                None => println!("No suitable scene found."),
            }
        }

        // ── Analyze ──────────────────────────────────────────────────
        Commands::Analyze {
            data_dir,
            bands,
            plot,
        } => {
            let base = data_dir
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("No scene id in path {}", data_dir.display()))?
                .to_string();
            let band_path = |suffix: &str| data_dir.join(format!("{base}_{suffix}"));
            let start = Instant::now();

            let red = read_band(&band_path(&format!("{}.tif", bands.red_key)))?;
            let nir = read_band(&band_path(&format!("{}.tif", bands.nir_key)))?;
            let index = compute_ndvi(&nir, &red)?;

            let output = band_path("NDVI.tif");
            let plot_path = band_path("NDVI_plot.png");
            write_outputs(&index, &output, Some((&plot_path, &plot)))?;
            print_index_summary(&index);
            done(start.elapsed());
        }

        // ── NDVI ─────────────────────────────────────────────────────
        Commands::Ndvi {
            nir,
            red,
            output,
            plot,
            plot_args,
        } => {
            let start = Instant::now();
            let red = read_band(&red)?;
            let nir = read_band(&nir)?;
            let index = compute_ndvi(&nir, &red)?;

            write_outputs(&index, &output, plot.as_deref().map(|p| (p, &plot_args)))?;
            print_index_summary(&index);
            done(start.elapsed());
        }
    }

    Ok(())
}
