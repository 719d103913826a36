//! Command-line driver for crosswalk marking.
//!
//! Loads the municipal boundary, prints the grid overlay, and records
//! crosswalk points into the CSV store.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crosswalk::grid::GridTiler;
use crosswalk::{boundary, GeoPoint, PointStore, Region, Session};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "crosswalk")]
#[command(about = "Mark crosswalk coordinates inside a municipal boundary")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Boundary GeoJSON (overrides config)
    #[arg(long)]
    boundary: Option<PathBuf>,

    /// Point CSV file (overrides config)
    #[arg(long)]
    points: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the grid cells overlapping the boundary
    Grid {
        /// Cell side in degrees
        #[arg(long)]
        size: Option<f64>,

        #[arg(long, value_enum, default_value_t = Format::Geojson)]
        format: Format,
    },
    /// Register a crosswalk point and save the store
    Mark {
        #[arg(long, allow_hyphen_values = true, value_parser = parse_coordinate)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true, value_parser = parse_coordinate)]
        lon: f64,
    },
    /// Print stored points
    List,
    /// Summarize the boundary and the point store
    Info,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Geojson,
    Csv,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(path) = args.boundary {
        config.boundary.path = path;
    }
    if let Some(path) = args.points {
        config.store.path = path;
    }

    match args.command {
        Command::Grid { size, format } => run_grid(&config, size.unwrap_or(config.grid.size), format),
        Command::Mark { lat, lon } => run_mark(&config, GeoPoint::new(lat, lon)),
        Command::List => run_list(&config),
        Command::Info => run_info(&config),
    }
}

/// Parse a coordinate flag, refusing NaN and infinities which the store
/// could not read back.
fn parse_coordinate(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite coordinate", raw));
    }
    Ok(value)
}

fn load_region(config: &Config) -> Result<Region> {
    boundary::load_file(&config.boundary.path).with_context(|| {
        format!(
            "Failed to load boundary {}",
            config.boundary.path.display()
        )
    })
}

fn run_grid(config: &Config, size: f64, format: Format) -> Result<()> {
    let region = load_region(config)?;
    let cells = GridTiler::with_max_cells(config.grid.max_cells)
        .tile(&region, size)
        .context("Failed to tile boundary")?;

    match format {
        Format::Geojson => {
            println!("{}", serde_json::to_string(&cells.to_feature_collection())?);
        }
        Format::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["min_lon", "min_lat", "max_lon", "max_lat"])?;
            for cell in &cells {
                let (min_x, min_y, max_x, max_y) = cell.bounds();
                writer.serialize((min_x, min_y, max_x, max_y))?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}

fn run_mark(config: &Config, point: GeoPoint) -> Result<()> {
    // Outside points are still accepted, only flagged
    match load_region(config) {
        Ok(region) if !region.covers(&point) => {
            warn!("{} lies outside the boundary", point);
        }
        Ok(_) => {}
        Err(e) => warn!("Skipping boundary check: {:#}", e),
    }

    let store = config.store.point_store();
    let registry = store.load().context("Failed to load points")?;
    let mut session = Session::with_center(registry, config.session.center());

    if mark_point(&mut session, &store, point)? {
        info!("Saved {} ({} total)", point, session.registry().len());
    } else {
        info!("{} is already saved", point);
    }

    Ok(())
}

/// Click and confirm `point`, saving the store only when it was new.
fn mark_point(session: &mut Session, store: &PointStore, point: GeoPoint) -> Result<bool> {
    session.click(point);
    let was_new = session.confirm();
    if was_new {
        store
            .save(session.registry())
            .context("Failed to save points")?;
    }
    Ok(was_new)
}

fn run_list(config: &Config) -> Result<()> {
    let registry = config
        .store
        .point_store()
        .load()
        .context("Failed to load points")?;

    for (i, point) in registry.iter().enumerate() {
        println!("{}\t{}", i, point);
    }
    Ok(())
}

fn run_info(config: &Config) -> Result<()> {
    let region = load_region(config)?;
    let bbox = region.bbox();
    println!("boundary: {}", config.boundary.path.display());
    println!("polygons: {}", region.polygon_count());
    println!(
        "bbox: {}, {} - {}, {}",
        bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y
    );
    if let Some(c) = region.centroid() {
        println!("centroid: {}", c);
    }

    let registry = config
        .store
        .point_store()
        .load()
        .context("Failed to load points")?;
    let inside = registry.iter().filter(|p| region.covers(p)).count();
    println!(
        "points: {} ({} inside boundary)",
        registry.len(),
        inside
    );
    Ok(())
}
