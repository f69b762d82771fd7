use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use parkmap::api::{fetch_parking, geocode_postcode};
use parkmap::config::FileConfig;
use parkmap::domain::{ParkingCategory, ParkingFacility};
use parkmap::map::{render_map, write_map};
use parkmap::parking::interpret_parking;
use parkmap::postcode::validate_postcode;

/// Find and map nearby parking for a UK postcode
///
/// Examples:
///   # Map parking around Buckingham Palace
///   parkmap "SW1A 1AA"
///
///   # Wider search, custom output file
///   parkmap "M1 1AE" -r 2000 -o manchester.html
///
///   # Use coordinates directly
///   parkmap --lat 51.5014 --lon -0.1419
///
///   # Use a config file
///   parkmap --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "parkmap")]
#[command(version, about, long_about = None)]
struct Args {
    /// UK postcode to search around (optional if --lat and --lon are provided)
    postcode: Option<String>,

    /// Path to config file (optional, auto-searches parkmap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Latitude for direct coordinate input (use with --lon)
    #[arg(long, requires = "lon")]
    lat: Option<f64>,

    /// Longitude for direct coordinate input (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Search radius in meters
    #[arg(short = 'r', long, default_value = "1000")]
    radius: u32,

    /// Output HTML file path (defaults to parking_map.html)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            Some(toml::from_str(&contents).context("Failed to parse config file")?)
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load()
    };

    let postcode = args
        .postcode
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.postcode.clone()));
    let lat = args
        .lat
        .or_else(|| file_config.as_ref().and_then(|c| c.lat));
    let lon = args
        .lon
        .or_else(|| file_config.as_ref().and_then(|c| c.lon));
    let radius = if args.radius != 1000 {
        args.radius
    } else {
        file_config.as_ref().map(|c| c.radius).unwrap_or(1000)
    };
    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);
    let output = args
        .output
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output.clone()))
        .unwrap_or_else(|| PathBuf::from("parking_map.html"));

    let overpass_config = file_config
        .as_ref()
        .and_then(|c| c.overpass.clone())
        .unwrap_or_default();

    if postcode.is_none() && lat.is_none() {
        bail!("Must provide either a postcode, or --lat and --lon");
    }

    println!("parkmap - UK Parking Finder");
    println!("===========================");
    println!();

    if verbose {
        println!("Configuration:");
        if let Some(ref p) = postcode {
            println!("  Postcode: {}", p);
        }
        if let Some(lt) = lat {
            println!("  Coordinates: ({:.4}, {:.4})", lt, lon.unwrap());
        }
        println!("  Radius: {}m", radius);
        println!("  Output: {}", output.display());
        println!("  Overpass mirrors: {}", overpass_config.urls.len());
        println!();
    }

    let center = if let (Some(lt), Some(ln)) = (lat, lon) {
        println!("Using provided coordinates: ({:.4}, {:.4})", lt, ln);
        (lt, ln)
    } else {
        let p = postcode.as_ref().unwrap();
        if !validate_postcode(p) {
            bail!("'{}' is not a valid UK postcode", p);
        }

        let spinner = create_spinner("Geocoding postcode...");
        let start = Instant::now();
        let coords =
            geocode_postcode(p).context("Could not find location for this postcode")?;
        spinner.finish_with_message(format!(
            "Geocoded: {} -> ({:.4}, {:.4}) [{:.1}s]",
            p,
            coords.0,
            coords.1,
            start.elapsed().as_secs_f32()
        ));
        coords
    };

    // Parking data failure never blocks the map; degrade to no markers
    let spinner = create_spinner("Fetching parking data from OpenStreetMap...");
    let start = Instant::now();
    let facilities = match fetch_parking(center, radius, &overpass_config) {
        Ok(response) => {
            spinner.finish_with_message(format!(
                "Fetched {} parking elements [{:.1}s]",
                response.elements.len(),
                start.elapsed().as_secs_f32()
            ));
            interpret_parking(&response)
        }
        Err(e) => {
            spinner.finish_with_message("Parking data unavailable".to_string());
            eprintln!("Warning: failed to fetch parking data: {}", e);
            Vec::new()
        }
    };

    if verbose {
        println!("  Interpreted {} parking facilities", facilities.len());
    }

    let spinner = create_spinner("Rendering map...");
    let start = Instant::now();
    let html = render_map(center, radius, &facilities);
    write_map(&output, &html).context("Failed to write map file")?;
    spinner.finish_with_message(format!(
        "Wrote {} ({:.1} KB) [{:.1}s]",
        output.display(),
        html.len() as f64 / 1024.0,
        start.elapsed().as_secs_f32()
    ));

    println!();
    print_summary(&facilities);
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Open {} in a browser to view the map.", output.display());

    Ok(())
}

fn print_summary(facilities: &[ParkingFacility]) {
    if facilities.is_empty() {
        println!("No parking found in the search area.");
        println!();
        return;
    }

    let categories = [
        ParkingCategory::Surface,
        ParkingCategory::Underground,
        ParkingCategory::MultiStorey,
        ParkingCategory::Street,
        ParkingCategory::Unknown,
    ];

    println!("Parking found: {} locations", facilities.len());
    for category in categories {
        let count = facilities.iter().filter(|f| f.category == category).count();
        if count > 0 {
            println!("  {}: {}", category.label(), count);
        }
    }

    let total_capacity: u32 = facilities.iter().filter_map(|f| f.capacity).sum();
    if total_capacity > 0 {
        println!("  Tagged capacity: {} spaces", total_capacity);
    }
    println!();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
