use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use trails_tin::{
    build_tin,
    io::{
        geojson::{boundaries_to_geojson, contours_to_geojson},
        landxml::{read_landxml_surface, write_landxml_surface},
        read_points_csv, write_string,
    },
    GeoOrigin, PlanarPointSet, QualityFilter, TinConfig, TinMesh,
};

/// Command line interface for building terrain surfaces and deriving
/// contours and boundaries from them.
#[derive(Parser)]
#[command(name = "trails_tin_cli", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Triangulate a CSV file of x,y,z points into a LandXML surface. The
    /// surface is stored relative to the first point, whose position is
    /// saved next to it as `<name>.origin.json`.
    Build {
        input: String,
        #[arg(long)]
        output: String,
        /// JSON file with surface settings
        #[arg(long)]
        config: Option<String>,
        /// Longest edge kept in the surface
        #[arg(long)]
        max_length: Option<f64>,
        /// Largest interior angle kept in the surface, in degrees
        #[arg(long)]
        max_angle: Option<f64>,
    },
    /// Extract major and minor contours of a LandXML surface to GeoJSON.
    Contours {
        input: String,
        #[arg(long)]
        output: String,
        #[arg(long)]
        major: Option<f64>,
        #[arg(long)]
        minor: Option<f64>,
    },
    /// Extract the boundary loops of a LandXML surface to GeoJSON.
    Boundary {
        input: String,
        #[arg(long)]
        output: String,
    },
    /// Print point and triangle counts of a LandXML surface.
    Info { input: String },
}

fn load_config(path: Option<&str>) -> Result<TinConfig, String> {
    match path {
        Some(p) => TinConfig::load(p).map_err(|e| format!("Error reading {}: {}", p, e)),
        None => Ok(TinConfig::default()),
    }
}

fn origin_path(surface: &str) -> String {
    Path::new(surface)
        .with_extension("origin.json")
        .to_string_lossy()
        .into_owned()
}

fn load_origin(surface: &str) -> Result<GeoOrigin, String> {
    let path = origin_path(surface);
    if !Path::new(&path).exists() {
        log::debug!("no origin file next to {}, using the default origin", surface);
        return Ok(GeoOrigin::default());
    }
    GeoOrigin::load(&path).map_err(|e| format!("Error reading {}: {}", path, e))
}

fn read_surface(path: &str) -> Result<TinMesh, String> {
    read_landxml_surface(path).map_err(|e| format!("Error reading {}: {}", path, e))
}

fn write_output(path: &str, contents: &str) -> Result<(), String> {
    write_string(path, contents).map_err(|e| format!("Error writing {}: {}", path, e))?;
    log::info!("wrote {}", path);
    Ok(())
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Build {
            input,
            output,
            config,
            max_length,
            max_angle,
        } => {
            let cfg = load_config(config.as_deref())?;
            let filter = QualityFilter {
                max_edge_length: max_length.unwrap_or(cfg.max_edge_length),
                max_angle: max_angle.unwrap_or(cfg.max_angle),
            };
            let points =
                read_points_csv(&input).map_err(|e| format!("Error reading {}: {}", input, e))?;
            let mut slot = None;
            let origin = match points.first() {
                Some(&first) => GeoOrigin::get_or_init(&mut slot, first).clone(),
                None => GeoOrigin::default(),
            };
            let local = PlanarPointSet::from_global(&points, &origin);
            let mesh = build_tin(local.as_slice(), &filter).map_err(|e| format!("Error: {}", e))?;
            write_landxml_surface(&output, &mesh)
                .map_err(|e| format!("Error writing {}: {}", output, e))?;
            log::info!("wrote {}", output);
            let origin_file = origin_path(&output);
            origin
                .save(&origin_file)
                .map_err(|e| format!("Error writing {}: {}", origin_file, e))?;
            log::info!("wrote {}", origin_file);
            println!("Triangles: {}", mesh.triangle_count());
        }
        Commands::Contours {
            input,
            output,
            major,
            minor,
        } => {
            let mesh = read_surface(&input)?;
            let origin = load_origin(&input)?;
            let cfg = match minor {
                Some(m) => TinConfig::default().with_minor_interval(m),
                None => TinConfig::default(),
            };
            let major = major.unwrap_or(cfg.major_interval);
            let minor = cfg.minor_interval;
            if !(minor.is_finite() && minor > 0.0) {
                return Err(format!("Error: minor interval must be positive, got {}", minor));
            }
            let set = mesh.extract_contours(major, minor);
            write_output(&output, &contours_to_geojson(&set, &origin))?;
            println!("Major: {}, Minor: {}", set.major.len(), set.minor.len());
        }
        Commands::Boundary { input, output } => {
            let mesh = read_surface(&input)?;
            let origin = load_origin(&input)?;
            let loops = mesh.extract_boundary();
            write_output(&output, &boundaries_to_geojson(&loops, &origin))?;
            println!("Loops: {}", loops.len());
        }
        Commands::Info { input } => {
            let mesh = read_surface(&input)?;
            let origin = load_origin(&input)?;
            println!(
                "Origin: {} ({:.3}, {:.3})",
                origin.zone, origin.origin.x, origin.origin.y
            );
            println!("Points: {}", mesh.point_count());
            println!("Triangles: {}", mesh.triangle_count());
            if let Some((lo, hi)) = mesh.elevation_range() {
                println!("Elevation: {:.3} to {:.3}", lo, hi);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{}", msg);
            ExitCode::FAILURE
        }
    }
}
