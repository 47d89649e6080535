use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use skylane_lib::{
    compute_flight_stats, plan_flight, CityAtlas, FlightRequest, FlightStatsRequest, PlaneCatalog,
    UnitStore, UpgradeLevel, Upgrades,
};

#[derive(Parser, Debug)]
#[command(version, about = "Flight routing and unit conversion utilities")]
struct Cli {
    /// Override the built-in city table with a CSV file.
    #[arg(long)]
    cities_file: Option<PathBuf>,

    /// Override the built-in plane table with a CSV file.
    #[arg(long)]
    planes_file: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the shortest flight path between two cities.
    Route {
        /// City to start from.
        #[arg(long = "from")]
        from: String,
        /// Target city.
        #[arg(long = "to")]
        to: String,
        /// Plane to use for the flight.
        #[arg(long)]
        plane: String,
        /// Range upgrade level to use (0-4).
        #[arg(long, default_value_t = 0)]
        range_upgrade: i64,
    },
    /// Calculate the stats of a flight along an explicit city path.
    Flight {
        /// Comma separated list of cities.
        #[arg(long)]
        cities: String,
        /// Plane to use for the flight.
        #[arg(long)]
        plane: String,
        /// Range upgrade level (0-4).
        #[arg(long, default_value_t = 0)]
        range_upgrade: i64,
        /// Speed upgrade level (0-4).
        #[arg(long, default_value_t = 0)]
        speed_upgrade: i64,
        /// Weight upgrade level (0-4).
        #[arg(long, default_value_t = 0)]
        weight_upgrade: i64,
    },
    /// Convert a measure from one unit to another.
    Convert {
        /// Value or amount to convert.
        value: f64,
        /// Unit to convert from.
        from: String,
        /// Unit to convert to.
        to: String,
    },
    /// List all supported units.
    Units,
    /// Straight-line distance between two cities.
    Distance {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let format = cli.format;

    let atlas = load_atlas(cli.cities_file.as_deref())?;
    let catalog = load_catalog(cli.planes_file.as_deref())?;

    match cli.command {
        Command::Route {
            from,
            to,
            plane,
            range_upgrade,
        } => handle_route(&atlas, &catalog, format, &from, &to, &plane, range_upgrade),
        Command::Flight {
            cities,
            plane,
            range_upgrade,
            speed_upgrade,
            weight_upgrade,
        } => handle_flight(
            &atlas,
            &catalog,
            format,
            &cities,
            &plane,
            range_upgrade,
            speed_upgrade,
            weight_upgrade,
        ),
        Command::Convert { value, from, to } => handle_convert(format, value, &from, &to),
        Command::Units => handle_units(format),
        Command::Distance { from, to } => handle_distance(&atlas, format, &from, &to),
    }
}

fn load_atlas(path: Option<&Path>) -> Result<CityAtlas> {
    match path {
        Some(path) => CityAtlas::from_path(path)
            .with_context(|| format!("failed to load city table from {}", path.display())),
        None => Ok(CityAtlas::builtin().clone()),
    }
}

fn load_catalog(path: Option<&Path>) -> Result<PlaneCatalog> {
    match path {
        Some(path) => PlaneCatalog::from_path(path)
            .with_context(|| format!("failed to load plane table from {}", path.display())),
        None => Ok(PlaneCatalog::builtin().clone()),
    }
}

fn handle_route(
    atlas: &CityAtlas,
    catalog: &PlaneCatalog,
    format: OutputFormat,
    from: &str,
    to: &str,
    plane: &str,
    range_upgrade: i64,
) -> Result<()> {
    let request = FlightRequest {
        origin: from.to_string(),
        destination: to.to_string(),
        plane: plane.to_string(),
        range_upgrade: UpgradeLevel::new(range_upgrade)?,
    };
    let plan = plan_flight(atlas, catalog, &request)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => {
            println!(
                "Using the {} with a range upgrade of {} ({} mi.), the best path is:",
                plan.plane, range_upgrade, plan.effective_range
            );
            println!("{}", plan.steps.join(" -> "));
            println!(
                "Total distance: {} mi. over {} hop(s)",
                plan.total_distance,
                plan.hop_count()
            );
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_flight(
    atlas: &CityAtlas,
    catalog: &PlaneCatalog,
    format: OutputFormat,
    cities: &str,
    plane: &str,
    range_upgrade: i64,
    speed_upgrade: i64,
    weight_upgrade: i64,
) -> Result<()> {
    let request = FlightStatsRequest {
        cities: cities
            .split(',')
            .map(|city| city.trim().to_string())
            .collect(),
        plane: plane.to_string(),
        upgrades: Upgrades {
            range: UpgradeLevel::new(range_upgrade)?,
            speed: UpgradeLevel::new(speed_upgrade)?,
            weight: UpgradeLevel::new(weight_upgrade)?,
        },
    };
    let stats = compute_flight_stats(atlas, catalog, &request)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            println!(
                "Flight stats for the {} along {}",
                stats.plane,
                stats.path.join(" -> ")
            );
            println!(
                "Profit: {} (gain {} / loss {})",
                stats.profit, stats.payout, stats.loss
            );
            println!("Profit per hour: {:.2}", stats.profit_per_hour);
            println!(
                "Total distance: {} mi. (longest leg {} mi.)",
                stats.total_distance, stats.longest_leg
            );
            println!(
                "Flight time: {}",
                format_flight_time(stats.flight_time_seconds)
            );
            println!(
                "Range ({}): {}  Speed ({}): {}  Weight ({}): {:.1}",
                range_upgrade,
                stats.effective_range,
                speed_upgrade,
                stats.effective_speed,
                weight_upgrade,
                stats.effective_weight
            );
        }
    }

    Ok(())
}

fn handle_convert(format: OutputFormat, value: f64, from: &str, to: &str) -> Result<()> {
    let conversion = UnitStore::builtin().convert(value, from, to)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&conversion)?),
        OutputFormat::Text => println!(
            "{} {} is {} {}",
            conversion.value, conversion.from.name, conversion.converted, conversion.to.name
        ),
    }

    Ok(())
}

fn handle_units(format: OutputFormat) -> Result<()> {
    let store = UnitStore::builtin();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&store.unit_list())?),
        OutputFormat::Text => {
            for category in store.categories() {
                println!("{category}:");
                for unit in store
                    .unit_list()
                    .into_iter()
                    .filter(|unit| unit.category == category)
                {
                    if unit.aliases.is_empty() {
                        println!("  {}", unit.name);
                    } else {
                        println!("  {} ({})", unit.name, unit.aliases.join(", "));
                    }
                }
            }
        }
    }

    Ok(())
}

fn handle_distance(atlas: &CityAtlas, format: OutputFormat, from: &str, to: &str) -> Result<()> {
    let from_city = atlas.resolve(from)?;
    let to_city = atlas.resolve(to)?;
    let distance = from_city.distance_to(to_city);

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "from": from_city.name,
                "to": to_city.name,
                "distance": distance,
            }))?
        ),
        OutputFormat::Text => println!(
            "{} to {}: {} mi.",
            from_city.name, to_city.name, distance
        ),
    }

    Ok(())
}

fn format_flight_time(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds - hours as f64 * 3600.0) / 60.0).floor() as u64;
    if hours > 0 {
        format!("{hours}h {minutes}min")
    } else {
        format!("{minutes}min")
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
