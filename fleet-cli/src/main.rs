#![deny(missing_docs)]
//! Fleet registry command-line interface.
//!
//! Lists, counts, creates, edits and deletes ships on a running registry
//! server.

mod client;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::{DEFAULT_SERVER_URL, FleetClient};
use fleet_core::{Ship, ShipDraft, ShipId, ShipOrder, ShipQuery, ShipType, timestamp_from_millis};
use std::fmt::Write;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "fleet", version, about = "Fleet registry CLI")]
struct Cli {
    /// Base URL of the fleet registry server.
    #[arg(long, global = true, env = "FLEET_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OrderArg {
    Id,
    Speed,
    Date,
    Rating,
}

impl From<OrderArg> for ShipOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Id => ShipOrder::Id,
            OrderArg::Speed => ShipOrder::Speed,
            OrderArg::Date => ShipOrder::Date,
            OrderArg::Rating => ShipOrder::Rating,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Substring of the ship name.
    #[arg(long)]
    name: Option<String>,
    /// Substring of the planet.
    #[arg(long)]
    planet: Option<String>,
    /// Exact ship type (transport, military, merchant).
    #[arg(long)]
    ship_type: Option<ShipType>,
    /// Earliest production date.
    #[arg(long, value_parser = parse_date)]
    after: Option<DateTime<Utc>>,
    /// Latest production date.
    #[arg(long, value_parser = parse_date)]
    before: Option<DateTime<Utc>>,
    /// Used flag.
    #[arg(long)]
    used: Option<bool>,
    /// Minimum speed.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Maximum speed.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Minimum crew size.
    #[arg(long)]
    min_crew_size: Option<i32>,
    /// Maximum crew size.
    #[arg(long)]
    max_crew_size: Option<i32>,
    /// Minimum rating.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Maximum rating.
    #[arg(long)]
    max_rating: Option<f64>,
}

impl FilterArgs {
    fn to_query(&self) -> ShipQuery {
        ShipQuery {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            after: self.after.map(|date| date.timestamp_millis()),
            before: self.before.map(|date| date.timestamp_millis()),
            is_used: self.used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            ..ShipQuery::default()
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct PageArgs {
    /// Sort key.
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Zero-based page index.
    #[arg(long)]
    page_number: Option<u32>,
    /// Ships per page.
    #[arg(long)]
    page_size: Option<u32>,
}

#[derive(Args, Clone, Debug, Default)]
struct ShipArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (transport, military, merchant).
    #[arg(long)]
    ship_type: Option<ShipType>,
    /// Production date as epoch millis, YYYY-MM-DD or RFC 3339.
    #[arg(long, value_parser = parse_date)]
    prod_date: Option<DateTime<Utc>>,
    /// Whether the ship had a previous owner.
    #[arg(long)]
    used: Option<bool>,
    /// Cruise speed.
    #[arg(long)]
    speed: Option<f64>,
    /// Crew size.
    #[arg(long)]
    crew_size: Option<i32>,
}

impl From<ShipArgs> for ShipDraft {
    fn from(args: ShipArgs) -> Self {
        Self {
            name: args.name,
            planet: args.planet,
            ship_type: args.ship_type,
            prod_date: args.prod_date,
            used: args.used,
            speed: args.speed,
            crew_size: args.crew_size,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of ships matching the filters.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one ship.
    Get {
        /// Ship identifier.
        #[arg(value_parser = parse_ship_id)]
        id: ShipId,
    },
    /// Register a new ship.
    Create(ShipArgs),
    /// Overwrite the given fields of a ship.
    Edit {
        /// Ship identifier.
        #[arg(value_parser = parse_ship_id)]
        id: ShipId,
        #[command(flatten)]
        ship: ShipArgs,
    },
    /// Delete a ship.
    Delete {
        /// Ship identifier.
        #[arg(value_parser = parse_ship_id)]
        id: ShipId,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = FleetClient::new(&cli.server_url)?;
    let output = run_command(&client, cli.command, cli.format).await?;
    print!("{output}");
    Ok(())
}

async fn run_command(
    client: &FleetClient,
    command: Commands,
    format: OutputFormat,
) -> CliResult<String> {
    match command {
        Commands::List { filter, page } => {
            let query = ShipQuery {
                order: page.order.map(ShipOrder::from),
                page_number: page.page_number,
                page_size: page.page_size,
                ..filter.to_query()
            };
            let ships = client.list(&query).await?;
            match format {
                OutputFormat::Text => Ok(render_ships_text(&ships)),
                OutputFormat::Json => render_json(&ships),
            }
        }
        Commands::Count { filter } => {
            let count = client.count(&filter.to_query()).await?;
            match format {
                OutputFormat::Text => Ok(format!("{count} ships\n")),
                OutputFormat::Json => render_json(&count),
            }
        }
        Commands::Get { id } => {
            let ship = client.get(id).await?;
            render_ship(&ship, format)
        }
        Commands::Create(args) => {
            let ship = client.create(&ShipDraft::from(args)).await?;
            render_ship(&ship, format)
        }
        Commands::Edit { id, ship } => {
            let ship = client.edit(id, &ShipDraft::from(ship)).await?;
            render_ship(&ship, format)
        }
        Commands::Delete { id } => {
            client.delete(id).await?;
            match format {
                OutputFormat::Text => Ok(format!("Deleted ship {id}\n")),
                OutputFormat::Json => render_json(&serde_json::json!({ "deleted": id })),
            }
        }
    }
}

/// Parse a ship identifier with the registry's id rules.
fn parse_ship_id(raw: &str) -> Result<ShipId, String> {
    fleet_core::parse_id(Some(raw)).map_err(|err| err.to_string())
}

/// Parse a date given as epoch millis, `YYYY-MM-DD` (UTC midnight) or RFC 3339.
fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return timestamp_from_millis(millis).map_err(|err| err.to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| format!("expected epoch millis, YYYY-MM-DD or an RFC 3339 date, got {raw:?}"))
}

fn render_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<String> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}

fn render_ship(ship: &Ship, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(render_ship_text(ship)),
        OutputFormat::Json => render_json(ship),
    }
}

fn render_ship_text(ship: &Ship) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "#{} {}", ship.id, ship.name);
    let _ = writeln!(output, "  Planet: {}", ship.planet);
    let _ = writeln!(output, "  Type: {}", ship.ship_type);
    let _ = writeln!(output, "  Produced: {}", ship.prod_date.format("%Y-%m-%d"));
    let _ = writeln!(output, "  Used: {}", if ship.used { "yes" } else { "no" });
    let _ = writeln!(output, "  Speed: {}", ship.speed);
    let _ = writeln!(output, "  Crew: {}", ship.crew_size);
    let _ = writeln!(output, "  Rating: {:.2}", ship.rating);
    output
}

fn render_ships_text(ships: &[Ship]) -> String {
    if ships.is_empty() {
        return "No ships found.\n".to_string();
    }
    let mut output = String::new();
    for ship in ships {
        output.push_str(&render_ship_text(ship));
    }
    output
}
