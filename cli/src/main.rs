//! Corral command line client
//!
//! Usage:
//!   corral ping
//!   corral watch --interval-ms 5000 --count 10
//!   corral pins
//!   corral token set <TOKEN>

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use corral_cli::commands;
use corral_cli::{Args, Command, TokenAction};
use corral_map::Placement;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = args.resolve_config()?;

    match args.command {
        Command::Ping => {
            let report = commands::ping(&config).await?;
            let state = if report.connected { "connected" } else { "disconnected" };
            println!("{} {state} ({}ms)", config.client.base_url, report.latency_ms);
        }
        Command::Watch { count, .. } => {
            let print = |status: &corral_sync::ConnectionStatus| {
                let checked = status
                    .last_check
                    .map_or_else(|| "-".to_string(), |t| t.format("%H:%M:%S").to_string());
                let state = if status.is_connected { "connected" } else { "disconnected" };
                println!("[{checked}] {state} ({}ms)", status.latency_ms);
            };
            tokio::select! {
                result = commands::watch(&config, count, print) => result?,
                _ = tokio::signal::ctrl_c() => info!("Stopped"),
            }
        }
        Command::Pins => {
            let listing = commands::pins(&config, Utc::now()).await?;
            println!("{} pins ({} data)", listing.report.pins, listing.source);
            for row in &listing.rows {
                let cell = match row.placement {
                    Placement::Grid { column, row, .. } => format!("{column},{row}"),
                    Placement::Geo { lat, lng } => format!("{lat:.5},{lng:.5}"),
                };
                println!(
                    "  {:<12} cell {:<6} {} {:<5} {:.5},{:.5}",
                    row.pin.label,
                    cell,
                    row.color,
                    row.bucket.label(),
                    row.pin.coordinate.lat,
                    row.pin.coordinate.lng,
                );
            }
        }
        Command::Token { action } => match action {
            TokenAction::Set { token } => {
                let path = commands::token_set(&config, &token)?;
                println!("Token stored in {}", path.display());
            }
            TokenAction::Clear => {
                let path = commands::token_clear(&config)?;
                println!("Token removed from {}", path.display());
            }
        },
    }

    Ok(())
}
