//! Command-line smoke entry point for the delivery store.
//!
//! # Responsibility
//! - Verify `delivery_core` linkage (`ping`).
//! - Inspect delivery locations in a database file (`list`).

use clap::{Parser, Subcommand};
use delivery_core::db::{open_db, open_db_in_memory};
use delivery_core::{
    default_log_level, init_logging, DeliveryLocationQuery, DeliveryLocationService,
    SqliteDeliveryLocationRepository,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "delivery", version, about = "Inspect supplier delivery locations")]
struct Cli {
    /// SQLite database file; an empty in-memory store is used when omitted.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core ping and version.
    Ping,
    /// List delivery locations, optionally narrowed by supplier and place.
    List {
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    match cli.command {
        Command::Ping => {
            println!("delivery_core ping={}", delivery_core::ping());
            println!("delivery_core version={}", delivery_core::core_version());
        }
        Command::List { supplier, location } => {
            let conn = match cli.db.as_ref() {
                Some(path) => open_db(path)?,
                None => open_db_in_memory()?,
            };
            let service =
                DeliveryLocationService::new(SqliteDeliveryLocationRepository::try_new(&conn)?);
            let query = DeliveryLocationQuery {
                owner: supplier,
                location,
                ..DeliveryLocationQuery::default()
            };

            let records = service.list_delivery_locations(&query)?;
            info!("event=cli_list module=cli status=ok count={}", records.len());
            for record in &records {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.id().unwrap_or_default(),
                    record.owner,
                    record.date,
                    record.location
                );
            }
        }
    }

    Ok(())
}
