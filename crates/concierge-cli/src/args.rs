use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Fallback intent-resolution endpoint when neither the flag nor the
/// environment provides one.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8080/resolve";

/// Main command-line interface for the Concierge booking workflow
///
/// Concierge drives a two-phase booking process: `plan` turns a free-form
/// request into a proposal with candidate options, and `book` commits an
/// approved option. Step-by-step progress is printed as each phase runs.
#[derive(Parser)]
#[command(version, about, name = "concierge")]
pub struct Args {
    /// Path to the SQLite record store. Defaults to
    /// $XDG_DATA_HOME/concierge/bookings.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Concierge CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Run the planning phase for a free-form request
    #[command(alias = "p")]
    Plan(PlanArgs),
    /// Run the execution phase for an approved option
    #[command(alias = "b")]
    Book(BookArgs),
    /// Show a persisted booking record
    Show {
        /// Booking record to display
        booking_id: String,
    },
    /// Print the step catalog for a phase and booking kind
    Catalog {
        /// Phase name (planning or booking)
        phase: String,

        /// Booking kind (flight, ride, doctor)
        kind: String,
    },
}

/// Arguments for the planning phase
#[derive(ClapArgs)]
pub struct PlanArgs {
    /// The request, e.g. "two tickets to Tokyo in October under $1200"
    pub message: String,

    /// Booking kind hint used to seed the catalog (flight, ride, doctor)
    #[arg(long, default_value = "flight")]
    pub kind: String,

    /// Session token; defaults to $CONCIERGE_SESSION. Planning fails
    /// without one.
    #[arg(long, env = "CONCIERGE_SESSION")]
    pub session: Option<String>,

    /// Intent-resolution service endpoint
    #[arg(long, env = "CONCIERGE_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    pub service_url: String,

    /// Bearer token for the intent-resolution service
    #[arg(long, env = "CONCIERGE_SERVICE_TOKEN")]
    pub service_token: Option<String>,

    /// Caller latitude, forwarded to the service
    #[arg(long, requires = "longitude")]
    pub latitude: Option<f64>,

    /// Caller longitude, forwarded to the service
    #[arg(long, requires = "latitude")]
    pub longitude: Option<f64>,

    /// Caller city, forwarded to the service
    #[arg(long)]
    pub city: Option<String>,
}

/// Arguments for the execution phase
#[derive(ClapArgs)]
pub struct BookArgs {
    /// Booking record to commit; its stored kind selects the catalog
    pub booking_id: String,

    /// Display summary of the approved option
    #[arg(long, default_value = "approved option")]
    pub summary: String,

    /// Price of the approved option
    #[arg(long)]
    pub price: Option<f64>,
}
