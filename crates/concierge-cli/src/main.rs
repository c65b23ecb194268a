//! Concierge CLI application
//!
//! Command-line front end for the two-phase booking workflow: `plan`
//! resolves a free-form request into a proposal, `book` commits an
//! approved option against the persisted record.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use concierge_core::SqliteBookingStore;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args { database_file, no_color, command } = Args::parse();

    let store = match database_file {
        Some(path) => SqliteBookingStore::at_path(path),
        None => SqliteBookingStore::at_default_path(),
    }
    .context("Failed to open the booking record store")?;

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(store, renderer);

    info!("Concierge started");

    match command {
        Plan(plan_args) => cli.handle_plan(plan_args).await,
        Book(book_args) => cli.handle_book(book_args).await,
        Show { booking_id } => cli.handle_show(booking_id).await,
        Catalog { phase, kind } => cli.handle_catalog(phase, kind),
    }
}
