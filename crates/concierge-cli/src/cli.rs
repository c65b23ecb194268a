//! Command handlers bridging parsed arguments to the core workflow.
//!
//! Each handler converts CLI arguments into core parameter types, runs
//! the corresponding phase or store operation, and renders the result as
//! markdown. Failed phases surface as `anyhow` errors so the process
//! exits non-zero.

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, bail, Context, Result};
use concierge_core::{
    catalog_lookup, BookingStore, BookingType, ExecutionRequest, GeoLocation, HttpIntentResolver,
    Orchestrator, PhaseReport, PlanningRequest, ProgressSink, ProposalView, Selection,
    SqliteBookingStore, Step,
};
use log::info;

use crate::args::{BookArgs, PlanArgs, DEFAULT_SERVICE_URL};
use crate::renderer::TerminalRenderer;

/// Progress sink that prints one line per step transition as a phase runs.
struct ConsoleSink<'a> {
    renderer: &'a TerminalRenderer,
}

impl ProgressSink for ConsoleSink<'_> {
    fn on_step_change(&mut self, step: &Step, _all_steps: &[Step]) {
        self.renderer.step_line(step);
    }
}

/// CLI command handler holding the record store and renderer.
pub struct Cli {
    store: SqliteBookingStore,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(store: SqliteBookingStore, renderer: TerminalRenderer) -> Self {
        Self { store, renderer }
    }

    /// Runs the planning phase and, on success, creates the draft booking
    /// record the `book` command later commits.
    pub async fn handle_plan(&self, args: PlanArgs) -> Result<()> {
        let kind = parse_kind(&args.kind)?;
        let current_location = match (args.latitude, args.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoLocation {
                latitude,
                longitude,
                city: args.city,
                nearest_airport: None,
            }),
            _ => None,
        };

        let request = PlanningRequest {
            user_message: args.message,
            current_location,
            booking_type: Some(kind),
            session: args.session,
        };

        let mut resolver = HttpIntentResolver::new(args.service_url);
        if let Some(token) = args.service_token {
            resolver = resolver.with_bearer_token(token);
        }

        let orchestrator = Orchestrator::new(resolver, self.store.clone());
        let mut sink = ConsoleSink { renderer: &self.renderer };
        let outcome = orchestrator.run_planning_phase(&request, &mut sink).await;

        println!();
        self.renderer.render(&ProposalView(&outcome).to_string())?;

        if !outcome.result.success {
            let reason = outcome
                .result
                .error
                .unwrap_or_else(|| "unknown error".to_string());
            bail!("Planning failed: {reason}");
        }

        let booking_id = outcome.booking_id.unwrap_or_else(generated_booking_id);
        let kind = outcome.booking_type.unwrap_or(kind);
        self.store
            .create_booking(&booking_id, kind, outcome.proposal.as_deref())
            .await
            .context("Failed to create draft booking record")?;
        info!("draft record created (booking: {booking_id}, kind: {kind})");

        self.renderer.render(&format!(
            "\nDraft saved as `{booking_id}`. Run `concierge book {booking_id}` to commit.\n"
        ))
    }

    /// Runs the execution phase against an existing draft record.
    pub async fn handle_book(&self, args: BookArgs) -> Result<()> {
        let record = self
            .store
            .get_booking(&args.booking_id)
            .await?
            .ok_or_else(|| anyhow!("Booking '{}' not found", args.booking_id))?;

        let request = ExecutionRequest {
            booking_id: args.booking_id,
            booking_type: record.booking_type,
            selection: Selection {
                summary: args.summary,
                price: args.price,
            },
        };

        // The resolver is only consulted during planning; the endpoint
        // here is never called.
        let orchestrator = Orchestrator::new(
            HttpIntentResolver::new(DEFAULT_SERVICE_URL),
            self.store.clone(),
        );
        let mut sink = ConsoleSink { renderer: &self.renderer };
        let result = orchestrator.run_execution_phase(&request, &mut sink).await;

        println!();
        self.renderer.render(&PhaseReport(&result).to_string())?;

        if !result.success {
            let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
            bail!("Booking failed: {reason}");
        }
        Ok(())
    }

    /// Displays a persisted booking record.
    pub async fn handle_show(&self, booking_id: String) -> Result<()> {
        let record = self
            .store
            .get_booking(&booking_id)
            .await?
            .ok_or_else(|| anyhow!("Booking '{booking_id}' not found"))?;
        self.renderer.render(&record.to_string())
    }

    /// Prints the step catalog for a phase and booking kind.
    pub fn handle_catalog(&self, phase: String, kind: String) -> Result<()> {
        let templates = catalog_lookup(&phase, &kind)?;

        let mut output = format!("# {phase} steps ({kind})\n\n");
        for (position, template) in templates.iter().enumerate() {
            output.push_str(&format!(
                "{}. **{}**: {}\n",
                position + 1,
                template.label,
                template.description
            ));
        }
        self.renderer.render(&output)
    }
}

fn parse_kind(kind: &str) -> Result<BookingType> {
    BookingType::from_str(kind).map_err(|e| anyhow!(e))
}

/// Fallback record key when the intent-resolution service did not assign
/// one.
fn generated_booking_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("bk-{millis}")
}
