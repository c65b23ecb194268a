//! Core library for the Concierge staged booking workflow.
//!
//! This crate drives a multi-step, two-phase booking process (planning
//! produces a proposal, execution commits a selection) as a sequence of
//! discrete named steps with observable statuses, reporting progress
//! through a callback interface consumed by presentation layers.
//!
//! # Architecture
//!
//! - [`catalog`]: static, ordered step definitions per phase and booking
//!   kind; pure lookup, freshly constructed per call
//! - [`sequencer`]: the [`StepSequencer`] state machine enforcing
//!   ordering and completion invariants
//! - [`orchestrator`]: the [`Orchestrator`] phase procedures, the
//!   [`ProgressSink`] callback contract, and cooperative cancellation
//! - [`resolver`] / [`store`]: trait seams for the two external
//!   collaborators (intent-resolution service, booking record store)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use concierge_core::{
//!     Orchestrator, PlanningRequest, ProgressSink, Step,
//!     HttpIntentResolver, SqliteBookingStore,
//! };
//!
//! struct LogSink;
//!
//! impl ProgressSink for LogSink {
//!     fn on_step_change(&mut self, step: &Step, _all: &[Step]) {
//!         println!("{}: {}", step.label, step.status);
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::new(
//!     HttpIntentResolver::new("https://resolve.example.com/intent"),
//!     SqliteBookingStore::at_default_path()?,
//! );
//!
//! let request = PlanningRequest {
//!     user_message: "Two tickets to Tokyo in October under $1200".to_string(),
//!     session: Some("session-token".to_string()),
//!     ..Default::default()
//! };
//!
//! let outcome = orchestrator.run_planning_phase(&request, &mut LogSink).await;
//! if outcome.result.success {
//!     println!("proposal ready: {:?}", outcome.proposal);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod display;
pub mod error;
pub mod intent;
pub mod models;
pub mod orchestrator;
pub mod params;
pub mod resolver;
pub mod sequencer;
pub mod store;

// Re-export commonly used types
pub use catalog::{catalog as step_catalog, lookup as catalog_lookup, StepTemplate};
pub use display::{OptionList, PhaseReport, ProposalView, StepList};
pub use error::{Result, StoreResultExt, WorkflowError};
pub use intent::{
    BookingIntent, CandidateOptions, DoctorOption, FlightOption, ResolveResponse, RideOption,
};
pub use models::{
    BookingType, Phase, PhaseResult, PlanningOutcome, Step, StepDetails, StepStatus,
};
pub use orchestrator::{CancelFlag, Orchestrator, ProgressSink};
pub use params::{ExecutionRequest, GeoLocation, PlanningRequest, Selection};
pub use resolver::{HttpIntentResolver, IntentResolver};
pub use sequencer::StepSequencer;
pub use store::{BookingRecord, BookingStore, SqliteBookingStore};
