//! The two-phase orchestrator.
//!
//! [`Orchestrator::run_planning_phase`] and
//! [`Orchestrator::run_execution_phase`] drive a [`StepSequencer`]
//! through its catalog as a single cooperative task: steps execute
//! strictly sequentially, yielding only at the fixed pacing waits and at
//! the one external call each phase makes (intent resolution during
//! planning, the record-store status write during execution). Every
//! error is caught at the top of the phase and converted into a
//! structured failure result; nothing propagates to the caller uncaught.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use log::{debug, info, warn};

use crate::{
    catalog::catalog,
    error::{Result, WorkflowError},
    intent::BookingIntent,
    models::{BookingType, Phase, PhaseResult, PlanningOutcome, Step, StepDetails},
    params::{ExecutionRequest, PlanningRequest},
    resolver::IntentResolver,
    sequencer::StepSequencer,
    store::BookingStore,
};

/// Default simulated latency between a step's activation and completion.
pub const DEFAULT_PACING: Duration = Duration::from_millis(350);

/// Default additional settlement wait at the payment step.
pub const DEFAULT_SETTLEMENT_DELAY: Duration = Duration::from_millis(750);

/// Status written to the record store at the confirmation step.
const BOOKED_STATUS: &str = "booked";

/// Callback contract consumed by presentation layers.
///
/// Invoked synchronously at every activate and complete/fail transition.
/// A slow sink delays the next step because the orchestrator executes
/// within a single logical task. Implementations must tolerate
/// `all_steps` ending in a terminal error step.
pub trait ProgressSink {
    /// Called with the step that changed and a snapshot of all steps in
    /// catalog order.
    fn on_step_change(&mut self, step: &Step, all_steps: &[Step]);
}

/// Cooperative cancellation signal, checked before each step activation.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the run holding this flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives phase runs against the external collaborators.
///
/// Two independent phase runs may execute concurrently as independent
/// tasks; each constructs its own [`StepSequencer`], so no locking is
/// needed between runs.
pub struct Orchestrator<R, S> {
    resolver: R,
    store: S,
    pacing: Duration,
    settlement_delay: Duration,
    cancel: Option<CancelFlag>,
}

impl<R: IntentResolver, S: BookingStore> Orchestrator<R, S> {
    /// Creates an orchestrator with default pacing.
    pub fn new(resolver: R, store: S) -> Self {
        Self {
            resolver,
            store,
            pacing: DEFAULT_PACING,
            settlement_delay: DEFAULT_SETTLEMENT_DELAY,
            cancel: None,
        }
    }

    /// Overrides the per-step simulated latency. Tests pass
    /// [`Duration::ZERO`] to run phases instantly.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Overrides the extra settlement wait at the payment step.
    pub fn with_settlement_delay(mut self, delay: Duration) -> Self {
        self.settlement_delay = delay;
        self
    }

    /// Attaches a cancellation flag checked before each step activation.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Runs the planning phase: seeds a fresh sequencer from the planning
    /// catalog, advances every step in order, calls the intent-resolution
    /// service exactly once at the understand step, and returns the
    /// structured outcome. Never returns an error; failures surface as
    /// `result.success == false`.
    pub async fn run_planning_phase(
        &self,
        request: &PlanningRequest,
        sink: &mut dyn ProgressSink,
    ) -> PlanningOutcome {
        let kind = request.booking_type.unwrap_or_default();
        let mut sequencer =
            StepSequencer::seeded(Phase::Planning, catalog(Phase::Planning, kind));
        info!("planning phase started (kind: {kind})");

        match self.planning_procedure(request, &mut sequencer, sink).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("planning phase aborted: {e}");
                PlanningOutcome::failed(sequencer.snapshot(), e.to_string())
            }
        }
    }

    async fn planning_procedure(
        &self,
        request: &PlanningRequest,
        sequencer: &mut StepSequencer,
        sink: &mut dyn ProgressSink,
    ) -> Result<PlanningOutcome> {
        self.begin_step(sequencer, "authenticate", sink)?;
        if request.session.is_none() {
            self.fail_step(sequencer, "authenticate", sink);
            return Ok(PlanningOutcome::failed(
                sequencer.snapshot(),
                "no active session",
            ));
        }
        self.finish_step(
            sequencer,
            "authenticate",
            details([("Session", "active".to_string())]),
            sink,
        )
        .await?;

        // The one network call of the planning phase.
        self.begin_step(sequencer, "understand", sink)?;
        let response = match self.resolver.resolve(request).await {
            Ok(response) if response.success => response,
            Ok(response) => {
                self.fail_step(sequencer, "understand", sink);
                let reason = response
                    .error
                    .unwrap_or_else(|| "intent resolution rejected the request".to_string());
                return Ok(PlanningOutcome::failed(sequencer.snapshot(), reason));
            }
            Err(e) => {
                self.fail_step(sequencer, "understand", sink);
                return Ok(PlanningOutcome::failed(sequencer.snapshot(), e.to_string()));
            }
        };

        let intent = response.intent.clone().unwrap_or_default();
        let resolved_kind = response
            .booking_type
            .or(request.booking_type)
            .unwrap_or_default();
        debug!(
            "intent resolved (kind: {resolved_kind}, candidates: {})",
            response.options.len()
        );
        self.finish_step(sequencer, "understand", intent_summary(&intent, resolved_kind), sink)
            .await?;

        self.begin_step(sequencer, "dates", sink)?;
        self.finish_step(sequencer, "dates", date_details(&intent), sink)
            .await?;

        self.begin_step(sequencer, "preferences", sink)?;
        self.finish_step(sequencer, "preferences", preference_details(&intent), sink)
            .await?;

        self.begin_step(sequencer, "create_trip", sink)?;
        let mut draft = StepDetails::new();
        draft.insert("Record".to_string(), "draft".to_string());
        if let Some(id) = &response.booking_id {
            draft.insert("Booking".to_string(), id.clone());
        }
        self.finish_step(sequencer, "create_trip", Some(draft), sink)
            .await?;

        self.begin_step(sequencer, "proposal", sink)?;
        self.finish_step(
            sequencer,
            "proposal",
            details([("Options", response.options.len().to_string())]),
            sink,
        )
        .await?;

        info!("planning phase completed");
        Ok(PlanningOutcome {
            result: PhaseResult::ok(sequencer.snapshot()),
            intent: Some(intent),
            booking_type: Some(resolved_kind),
            options: response.options,
            proposal: response.proposal,
            booking_id: response.booking_id,
        })
    }

    /// Runs the execution phase over the booking catalog for the request's
    /// kind, performing the single record-store write at the confirmation
    /// step and an extra settlement wait at the payment step. Never
    /// returns an error; failures surface as `success == false`.
    pub async fn run_execution_phase(
        &self,
        request: &ExecutionRequest,
        sink: &mut dyn ProgressSink,
    ) -> PhaseResult {
        let mut sequencer = StepSequencer::seeded(
            Phase::Booking,
            catalog(Phase::Booking, request.booking_type),
        );
        info!(
            "execution phase started (booking: {}, kind: {})",
            request.booking_id, request.booking_type
        );

        match self.execution_procedure(request, &mut sequencer, sink).await {
            Ok(result) => result,
            Err(e) => {
                warn!("execution phase aborted: {e}");
                PhaseResult::failed(sequencer.snapshot(), e.to_string())
            }
        }
    }

    async fn execution_procedure(
        &self,
        request: &ExecutionRequest,
        sequencer: &mut StepSequencer,
        sink: &mut dyn ProgressSink,
    ) -> Result<PhaseResult> {
        let step_ids: Vec<String> = sequencer.steps().iter().map(|s| s.id.clone()).collect();

        for id in &step_ids {
            self.begin_step(sequencer, id, sink)?;

            match id.as_str() {
                "payment" => {
                    // Settlement latency on top of the regular pacing.
                    tokio::time::sleep(self.settlement_delay).await;
                }
                "confirm" => {
                    // The one external write of the execution phase.
                    if let Err(e) = self
                        .store
                        .update_status(&request.booking_id, BOOKED_STATUS)
                        .await
                    {
                        self.fail_step(sequencer, id, sink);
                        return Ok(PhaseResult::failed(sequencer.snapshot(), e.to_string()));
                    }
                }
                _ => {}
            }

            self.finish_step(sequencer, id, execution_details(id, request), sink)
                .await?;
        }

        info!("execution phase completed (booking: {})", request.booking_id);
        Ok(PhaseResult::ok(sequencer.snapshot()))
    }

    /// Activates a step and notifies the sink, honoring cancellation.
    fn begin_step(
        &self,
        sequencer: &mut StepSequencer,
        step_id: &str,
        sink: &mut dyn ProgressSink,
    ) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            // Mark the step we were about to run as failed, emit that one
            // transition, and stop.
            if sequencer.fail(step_id).is_ok() {
                self.emit(sequencer, step_id, sink);
            }
            return Err(WorkflowError::Cancelled);
        }

        sequencer.activate(step_id)?;
        self.emit(sequencer, step_id, sink);
        Ok(())
    }

    /// Waits out the pacing interval, completes the step with details,
    /// and notifies the sink.
    async fn finish_step(
        &self,
        sequencer: &mut StepSequencer,
        step_id: &str,
        step_details: Option<StepDetails>,
        sink: &mut dyn ProgressSink,
    ) -> Result<()> {
        tokio::time::sleep(self.pacing).await;
        sequencer.complete(step_id, step_details)?;
        self.emit(sequencer, step_id, sink);
        Ok(())
    }

    /// Fails a step and notifies the sink. Transition errors here mean
    /// the run is already terminal and are deliberately swallowed.
    fn fail_step(&self, sequencer: &mut StepSequencer, step_id: &str, sink: &mut dyn ProgressSink) {
        if sequencer.fail(step_id).is_ok() {
            self.emit(sequencer, step_id, sink);
        }
    }

    fn emit(&self, sequencer: &StepSequencer, step_id: &str, sink: &mut dyn ProgressSink) {
        let all_steps = sequencer.snapshot();
        if let Some(step) = all_steps.iter().find(|s| s.id == step_id) {
            debug!("{} step '{step_id}' is {}", sequencer.phase(), step.status);
            sink.on_step_change(step, &all_steps);
        }
    }
}

/// Builds a details map from label/value pairs.
fn details<const N: usize>(pairs: [(&str, String); N]) -> Option<StepDetails> {
    let map: StepDetails = pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    Some(map)
}

fn intent_summary(intent: &BookingIntent, kind: BookingType) -> Option<StepDetails> {
    let mut map = StepDetails::new();
    map.insert("Kind".to_string(), kind.to_string());
    if let Some(destination) = &intent.destination {
        map.insert("Destination".to_string(), destination.clone());
    }
    if let Some(origin) = &intent.origin {
        map.insert("Origin".to_string(), origin.clone());
    }
    Some(map)
}

fn date_details(intent: &BookingIntent) -> Option<StepDetails> {
    let mut map = StepDetails::new();
    match (&intent.depart_date, &intent.return_date) {
        (Some(depart), Some(ret)) => {
            map.insert("Dates".to_string(), format!("{depart} – {ret}"));
        }
        (Some(depart), None) => {
            map.insert("Date".to_string(), depart.clone());
        }
        _ => {
            map.insert("Dates".to_string(), "flexible".to_string());
        }
    }
    if let Some(time) = &intent.preferred_time {
        map.insert("Time".to_string(), time.clone());
    }
    Some(map)
}

fn preference_details(intent: &BookingIntent) -> Option<StepDetails> {
    let mut map = StepDetails::new();
    if let Some(budget) = intent.budget {
        map.insert("Budget".to_string(), format!("${budget:.0}"));
    }
    if let Some(travelers) = intent.travelers {
        map.insert("Travelers".to_string(), travelers.to_string());
    }
    if let Some(preference) = &intent.preference {
        map.insert("Preference".to_string(), preference.clone());
    }
    if let Some(specialty) = &intent.specialty {
        map.insert("Specialty".to_string(), specialty.clone());
    }
    if map.is_empty() {
        map.insert("Preferences".to_string(), "none stated".to_string());
    }
    Some(map)
}

fn execution_details(step_id: &str, request: &ExecutionRequest) -> Option<StepDetails> {
    match step_id {
        "select" => details([("Selection", request.selection.summary.clone())]),
        "payment" => {
            let amount = request
                .selection
                .price
                .map_or_else(|| "on file".to_string(), |p| format!("${p:.2}"));
            details([("Charged", amount)])
        }
        "confirm" => details([
            ("Booking", request.booking_id.clone()),
            ("Status", BOOKED_STATUS.to_string()),
        ]),
        _ => None,
    }
}
