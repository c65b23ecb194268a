//! The step state machine driving a single phase run.
//!
//! A [`StepSequencer`] owns an ordered list of [`Step`]s seeded from the
//! catalog. Order is significant and defines the only valid progression:
//! no skipping, no reordering, no concurrent activation. The sequencer is
//! exclusively owned by one phase run and never shared across phases.
//!
//! # State machine
//!
//! ```text
//! pending ──activate──▶ active ──complete──▶ completed
//!    │                    │
//!    └───────fail─────────┴──fail──▶ error (terminal for the whole run)
//! ```
//!
//! Invariants enforced here:
//!
//! - at most one step is `active` at any instant;
//! - for positions i < j, if step j is or has been active, step i is
//!   completed or error;
//! - once any step is in error, every further transition fails with
//!   [`WorkflowError::TerminalState`].

use crate::{
    catalog::StepTemplate,
    error::{Result, WorkflowError},
    models::{Phase, Step, StepDetails, StepStatus},
};

/// Ordered step list with enforced transition discipline.
#[derive(Debug)]
pub struct StepSequencer {
    phase: Phase,
    steps: Vec<Step>,
    seeded: bool,
}

impl StepSequencer {
    /// Creates an empty, unseeded sequencer for a phase.
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            steps: Vec::new(),
            seeded: false,
        }
    }

    /// Creates and seeds a sequencer in one call.
    pub fn seeded(phase: Phase, templates: Vec<StepTemplate>) -> Self {
        let mut sequencer = Self::new(phase);
        // A fresh sequencer always accepts a seed.
        sequencer
            .seed(templates)
            .unwrap_or_else(|_| unreachable!("fresh sequencer is never seeded"));
        sequencer
    }

    /// Initializes the step list from catalog templates, all pending.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidState`] if the sequencer is already
    /// seeded and has not been reset.
    pub fn seed(&mut self, templates: Vec<StepTemplate>) -> Result<()> {
        if self.seeded {
            return Err(WorkflowError::InvalidState {
                reason: "sequencer is already seeded; call reset() first".to_string(),
            });
        }
        self.steps = templates
            .into_iter()
            .map(|t| t.into_step(self.phase))
            .collect();
        self.seeded = true;
        Ok(())
    }

    /// Returns the sequencer to its unseeded state.
    ///
    /// Phase runs are single-use; the orchestrator never calls this. It
    /// exists for presentation layers that re-render a sequencer in place.
    pub fn reset(&mut self) {
        self.steps.clear();
        self.seeded = false;
    }

    /// The phase this sequencer runs.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Read-only view of the steps in catalog order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether the sequencer has been seeded.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// The first step in error, if the run has failed.
    pub fn failed_step(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.status == StepStatus::Error)
    }

    /// Immutable copy of all steps for emission to a progress sink.
    ///
    /// Copy-on-read: the returned vector never aliases internal state.
    pub fn snapshot(&self) -> Vec<Step> {
        self.steps.clone()
    }

    /// Transitions the target step to active.
    ///
    /// As a side effect, any earlier step that is still active is forced
    /// to completed. Jumping ahead without an explicit `complete` call
    /// relies on this catch-up; it also means a skipped completion goes
    /// unnoticed, so callers should prefer completing explicitly.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::TerminalState`] if any step is already in error
    /// - [`WorkflowError::UnknownStep`] if `step_id` is absent
    /// - [`WorkflowError::InvalidState`] if a later step already
    ///   progressed past the target
    /// - [`WorkflowError::InvalidTransition`] if the target is not pending
    pub fn activate(&mut self, step_id: &str) -> Result<()> {
        self.ensure_not_terminal()?;
        let idx = self.position(step_id)?;

        if self.steps[idx + 1..]
            .iter()
            .any(|s| s.status != StepStatus::Pending)
        {
            return Err(WorkflowError::InvalidState {
                reason: format!("step '{step_id}' precedes a step that already progressed"),
            });
        }

        if self.steps[idx].status != StepStatus::Pending {
            return Err(WorkflowError::InvalidTransition {
                step: step_id.to_string(),
                from: self.steps[idx].status.as_str(),
                to: StepStatus::Active.as_str(),
            });
        }

        for earlier in &mut self.steps[..idx] {
            if earlier.status == StepStatus::Active {
                earlier.status = StepStatus::Completed;
            }
        }
        self.steps[idx].status = StepStatus::Active;
        Ok(())
    }

    /// Transitions the target step from active to completed, attaching the
    /// optional display details.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::TerminalState`] if any step is already in error
    /// - [`WorkflowError::UnknownStep`] if `step_id` is absent
    /// - [`WorkflowError::InvalidTransition`] if the target is not active
    pub fn complete(&mut self, step_id: &str, details: Option<StepDetails>) -> Result<()> {
        self.ensure_not_terminal()?;
        let idx = self.position(step_id)?;

        if self.steps[idx].status != StepStatus::Active {
            return Err(WorkflowError::InvalidTransition {
                step: step_id.to_string(),
                from: self.steps[idx].status.as_str(),
                to: StepStatus::Completed.as_str(),
            });
        }

        self.steps[idx].status = StepStatus::Completed;
        if let Some(details) = details {
            self.steps[idx].details = details;
        }
        Ok(())
    }

    /// Transitions the target step to error, making the whole run
    /// terminal. Subsequent `activate`/`complete`/`fail` calls fail with
    /// [`WorkflowError::TerminalState`].
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::TerminalState`] if the run already failed
    /// - [`WorkflowError::UnknownStep`] if `step_id` is absent
    /// - [`WorkflowError::InvalidTransition`] if the target is completed
    pub fn fail(&mut self, step_id: &str) -> Result<()> {
        self.ensure_not_terminal()?;
        let idx = self.position(step_id)?;

        if self.steps[idx].status == StepStatus::Completed {
            return Err(WorkflowError::InvalidTransition {
                step: step_id.to_string(),
                from: self.steps[idx].status.as_str(),
                to: StepStatus::Error.as_str(),
            });
        }

        self.steps[idx].status = StepStatus::Error;
        Ok(())
    }

    fn ensure_not_terminal(&self) -> Result<()> {
        match self.failed_step() {
            Some(step) => Err(WorkflowError::TerminalState {
                failed_step: step.id.clone(),
            }),
            None => Ok(()),
        }
    }

    fn position(&self, step_id: &str) -> Result<usize> {
        self.steps
            .iter()
            .position(|s| s.id == step_id)
            .ok_or_else(|| WorkflowError::UnknownStep {
                id: step_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::catalog, models::BookingType};

    fn planning_sequencer() -> StepSequencer {
        StepSequencer::seeded(Phase::Planning, catalog(Phase::Planning, BookingType::Flight))
    }

    fn active_count(sequencer: &StepSequencer) -> usize {
        sequencer
            .steps()
            .iter()
            .filter(|s| s.status == StepStatus::Active)
            .count()
    }

    #[test]
    fn test_seed_initializes_all_pending() {
        let sequencer = planning_sequencer();
        assert!(sequencer.is_seeded());
        assert_eq!(sequencer.phase(), Phase::Planning);
        assert_eq!(sequencer.steps().len(), 6);
        assert!(sequencer
            .steps()
            .iter()
            .all(|s| s.status == StepStatus::Pending));
    }

    #[test]
    fn test_seed_twice_fails_until_reset() {
        let mut sequencer = planning_sequencer();
        let err = sequencer
            .seed(catalog(Phase::Planning, BookingType::Flight))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidState { .. }));

        sequencer.reset();
        assert!(!sequencer.is_seeded());
        sequencer
            .seed(catalog(Phase::Planning, BookingType::Ride))
            .expect("reseed after reset");
    }

    #[test]
    fn test_activate_then_complete() {
        let mut sequencer = planning_sequencer();
        sequencer.activate("authenticate").unwrap();
        assert_eq!(sequencer.steps()[0].status, StepStatus::Active);
        assert_eq!(active_count(&sequencer), 1);

        let mut details = StepDetails::new();
        details.insert("Session".to_string(), "valid".to_string());
        sequencer.complete("authenticate", Some(details)).unwrap();
        assert_eq!(sequencer.steps()[0].status, StepStatus::Completed);
        assert_eq!(
            sequencer.steps()[0].details.get("Session").map(String::as_str),
            Some("valid")
        );
    }

    #[test]
    fn test_activate_unknown_step() {
        let mut sequencer = planning_sequencer();
        let err = sequencer.activate("teleport").unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownStep { id } if id == "teleport"));
    }

    #[test]
    fn test_activate_catches_up_earlier_active_step() {
        let mut sequencer = planning_sequencer();
        sequencer.activate("authenticate").unwrap();
        // No explicit complete; jumping ahead must finish the earlier step.
        sequencer.activate("understand").unwrap();

        assert_eq!(sequencer.steps()[0].status, StepStatus::Completed);
        assert_eq!(sequencer.steps()[1].status, StepStatus::Active);
        assert_eq!(active_count(&sequencer), 1);
    }

    #[test]
    fn test_activate_rejects_backwards_jump() {
        let mut sequencer = planning_sequencer();
        sequencer.activate("authenticate").unwrap();
        sequencer.activate("understand").unwrap();

        let err = sequencer.activate("authenticate").unwrap_err();
        // "authenticate" was force-completed by the catch-up, so the
        // ordering guard sees a later progressed step first.
        assert!(matches!(err, WorkflowError::InvalidState { .. }));
    }

    #[test]
    fn test_activate_active_step_is_invalid() {
        let mut sequencer = planning_sequencer();
        sequencer.activate("authenticate").unwrap();
        let err = sequencer.activate("authenticate").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidTransition { from: "active", .. }
        ));
    }

    #[test]
    fn test_complete_requires_active() {
        let mut sequencer = planning_sequencer();
        let err = sequencer.complete("authenticate", None).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidTransition { from: "pending", .. }
        ));
    }

    #[test]
    fn test_fail_makes_run_terminal() {
        let mut sequencer = planning_sequencer();
        sequencer.activate("authenticate").unwrap();
        sequencer.fail("authenticate").unwrap();

        assert_eq!(sequencer.failed_step().unwrap().id, "authenticate");
        let err = sequencer.activate("understand").unwrap_err();
        assert!(
            matches!(err, WorkflowError::TerminalState { ref failed_step } if failed_step == "authenticate")
        );
        let err = sequencer.complete("understand", None).unwrap_err();
        assert!(matches!(err, WorkflowError::TerminalState { .. }));
    }

    #[test]
    fn test_fail_pending_step_is_allowed() {
        let mut sequencer = planning_sequencer();
        sequencer.fail("dates").unwrap();
        assert_eq!(sequencer.steps()[2].status, StepStatus::Error);
    }

    #[test]
    fn test_fail_completed_step_is_invalid() {
        let mut sequencer = planning_sequencer();
        sequencer.activate("authenticate").unwrap();
        sequencer.complete("authenticate", None).unwrap();
        let err = sequencer.fail("authenticate").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidTransition { from: "completed", .. }
        ));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut sequencer = planning_sequencer();
        sequencer.activate("authenticate").unwrap();
        let snapshot = sequencer.snapshot();

        sequencer.complete("authenticate", None).unwrap();
        // The snapshot reflects the state at the time it was taken.
        assert_eq!(snapshot[0].status, StepStatus::Active);
        assert_eq!(sequencer.steps()[0].status, StepStatus::Completed);
    }

    #[test]
    fn test_full_run_keeps_single_active_invariant() {
        let mut sequencer = StepSequencer::seeded(
            Phase::Booking,
            catalog(Phase::Booking, BookingType::Flight),
        );
        let ids: Vec<String> = sequencer.steps().iter().map(|s| s.id.clone()).collect();
        for id in &ids {
            sequencer.activate(id).unwrap();
            assert_eq!(active_count(&sequencer), 1);
            sequencer.complete(id, None).unwrap();
        }
        assert!(sequencer.steps().iter().all(|s| s.status == StepStatus::Completed));
    }
}
