//! Display wrappers for contextual formatting.
//!
//! Domain models format themselves directly via `Display`; the wrappers
//! here add context for list output and phase reports so the same data
//! renders differently depending on where it appears.

use std::fmt;

use crate::{
    intent::CandidateOptions,
    models::{PhaseResult, PlanningOutcome, Step},
};

/// Compact one-line-per-step list with position numbers.
///
/// Finished steps append their detail pairs as an indented sublist, so
/// the report doubles as a record of what each step produced.
pub struct StepList<'a>(pub &'a [Step]);

impl fmt::Display for StepList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, step) in self.0.iter().enumerate() {
            writeln!(
                f,
                "{}. {} ({})",
                position + 1,
                step.label,
                step.status.with_icon()
            )?;
            if step.is_done() {
                for (key, value) in &step.details {
                    writeln!(f, "   - {key}: {value}")?;
                }
            }
        }
        Ok(())
    }
}

/// Full report for a finished phase run.
pub struct PhaseReport<'a>(pub &'a PhaseResult);

impl fmt::Display for PhaseReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headline = if self.0.success {
            "# Phase completed"
        } else {
            "# Phase failed"
        };
        writeln!(f, "{headline}")?;
        writeln!(f)?;

        if let Some(error) = &self.0.error {
            writeln!(f, "**Error**: {error}")?;
            writeln!(f)?;
        }

        write!(f, "{}", StepList(&self.0.steps))
    }
}

/// Markdown rendering of a planning outcome, including the proposal and
/// candidate options.
pub struct ProposalView<'a>(pub &'a PlanningOutcome);

impl fmt::Display for ProposalView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PhaseReport(&self.0.result))?;

        if let Some(proposal) = &self.0.proposal {
            writeln!(f)?;
            writeln!(f, "## Proposal")?;
            writeln!(f)?;
            writeln!(f, "{proposal}")?;
        }

        if !self.0.options.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Options")?;
            writeln!(f)?;
            write!(f, "{}", OptionList(&self.0.options))?;
        }

        Ok(())
    }
}

/// Candidate options as a numbered markdown list.
pub struct OptionList<'a>(pub &'a CandidateOptions);

impl fmt::Display for OptionList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut position = 0;
        for flight in &self.0.flights {
            position += 1;
            writeln!(
                f,
                "{position}. {} {}, {} → {} (${:.2})",
                flight.airline, flight.flight_number, flight.depart, flight.arrive, flight.price
            )?;
        }
        for ride in &self.0.rides {
            position += 1;
            writeln!(
                f,
                "{position}. {} {}, {} min away (${:.2})",
                ride.provider, ride.vehicle_class, ride.eta_minutes, ride.price
            )?;
        }
        for doctor in &self.0.doctors {
            position += 1;
            writeln!(
                f,
                "{position}. Dr. {} ({}) at {}, next {}",
                doctor.name, doctor.specialty, doctor.clinic, doctor.next_available
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Phase, PhaseResult, StepStatus};

    fn step(id: &str, status: StepStatus) -> Step {
        Step {
            id: id.to_string(),
            phase: Phase::Planning,
            label: id.to_string(),
            description: String::new(),
            status,
            details: Default::default(),
        }
    }

    #[test]
    fn test_step_list_positions() {
        let steps = vec![
            step("authenticate", StepStatus::Completed),
            step("understand", StepStatus::Active),
        ];
        let output = format!("{}", StepList(&steps));
        assert!(output.contains("1. authenticate (✓ Completed)"));
        assert!(output.contains("2. understand (➤ Active)"));
    }

    #[test]
    fn test_step_list_shows_details_for_done_steps() {
        let mut done = step("authenticate", StepStatus::Completed);
        done.details
            .insert("Session".to_string(), "active".to_string());
        let mut active = step("understand", StepStatus::Active);
        active
            .details
            .insert("Partial".to_string(), "hidden".to_string());

        let output = format!("{}", StepList(&[done, active]));
        assert!(output.contains("   - Session: active"));
        assert!(!output.contains("Partial"));
    }

    #[test]
    fn test_phase_report_failure_shows_error() {
        let result = PhaseResult::failed(
            vec![step("authenticate", StepStatus::Error)],
            "no active session",
        );
        let output = format!("{}", PhaseReport(&result));
        assert!(output.contains("# Phase failed"));
        assert!(output.contains("**Error**: no active session"));
        assert!(output.contains("✗ Error"));
    }

    #[test]
    fn test_phase_report_success() {
        let result = PhaseResult::ok(vec![step("confirm", StepStatus::Completed)]);
        let output = format!("{}", PhaseReport(&result));
        assert!(output.contains("# Phase completed"));
        assert!(!output.contains("**Error**"));
    }
}
