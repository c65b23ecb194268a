//! Data models for workflow phases and steps.
//!
//! This module contains the core domain models of the booking workflow:
//! the two top-level [`Phase`]s, the supported [`BookingType`]s, the
//! [`Step`] with its observable [`StepStatus`], and the terminal
//! [`PhaseResult`] of a phase run.
//!
//! Models implement [`std::fmt::Display`] for direct markdown formatting,
//! with contextual wrappers available in [`crate::display`]. Step statuses
//! carry consistent icons across all display contexts (`○` pending,
//! `➤` active, `✓` completed, `✗` error).

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::intent::{BookingIntent, CandidateOptions};

/// The two top-level stages of a booking workflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Produce a proposal from the user's request
    Planning,
    /// Commit a selected option into a booking
    Booking,
}

impl Phase {
    /// Convert to the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::Booking => "booking",
        }
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planning" | "plan" => Ok(Phase::Planning),
            "booking" | "execution" | "book" => Ok(Phase::Booking),
            _ => Err(format!("Invalid phase: {s}")),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kinds of bookings the workflow supports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    /// Flight reservation
    #[default]
    Flight,
    /// Ground transport / ride hail
    Ride,
    /// Doctor appointment
    Doctor,
}

impl BookingType {
    /// Convert to the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Flight => "flight",
            BookingType::Ride => "ride",
            BookingType::Doctor => "doctor",
        }
    }
}

impl FromStr for BookingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flight" => Ok(BookingType::Flight),
            "ride" => Ok(BookingType::Ride),
            "doctor" => Ok(BookingType::Doctor),
            _ => Err(format!("Invalid booking type: {s}")),
        }
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type-safe enumeration of step statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step has not been reached yet
    #[default]
    Pending,

    /// Step is currently being worked on
    Active,

    /// Step finished successfully
    Completed,

    /// Step failed; the whole run is terminal
    Error,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "active" => Ok(StepStatus::Active),
            "completed" => Ok(StepStatus::Completed),
            "error" => Ok(StepStatus::Error),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StepStatus {
    /// Convert to the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Active => "active",
            StepStatus::Completed => "completed",
            StepStatus::Error => "error",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Icons Used
    /// - `○ Pending` - Circle for steps not yet reached
    /// - `➤ Active` - Arrow for the step currently in progress
    /// - `✓ Completed` - Checkmark for finished steps
    /// - `✗ Error` - Cross for the failed step
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Pending => "○ Pending",
            StepStatus::Active => "➤ Active",
            StepStatus::Completed => "✓ Completed",
            StepStatus::Error => "✗ Error",
        }
    }

    /// Whether the status is terminal for the step itself.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Error)
    }
}

/// Free-form key/value payload attached to a completed step, used purely
/// for display.
pub type StepDetails = BTreeMap<String, String>;

/// One named unit of a phase's workflow with an observable status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Identifier, unique within one phase's catalog
    pub id: String,

    /// Phase this step belongs to
    pub phase: Phase,

    /// Short presentation label
    pub label: String,

    /// Longer presentation text
    pub description: String,

    /// Current observable status
    pub status: StepStatus,

    /// Optional display payload attached when the step completes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: StepDetails,
}

impl Step {
    /// Whether the step has reached a terminal status.
    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({})", self.label, self.status.with_icon())?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;

        if !self.details.is_empty() {
            writeln!(f)?;
            for (key, value) in &self.details {
                writeln!(f, "- **{key}**: {value}")?;
            }
        }

        Ok(())
    }
}

/// The terminal output of a phase run.
///
/// Created only at phase completion and immutable thereafter. A
/// `success: false` result means the phase did not complete; no step
/// beyond the failed one was applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseResult {
    /// Whether the phase ran to completion
    pub success: bool,

    /// Final state of all steps, in catalog order, for audit/history
    pub steps: Vec<Step>,

    /// Error description when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PhaseResult {
    /// Builds a successful result from a final step list.
    pub fn ok(steps: Vec<Step>) -> Self {
        Self {
            success: true,
            steps,
            error: None,
        }
    }

    /// Builds a failed result from a final step list and error text.
    pub fn failed(steps: Vec<Step>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            steps,
            error: Some(error.into()),
        }
    }
}

/// The terminal output of a planning run: phase result plus the extracted
/// intent, candidate options and proposal text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningOutcome {
    /// Phase completion status and final step list
    pub result: PhaseResult,

    /// Normalized extraction of the user's request, produced exactly once
    /// by the intent-resolution service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<BookingIntent>,

    /// Booking kind the service resolved the request to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_type: Option<BookingType>,

    /// Candidate options returned alongside the intent
    #[serde(default)]
    pub options: CandidateOptions,

    /// Human-readable proposal text for presentation layers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal: Option<String>,

    /// Identifier of the booking record created during planning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

impl PlanningOutcome {
    /// Builds a failed outcome carrying no payload.
    pub fn failed(steps: Vec<Step>, error: impl Into<String>) -> Self {
        Self {
            result: PhaseResult::failed(steps, error),
            intent: None,
            booking_type: None,
            options: CandidateOptions::default(),
            proposal: None,
            booking_id: None,
        }
    }
}
