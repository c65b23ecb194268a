//! Static, ordered step definitions per phase and booking kind.
//!
//! The catalog is a pure lookup: every call returns freshly constructed
//! templates, never a shared list, so one run's mutation of step details
//! can never leak into another run.

use crate::{
    error::{Result, WorkflowError},
    models::{BookingType, Phase, Step, StepStatus},
};

/// Immutable template a sequencer is seeded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTemplate {
    /// Identifier, unique within the phase's catalog
    pub id: &'static str,

    /// Short presentation label
    pub label: String,

    /// Longer presentation text
    pub description: String,
}

impl StepTemplate {
    fn new(id: &'static str, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            description: description.into(),
        }
    }

    /// Materializes the template into a pending [`Step`].
    pub fn into_step(self, phase: Phase) -> Step {
        Step {
            id: self.id.to_string(),
            phase,
            label: self.label,
            description: self.description,
            status: StepStatus::Pending,
            details: Default::default(),
        }
    }
}

/// Returns the ordered step templates for a phase and booking kind.
///
/// Deterministic and side-effect free; the same arguments always yield
/// structurally identical sequences. Order is significant and defines the
/// only valid progression. Total over the enum domain; use [`lookup`] when
/// the phase and kind arrive as untrusted strings.
pub fn catalog(phase: Phase, kind: BookingType) -> Vec<StepTemplate> {
    match phase {
        Phase::Planning => planning_catalog(kind),
        Phase::Booking => booking_catalog(kind),
    }
}

/// String-keyed catalog lookup for callers holding untyped phase/kind
/// names (configuration files, CLI arguments, wire payloads).
///
/// # Errors
///
/// Returns [`WorkflowError::Configuration`] when either name does not map
/// to a supported value.
pub fn lookup(phase: &str, kind: &str) -> Result<Vec<StepTemplate>> {
    let phase: Phase = phase
        .parse()
        .map_err(|e: String| WorkflowError::configuration(format!("Unsupported phase: {e}")))?;
    let kind: BookingType = kind.parse().map_err(|e: String| {
        WorkflowError::configuration(format!("Unsupported booking type: {e}"))
    })?;
    Ok(catalog(phase, kind))
}

/// Planning steps are shared across booking kinds; only the wording
/// references the kind.
fn planning_catalog(kind: BookingType) -> Vec<StepTemplate> {
    let subject = match kind {
        BookingType::Flight => "trip",
        BookingType::Ride => "ride",
        BookingType::Doctor => "appointment",
    };

    vec![
        StepTemplate::new(
            "authenticate",
            "Checking session",
            "Verify the caller holds an active session",
        ),
        StepTemplate::new(
            "understand",
            "Understanding request",
            "Extract a structured intent from the user's message",
        ),
        StepTemplate::new(
            "dates",
            "Resolving dates",
            format!("Pin down the dates and times for the {subject}"),
        ),
        StepTemplate::new(
            "preferences",
            "Applying preferences",
            "Fold stated preferences and budget into the options",
        ),
        StepTemplate::new(
            "create_trip",
            "Saving draft",
            format!("Persist the draft {subject} record"),
        ),
        StepTemplate::new(
            "proposal",
            "Preparing proposal",
            "Assemble the proposal for review",
        ),
    ]
}

fn booking_catalog(kind: BookingType) -> Vec<StepTemplate> {
    let (noun, plural) = match kind {
        BookingType::Flight => ("flight", "flights"),
        BookingType::Ride => ("ride", "rides"),
        BookingType::Doctor => ("doctor", "doctors"),
    };

    let mut steps = vec![
        StepTemplate::new(
            "search",
            format!("Searching {plural}"),
            format!("Query availability for matching {plural}"),
        ),
        StepTemplate::new(
            "compare",
            "Comparing options",
            "Compare candidates on price and fit",
        ),
        StepTemplate::new(
            "rank",
            "Ranking results",
            "Order candidates by overall score",
        ),
        StepTemplate::new(
            "select",
            "Locking selection",
            format!("Hold the chosen {noun}"),
        ),
    ];

    // Seat maps and passenger manifests only exist for flights.
    if kind == BookingType::Flight {
        steps.push(StepTemplate::new(
            "seats",
            "Assigning seats",
            "Pick seats from the seat map",
        ));
        steps.push(StepTemplate::new(
            "passengers",
            "Confirming passengers",
            "Attach passenger details to the reservation",
        ));
    }

    steps.extend([
        StepTemplate::new(
            "payment",
            "Processing payment",
            "Charge the stored payment method",
        ),
        StepTemplate::new(
            "confirm",
            "Confirming booking",
            "Write the confirmed status to the record store",
        ),
        StepTemplate::new(
            "calendar_sync",
            "Syncing calendar",
            "Push the booking onto the user's calendar",
        ),
        StepTemplate::new(
            "itinerary",
            "Building itinerary",
            "Assemble the final itinerary document",
        ),
    ]);

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_deterministic() {
        let first = catalog(Phase::Planning, BookingType::Flight);
        let second = catalog(Phase::Planning, BookingType::Flight);
        assert_eq!(first, second);
    }

    #[test]
    fn test_planning_order() {
        let steps = catalog(Phase::Planning, BookingType::Ride);
        let ids: Vec<_> = steps.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            [
                "authenticate",
                "understand",
                "dates",
                "preferences",
                "create_trip",
                "proposal"
            ]
        );
    }

    #[test]
    fn test_flight_booking_order() {
        let steps = catalog(Phase::Booking, BookingType::Flight);
        let ids: Vec<_> = steps.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            [
                "search",
                "compare",
                "rank",
                "select",
                "seats",
                "passengers",
                "payment",
                "confirm",
                "calendar_sync",
                "itinerary"
            ]
        );
    }

    #[test]
    fn test_ride_booking_omits_flight_only_steps() {
        let steps = catalog(Phase::Booking, BookingType::Ride);
        let ids: Vec<_> = steps.iter().map(|s| s.id).collect();
        assert!(!ids.contains(&"seats"));
        assert!(!ids.contains(&"passengers"));
        // Relative order of the surviving steps is preserved.
        assert_eq!(
            ids,
            [
                "search",
                "compare",
                "rank",
                "select",
                "payment",
                "confirm",
                "calendar_sync",
                "itinerary"
            ]
        );
    }

    #[test]
    fn test_lookup_accepts_known_names() {
        let steps = lookup("planning", "doctor").unwrap();
        assert_eq!(steps.first().unwrap().id, "authenticate");
    }

    #[test]
    fn test_lookup_rejects_unknown_combination() {
        let err = lookup("planning", "cruise").unwrap_err();
        assert!(matches!(
            err,
            crate::error::WorkflowError::Configuration { .. }
        ));
    }

    #[test]
    fn test_templates_materialize_pending() {
        let steps = catalog(Phase::Planning, BookingType::Doctor);
        let step = steps.into_iter().next().unwrap().into_step(Phase::Planning);
        assert_eq!(step.status, StepStatus::Pending);
        assert_eq!(step.phase, Phase::Planning);
        assert!(step.details.is_empty());
    }
}
