//! Parameter structs for the orchestrator entry points.

use serde::{Deserialize, Serialize};

use crate::models::BookingType;

/// Caller position forwarded to the intent-resolution service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_airport: Option<String>,
}

/// Input to a planning phase run.
#[derive(Debug, Clone, Default)]
pub struct PlanningRequest {
    /// The user's free-form request
    pub user_message: String,

    /// Optional caller position, forwarded verbatim to the service
    pub current_location: Option<GeoLocation>,

    /// Booking kind used to seed the catalog before the intent is known.
    /// `None` falls back to the default kind.
    pub booking_type: Option<BookingType>,

    /// Opaque session token. `None` means no active session and the
    /// planning run fails at the authenticate step.
    pub session: Option<String>,
}

/// The option the user approved out of the planning proposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    /// Display summary of the chosen candidate
    pub summary: String,

    /// Price of the chosen candidate, when priced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Input to an execution phase run.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Identifier of the booking record created during planning
    pub booking_id: String,

    /// Booking kind, selects the execution catalog
    pub booking_type: BookingType,

    /// The approved candidate
    pub selection: Selection,
}
