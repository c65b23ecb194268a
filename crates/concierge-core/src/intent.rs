//! Intent and candidate-option types shared with the intent-resolution
//! service.
//!
//! The wire format uses camelCase field names; everything here derives
//! serde both ways so the same types serve as the service response model
//! and as the payload carried inside [`crate::models::PlanningOutcome`].

use serde::{Deserialize, Serialize};

use crate::models::BookingType;

/// Normalized extraction of the user's free-form request.
///
/// Produced exactly once per planning run by the intent-resolution
/// service and never mutated afterwards. Fields that do not apply to the
/// booking kind are left empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingIntent {
    /// Destination city, airport, or address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Origin city, airport, or pickup address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Outbound date, ISO 8601 (`YYYY-MM-DD`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depart_date: Option<String>,

    /// Return date, ISO 8601, absent for one-way trips and rides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,

    /// Budget ceiling in the user's currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,

    /// Number of travelers / passengers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travelers: Option<u32>,

    /// Cabin class, vehicle class, or appointment preference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference: Option<String>,

    /// Medical specialty, doctor bookings only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,

    /// Preferred appointment or pickup time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
}

/// One flight candidate returned by the intent-resolution service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightOption {
    pub airline: String,
    pub flight_number: String,
    pub depart: String,
    pub arrive: String,
    pub price: f64,
}

/// One ride candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RideOption {
    pub provider: String,
    pub vehicle_class: String,
    pub eta_minutes: u32,
    pub price: f64,
}

/// One doctor candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoctorOption {
    pub name: String,
    pub specialty: String,
    pub clinic: String,
    pub next_available: String,
}

/// Candidate options for the user to choose from, grouped by kind.
///
/// Only the group matching the resolved booking kind is populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CandidateOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flights: Vec<FlightOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rides: Vec<RideOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub doctors: Vec<DoctorOption>,
}

impl CandidateOptions {
    /// Total number of candidates across all groups.
    pub fn len(&self) -> usize {
        self.flights.len() + self.rides.len() + self.doctors.len()
    }

    /// Whether no candidates were returned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response body of the intent-resolution service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub success: bool,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub booking_type: Option<BookingType>,
    #[serde(default)]
    pub intent: Option<BookingIntent>,
    #[serde(flatten)]
    pub options: CandidateOptions,
    #[serde(default)]
    pub proposal: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_response_parses_ride_payload() {
        let body = r#"{
            "success": true,
            "bookingId": "bk-17",
            "bookingType": "ride",
            "intent": {"destination": "Airport", "travelers": 1},
            "rides": [
                {"provider": "Swift", "vehicleClass": "sedan", "etaMinutes": 4, "price": 23.5}
            ],
            "proposal": "Sedan to the airport in 4 minutes"
        }"#;

        let response: ResolveResponse = serde_json::from_str(body).unwrap();
        assert!(response.success);
        assert_eq!(response.booking_type, Some(BookingType::Ride));
        let intent = response.intent.unwrap();
        assert_eq!(intent.destination.as_deref(), Some("Airport"));
        assert_eq!(response.options.rides.len(), 1);
        assert!(response.options.flights.is_empty());
    }

    #[test]
    fn test_resolve_response_tolerates_missing_fields() {
        let response: ResolveResponse =
            serde_json::from_str(r#"{"success": false, "error": "unparseable request"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("unparseable request"));
        assert!(response.intent.is_none());
        assert!(response.options.is_empty());
    }

    #[test]
    fn test_intent_camel_case_round_trip() {
        let intent = BookingIntent {
            destination: Some("Tokyo".to_string()),
            depart_date: Some("2026-10-01".to_string()),
            budget: Some(1200.0),
            travelers: Some(2),
            ..Default::default()
        };
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains("departDate"));
        let back: BookingIntent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, intent);
    }
}
