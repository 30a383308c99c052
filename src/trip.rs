//! Trip request collected from the user and turned into the seed message.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::pipeline::PipelineState;
use crate::types::{AppError, AppResult};

pub const MISSING_DESTINATION: &str = "Please enter a travel destination.";
pub const END_BEFORE_START: &str = "The end date must be on or after the start date.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_dates", skip_on_field_errors = false))]
pub struct TripRequest {
    #[validate(custom(function = "validate_destination"))]
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub preferences: Option<String>,
}

fn validate_destination(destination: &str) -> Result<(), ValidationError> {
    if destination.trim().is_empty() {
        let mut err = ValidationError::new("destination_required");
        err.message = Some(Cow::Borrowed(MISSING_DESTINATION));
        return Err(err);
    }
    Ok(())
}

fn validate_dates(trip: &TripRequest) -> Result<(), ValidationError> {
    if trip.end_date < trip.start_date {
        let mut err = ValidationError::new("end_before_start");
        err.message = Some(Cow::Borrowed(END_BEFORE_START));
        return Err(err);
    }
    Ok(())
}

// destination problems are reported first, like the form checks them
fn error_rank(code: &str) -> u8 {
    match code {
        "destination_required" => 0,
        "end_before_start" => 1,
        _ => 2,
    }
}

impl TripRequest {
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            destination: destination.into(),
            start_date,
            end_date,
            preferences: None,
        }
    }

    pub fn with_preferences(mut self, preferences: impl Into<String>) -> Self {
        self.preferences = Some(preferences.into());
        self
    }

    /// Validate, mapping failures to user-facing messages
    pub fn ensure_valid(&self) -> AppResult<()> {
        self.validate().map_err(|errors| {
            let mut found: Vec<ValidationError> = errors
                .field_errors()
                .into_values()
                .flat_map(|errs| errs.iter().cloned())
                .collect();
            found.sort_by_key(|e| error_rank(&e.code));

            let message = found
                .iter()
                .map(|e| e.message.as_deref().unwrap_or(&e.code).to_string())
                .collect::<Vec<_>>()
                .join(" ");
            AppError::InvalidRequest(message)
        })
    }

    /// Number of calendar days covered, counting both ends
    pub fn travel_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    fn preferences_text(&self) -> Option<&str> {
        self.preferences.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    pub fn seed_message(&self) -> String {
        let mut message = format!(
            "I'm planning to travel to {} from {} to {}.",
            self.destination.trim(),
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
        );
        if let Some(preferences) = self.preferences_text() {
            message.push_str(&format!(" Preferences: {}.", preferences.trim_end_matches('.')));
        }
        message.push_str(" Please prepare an itinerary accordingly.");
        message
    }

    /// Validate and build the initial pipeline state
    pub fn to_state(&self) -> AppResult<PipelineState> {
        self.ensure_valid()?;
        Ok(PipelineState::seed(self.seed_message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn jeju() -> TripRequest {
        TripRequest::new("Jeju Island", date("2024-12-22"), date("2024-12-24")).with_preferences("nature and food")
    }

    #[test]
    fn test_seed_message_matches_template() {
        assert_eq!(
            jeju().seed_message(),
            "I'm planning to travel to Jeju Island from 2024-12-22 to 2024-12-24. \
             Preferences: nature and food. Please prepare an itinerary accordingly."
        );
    }

    #[test]
    fn test_seed_message_without_preferences() {
        let trip = TripRequest::new("Paris", date("2025-05-01"), date("2025-05-03")).with_preferences("   ");
        assert_eq!(
            trip.seed_message(),
            "I'm planning to travel to Paris from 2025-05-01 to 2025-05-03. Please prepare an itinerary accordingly."
        );
    }

    #[test]
    fn test_empty_destination_is_rejected() {
        let mut trip = jeju();
        trip.destination = String::new();
        let err = trip.ensure_valid().unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid request: {}", MISSING_DESTINATION));

        trip.destination = "   ".to_string();
        assert!(trip.to_state().is_err());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let trip = TripRequest::new("Tokyo", date("2024-12-24"), date("2024-12-22"));
        let err = trip.ensure_valid().unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(ref m) if m == END_BEFORE_START));
    }

    #[test]
    fn test_both_errors_destination_first() {
        let trip = TripRequest::new("", date("2024-12-24"), date("2024-12-22"));
        let err = trip.ensure_valid().unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid request: {} {}", MISSING_DESTINATION, END_BEFORE_START));
    }

    #[test]
    fn test_same_day_trip_is_valid() {
        let trip = TripRequest::new("Busan", date("2024-12-22"), date("2024-12-22"));
        assert!(trip.ensure_valid().is_ok());
        assert_eq!(trip.travel_days(), 1);
        let state = trip.to_state().unwrap();
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_travel_days_counts_both_ends() {
        assert_eq!(jeju().travel_days(), 3);
    }

    #[test]
    fn test_deserializes_iso_dates() {
        let trip: TripRequest = serde_json::from_value(serde_json::json!({
            "destination": "Jeju Island",
            "start_date": "2024-12-22",
            "end_date": "2024-12-24"
        }))
        .unwrap();
        assert_eq!(trip.preferences, None);
        assert_eq!(trip.travel_days(), 3);
    }
}
