//! Booking domain model and its status state machine.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::error::BookingError;
use crate::services::pricing::MINIMUM_ORDER;

// ============================================================================
// Booking Status Enum
// ============================================================================

/// Lifecycle status of a booking.
///
/// pending -> confirmed -> assigned -> in_progress -> completed, with
/// cancellation possible from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Assigned => "assigned",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are permitted from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Check if transition to target status is valid.
    pub fn can_transition_to(&self, target: BookingStatus) -> bool {
        match (self, target) {
            (BookingStatus::Pending, BookingStatus::Confirmed) => true,
            (BookingStatus::Confirmed, BookingStatus::Assigned) => true,
            (BookingStatus::Assigned, BookingStatus::InProgress) => true,
            (BookingStatus::InProgress, BookingStatus::Completed) => true,
            // Cancellation from any pre-completion state
            (from, BookingStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Validates a transition, returning the typed failure on rejection.
    pub fn require_transition(&self, target: BookingStatus) -> Result<(), BookingError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(BookingError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "assigned" => Ok(BookingStatus::Assigned),
            "in_progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!(
                "Invalid booking status: {}. Must be one of: pending, confirmed, assigned, in_progress, completed, cancelled",
                s
            )),
        }
    }
}

// ============================================================================
// Core Model
// ============================================================================

/// Represents a booking record in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub booking_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<Uuid>,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_user_id: Option<Uuid>,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub pincode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panchayath_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ward_number: Option<i32>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub base_price: i64,
    pub addon_price: i64,
    pub total_price: i64,
    pub required_staff_count: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Validates the pricing invariants of a booking request.
///
/// `total == base + addon` must hold, all components must be non-negative,
/// and the total must meet the minimum order before any persistence call.
pub fn validate_booking_pricing(
    base_price: i64,
    addon_price: i64,
    total_price: i64,
) -> Result<(), BookingError> {
    if base_price < 0 || addon_price < 0 {
        return Err(BookingError::Validation(
            "Prices must be non-negative".to_string(),
        ));
    }
    if total_price != base_price + addon_price {
        return Err(BookingError::Validation(format!(
            "Total price {} does not equal base {} plus add-ons {}",
            total_price, base_price, addon_price
        )));
    }
    if total_price < MINIMUM_ORDER {
        return Err(BookingError::BelowMinimumOrder {
            total: total_price,
            minimum: MINIMUM_ORDER,
        });
    }
    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request payload for creating a booking.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub package_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "customerName must be 1-100 characters"))]
    pub customer_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub customer_email: Option<String>,

    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub customer_phone: String,

    #[validate(length(min = 1, max = 200, message = "addressLine1 must be 1-200 characters"))]
    pub address_line1: String,

    pub address_line2: Option<String>,

    #[validate(length(min = 1, max = 100, message = "city must be 1-100 characters"))]
    pub city: String,

    #[validate(custom(function = "shared::validation::validate_pincode"))]
    pub pincode: String,

    pub landmark: Option<String>,

    pub panchayath_id: Option<Uuid>,

    #[validate(custom(function = "crate::models::booking::validate_optional_ward"))]
    pub ward_number: Option<i32>,

    #[validate(custom(function = "shared::validation::validate_scheduled_date"))]
    pub scheduled_date: NaiveDate,

    pub scheduled_time: NaiveTime,

    #[validate(length(max = 1000, message = "specialInstructions too long"))]
    pub special_instructions: Option<String>,

    #[validate(custom(function = "shared::validation::validate_price"))]
    pub base_price: i64,

    #[validate(custom(function = "shared::validation::validate_price"))]
    pub addon_price: i64,

    #[validate(custom(function = "shared::validation::validate_price"))]
    pub total_price: i64,

    #[validate(custom(function = "crate::models::booking::validate_optional_staff_count"))]
    pub required_staff_count: Option<i32>,
}

/// Validates optional ward number.
pub fn validate_optional_ward(ward: i32) -> Result<(), validator::ValidationError> {
    shared::validation::validate_ward_number(ward)
}

/// Validates optional staff count.
pub fn validate_optional_staff_count(count: i32) -> Result<(), validator::ValidationError> {
    shared::validation::validate_staff_count(count)
}

/// Request payload for a status update on a booking.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
    /// Admin-only: apply the status even when the transition table forbids it.
    #[serde(default)]
    pub force: bool,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response payload for booking creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub id: Uuid,
    pub booking_number: String,
    pub status: BookingStatus,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

/// Response payload for booking retrieval.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub booking_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub address_line1: String,
    pub city: String,
    pub pincode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panchayath_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ward_number: Option<i32>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub base_price: i64,
    pub addon_price: i64,
    pub total_price: i64,
    pub required_staff_count: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            booking_number: booking.booking_number,
            package_id: booking.package_id,
            customer_name: booking.customer_name,
            customer_phone: booking.customer_phone,
            address_line1: booking.address_line1,
            city: booking.city,
            pincode: booking.pincode,
            panchayath_id: booking.panchayath_id,
            ward_number: booking.ward_number,
            scheduled_date: booking.scheduled_date,
            scheduled_time: booking.scheduled_time,
            special_instructions: booking.special_instructions,
            base_price: booking.base_price,
            addon_price: booking.addon_price,
            total_price: booking.total_price,
            required_staff_count: booking.required_staff_count,
            status: booking.status,
            created_at: booking.created_at,
            completed_at: booking.completed_at,
        }
    }
}

/// Pagination info for booking list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Response for the admin booking list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListResponse {
    pub bookings: Vec<BookingResponse>,
    pub pagination: BookingPagination,
}

/// Query parameters for the admin booking list.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingListQuery {
    pub cursor: Option<String>,
    pub limit: Option<i32>,
    pub status: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const ALL_STATUSES: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Assigned,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    #[test]
    fn test_status_as_str() {
        assert_eq!(BookingStatus::Pending.as_str(), "pending");
        assert_eq!(BookingStatus::InProgress.as_str(), "in_progress");
        assert_eq!(BookingStatus::Cancelled.as_str(), "cancelled");
    }

    #[test]
    fn test_status_from_str_round_trip() {
        for status in ALL_STATUSES {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_from_str_invalid() {
        assert!("open".parse::<BookingStatus>().is_err());
        assert!("PENDING".parse::<BookingStatus>().is_err());
        assert!("inprogress".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: BookingStatus = serde_json::from_str("\"confirmed\"").unwrap();
        assert_eq!(parsed, BookingStatus::Confirmed);
    }

    #[test]
    fn test_forward_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Assigned));
        assert!(BookingStatus::Assigned.can_transition_to(BookingStatus::InProgress));
        assert!(BookingStatus::InProgress.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn test_no_skipping_intermediate_states() {
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Assigned));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::InProgress));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Assigned.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Assigned.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::InProgress.can_transition_to(BookingStatus::Assigned));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::InProgress));
    }

    #[test]
    fn test_cancellation_from_every_pre_completion_state() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Assigned,
            BookingStatus::InProgress,
        ] {
            assert!(
                status.can_transition_to(BookingStatus::Cancelled),
                "{} should be cancellable",
                status
            );
        }
    }

    #[test]
    fn test_terminal_states_allow_nothing() {
        for terminal in [BookingStatus::Completed, BookingStatus::Cancelled] {
            for target in ALL_STATUSES {
                assert!(
                    !terminal.can_transition_to(target),
                    "{} -> {} should be rejected",
                    terminal,
                    target
                );
            }
        }
    }

    #[test]
    fn test_self_transitions_rejected() {
        for status in ALL_STATUSES {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_require_transition_error_carries_states() {
        let err = BookingStatus::Assigned
            .require_transition(BookingStatus::Completed)
            .unwrap_err();
        assert_eq!(
            err,
            BookingError::InvalidTransition {
                from: BookingStatus::Assigned,
                to: BookingStatus::Completed,
            }
        );
    }

    #[test]
    fn test_is_terminal() {
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::InProgress.is_terminal());
    }

    // =========================================================================
    // Pricing invariant tests
    // =========================================================================

    #[test]
    fn test_validate_booking_pricing_ok() {
        assert!(validate_booking_pricing(300, 250, 550).is_ok());
        assert!(validate_booking_pricing(500, 0, 500).is_ok());
    }

    #[test]
    fn test_validate_booking_pricing_below_minimum() {
        let err = validate_booking_pricing(200, 0, 200).unwrap_err();
        assert_eq!(
            err,
            BookingError::BelowMinimumOrder {
                total: 200,
                minimum: MINIMUM_ORDER,
            }
        );
    }

    #[test]
    fn test_validate_booking_pricing_mismatched_total() {
        assert!(matches!(
            validate_booking_pricing(300, 250, 600),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_booking_pricing_negative() {
        assert!(matches!(
            validate_booking_pricing(-100, 700, 600),
            Err(BookingError::Validation(_))
        ));
    }

    // =========================================================================
    // DTO tests
    // =========================================================================

    fn valid_request() -> CreateBookingRequest {
        CreateBookingRequest {
            package_id: None,
            customer_name: "Asha Nair".to_string(),
            customer_email: None,
            customer_phone: "9876543210".to_string(),
            address_line1: "12 Beach Road".to_string(),
            address_line2: None,
            city: "Kochi".to_string(),
            pincode: "682001".to_string(),
            landmark: None,
            panchayath_id: Some(Uuid::new_v4()),
            ward_number: Some(4),
            scheduled_date: Utc::now().date_naive() + Duration::days(3),
            scheduled_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            special_instructions: None,
            base_price: 300,
            addon_price: 250,
            total_price: 550,
            required_staff_count: Some(2),
        }
    }

    #[test]
    fn test_create_booking_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_booking_request_bad_phone() {
        let mut request = valid_request();
        request.customer_phone = "12345".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_booking_request_past_date() {
        let mut request = valid_request();
        request.scheduled_date = Utc::now().date_naive() - Duration::days(1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_booking_request_zero_staff() {
        let mut request = valid_request();
        request.required_staff_count = Some(0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_booking_request_deserialization() {
        let json = r#"{
            "customerName": "Asha Nair",
            "customerPhone": "9876543210",
            "addressLine1": "12 Beach Road",
            "city": "Kochi",
            "pincode": "682001",
            "scheduledDate": "2031-06-15",
            "scheduledTime": "10:00:00",
            "basePrice": 300,
            "addonPrice": 250,
            "totalPrice": 550
        }"#;

        let request: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.customer_name, "Asha Nair");
        assert_eq!(request.total_price, 550);
        assert!(request.required_staff_count.is_none());
    }

    #[test]
    fn test_update_status_request_force_defaults_false() {
        let request: UpdateBookingStatusRequest =
            serde_json::from_str(r#"{"status": "confirmed"}"#).unwrap();
        assert_eq!(request.status, BookingStatus::Confirmed);
        assert!(!request.force);
    }

    #[test]
    fn test_booking_response_serialization() {
        let response = CreateBookingResponse {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            booking_number: "BK-250314-00042".to_string(),
            status: BookingStatus::Pending,
            total_price: 550,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("BK-250314-00042"));
        assert!(json.contains("\"pending\""));
        assert!(json.contains("bookingNumber"));
    }
}
