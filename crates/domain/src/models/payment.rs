//! Payment and rating records attached to completed bookings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Settlement status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// A payment recorded against a booking after completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: i64,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The customer's one-time rating of a completed booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub rating: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for recording a payment on a completed booking.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,

    #[validate(length(min = 1, max = 50, message = "paymentMethod must be 1-50 characters"))]
    pub payment_method: Option<String>,

    pub transaction_id: Option<String>,

    /// Marks the payment as settled immediately.
    #[serde(default)]
    pub mark_paid: bool,
}

/// Request payload for rating a completed booking.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    #[validate(custom(function = "shared::validation::validate_rating"))]
    pub rating: i16,

    #[validate(length(max = 1000, message = "comment too long"))]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_round_trip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_record_payment_request_valid() {
        let request = RecordPaymentRequest {
            amount: 550,
            payment_method: Some("upi".to_string()),
            transaction_id: None,
            mark_paid: true,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_record_payment_request_zero_amount() {
        let request = RecordPaymentRequest {
            amount: 0,
            payment_method: None,
            transaction_id: None,
            mark_paid: false,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_rating_request_bounds() {
        let ok = CreateRatingRequest { rating: 5, comment: None };
        assert!(ok.validate().is_ok());

        let too_high = CreateRatingRequest { rating: 6, comment: None };
        assert!(too_high.validate().is_err());

        let too_low = CreateRatingRequest { rating: 0, comment: None };
        assert!(too_low.validate().is_err());
    }
}
