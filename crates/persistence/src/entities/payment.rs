//! Payment and rating entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::payment::{Payment, PaymentStatus, Rating};

/// Database row mapping for the payments table.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: i64,
    pub status: String,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentEntity> for Payment {
    fn from(e: PaymentEntity) -> Self {
        let status = e.status.parse::<PaymentStatus>().unwrap_or(PaymentStatus::Pending);
        Payment {
            id: e.id,
            booking_id: e.booking_id,
            amount: e.amount,
            status,
            payment_method: e.payment_method,
            transaction_id: e.transaction_id,
            paid_at: e.paid_at,
            created_at: e.created_at,
        }
    }
}

/// Database row mapping for the ratings table.
#[derive(Debug, Clone, FromRow)]
pub struct RatingEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RatingEntity> for Rating {
    fn from(e: RatingEntity) -> Self {
        Rating {
            id: e.id,
            booking_id: e.booking_id,
            rating: e.rating,
            comment: e.comment,
            created_at: e.created_at,
        }
    }
}
