//! Payment and rating repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{PaymentEntity, RatingEntity};
use crate::metrics::QueryTimer;

/// Input data for recording a payment.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    pub booking_id: Uuid,
    pub amount: i64,
    pub status: String,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Repository for payment and rating database operations.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a payment against a booking.
    ///
    /// Handlers only call this for completed bookings; completed is terminal,
    /// so a plain insert after the status check cannot race a regression.
    pub async fn create(&self, input: PaymentInput) -> Result<PaymentEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_payment");

        let entity = sqlx::query_as::<_, PaymentEntity>(
            r#"
            INSERT INTO payments (booking_id, amount, status, payment_method, transaction_id, paid_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, booking_id, amount, status, payment_method, transaction_id,
                      paid_at, created_at
            "#,
        )
        .bind(input.booking_id)
        .bind(input.amount)
        .bind(&input.status)
        .bind(&input.payment_method)
        .bind(&input.transaction_id)
        .bind(input.paid_at)
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok(entity)
    }

    /// Payments recorded for a booking.
    pub async fn list_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_payments_for_booking");

        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            SELECT id, booking_id, amount, status, payment_method, transaction_id,
                   paid_at, created_at
            FROM payments
            WHERE booking_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Record the customer's one-time rating of a completed booking.
    ///
    /// The unique booking_id index enforces one rating per booking; the
    /// caller maps the unique violation to a conflict.
    pub async fn create_rating(
        &self,
        booking_id: Uuid,
        rating: i16,
        comment: Option<&str>,
    ) -> Result<RatingEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_rating");

        let entity = sqlx::query_as::<_, RatingEntity>(
            r#"
            INSERT INTO ratings (booking_id, rating, comment)
            VALUES ($1, $2, $3)
            RETURNING id, booking_id, rating, comment, created_at
            "#,
        )
        .bind(booking_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok(entity)
    }

    /// The rating for a booking, if any.
    pub async fn find_rating(&self, booking_id: Uuid) -> Result<Option<RatingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_rating");

        let result = sqlx::query_as::<_, RatingEntity>(
            r#"
            SELECT id, booking_id, rating, comment, created_at
            FROM ratings
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }
}
