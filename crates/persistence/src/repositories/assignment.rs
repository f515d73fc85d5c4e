//! Staff assignment repository: the job board and the acceptance protocol.

use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::entities::{AssignmentEntity, BookingEntity};
use crate::metrics::QueryTimer;

const UNIQUE_VIOLATION: &str = "23505";

/// Typed failures of the acceptance protocol.
#[derive(Debug, Error)]
pub enum AcceptJobError {
    #[error("Booking not found")]
    NotFound,

    #[error("Booking is not open for acceptance (status: {0})")]
    NotOpen(String),

    #[error("Staff member has already accepted or rejected this booking")]
    AlreadyActedOn,

    #[error("Booking already has the required number of staff")]
    CapacityExceeded,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Result of a successful acceptance.
#[derive(Debug, Clone)]
pub struct AcceptOutcome {
    pub assignment: AssignmentEntity,
    /// True when this acceptance filled the last slot and the booking was
    /// promoted to `assigned` in the same transaction.
    pub booking_assigned: bool,
}

/// Repository for assignment database operations.
#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Creates a new AssignmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open jobs visible to a staff member.
    ///
    /// Confirmed bookings whose coverage unit matches one of the staff
    /// member's registered units, excluding bookings the staff member has
    /// already accepted or rejected. Ordered by scheduled date, ties broken
    /// by creation time.
    pub async fn list_available_jobs(
        &self,
        staff_id: Uuid,
    ) -> Result<Vec<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_available_jobs");

        let result = sqlx::query_as::<_, BookingEntity>(
            r#"
            SELECT
                b.id, b.booking_number, b.package_id, b.customer_name, b.customer_email,
                b.customer_phone, b.customer_user_id, b.address_line1, b.address_line2,
                b.city, b.pincode, b.landmark, b.panchayath_id, b.ward_number,
                b.scheduled_date, b.scheduled_time, b.special_instructions,
                b.base_price, b.addon_price, b.total_price, b.required_staff_count,
                b.status, b.created_at, b.updated_at, b.completed_at
            FROM bookings b
            WHERE b.status = 'confirmed'
              AND b.panchayath_id IS NOT NULL
              AND EXISTS (
                  SELECT 1 FROM staff_coverage sc
                  WHERE sc.staff_user_id = $1
                    AND sc.panchayath_id = b.panchayath_id
                    AND (b.ward_number IS NULL OR sc.ward_number = b.ward_number)
              )
              AND NOT EXISTS (
                  SELECT 1 FROM booking_assignments a
                  WHERE a.booking_id = b.id AND a.staff_user_id = $1
              )
            ORDER BY b.scheduled_date ASC, b.created_at ASC
            "#,
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Accept an open job.
    ///
    /// The booking row is locked for the duration of the transaction, so the
    /// capacity check, the insert, and the promotion to `assigned` act as one
    /// unit. Two staff members racing for the last slot serialize on the row
    /// lock; the loser re-checks capacity and fails closed with
    /// `CapacityExceeded`.
    pub async fn accept_job(
        &self,
        booking_id: Uuid,
        staff_id: Uuid,
    ) -> Result<AcceptOutcome, AcceptJobError> {
        let timer = QueryTimer::new("accept_job");
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, (String, i32)>(
            r#"
            SELECT status, required_staff_count
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (status, required) = booking.ok_or(AcceptJobError::NotFound)?;
        if status != "confirmed" {
            return Err(AcceptJobError::NotOpen(status));
        }

        let already_acted: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM booking_assignments
                WHERE booking_id = $1 AND staff_user_id = $2
            )
            "#,
        )
        .bind(booking_id)
        .bind(staff_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_acted {
            return Err(AcceptJobError::AlreadyActedOn);
        }

        let accepted_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM booking_assignments
            WHERE booking_id = $1 AND status = 'accepted'
            "#,
        )
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await?;

        if accepted_count >= i64::from(required) {
            return Err(AcceptJobError::CapacityExceeded);
        }

        let assignment = insert_assignment(&mut tx, booking_id, staff_id, "accepted").await?;

        let booking_assigned = accepted_count + 1 == i64::from(required);
        if booking_assigned {
            sqlx::query(
                r#"
                UPDATE bookings
                SET status = 'assigned', updated_at = now()
                WHERE id = $1
                "#,
            )
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();

        debug!(
            booking_id = %booking_id,
            staff_id = %staff_id,
            accepted = accepted_count + 1,
            required,
            booking_assigned,
            "Job accepted"
        );

        Ok(AcceptOutcome {
            assignment,
            booking_assigned,
        })
    }

    /// Record a rejection, permanently hiding the booking from this staff
    /// member's available list. No effect on the booking status.
    pub async fn reject_job(
        &self,
        booking_id: Uuid,
        staff_id: Uuid,
    ) -> Result<AssignmentEntity, AcceptJobError> {
        let timer = QueryTimer::new("reject_job");

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM bookings WHERE id = $1)")
            .bind(booking_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(AcceptJobError::NotFound);
        }

        let result = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            INSERT INTO booking_assignments (booking_id, staff_user_id, status)
            VALUES ($1, $2, 'rejected')
            RETURNING id, booking_id, staff_user_id, status, assigned_at
            "#,
        )
        .bind(booking_id)
        .bind(staff_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_pair_conflict);

        timer.record();
        result
    }

    /// Whether a staff member holds an accepted assignment on a booking.
    pub async fn has_accepted(
        &self,
        booking_id: Uuid,
        staff_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("has_accepted_assignment");

        let result = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM booking_assignments
                WHERE booking_id = $1 AND staff_user_id = $2 AND status = 'accepted'
            )
            "#,
        )
        .bind(booking_id)
        .bind(staff_id)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// All assignment rows for a booking.
    pub async fn list_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<AssignmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_assignments_for_booking");

        let result = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            SELECT id, booking_id, staff_user_id, status, assigned_at
            FROM booking_assignments
            WHERE booking_id = $1
            ORDER BY assigned_at ASC
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Bookings a staff member has accepted, for their job list.
    pub async fn list_staff_jobs(&self, staff_id: Uuid) -> Result<Vec<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_staff_jobs");

        let result = sqlx::query_as::<_, BookingEntity>(
            r#"
            SELECT
                b.id, b.booking_number, b.package_id, b.customer_name, b.customer_email,
                b.customer_phone, b.customer_user_id, b.address_line1, b.address_line2,
                b.city, b.pincode, b.landmark, b.panchayath_id, b.ward_number,
                b.scheduled_date, b.scheduled_time, b.special_instructions,
                b.base_price, b.addon_price, b.total_price, b.required_staff_count,
                b.status, b.created_at, b.updated_at, b.completed_at
            FROM bookings b
            JOIN booking_assignments a ON a.booking_id = b.id
            WHERE a.staff_user_id = $1 AND a.status = 'accepted'
            ORDER BY b.scheduled_date ASC, b.created_at ASC
            "#,
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }
}

async fn insert_assignment(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: Uuid,
    staff_id: Uuid,
    status: &str,
) -> Result<AssignmentEntity, AcceptJobError> {
    sqlx::query_as::<_, AssignmentEntity>(
        r#"
        INSERT INTO booking_assignments (booking_id, staff_user_id, status)
        VALUES ($1, $2, $3)
        RETURNING id, booking_id, staff_user_id, status, assigned_at
        "#,
    )
    .bind(booking_id)
    .bind(staff_id)
    .bind(status)
    .fetch_one(&mut **tx)
    .await
    .map_err(map_pair_conflict)
}

/// A unique-index violation on (booking_id, staff_user_id) means the staff
/// member already acted; surface it as the protocol error.
fn map_pair_conflict(err: sqlx::Error) -> AcceptJobError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return AcceptJobError::AlreadyActedOn;
        }
    }
    AcceptJobError::Database(err)
}
