//! Booking repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{BookingEntity, BookingStatsEntity};
use crate::metrics::QueryTimer;

const BOOKING_COLUMNS: &str = r#"
    id, booking_number, package_id, customer_name, customer_email, customer_phone,
    customer_user_id, address_line1, address_line2, city, pincode, landmark,
    panchayath_id, ward_number, scheduled_date, scheduled_time, special_instructions,
    base_price, addon_price, total_price, required_staff_count, status,
    created_at, updated_at, completed_at
"#;

/// Input data for inserting a booking record.
#[derive(Debug, Clone)]
pub struct BookingInput {
    pub package_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub customer_user_id: Option<Uuid>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub pincode: String,
    pub landmark: Option<String>,
    pub panchayath_id: Option<Uuid>,
    pub ward_number: Option<i32>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: chrono::NaiveTime,
    pub special_instructions: Option<String>,
    pub base_price: i64,
    pub addon_price: i64,
    pub total_price: i64,
    pub required_staff_count: i32,
}

/// Query parameters for the paginated booking list.
#[derive(Debug, Clone)]
pub struct BookingPageQuery {
    pub status_filter: Option<String>,
    pub cursor_date: Option<NaiveDate>,
    pub cursor_id: Option<Uuid>,
    pub limit: i32,
}

/// Repository for booking database operations.
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Creates a new BookingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new booking in `pending` with a generated booking number.
    ///
    /// The booking number comes from a database sequence so creation stays a
    /// single atomic statement.
    pub async fn create(&self, input: BookingInput) -> Result<BookingEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_booking");

        let sql = format!(
            r#"
            INSERT INTO bookings (
                booking_number, package_id, customer_name, customer_email, customer_phone,
                customer_user_id, address_line1, address_line2, city, pincode, landmark,
                panchayath_id, ward_number, scheduled_date, scheduled_time,
                special_instructions, base_price, addon_price, total_price,
                required_staff_count, status
            )
            VALUES (
                'BK-' || to_char(now(), 'YYMMDD') || '-' ||
                    lpad(nextval('booking_number_seq')::text, 5, '0'),
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, 'pending'
            )
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let entity = sqlx::query_as::<_, BookingEntity>(&sql)
            .bind(input.package_id)
            .bind(&input.customer_name)
            .bind(&input.customer_email)
            .bind(&input.customer_phone)
            .bind(input.customer_user_id)
            .bind(&input.address_line1)
            .bind(&input.address_line2)
            .bind(&input.city)
            .bind(&input.pincode)
            .bind(&input.landmark)
            .bind(input.panchayath_id)
            .bind(input.ward_number)
            .bind(input.scheduled_date)
            .bind(input.scheduled_time)
            .bind(&input.special_instructions)
            .bind(input.base_price)
            .bind(input.addon_price)
            .bind(input.total_price)
            .bind(input.required_staff_count)
            .fetch_one(&self.pool)
            .await?;

        timer.record();
        Ok(entity)
    }

    /// Find booking by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_booking_by_id");

        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        let result = sqlx::query_as::<_, BookingEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        timer.record();
        result
    }

    /// Find booking by its human-readable number.
    pub async fn find_by_number(
        &self,
        booking_number: &str,
    ) -> Result<Option<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_booking_by_number");

        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_number = $1");
        let result = sqlx::query_as::<_, BookingEntity>(&sql)
            .bind(booking_number)
            .fetch_optional(&self.pool)
            .await;

        timer.record();
        result
    }

    /// Paginated booking list for the admin dashboard.
    ///
    /// Keyset pagination over (scheduled_date, id) ascending; fetches one row
    /// beyond the limit to detect whether more results exist.
    pub async fn list_page(
        &self,
        query: BookingPageQuery,
    ) -> Result<(Vec<BookingEntity>, bool), sqlx::Error> {
        let timer = QueryTimer::new("list_bookings_page");

        let fetch_limit = (query.limit + 1) as i64;
        let sql = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::date IS NULL OR (scheduled_date, id) > ($2, $3))
            ORDER BY scheduled_date ASC, id ASC
            LIMIT $4
            "#
        );

        let bookings = sqlx::query_as::<_, BookingEntity>(&sql)
            .bind(&query.status_filter)
            .bind(query.cursor_date)
            // Nil UUID as fallback keeps keyset pagination correct when only
            // the date half of the cursor is present.
            .bind(query.cursor_id.unwrap_or(Uuid::nil()))
            .bind(fetch_limit)
            .fetch_all(&self.pool)
            .await?;

        timer.record();

        let has_more = bookings.len() > query.limit as usize;
        let mut result = bookings;
        if has_more {
            result.pop();
        }

        Ok((result, has_more))
    }

    /// Bookings created by a customer, most recent first.
    pub async fn list_for_customer(
        &self,
        customer_user_id: Uuid,
    ) -> Result<Vec<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_bookings_for_customer");

        let sql = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE customer_user_id = $1
            ORDER BY created_at DESC
            "#
        );
        let result = sqlx::query_as::<_, BookingEntity>(&sql)
            .bind(customer_user_id)
            .fetch_all(&self.pool)
            .await;

        timer.record();
        result
    }

    /// Apply a status transition only if the row is still in the expected
    /// status.
    ///
    /// Returns `None` when the precondition failed (row missing or status
    /// moved concurrently); the row is left untouched in that case.
    /// `completed_at` is stamped exactly once, on entry into `completed`.
    pub async fn update_status_guarded(
        &self,
        id: Uuid,
        expected: &str,
        target: &str,
    ) -> Result<Option<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_booking_status_guarded");

        let sql = format!(
            r#"
            UPDATE bookings
            SET status = $3,
                completed_at = CASE
                    WHEN $3 = 'completed' THEN COALESCE(completed_at, now())
                    ELSE completed_at
                END,
                updated_at = now()
            WHERE id = $1 AND status = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, BookingEntity>(&sql)
            .bind(id)
            .bind(expected)
            .bind(target)
            .fetch_optional(&self.pool)
            .await;

        timer.record();
        result
    }

    /// Admin override: set the status unconditionally.
    ///
    /// Keeps the completed_at invariant: entering `completed` stamps it (once),
    /// leaving `completed` clears it.
    pub async fn update_status_forced(
        &self,
        id: Uuid,
        target: &str,
    ) -> Result<Option<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_booking_status_forced");

        let sql = format!(
            r#"
            UPDATE bookings
            SET status = $2,
                completed_at = CASE
                    WHEN $2 = 'completed' THEN COALESCE(completed_at, now())
                    ELSE NULL
                END,
                updated_at = now()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, BookingEntity>(&sql)
            .bind(id)
            .bind(target)
            .fetch_optional(&self.pool)
            .await;

        timer.record();
        result
    }

    /// Aggregate counters for the admin dashboard.
    pub async fn stats(&self) -> Result<BookingStatsEntity, sqlx::Error> {
        let timer = QueryTimer::new("booking_stats");

        let result = sqlx::query_as::<_, BookingStatsEntity>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE scheduled_date = CURRENT_DATE) AS today_count,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_count,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_count,
                COALESCE(SUM(total_price) FILTER (WHERE status <> 'cancelled'), 0)::bigint
                    AS total_revenue
            FROM bookings
            "#,
        )
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};

    #[test]
    fn test_booking_input_creation() {
        let input = BookingInput {
            package_id: None,
            customer_name: "Asha Nair".to_string(),
            customer_email: None,
            customer_phone: "9876543210".to_string(),
            customer_user_id: None,
            address_line1: "12 Beach Road".to_string(),
            address_line2: None,
            city: "Kochi".to_string(),
            pincode: "682001".to_string(),
            landmark: None,
            panchayath_id: None,
            ward_number: None,
            scheduled_date: Utc::now().date_naive(),
            scheduled_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            special_instructions: None,
            base_price: 300,
            addon_price: 250,
            total_price: 550,
            required_staff_count: 2,
        };

        assert_eq!(input.total_price, input.base_price + input.addon_price);
    }

    #[test]
    fn test_page_query_defaults() {
        let query = BookingPageQuery {
            status_filter: Some("confirmed".to_string()),
            cursor_date: None,
            cursor_id: None,
            limit: 20,
        };

        assert_eq!(query.limit, 20);
        assert!(query.cursor_date.is_none());
    }
}
