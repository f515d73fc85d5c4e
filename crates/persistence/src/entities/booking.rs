//! Booking entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::booking::BookingStatus;

/// Database row mapping for the bookings table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingEntity {
    pub id: Uuid,
    pub booking_number: String,
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
    pub scheduled_time: NaiveTime,
    pub special_instructions: Option<String>,
    pub base_price: i64,
    pub addon_price: i64,
    pub total_price: i64,
    pub required_staff_count: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BookingEntity {
    /// Convert to domain model.
    pub fn into_domain(self) -> domain::models::Booking {
        let status = self
            .status
            .parse::<BookingStatus>()
            .unwrap_or(BookingStatus::Pending);

        domain::models::Booking {
            id: self.id,
            booking_number: self.booking_number,
            package_id: self.package_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            customer_user_id: self.customer_user_id,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            city: self.city,
            pincode: self.pincode,
            landmark: self.landmark,
            panchayath_id: self.panchayath_id,
            ward_number: self.ward_number,
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time,
            special_instructions: self.special_instructions,
            base_price: self.base_price,
            addon_price: self.addon_price,
            total_price: self.total_price,
            required_staff_count: self.required_staff_count,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
        }
    }
}

impl From<BookingEntity> for domain::models::Booking {
    fn from(entity: BookingEntity) -> Self {
        entity.into_domain()
    }
}

/// Aggregate booking counters for the admin dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct BookingStatsEntity {
    pub today_count: i64,
    pub pending_count: i64,
    pub completed_count: i64,
    pub total_revenue: i64,
}
