//! Common test utilities for integration tests.
//!
//! Integration tests run against a real PostgreSQL database named by the
//! `TEST_DATABASE_URL` environment variable. When the variable is unset the
//! tests skip themselves, so the suite stays green on machines without a
//! database.

#![allow(dead_code)]

use chrono::{Duration, NaiveTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use persistence::repositories::{BookingInput, BookingRepository, NewUser, UserRepository};

/// Connect to the test database, or `None` when none is configured.
pub async fn try_create_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    run_migrations(&pool).await;
    Some(pool)
}

/// Apply all migration files in order. Re-applying is harmless.
pub async fn run_migrations(pool: &PgPool) {
    let migration_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("persistence/src/migrations");

    let mut entries: Vec<_> = std::fs::read_dir(&migration_dir)
        .expect("Failed to read migrations directory")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|ext| ext == "sql").unwrap_or(false))
        .collect();

    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let sql = std::fs::read_to_string(entry.path()).expect("Failed to read migration file");
        // Already-applied migrations error on CREATE TABLE; ignore.
        let _ = sqlx::raw_sql(&sql).execute(pool).await;
    }
}

/// A unique, valid Indian mobile number derived from a UUID.
pub fn unique_phone() -> String {
    let n = u64::from_le_bytes(
        Uuid::new_v4().as_bytes()[..8]
            .try_into()
            .expect("uuid has 16 bytes"),
    );
    format!("9{:09}", n % 1_000_000_000)
}

/// Provision a staff account with coverage over one panchayath ward.
pub async fn create_staff(pool: &PgPool, panchayath_id: Uuid, ward: i32) -> Uuid {
    let repo = UserRepository::new(pool.clone());
    let user = repo
        .create_staff(
            NewUser {
                full_name: "Test Staff".to_string(),
                phone: unique_phone(),
                email: None,
                password_hash: "$argon2id$test".to_string(),
                role: "staff".to_string(),
            },
            panchayath_id,
            &[ward],
        )
        .await
        .expect("Failed to create staff");
    user.id
}

/// Provision a customer account.
pub async fn create_customer(pool: &PgPool) -> Uuid {
    let repo = UserRepository::new(pool.clone());
    let user = repo
        .create(NewUser {
            full_name: "Test Customer".to_string(),
            phone: unique_phone(),
            email: None,
            password_hash: "$argon2id$test".to_string(),
            role: "customer".to_string(),
        })
        .await
        .expect("Failed to create customer");
    user.id
}

/// Insert a panchayath and return its id.
pub async fn create_panchayath(pool: &PgPool, ward_count: i32) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO panchayaths (name, ward_count) VALUES ($1, $2) RETURNING id",
    )
    .bind(format!("Test Panchayath {}", Uuid::new_v4()))
    .bind(ward_count)
    .fetch_one(pool)
    .await
    .expect("Failed to create panchayath")
}

/// Create a booking in `pending` for the given coverage unit.
pub async fn create_booking(
    pool: &PgPool,
    customer_id: Option<Uuid>,
    panchayath_id: Uuid,
    ward: i32,
    required_staff_count: i32,
) -> Uuid {
    let repo = BookingRepository::new(pool.clone());
    let entity = repo
        .create(BookingInput {
            package_id: None,
            customer_name: "Test Customer".to_string(),
            customer_email: None,
            customer_phone: unique_phone(),
            customer_user_id: customer_id,
            address_line1: "12 Beach Road".to_string(),
            address_line2: None,
            city: "Kochi".to_string(),
            pincode: "682001".to_string(),
            landmark: None,
            panchayath_id: Some(panchayath_id),
            ward_number: Some(ward),
            scheduled_date: (Utc::now() + Duration::days(3)).date_naive(),
            scheduled_time: NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
            special_instructions: None,
            base_price: 300,
            addon_price: 250,
            total_price: 550,
            required_staff_count,
        })
        .await
        .expect("Failed to create booking");
    entity.id
}

/// Promote a booking to `confirmed` (the admin step).
pub async fn confirm_booking(pool: &PgPool, booking_id: Uuid) {
    BookingRepository::new(pool.clone())
        .update_status_guarded(booking_id, "pending", "confirmed")
        .await
        .expect("Failed to confirm booking")
        .expect("Booking was not pending");
}
