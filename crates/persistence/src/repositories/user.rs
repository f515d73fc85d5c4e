//! User repository: registration, login lookup, permissions, coverage.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{StaffCoverageEntity, UserEntity};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str =
    "id, full_name, phone, email, password_hash, role, created_at, updated_at";

/// Input data for provisioning a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: String,
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Provision a customer or admin account.
    ///
    /// The unique phone index rejects duplicate signups; the caller maps the
    /// unique violation to a conflict.
    pub async fn create(&self, input: NewUser) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");

        let sql = format!(
            r#"
            INSERT INTO users (full_name, phone, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );
        let entity = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(&self.pool)
            .await?;

        timer.record();
        Ok(entity)
    }

    /// Provision a staff account together with its coverage units, in one
    /// transaction so a staff member never exists without coverage.
    pub async fn create_staff(
        &self,
        input: NewUser,
        panchayath_id: Uuid,
        ward_numbers: &[i32],
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_staff");
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO users (full_name, phone, email, password_hash, role)
            VALUES ($1, $2, $3, $4, 'staff')
            RETURNING {USER_COLUMNS}
            "#
        );
        let entity = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(&mut *tx)
            .await?;

        for ward in ward_numbers {
            sqlx::query(
                r#"
                INSERT INTO staff_coverage (staff_user_id, panchayath_id, ward_number)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(entity.id)
            .bind(panchayath_id)
            .bind(ward)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(entity)
    }

    /// Find user by normalized phone number.
    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_phone");

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE phone = $1");
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await;

        timer.record();
        result
    }

    /// Find user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        timer.record();
        result
    }

    /// Admin dashboard tabs granted to an admin account.
    pub async fn admin_tabs(&self, user_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("admin_tabs");

        let result = sqlx::query_scalar(
            "SELECT tab FROM admin_tab_permissions WHERE user_id = $1 ORDER BY tab",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Coverage units a staff member serves.
    pub async fn staff_coverage(
        &self,
        staff_id: Uuid,
    ) -> Result<Vec<StaffCoverageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("staff_coverage");

        let result = sqlx::query_as::<_, StaffCoverageEntity>(
            r#"
            SELECT staff_user_id, panchayath_id, ward_number
            FROM staff_coverage
            WHERE staff_user_id = $1
            ORDER BY panchayath_id, ward_number
            "#,
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }
}
