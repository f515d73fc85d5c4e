//! Panchayath repository: coverage reference data.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PanchayathEntity;
use crate::metrics::QueryTimer;

/// Repository for panchayath reference data.
#[derive(Clone)]
pub struct PanchayathRepository {
    pool: PgPool,
}

impl PanchayathRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active panchayaths, alphabetical.
    pub async fn list_active(&self) -> Result<Vec<PanchayathEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_panchayaths");

        let result = sqlx::query_as::<_, PanchayathEntity>(
            r#"
            SELECT id, name, district, ward_count, is_active
            FROM panchayaths
            WHERE is_active
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Find panchayath by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PanchayathEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_panchayath_by_id");

        let result = sqlx::query_as::<_, PanchayathEntity>(
            r#"
            SELECT id, name, district, ward_count, is_active
            FROM panchayaths
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }
}
