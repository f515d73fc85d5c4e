//! Catalog repository: read access to pricing templates.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    AddonServiceEntity, CustomFeatureEntity, PackageEntity, ServiceCategoryEntity,
};
use crate::metrics::QueryTimer;

/// Repository for catalog reference data.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active service categories in display order.
    pub async fn list_categories(&self) -> Result<Vec<ServiceCategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_categories");

        let result = sqlx::query_as::<_, ServiceCategoryEntity>(
            r#"
            SELECT id, name, description, icon, display_order, is_active
            FROM service_categories
            WHERE is_active
            ORDER BY display_order ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Active packages in display order.
    pub async fn list_packages(&self) -> Result<Vec<PackageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_packages");

        let result = sqlx::query_as::<_, PackageEntity>(
            r#"
            SELECT id, category_id, name, description, price, duration_hours, min_staff,
                   is_active, display_order, is_featured, discount_amount, created_at
            FROM packages
            WHERE is_active
            ORDER BY display_order ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Active add-on services in display order.
    pub async fn list_addons(&self) -> Result<Vec<AddonServiceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_addons");

        let result = sqlx::query_as::<_, AddonServiceEntity>(
            r#"
            SELECT id, name, description, icon, price, is_active, display_order
            FROM addon_services
            WHERE is_active
            ORDER BY display_order ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Active features selectable for a category.
    ///
    /// A feature with no category mapping is global; a mapped feature appears
    /// only under its mapped categories. Without a category the whole active
    /// set is returned.
    pub async fn list_features_for_category(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<CustomFeatureEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_features_for_category");

        let result = sqlx::query_as::<_, CustomFeatureEntity>(
            r#"
            SELECT f.id, f.name, f.description, f.icon, f.price, f.is_active, f.display_order
            FROM custom_features f
            WHERE f.is_active
              AND (
                  $1::uuid IS NULL
                  OR NOT EXISTS (
                      SELECT 1 FROM category_feature_mappings m
                      WHERE m.custom_feature_id = f.id
                  )
                  OR EXISTS (
                      SELECT 1 FROM category_feature_mappings m
                      WHERE m.custom_feature_id = f.id AND m.category_id = $1
                  )
              )
            ORDER BY f.display_order ASC, f.name ASC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Resolve selected feature ids against the eligible set for a category.
    ///
    /// Ids that are inactive, unknown, or mapped to a different category are
    /// simply absent from the result; the caller rejects the request if
    /// anything it asked for is missing.
    pub async fn find_eligible_features(
        &self,
        ids: &[Uuid],
        category_id: Option<Uuid>,
    ) -> Result<Vec<CustomFeatureEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_eligible_features");

        let result = sqlx::query_as::<_, CustomFeatureEntity>(
            r#"
            SELECT f.id, f.name, f.description, f.icon, f.price, f.is_active, f.display_order
            FROM custom_features f
            WHERE f.id = ANY($1)
              AND f.is_active
              AND (
                  $2::uuid IS NULL
                  OR NOT EXISTS (
                      SELECT 1 FROM category_feature_mappings m
                      WHERE m.custom_feature_id = f.id
                  )
                  OR EXISTS (
                      SELECT 1 FROM category_feature_mappings m
                      WHERE m.custom_feature_id = f.id AND m.category_id = $2
                  )
              )
            "#,
        )
        .bind(ids)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Resolve selected add-on ids against the active set.
    pub async fn find_active_addons(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<AddonServiceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_addons");

        let result = sqlx::query_as::<_, AddonServiceEntity>(
            r#"
            SELECT id, name, description, icon, price, is_active, display_order
            FROM addon_services
            WHERE id = ANY($1) AND is_active
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }
}
