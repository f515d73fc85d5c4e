//! Read-only catalog and coverage reference data for the booking flow.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::catalog::{AddonService, CustomFeature, Package, ServiceCategory};
use domain::models::panchayath::Panchayath;
use persistence::repositories::{CatalogRepository, PanchayathRepository};

/// List active service categories.
///
/// GET /api/v1/catalog/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceCategory>>, ApiError> {
    let rows = CatalogRepository::new(state.pool.clone())
        .list_categories()
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// List active packages (featured ones drive promotional banners).
///
/// GET /api/v1/catalog/packages
pub async fn list_packages(State(state): State<AppState>) -> Result<Json<Vec<Package>>, ApiError> {
    let rows = CatalogRepository::new(state.pool.clone())
        .list_packages()
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesQuery {
    pub category_id: Option<Uuid>,
}

/// List features selectable for a category (global features included).
///
/// GET /api/v1/catalog/features?categoryId=...
pub async fn list_features(
    State(state): State<AppState>,
    Query(query): Query<FeaturesQuery>,
) -> Result<Json<Vec<CustomFeature>>, ApiError> {
    let rows = CatalogRepository::new(state.pool.clone())
        .list_features_for_category(query.category_id)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// List active add-on services.
///
/// GET /api/v1/catalog/addons
pub async fn list_addons(
    State(state): State<AppState>,
) -> Result<Json<Vec<AddonService>>, ApiError> {
    let rows = CatalogRepository::new(state.pool.clone())
        .list_addons()
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// List active panchayaths for address and signup forms.
///
/// GET /api/v1/catalog/panchayaths
pub async fn list_panchayaths(
    State(state): State<AppState>,
) -> Result<Json<Vec<Panchayath>>, ApiError> {
    let rows = PanchayathRepository::new(state.pool.clone())
        .list_active()
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_query_deserialization() {
        let query: FeaturesQuery =
            serde_json::from_str(r#"{"categoryId": "550e8400-e29b-41d4-a716-446655440000"}"#)
                .unwrap();
        assert!(query.category_id.is_some());

        let query: FeaturesQuery = serde_json::from_str("{}").unwrap();
        assert!(query.category_id.is_none());
    }
}
