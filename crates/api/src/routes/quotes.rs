//! Order quote endpoint: the pricing engine over selected line items.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::services::pricing::{compute_order_total, Selection, MINIMUM_ORDER};
use persistence::repositories::CatalogRepository;

/// One selected catalog item with its quantity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub id: Uuid,
    pub quantity: u32,
}

/// Request body for computing an order total.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub features: Vec<QuoteItem>,
    #[serde(default)]
    pub addons: Vec<QuoteItem>,
}

/// Response body with the computed total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub grand_total: i64,
    pub meets_minimum: bool,
    pub minimum_order: i64,
}

/// Compute an order total for the selected features and add-ons.
///
/// POST /api/v1/quotes
///
/// Unit prices always come from the catalog, never from the client. A
/// selected feature that is inactive, unknown, or not selectable for the
/// requested category rejects the whole quote.
pub async fn compute_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let catalog = CatalogRepository::new(state.pool.clone());

    let feature_ids: Vec<Uuid> = request.features.iter().map(|i| i.id).collect();
    let addon_ids: Vec<Uuid> = request.addons.iter().map(|i| i.id).collect();

    let features = catalog
        .find_eligible_features(&feature_ids, request.category_id)
        .await?;
    let addons = catalog.find_active_addons(&addon_ids).await?;

    let feature_selection = resolve_selection(&request.features, |id| {
        features.iter().find(|f| f.id == id).map(|f| f.price)
    })
    .map_err(|id| {
        ApiError::Validation(format!("Feature {} is not available for this category", id))
    })?;

    let addon_selection = resolve_selection(&request.addons, |id| {
        addons.iter().find(|a| a.id == id).map(|a| a.price)
    })
    .map_err(|id| ApiError::Validation(format!("Add-on {} is not available", id)))?;

    let total = compute_order_total(&feature_selection.items(), &addon_selection.items());

    Ok(Json(QuoteResponse {
        grand_total: total.grand_total,
        meets_minimum: total.meets_minimum,
        minimum_order: MINIMUM_ORDER,
    }))
}

/// Fold the requested items into a [`Selection`], pricing each from the
/// catalog. Duplicate ids collapse (last one wins) and zero quantities are
/// dropped rather than retained; an unresolvable id is returned as the
/// error.
fn resolve_selection(
    items: &[QuoteItem],
    price_of: impl Fn(Uuid) -> Option<i64>,
) -> Result<Selection, Uuid> {
    let mut selection = Selection::new();
    for item in items {
        // A zero-quantity line never needs a catalog row; it is simply absent
        // from the selection.
        if item.quantity == 0 {
            selection.remove(item.id);
            continue;
        }
        let price = price_of(item.id).ok_or(item.id)?;
        selection.set(item.id, price, item.quantity);
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_request_deserialization() {
        let json = r#"{
            "categoryId": "550e8400-e29b-41d4-a716-446655440000",
            "features": [{"id": "650e8400-e29b-41d4-a716-446655440000", "quantity": 2}],
            "addons": []
        }"#;

        let request: QuoteRequest = serde_json::from_str(json).unwrap();
        assert!(request.category_id.is_some());
        assert_eq!(request.features.len(), 1);
        assert_eq!(request.features[0].quantity, 2);
        assert!(request.addons.is_empty());
    }

    #[test]
    fn test_quote_request_defaults_to_empty() {
        let request: QuoteRequest = serde_json::from_str("{}").unwrap();
        assert!(request.features.is_empty());
        assert!(request.addons.is_empty());
    }

    #[test]
    fn test_resolve_selection_prices_from_catalog() {
        let id = Uuid::new_v4();
        let items = vec![QuoteItem { id, quantity: 2 }];

        let selection =
            resolve_selection(&items, |i| if i == id { Some(300) } else { None }).unwrap();
        let lines = selection.items();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].price, 300);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(selection.total(), 600);
    }

    #[test]
    fn test_resolve_selection_unknown_id_fails() {
        let id = Uuid::new_v4();
        let items = vec![QuoteItem { id, quantity: 1 }];

        assert_eq!(resolve_selection(&items, |_| None).unwrap_err(), id);
    }

    #[test]
    fn test_resolve_selection_drops_zero_quantities() {
        let id = Uuid::new_v4();
        let items = vec![
            QuoteItem { id, quantity: 2 },
            QuoteItem { id, quantity: 0 },
        ];

        // The later zero-quantity line removes the item entirely.
        let selection = resolve_selection(&items, |_| Some(300)).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_quote_response_serialization() {
        let response = QuoteResponse {
            grand_total: 550,
            meets_minimum: true,
            minimum_order: MINIMUM_ORDER,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"grandTotal\":550"));
        assert!(json.contains("\"meetsMinimum\":true"));
        assert!(json.contains("\"minimumOrder\":500"));
    }
}
