//! Pricing engine: order totals from selected feature and add-on line items.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::catalog::{CategoryFeatureMapping, CustomFeature};

/// Fixed minimum order threshold, in whole currency units.
pub const MINIMUM_ORDER: i64 = 500;

/// One selected line item: a priced catalog entry and a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: Uuid,
    pub price: i64,
    pub quantity: u32,
}

/// Computed order total and the minimum-order verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotal {
    pub grand_total: i64,
    pub meets_minimum: bool,
}

/// Total for a single line item.
pub fn line_total(item: &LineItem) -> i64 {
    item.price * i64::from(item.quantity)
}

/// Computes the grand total over selected features and add-ons.
///
/// An empty selection totals zero and never meets the minimum, since the
/// minimum order is positive.
pub fn compute_order_total(features: &[LineItem], addons: &[LineItem]) -> OrderTotal {
    let grand_total: i64 = features.iter().chain(addons.iter()).map(line_total).sum();
    OrderTotal {
        grand_total,
        meets_minimum: grand_total >= MINIMUM_ORDER,
    }
}

/// Filters the catalog down to features selectable for a category.
///
/// A feature with no mapping rows is global; a mapped feature is eligible
/// only for the categories it is mapped to. With no category in play the
/// whole active set is selectable.
pub fn eligible_features<'a>(
    features: &'a [CustomFeature],
    mappings: &[CategoryFeatureMapping],
    category_id: Option<Uuid>,
) -> Vec<&'a CustomFeature> {
    features
        .iter()
        .filter(|f| {
            let feature_mappings: Vec<_> = mappings
                .iter()
                .filter(|m| m.custom_feature_id == f.id)
                .collect();
            match category_id {
                None => true,
                Some(cid) => {
                    feature_mappings.is_empty()
                        || feature_mappings.iter().any(|m| m.category_id == cid)
                }
            }
        })
        .collect()
}

/// A mutable selection of line items keyed by catalog id.
///
/// Quantities are clamped at zero; an item whose quantity reaches zero is
/// dropped from the selection rather than retained at count 0.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    items: BTreeMap<Uuid, LineItem>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an item's quantity outright; zero removes it.
    pub fn set(&mut self, id: Uuid, price: i64, quantity: u32) {
        if quantity == 0 {
            self.items.remove(&id);
        } else {
            self.items.insert(id, LineItem { id, price, quantity });
        }
    }

    /// Adds one to an item's quantity, inserting it on first use.
    pub fn increment(&mut self, id: Uuid, price: i64) {
        let quantity = self.items.get(&id).map(|i| i.quantity).unwrap_or(0) + 1;
        self.items.insert(id, LineItem { id, price, quantity });
    }

    /// Subtracts one from an item's quantity. Decrementing an absent item is
    /// a no-op; reaching zero drops the item.
    pub fn decrement(&mut self, id: Uuid) {
        if let Some(item) = self.items.get(&id).copied() {
            if item.quantity <= 1 {
                self.items.remove(&id);
            } else {
                self.items.insert(
                    id,
                    LineItem {
                        quantity: item.quantity - 1,
                        ..item
                    },
                );
            }
        }
    }

    pub fn remove(&mut self, id: Uuid) {
        self.items.remove(&id);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> Vec<LineItem> {
        self.items.values().copied().collect()
    }

    /// Grand total of this selection alone.
    pub fn total(&self) -> i64 {
        self.items.values().map(line_total).sum()
    }
}
