//! Pricing-template catalog: categories, packages, features and add-ons.
//!
//! These are read-only inputs to the pricing engine; their mutation is an
//! administrative CRUD concern handled outside the booking core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A service category (e.g. deep cleaning, sofa cleaning).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

/// A fixed-price service package within a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: i64,
    pub duration_hours: i32,
    pub min_staff: i32,
    pub is_active: bool,
    pub display_order: i32,
    /// Shown in promotional banners when set.
    pub is_featured: bool,
    pub discount_amount: i64,
    pub created_at: DateTime<Utc>,
}

/// A selectable feature line item with a unit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFeature {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub price: i64,
    pub is_active: bool,
    pub display_order: i32,
}

/// An add-on service line item with a unit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonService {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub price: i64,
    pub is_active: bool,
    pub display_order: i32,
}

/// Maps a feature to a category it is selectable under.
///
/// A feature with no mapping rows is global and selectable everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFeatureMapping {
    pub category_id: Uuid,
    pub custom_feature_id: Uuid,
}
