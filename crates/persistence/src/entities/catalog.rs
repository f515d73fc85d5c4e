//! Catalog entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::catalog::{
    AddonService, CategoryFeatureMapping, CustomFeature, Package, ServiceCategory,
};

/// Database row mapping for the service_categories table.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceCategoryEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

impl From<ServiceCategoryEntity> for ServiceCategory {
    fn from(e: ServiceCategoryEntity) -> Self {
        ServiceCategory {
            id: e.id,
            name: e.name,
            description: e.description,
            icon: e.icon,
            display_order: e.display_order,
            is_active: e.is_active,
        }
    }
}

/// Database row mapping for the packages table.
#[derive(Debug, Clone, FromRow)]
pub struct PackageEntity {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub duration_hours: i32,
    pub min_staff: i32,
    pub is_active: bool,
    pub display_order: i32,
    pub is_featured: bool,
    pub discount_amount: i64,
    pub created_at: DateTime<Utc>,
}

impl From<PackageEntity> for Package {
    fn from(e: PackageEntity) -> Self {
        Package {
            id: e.id,
            category_id: e.category_id,
            name: e.name,
            description: e.description,
            price: e.price,
            duration_hours: e.duration_hours,
            min_staff: e.min_staff,
            is_active: e.is_active,
            display_order: e.display_order,
            is_featured: e.is_featured,
            discount_amount: e.discount_amount,
            created_at: e.created_at,
        }
    }
}

/// Database row mapping for the custom_features table.
#[derive(Debug, Clone, FromRow)]
pub struct CustomFeatureEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub price: i64,
    pub is_active: bool,
    pub display_order: i32,
}

impl From<CustomFeatureEntity> for CustomFeature {
    fn from(e: CustomFeatureEntity) -> Self {
        CustomFeature {
            id: e.id,
            name: e.name,
            description: e.description,
            icon: e.icon,
            price: e.price,
            is_active: e.is_active,
            display_order: e.display_order,
        }
    }
}

/// Database row mapping for the addon_services table.
#[derive(Debug, Clone, FromRow)]
pub struct AddonServiceEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub price: i64,
    pub is_active: bool,
    pub display_order: i32,
}

impl From<AddonServiceEntity> for AddonService {
    fn from(e: AddonServiceEntity) -> Self {
        AddonService {
            id: e.id,
            name: e.name,
            description: e.description,
            icon: e.icon,
            price: e.price,
            is_active: e.is_active,
            display_order: e.display_order,
        }
    }
}

/// Database row mapping for the category_feature_mappings table.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryFeatureMappingEntity {
    pub category_id: Uuid,
    pub custom_feature_id: Uuid,
}

impl From<CategoryFeatureMappingEntity> for CategoryFeatureMapping {
    fn from(e: CategoryFeatureMappingEntity) -> Self {
        CategoryFeatureMapping {
            category_id: e.category_id,
            custom_feature_id: e.custom_feature_id,
        }
    }
}
