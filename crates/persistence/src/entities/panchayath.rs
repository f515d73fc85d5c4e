//! Coverage unit entities (database row mappings).

use sqlx::FromRow;
use uuid::Uuid;

use domain::models::panchayath::{CoverageUnit, Panchayath};

/// Database row mapping for the panchayaths table.
#[derive(Debug, Clone, FromRow)]
pub struct PanchayathEntity {
    pub id: Uuid,
    pub name: String,
    pub district: Option<String>,
    pub ward_count: i32,
    pub is_active: bool,
}

impl From<PanchayathEntity> for Panchayath {
    fn from(e: PanchayathEntity) -> Self {
        Panchayath {
            id: e.id,
            name: e.name,
            district: e.district,
            ward_count: e.ward_count,
            is_active: e.is_active,
        }
    }
}

/// Database row mapping for the staff_coverage table.
#[derive(Debug, Clone, FromRow)]
pub struct StaffCoverageEntity {
    pub staff_user_id: Uuid,
    pub panchayath_id: Uuid,
    pub ward_number: i32,
}

impl From<StaffCoverageEntity> for CoverageUnit {
    fn from(e: StaffCoverageEntity) -> Self {
        CoverageUnit {
            panchayath_id: e.panchayath_id,
            ward_number: e.ward_number,
        }
    }
}
