//! Geographic coverage units.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A panchayath, the top-level coverage area a booking falls into.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panchayath {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// Number of wards; staff register for specific ward numbers 1..=ward_count.
    pub ward_count: i32,
    pub is_active: bool,
}

/// One coverage unit a staff member is registered to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageUnit {
    pub panchayath_id: Uuid,
    pub ward_number: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panchayath_serialization() {
        let p = Panchayath {
            id: Uuid::new_v4(),
            name: "Kumbalangi".to_string(),
            district: Some("Ernakulam".to_string()),
            ward_count: 18,
            is_active: true,
        };

        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"wardCount\":18"));
        assert!(json.contains("Kumbalangi"));
    }

    #[test]
    fn test_coverage_unit_equality() {
        let id = Uuid::new_v4();
        let a = CoverageUnit { panchayath_id: id, ward_number: 3 };
        let b = CoverageUnit { panchayath_id: id, ward_number: 3 };
        assert_eq!(a, b);
    }
}
