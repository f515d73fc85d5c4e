//! User profile and staff coverage models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::AppRole;

/// A provisioned user account with its single application role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: AppRole,
    pub created_at: DateTime<Utc>,
}

/// Coverage units a staff member serves, as registered at signup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    pub user: UserProfile,
    pub coverage: Vec<super::panchayath::CoverageUnit>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::Name;
    use fake::Fake;

    #[test]
    fn test_user_profile_serialization() {
        let name: String = Name().fake();
        let profile = UserProfile {
            id: Uuid::new_v4(),
            full_name: name.clone(),
            phone: "9876543210".to_string(),
            email: None,
            role: AppRole::Staff,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"staff\""));
        assert!(json.contains("fullName"));
        assert!(json.contains(&name));
        assert!(!json.contains("email"));
    }
}
