//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::role::AppRole;
use domain::models::user::UserProfile;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    /// Convert to domain model, dropping the credential.
    pub fn into_domain(self) -> UserProfile {
        let role = self.role.parse::<AppRole>().unwrap_or(AppRole::Customer);

        UserProfile {
            id: self.id,
            full_name: self.full_name,
            phone: self.phone,
            email: self.email,
            role,
            created_at: self.created_at,
        }
    }
}

impl From<UserEntity> for UserProfile {
    fn from(entity: UserEntity) -> Self {
        entity.into_domain()
    }
}
