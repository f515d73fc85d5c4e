//! Staff assignment entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::assignment::AssignmentStatus;

/// Database row mapping for the booking_assignments table.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub staff_user_id: Uuid,
    pub status: String,
    pub assigned_at: DateTime<Utc>,
}

impl AssignmentEntity {
    /// Convert to domain model.
    pub fn into_domain(self) -> domain::models::Assignment {
        let status = self
            .status
            .parse::<AssignmentStatus>()
            .unwrap_or(AssignmentStatus::Rejected);

        domain::models::Assignment {
            id: self.id,
            booking_id: self.booking_id,
            staff_user_id: self.staff_user_id,
            status,
            assigned_at: self.assigned_at,
        }
    }
}

impl From<AssignmentEntity> for domain::models::Assignment {
    fn from(entity: AssignmentEntity) -> Self {
        entity.into_domain()
    }
}
