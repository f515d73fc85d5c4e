//! Staff assignment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Outcome of a staff member acting on an open booking.
///
/// A rejected assignment is never flipped back to accepted; re-offering a
/// rejected booking is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Accepted,
    Rejected,
}

impl AssignmentStatus {
    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Accepted => "accepted",
            AssignmentStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(AssignmentStatus::Accepted),
            "rejected" => Ok(AssignmentStatus::Rejected),
            _ => Err(format!(
                "Invalid assignment status: {}. Must be accepted or rejected",
                s
            )),
        }
    }
}

/// Record of one staff member's acceptance or rejection of a booking.
///
/// At most one row exists per (booking, staff member) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub staff_user_id: Uuid,
    pub status: AssignmentStatus,
    pub assigned_at: DateTime<Utc>,
}

/// Response payload after a staff member accepts a job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptJobResponse {
    pub assignment: Assignment,
    /// True when this acceptance filled the last slot and the booking moved
    /// to assigned.
    pub booking_assigned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [AssignmentStatus::Accepted, AssignmentStatus::Rejected] {
            assert_eq!(
                status.as_str().parse::<AssignmentStatus>().unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_status_from_str_invalid() {
        assert!("declined".parse::<AssignmentStatus>().is_err());
        assert!("ACCEPTED".parse::<AssignmentStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&AssignmentStatus::Rejected).unwrap(),
            "\"rejected\""
        );
    }

    #[test]
    fn test_accept_job_response_serialization() {
        let response = AcceptJobResponse {
            assignment: Assignment {
                id: Uuid::new_v4(),
                booking_id: Uuid::new_v4(),
                staff_user_id: Uuid::new_v4(),
                status: AssignmentStatus::Accepted,
                assigned_at: Utc::now(),
            },
            booking_assigned: true,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"bookingAssigned\":true"));
        assert!(json.contains("\"accepted\""));
    }
}
