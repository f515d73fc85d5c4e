//! Status-change audit hook.
//!
//! Admin overrides of the booking state machine must be reported for audit.
//! The audit store itself lives outside the core; this module defines the
//! entry shape, a builder for handlers, and a tracing-backed default sink.

use uuid::Uuid;

use crate::models::booking::BookingStatus;
use crate::models::role::AppRole;

/// One auditable status change on a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangeAudit {
    pub booking_id: Uuid,
    pub booking_number: String,
    pub actor_id: Uuid,
    pub actor_role: AppRole,
    pub from: BookingStatus,
    pub to: BookingStatus,
    /// True when the change bypassed the transition table.
    pub overridden: bool,
    pub reason: Option<String>,
}

impl StatusChangeAudit {
    /// Starts an audit entry for a table-conforming transition.
    pub fn transition(
        booking_id: Uuid,
        booking_number: impl Into<String>,
        actor_id: Uuid,
        actor_role: AppRole,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Self {
        Self {
            booking_id,
            booking_number: booking_number.into(),
            actor_id,
            actor_role,
            from,
            to,
            overridden: false,
            reason: None,
        }
    }

    /// Starts an audit entry for an admin override that bypassed the table.
    pub fn admin_override(
        booking_id: Uuid,
        booking_number: impl Into<String>,
        actor_id: Uuid,
        actor_role: AppRole,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Self {
        Self {
            overridden: true,
            ..Self::transition(booking_id, booking_number, actor_id, actor_role, from, to)
        }
    }

    /// Attaches a free-form reason supplied by the actor.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Destination for audit entries. Implementations must not fail the calling
/// operation; the status write has already happened when the sink runs.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &StatusChangeAudit);
}

/// Default sink: structured log records via `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: &StatusChangeAudit) {
        if entry.overridden {
            tracing::warn!(
                booking_id = %entry.booking_id,
                booking_number = %entry.booking_number,
                actor_id = %entry.actor_id,
                actor_role = %entry.actor_role,
                from = %entry.from,
                to = %entry.to,
                reason = entry.reason.as_deref().unwrap_or(""),
                "Booking status overridden outside the transition table"
            );
        } else {
            tracing::info!(
                booking_id = %entry.booking_id,
                booking_number = %entry.booking_number,
                actor_id = %entry.actor_id,
                actor_role = %entry.actor_role,
                from = %entry.from,
                to = %entry.to,
                "Booking status changed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_builder() {
        let booking_id = Uuid::new_v4();
        let actor_id = Uuid::new_v4();

        let entry = StatusChangeAudit::transition(
            booking_id,
            "BK-250301-00007",
            actor_id,
            AppRole::Admin,
            BookingStatus::Pending,
            BookingStatus::Confirmed,
        );

        assert_eq!(entry.booking_id, booking_id);
        assert_eq!(entry.actor_id, actor_id);
        assert!(!entry.overridden);
        assert!(entry.reason.is_none());
    }

    #[test]
    fn test_admin_override_builder() {
        let entry = StatusChangeAudit::admin_override(
            Uuid::new_v4(),
            "BK-250301-00008",
            Uuid::new_v4(),
            AppRole::SuperAdmin,
            BookingStatus::Completed,
            BookingStatus::InProgress,
        )
        .with_reason("customer dispute");

        assert!(entry.overridden);
        assert_eq!(entry.reason.as_deref(), Some("customer dispute"));
    }

    #[test]
    fn test_tracing_sink_does_not_panic() {
        let sink = TracingAuditSink;
        sink.record(&StatusChangeAudit::transition(
            Uuid::new_v4(),
            "BK-250301-00009",
            Uuid::new_v4(),
            AppRole::Staff,
            BookingStatus::Assigned,
            BookingStatus::InProgress,
        ));
    }
}
