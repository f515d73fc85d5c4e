//! Role-based access policy for the admin dashboard and status mutations.
//!
//! Both checks are pure functions over explicit actor parameters; handlers
//! pass the actor's role in rather than consulting any ambient session.

use std::collections::HashSet;

use crate::models::booking::BookingStatus;
use crate::models::role::{AdminTab, AppRole};

/// Whether an actor may see an admin dashboard tab.
///
/// Super admins see everything. Admins see the tabs in their granted set.
/// Staff and customers have their own surfaces and never the admin tabs.
pub fn can_view_tab(role: AppRole, granted: &HashSet<AdminTab>, tab: AdminTab) -> bool {
    match role {
        AppRole::SuperAdmin => true,
        AppRole::Admin => granted.contains(&tab),
        AppRole::Staff | AppRole::Customer => false,
    }
}

/// The two transitions staff may trigger on their own accepted jobs.
pub fn staff_transition_allowed(from: BookingStatus, to: BookingStatus) -> bool {
    matches!(
        (from, to),
        (BookingStatus::Assigned, BookingStatus::InProgress)
            | (BookingStatus::InProgress, BookingStatus::Completed)
    )
}

/// Whether a role may request the given status transition.
///
/// Admins may drive any transition the state machine allows (the forced
/// override path is authorized separately). Staff get only start/complete,
/// and handlers must additionally verify an accepted assignment. Customers
/// never mutate status directly.
pub fn can_mutate_booking_status(role: AppRole, from: BookingStatus, to: BookingStatus) -> bool {
    match role {
        AppRole::SuperAdmin | AppRole::Admin => from.can_transition_to(to),
        AppRole::Staff => staff_transition_allowed(from, to),
        AppRole::Customer => false,
    }
}

/// Whether a role may bypass the transition table via direct override.
pub fn can_force_booking_status(role: AppRole) -> bool {
    role.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(tabs: &[AdminTab]) -> HashSet<AdminTab> {
        tabs.iter().copied().collect()
    }

    #[test]
    fn test_super_admin_sees_every_tab() {
        let empty = HashSet::new();
        for tab in AdminTab::all() {
            assert!(can_view_tab(AppRole::SuperAdmin, &empty, *tab));
        }
    }

    #[test]
    fn test_admin_sees_only_granted_tabs() {
        let set = granted(&[AdminTab::Dashboard, AdminTab::Bookings]);
        assert!(can_view_tab(AppRole::Admin, &set, AdminTab::Dashboard));
        assert!(can_view_tab(AppRole::Admin, &set, AdminTab::Bookings));
        assert!(!can_view_tab(AppRole::Admin, &set, AdminTab::Settings));
        assert!(!can_view_tab(AppRole::Admin, &set, AdminTab::Packages));
    }

    #[test]
    fn test_staff_and_customer_never_see_admin_tabs() {
        let all = granted(AdminTab::all());
        for tab in AdminTab::all() {
            assert!(!can_view_tab(AppRole::Staff, &all, *tab));
            assert!(!can_view_tab(AppRole::Customer, &all, *tab));
        }
    }

    #[test]
    fn test_staff_transitions() {
        assert!(staff_transition_allowed(
            BookingStatus::Assigned,
            BookingStatus::InProgress
        ));
        assert!(staff_transition_allowed(
            BookingStatus::InProgress,
            BookingStatus::Completed
        ));

        assert!(!staff_transition_allowed(
            BookingStatus::Pending,
            BookingStatus::Confirmed
        ));
        assert!(!staff_transition_allowed(
            BookingStatus::Confirmed,
            BookingStatus::Assigned
        ));
        assert!(!staff_transition_allowed(
            BookingStatus::Assigned,
            BookingStatus::Completed
        ));
        assert!(!staff_transition_allowed(
            BookingStatus::InProgress,
            BookingStatus::Cancelled
        ));
    }

    #[test]
    fn test_admin_may_drive_any_table_transition() {
        for role in [AppRole::SuperAdmin, AppRole::Admin] {
            assert!(can_mutate_booking_status(
                role,
                BookingStatus::Pending,
                BookingStatus::Confirmed
            ));
            assert!(can_mutate_booking_status(
                role,
                BookingStatus::InProgress,
                BookingStatus::Cancelled
            ));
            // Not in the table -> not via the normal path
            assert!(!can_mutate_booking_status(
                role,
                BookingStatus::Completed,
                BookingStatus::Pending
            ));
        }
    }

    #[test]
    fn test_staff_limited_to_start_and_complete() {
        assert!(can_mutate_booking_status(
            AppRole::Staff,
            BookingStatus::Assigned,
            BookingStatus::InProgress
        ));
        assert!(!can_mutate_booking_status(
            AppRole::Staff,
            BookingStatus::Pending,
            BookingStatus::Confirmed
        ));
        assert!(!can_mutate_booking_status(
            AppRole::Staff,
            BookingStatus::Assigned,
            BookingStatus::Cancelled
        ));
    }

    #[test]
    fn test_customer_never_mutates_status() {
        for from in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Assigned,
            BookingStatus::InProgress,
        ] {
            for to in [
                BookingStatus::Confirmed,
                BookingStatus::Assigned,
                BookingStatus::InProgress,
                BookingStatus::Completed,
                BookingStatus::Cancelled,
            ] {
                assert!(!can_mutate_booking_status(AppRole::Customer, from, to));
            }
        }
    }

    #[test]
    fn test_force_override_is_admin_only() {
        assert!(can_force_booking_status(AppRole::SuperAdmin));
        assert!(can_force_booking_status(AppRole::Admin));
        assert!(!can_force_booking_status(AppRole::Staff));
        assert!(!can_force_booking_status(AppRole::Customer));
    }
}
