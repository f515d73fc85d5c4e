//! Application roles and admin dashboard tabs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role assigned to a user. Every user has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppRole {
    SuperAdmin,
    Admin,
    Staff,
    Customer,
}

impl AppRole {
    /// Returns the string representation for database storage and JWT claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::SuperAdmin => "super_admin",
            AppRole::Admin => "admin",
            AppRole::Staff => "staff",
            AppRole::Customer => "customer",
        }
    }

    /// Whether this role can operate the admin dashboard at all.
    pub fn is_admin(&self) -> bool {
        matches!(self, AppRole::SuperAdmin | AppRole::Admin)
    }
}

impl fmt::Display for AppRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AppRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(AppRole::SuperAdmin),
            "admin" => Ok(AppRole::Admin),
            "staff" => Ok(AppRole::Staff),
            "customer" => Ok(AppRole::Customer),
            _ => Err(format!(
                "Invalid role: {}. Must be one of: super_admin, admin, staff, customer",
                s
            )),
        }
    }
}

/// Surfaces of the admin dashboard gated per admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminTab {
    Dashboard,
    Bookings,
    Staff,
    Packages,
    Addons,
    CustomFeatures,
    Panchayaths,
    Reports,
    Settings,
}

impl AdminTab {
    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminTab::Dashboard => "dashboard",
            AdminTab::Bookings => "bookings",
            AdminTab::Staff => "staff",
            AdminTab::Packages => "packages",
            AdminTab::Addons => "addons",
            AdminTab::CustomFeatures => "custom_features",
            AdminTab::Panchayaths => "panchayaths",
            AdminTab::Reports => "reports",
            AdminTab::Settings => "settings",
        }
    }

    /// All known tabs, in display order.
    pub fn all() -> &'static [AdminTab] {
        &[
            AdminTab::Dashboard,
            AdminTab::Bookings,
            AdminTab::Staff,
            AdminTab::Packages,
            AdminTab::Addons,
            AdminTab::CustomFeatures,
            AdminTab::Panchayaths,
            AdminTab::Reports,
            AdminTab::Settings,
        ]
    }
}

impl fmt::Display for AdminTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AdminTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(AdminTab::Dashboard),
            "bookings" => Ok(AdminTab::Bookings),
            "staff" => Ok(AdminTab::Staff),
            "packages" => Ok(AdminTab::Packages),
            "addons" => Ok(AdminTab::Addons),
            "custom_features" => Ok(AdminTab::CustomFeatures),
            "panchayaths" => Ok(AdminTab::Panchayaths),
            "reports" => Ok(AdminTab::Reports),
            "settings" => Ok(AdminTab::Settings),
            _ => Err(format!("Unknown admin tab: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(AppRole::SuperAdmin.as_str(), "super_admin");
        assert_eq!(AppRole::Admin.as_str(), "admin");
        assert_eq!(AppRole::Staff.as_str(), "staff");
        assert_eq!(AppRole::Customer.as_str(), "customer");
    }

    #[test]
    fn test_role_from_str_round_trip() {
        for role in [
            AppRole::SuperAdmin,
            AppRole::Admin,
            AppRole::Staff,
            AppRole::Customer,
        ] {
            assert_eq!(role.as_str().parse::<AppRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_from_str_invalid() {
        assert!("manager".parse::<AppRole>().is_err());
        assert!("Admin".parse::<AppRole>().is_err()); // case sensitive
        assert!("".parse::<AppRole>().is_err());
    }

    #[test]
    fn test_role_is_admin() {
        assert!(AppRole::SuperAdmin.is_admin());
        assert!(AppRole::Admin.is_admin());
        assert!(!AppRole::Staff.is_admin());
        assert!(!AppRole::Customer.is_admin());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(
            serde_json::to_string(&AppRole::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        let parsed: AppRole = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(parsed, AppRole::Staff);
    }

    #[test]
    fn test_tab_round_trip() {
        for tab in AdminTab::all() {
            assert_eq!(tab.as_str().parse::<AdminTab>().unwrap(), *tab);
        }
    }

    #[test]
    fn test_tab_all_is_complete() {
        assert_eq!(AdminTab::all().len(), 9);
    }

    #[test]
    fn test_tab_serde() {
        assert_eq!(
            serde_json::to_string(&AdminTab::CustomFeatures).unwrap(),
            "\"custom_features\""
        );
    }
}
