//! Staff role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles carried by identity tokens.
///
/// Roles are ordered by privilege level: Admin > Manager > Staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "staff_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    /// Full system administrator. Exempt from the access window.
    Admin,
    /// Can view live sessions and session history.
    Manager,
    /// Regular staff member.
    Staff,
}

impl StaffRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Manager => 2,
            Self::Staff => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &StaffRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role is exempt from access-window enforcement.
    pub fn bypasses_window(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role may view other users' sessions.
    pub fn is_manager_or_above(&self) -> bool {
        self.has_at_least(&Self::Manager)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = staffhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(staffhub_core::AppError::validation(format!(
                "Invalid staff role: '{s}'. Expected one of: admin, manager, staff"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(StaffRole::Admin.has_at_least(&StaffRole::Staff));
        assert!(StaffRole::Admin.has_at_least(&StaffRole::Admin));
        assert!(StaffRole::Manager.is_manager_or_above());
        assert!(!StaffRole::Staff.is_manager_or_above());
    }

    #[test]
    fn test_window_bypass() {
        assert!(StaffRole::Admin.bypasses_window());
        assert!(!StaffRole::Manager.bypasses_window());
        assert!(!StaffRole::Staff.bypasses_window());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<StaffRole>().unwrap(), StaffRole::Admin);
        assert_eq!("STAFF".parse::<StaffRole>().unwrap(), StaffRole::Staff);
        assert!("invalid".parse::<StaffRole>().is_err());
    }
}
