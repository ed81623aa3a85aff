//! Role checks for route guarding.

use staffhub_core::error::AppError;
use staffhub_entity::user::StaffRole;

use crate::extractors::AuthUser;

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if auth.role != StaffRole::Admin {
        return Err(AppError::authorization("Admin access required"));
    }
    Ok(())
}

/// Checks that the authenticated user has at least Manager role.
pub fn require_manager(auth: &AuthUser) -> Result<(), AppError> {
    match auth.role {
        StaffRole::Admin | StaffRole::Manager => Ok(()),
        _ => Err(AppError::authorization("Manager or Admin access required")),
    }
}
