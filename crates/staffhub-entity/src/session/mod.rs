//! Session domain entities.

pub mod model;

pub use model::{CreateSession, Session, SessionSummary};

use serde::{Deserialize, Serialize};

/// Lifecycle status of a session. The transition `active → inactive` is
/// one-way; a new login always creates a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The session is open.
    Active,
    /// The session has been closed (logout, window expiry, forced).
    Inactive,
}

impl SessionStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = staffhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(staffhub_core::AppError::validation(format!(
                "Invalid session status: '{s}'"
            ))),
        }
    }
}

/// Why a session was closed. Recorded for observability only; the
/// resulting session state is identical for every reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "close_reason", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// Explicit user logout.
    Manual,
    /// Best-effort beacon from a closing tab or page.
    PageClose,
    /// The access window ended while the session was open.
    TimeRestriction,
    /// Access was attempted outside the window.
    OutsideAccessHours,
}

impl CloseReason {
    /// Parse a client-supplied reason, defaulting to [`CloseReason::Manual`].
    ///
    /// Closing a session is always safe, so an unknown or missing reason is
    /// never grounds to reject the request.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("page_close") => Self::PageClose,
            Some("time_restriction") => Self::TimeRestriction,
            Some("outside_access_hours") => Self::OutsideAccessHours,
            _ => Self::Manual,
        }
    }

    /// Return the reason as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::PageClose => "page_close",
            Self::TimeRestriction => "time_restriction",
            Self::OutsideAccessHours => "outside_access_hours",
        }
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lenient_known_reasons() {
        assert_eq!(
            CloseReason::parse_lenient(Some("page_close")),
            CloseReason::PageClose
        );
        assert_eq!(
            CloseReason::parse_lenient(Some("time_restriction")),
            CloseReason::TimeRestriction
        );
        assert_eq!(
            CloseReason::parse_lenient(Some("outside_access_hours")),
            CloseReason::OutsideAccessHours
        );
        assert_eq!(
            CloseReason::parse_lenient(Some("manual")),
            CloseReason::Manual
        );
    }

    #[test]
    fn test_parse_lenient_defaults_to_manual() {
        assert_eq!(CloseReason::parse_lenient(None), CloseReason::Manual);
        assert_eq!(
            CloseReason::parse_lenient(Some("something_else")),
            CloseReason::Manual
        );
        assert_eq!(CloseReason::parse_lenient(Some("")), CloseReason::Manual);
    }
}
