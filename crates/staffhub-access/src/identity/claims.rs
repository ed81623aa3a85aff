//! Identity token claims.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use staffhub_entity::user::StaffRole;

/// Claims carried by an access token from the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the staff member's user id.
    pub sub: Uuid,
    /// Role granted at issuance.
    pub role: StaffRole,
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// The authenticated user's id.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}
