//! Identity token validation configuration.

use serde::{Deserialize, Serialize};

/// Settings for validating externally-issued access tokens.
///
/// Token issuance (and password verification) happens in the external
/// identity collaborator; this application only validates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// HMAC secret shared with the token issuer.
    pub token_secret: String,
    /// Expected `iss` claim. Empty disables issuer validation.
    #[serde(default)]
    pub issuer: String,
}
