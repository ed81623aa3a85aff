//! Validation of externally-issued identity tokens.
//!
//! Token issuance and password verification live in the external identity
//! collaborator; this module only validates and extracts the principal.

pub mod claims;
pub mod decoder;

pub use claims::Claims;
pub use decoder::TokenDecoder;
