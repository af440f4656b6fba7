//! JWT claims types

use serde::{Deserialize, Serialize};

/// Claims carried by bearer tokens from the auth subsystem
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Audience
    pub aud: Option<String>,
}
