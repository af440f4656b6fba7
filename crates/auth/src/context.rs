//! Authorization context for authenticated users

use crate::types::AuthIdentity;

/// Represents an authenticated user context
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
}

impl AuthContext {
    /// Create new auth context for a user
    pub fn new(user: AuthIdentity) -> Self {
        Self { user }
    }

    /// Check if the user has the admin/staff role
    pub fn is_admin(&self) -> bool {
        self.user.is_admin
    }
}
