//! Auth read-model types
//!
//! Lightweight view of the externally-owned users table. Carries only the
//! fields needed for authentication and authorization decisions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Lightweight identity for authenticated users.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub handle: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
