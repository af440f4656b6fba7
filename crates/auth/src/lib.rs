//! Authentication middleware for the Parley API
//!
//! Provides JWT validation and axum extractors that work with any domain
//! state implementing `FromRef<S>` for `AuthBackend`. Token issuance is
//! owned by the external auth subsystem; this crate only validates.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
mod types;

pub use backend::AuthBackend;
pub use claims::Claims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::AuthUser;
pub use types::AuthIdentity;
