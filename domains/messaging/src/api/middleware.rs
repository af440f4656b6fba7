//! Messaging domain state and auth backend integration

use crate::MessagingRepositories;
use axum::extract::FromRef;
use parley_auth::AuthBackend;

/// Application state for the Messaging domain
#[derive(Clone)]
pub struct MessagingState {
    pub repos: MessagingRepositories,
    pub auth: AuthBackend,
}

impl FromRef<MessagingState> for AuthBackend {
    fn from_ref(state: &MessagingState) -> Self {
        state.auth.clone()
    }
}
