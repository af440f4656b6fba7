//! User-scoped API handlers
//!
//! These endpoints take a user id from the path and are accessible to that
//! user or to an admin — a deliberately different policy from the
//! participant-only thread endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use parley_auth::AuthUser;
use parley_common::{Pagination, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::api::handlers::threads::{to_thread_responses, ListThreadsQuery, ThreadResponse};
use crate::api::middleware::MessagingState;
use crate::domain::error::MessagingError;
use crate::domain::policy;

/// Unread count response DTO
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// List threads for a specific user (admin-or-self)
pub async fn list_user_threads(
    AuthUser(ctx): AuthUser,
    State(state): State<MessagingState>,
    Path(user_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<ListThreadsQuery>,
) -> Result<Json<Vec<ThreadResponse>>> {
    if !policy::can_access_user_scope(&ctx, user_id) {
        return Err(MessagingError::Forbidden.into());
    }

    let threads = state
        .repos
        .threads
        .list_for_user(
            user_id,
            query.ordering()?,
            pagination.limit(),
            pagination.offset(),
        )
        .await?;

    let responses = to_thread_responses(&state, threads).await?;
    Ok(Json(responses))
}

/// Count unread messages for a specific user (admin-or-self)
pub async fn unread_count(
    AuthUser(ctx): AuthUser,
    State(state): State<MessagingState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UnreadCountResponse>> {
    if !policy::can_access_user_scope(&ctx, user_id) {
        return Err(MessagingError::Forbidden.into());
    }

    let count = state.repos.messages.unread_count(user_id).await?;
    Ok(Json(UnreadCountResponse { count }))
}
