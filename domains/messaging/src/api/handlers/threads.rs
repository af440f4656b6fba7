//! Thread management API handlers

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use parley_auth::AuthUser;
use parley_common::{Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::MessagingState;
use crate::domain::entities::{Thread, ThreadOrdering, UserRef};
use crate::domain::error::MessagingError;

/// Request for creating (or fetching) a thread with another user
#[derive(Debug, Deserialize, Validate)]
pub struct CreateThreadRequest {
    /// The user to open a thread with
    pub participant_id: Uuid,
}

/// Query params for thread listings
#[derive(Debug, Deserialize)]
pub struct ListThreadsQuery {
    /// Sort key: `created`, `-created`, `updated`, `-updated`
    pub ordering: Option<String>,
}

impl ListThreadsQuery {
    pub(crate) fn ordering(&self) -> Result<ThreadOrdering> {
        match self.ordering.as_deref() {
            Some(param) => ThreadOrdering::from_param(param),
            None => Ok(ThreadOrdering::default()),
        }
    }
}

/// Thread response DTO
#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub id: Uuid,
    pub participants: Vec<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assemble thread responses for a page of threads, fetching all
/// participants in one batched query.
pub(crate) async fn to_thread_responses(
    state: &MessagingState,
    threads: Vec<Thread>,
) -> Result<Vec<ThreadResponse>> {
    let thread_ids: Vec<Uuid> = threads.iter().map(|t| t.id).collect();
    let rows = state.repos.threads.participants_for(&thread_ids).await?;

    let mut by_thread: HashMap<Uuid, Vec<UserRef>> = HashMap::new();
    for row in rows {
        by_thread.entry(row.thread_id).or_default().push(UserRef {
            id: row.user_id,
            handle: row.handle,
        });
    }

    Ok(threads
        .into_iter()
        .map(|t| ThreadResponse {
            participants: by_thread.remove(&t.id).unwrap_or_default(),
            id: t.id,
            created_at: t.created_at,
            updated_at: t.updated_at,
        })
        .collect())
}

/// List threads for the authenticated user, newest-updated first by default
pub async fn list_threads(
    AuthUser(ctx): AuthUser,
    State(state): State<MessagingState>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<ListThreadsQuery>,
) -> Result<Json<Vec<ThreadResponse>>> {
    let threads = state
        .repos
        .threads
        .list_for_user(
            ctx.user.id,
            query.ordering()?,
            pagination.limit(),
            pagination.offset(),
        )
        .await?;

    let responses = to_thread_responses(&state, threads).await?;
    Ok(Json(responses))
}

/// Create a thread with another user, or return the existing one.
///
/// Idempotent: repeated calls for the same pair yield the same thread, and
/// the payload does not distinguish new from existing.
pub async fn create_thread(
    AuthUser(ctx): AuthUser,
    State(state): State<MessagingState>,
    ValidatedJson(req): ValidatedJson<CreateThreadRequest>,
) -> Result<(StatusCode, Json<ThreadResponse>)> {
    if req.participant_id == ctx.user.id {
        return Err(MessagingError::SelfThread.into());
    }

    if !state.repos.users.exists(req.participant_id).await? {
        return Err(MessagingError::ParticipantNotFound.into());
    }

    let thread = state
        .repos
        .threads
        .get_or_create(ctx.user.id, req.participant_id)
        .await?;

    let response = to_thread_responses(&state, vec![thread])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::Internal("Thread vanished during response assembly".to_string()))?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Delete a thread and all its messages.
///
/// Participant-only: admins get no override here, unlike the user-scoped
/// read endpoints.
pub async fn delete_thread(
    AuthUser(ctx): AuthUser,
    State(state): State<MessagingState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let thread = state
        .repos
        .threads
        .find(id)
        .await?
        .ok_or(MessagingError::NotFound("Thread"))?;

    if !state
        .repos
        .threads
        .is_participant(thread.id, ctx.user.id)
        .await?
    {
        return Err(MessagingError::NotParticipant.into());
    }

    state.repos.threads.delete(thread.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
