//! Message API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use parley_auth::AuthUser;
use parley_common::{Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::MessagingState;
use crate::domain::entities::{Message, UserRef};
use crate::domain::error::MessagingError;
use crate::domain::policy;
use crate::repository::messages::MessageWithSender;

/// Request for posting a message
#[derive(Debug, Deserialize, Validate)]
pub struct PostMessageRequest {
    /// Message text
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender: UserRef,
    pub text: String,
    pub thread_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl From<MessageWithSender> for MessageResponse {
    fn from(m: MessageWithSender) -> Self {
        Self {
            id: m.id,
            sender: UserRef {
                id: m.sender_id,
                handle: m.sender_handle,
            },
            text: m.text,
            thread_id: m.thread_id,
            created_at: m.created_at,
            is_read: m.is_read,
        }
    }
}

/// List messages of a thread, oldest first
pub async fn list_messages(
    AuthUser(ctx): AuthUser,
    State(state): State<MessagingState>,
    Path(thread_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<MessageResponse>>> {
    // Membership is re-checked here rather than trusted from the route
    if !state
        .repos
        .threads
        .is_participant(thread_id, ctx.user.id)
        .await?
    {
        return Err(MessagingError::NotParticipant.into());
    }

    let messages = state
        .repos
        .messages
        .list_by_thread(thread_id, pagination.limit(), pagination.offset())
        .await?;

    let responses: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Post a message to a thread
pub async fn post_message(
    AuthUser(ctx): AuthUser,
    State(state): State<MessagingState>,
    Path(thread_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<PostMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    if !state
        .repos
        .threads
        .is_participant(thread_id, ctx.user.id)
        .await?
    {
        return Err(MessagingError::NotParticipant.into());
    }

    let message = Message::new(thread_id, ctx.user.id, req.text)?;
    let created = state.repos.messages.create(&message).await?;

    let response = MessageResponse {
        id: created.id,
        sender: UserRef {
            id: ctx.user.id,
            handle: ctx.user.handle.clone(),
        },
        text: created.text,
        thread_id: created.thread_id,
        created_at: created.created_at,
        is_read: created.is_read,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Mark all eligible messages in a thread as read for the authenticated
/// user.
///
/// Eligibility (unread, not self-sent, actor is participant) is enforced by
/// the update itself; re-running is a no-op.
pub async fn mark_all_read(
    AuthUser(ctx): AuthUser,
    State(state): State<MessagingState>,
    Path(thread_id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state
        .repos
        .threads
        .is_participant(thread_id, ctx.user.id)
        .await?
    {
        return Err(MessagingError::NotParticipant.into());
    }

    let marked = state
        .repos
        .messages
        .mark_thread_read(thread_id, ctx.user.id)
        .await?;

    tracing::debug!(thread_id = %thread_id, marked, "Marked thread messages as read");
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a single message as read.
///
/// Allowed for an admin, or for a thread participant who did not send the
/// message. A message id that does not belong to the thread in the path is
/// a not-found, before any authorization outcome is revealed.
pub async fn mark_message_read(
    AuthUser(ctx): AuthUser,
    State(state): State<MessagingState>,
    Path((thread_id, message_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    let message = state
        .repos
        .messages
        .find(message_id)
        .await?
        .ok_or(MessagingError::NotFound("Message"))?;

    if message.thread_id != thread_id {
        return Err(MessagingError::NotFound("Message").into());
    }

    let is_participant = state
        .repos
        .threads
        .is_participant(thread_id, ctx.user.id)
        .await?;

    if !policy::can_mark_message_read(&ctx, message.sender_id, is_participant) {
        return Err(MessagingError::Forbidden.into());
    }

    state
        .repos
        .messages
        .mark_read(ctx.user.id, &[message_id])
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
