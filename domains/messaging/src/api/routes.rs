//! Route definitions for the Messaging domain API

use axum::{
    routing::{delete, get, patch},
    Router,
};

use super::handlers::{messages, threads, users};
use super::middleware::MessagingState;

/// Create thread routes
fn thread_routes() -> Router<MessagingState> {
    Router::new()
        .route(
            "/v1/threads",
            get(threads::list_threads).post(threads::create_thread),
        )
        .route("/v1/threads/{id}", delete(threads::delete_thread))
}

/// Create message routes
fn message_routes() -> Router<MessagingState> {
    Router::new()
        .route(
            "/v1/threads/{thread_id}/messages",
            get(messages::list_messages)
                .post(messages::post_message)
                .patch(messages::mark_all_read),
        )
        .route(
            "/v1/threads/{thread_id}/messages/{message_id}",
            patch(messages::mark_message_read),
        )
}

/// Create user-scoped routes
fn user_routes() -> Router<MessagingState> {
    Router::new()
        .route("/v1/users/{user_id}/threads", get(users::list_user_threads))
        .route(
            "/v1/users/{user_id}/unread-messages-count",
            get(users::unread_count),
        )
}

/// Create all Messaging domain API routes
pub fn routes() -> Router<MessagingState> {
    Router::new()
        .merge(thread_routes())
        .merge(message_routes())
        .merge(user_routes())
}
