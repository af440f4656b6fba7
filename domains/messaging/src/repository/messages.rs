//! Message repository
//!
//! Read-marking eligibility lives in the UPDATE clauses themselves: a row is
//! only touched when the actor is a thread participant, did not send the
//! message, and the message is still unread. Passing ineligible ids is safe
//! and counts as zero rows, never an error.

use crate::domain::entities::Message;
use chrono::{DateTime, Utc};
use parley_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Message row joined with the sender's user record for list responses
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageWithSender {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub sender_id: Uuid,
    pub sender_handle: String,
    pub text: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find message by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, thread_id, sender_id, text, is_read, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// Create a new message
    pub async fn create(&self, msg: &Message) -> Result<Message> {
        let created = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, thread_id, sender_id, text, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, thread_id, sender_id, text, is_read, created_at
            "#,
        )
        .bind(msg.id)
        .bind(msg.thread_id)
        .bind(msg.sender_id)
        .bind(&msg.text)
        .bind(msg.is_read)
        .bind(msg.created_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            message_id = %created.id,
            thread_id = %created.thread_id,
            "Created new message"
        );
        Ok(created)
    }

    /// List messages of a thread with sender details, oldest first
    pub async fn list_by_thread(
        &self,
        thread_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MessageWithSender>> {
        let messages = sqlx::query_as::<_, MessageWithSender>(
            r#"
            SELECT m.id, m.thread_id, m.sender_id, u.handle AS sender_handle,
                   m.text, m.is_read, m.created_at
            FROM messages m
            INNER JOIN users u ON u.id = m.sender_id
            WHERE m.thread_id = $1
            ORDER BY m.created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(thread_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Mark a set of messages as read on behalf of a user.
    ///
    /// Only rows the actor is eligible for are updated; the rest of the id
    /// set is left untouched. Returns the number of rows marked, so
    /// re-marking an already-read message reports 0 rather than failing.
    pub async fn mark_read(&self, user_id: Uuid, message_ids: &[Uuid]) -> Result<u64> {
        if message_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE messages m
            SET is_read = TRUE
            WHERE m.id = ANY($1)
              AND m.is_read = FALSE
              AND m.sender_id <> $2
              AND EXISTS (
                    SELECT 1 FROM thread_participants tp
                    WHERE tp.thread_id = m.thread_id AND tp.user_id = $2
                  )
            "#,
        )
        .bind(message_ids)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Mark every eligible message in a thread as read for a user.
    ///
    /// Same eligibility predicate as [`mark_read`](Self::mark_read), scoped
    /// to one thread.
    pub async fn mark_thread_read(&self, thread_id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE messages m
            SET is_read = TRUE
            WHERE m.thread_id = $1
              AND m.is_read = FALSE
              AND m.sender_id <> $2
              AND EXISTS (
                    SELECT 1 FROM thread_participants tp
                    WHERE tp.thread_id = $1 AND tp.user_id = $2
                  )
            "#,
        )
        .bind(thread_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Count unread messages across all of a user's threads.
    ///
    /// Uses the same predicate as the bulk marking path (participant,
    /// unread, not sent by the user), so mark-all followed by a count
    /// always yields 0.
    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages m
            INNER JOIN thread_participants tp
                ON tp.thread_id = m.thread_id AND tp.user_id = $1
            WHERE m.is_read = FALSE
              AND m.sender_id <> $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
