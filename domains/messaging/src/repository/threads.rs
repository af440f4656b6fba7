//! Thread repository
//!
//! All mutations run inside a single transaction scoped to the operation;
//! the unordered-pair unique constraint is the only cross-request guard.

use crate::domain::entities::{Thread, ThreadOrdering, ThreadPair};
use parley_common::{Error, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Participant row joined with the users table, fetched in one batch per
/// listing page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    pub thread_id: Uuid,
    pub user_id: Uuid,
    pub handle: String,
}

#[derive(Clone)]
pub struct ThreadRepository {
    pool: PgPool,
}

impl ThreadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find thread by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Thread>> {
        let thread = sqlx::query_as::<_, Thread>(
            r#"
            SELECT id, user_low, user_high, created_at, updated_at
            FROM threads
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(thread)
    }

    /// Find the thread whose participant set is exactly {a, b}.
    ///
    /// Order-independent. Threads whose participant count is not exactly 2
    /// are ignored rather than matched.
    pub async fn find_between(&self, a: Uuid, b: Uuid) -> Result<Option<Thread>> {
        let thread = sqlx::query_as::<_, Thread>(
            r#"
            SELECT t.id, t.user_low, t.user_high, t.created_at, t.updated_at
            FROM threads t
            WHERE EXISTS (
                    SELECT 1 FROM thread_participants
                    WHERE thread_id = t.id AND user_id = $1
                  )
              AND EXISTS (
                    SELECT 1 FROM thread_participants
                    WHERE thread_id = t.id AND user_id = $2
                  )
              AND (SELECT COUNT(*) FROM thread_participants WHERE thread_id = t.id) = 2
            LIMIT 1
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(thread)
    }

    /// Create a thread with exactly the two participants of `pair`.
    ///
    /// Thread row and both participant rows are written in one transaction.
    /// A concurrent duplicate insert trips the unordered-pair unique
    /// constraint (SQLSTATE 23505) and is resolved by returning the winner's
    /// thread instead.
    pub async fn create(&self, pair: ThreadPair) -> Result<Thread> {
        let thread = Thread::new(pair);

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Thread>(
            r#"
            INSERT INTO threads (id, user_low, user_high, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_low, user_high, created_at, updated_at
            "#,
        )
        .bind(thread.id)
        .bind(thread.user_low)
        .bind(thread.user_high)
        .bind(thread.created_at)
        .bind(thread.updated_at)
        .fetch_one(&mut *tx)
        .await;

        let created = match inserted {
            Ok(created) => created,
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                tx.rollback().await?;
                return self
                    .find_between(pair.low(), pair.high())
                    .await?
                    .ok_or_else(|| Error::Conflict("Thread already exists".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        sqlx::query(
            "INSERT INTO thread_participants (thread_id, user_id) VALUES ($1, $2), ($1, $3)",
        )
        .bind(created.id)
        .bind(pair.low())
        .bind(pair.high())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            thread_id = %created.id,
            user_low = %pair.low(),
            user_high = %pair.high(),
            "Created new thread"
        );
        Ok(created)
    }

    /// Return the existing thread for the pair, or create it.
    ///
    /// The only creation entry point exposed externally. Fails with a
    /// validation error for a self-pair.
    pub async fn get_or_create(&self, requester: Uuid, participant: Uuid) -> Result<Thread> {
        let pair = ThreadPair::new(requester, participant)?;

        if let Some(existing) = self.find_between(requester, participant).await? {
            return Ok(existing);
        }

        self.create(pair).await
    }

    /// List threads where the user is a participant
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        ordering: ThreadOrdering,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Thread>> {
        let order_clause = match ordering {
            ThreadOrdering::CreatedAsc => "t.created_at ASC",
            ThreadOrdering::CreatedDesc => "t.created_at DESC",
            ThreadOrdering::UpdatedAsc => "t.updated_at ASC",
            ThreadOrdering::UpdatedDesc => "t.updated_at DESC",
        };

        let sql = format!(
            r#"
            SELECT t.id, t.user_low, t.user_high, t.created_at, t.updated_at
            FROM threads t
            INNER JOIN thread_participants tp ON tp.thread_id = t.id
            WHERE tp.user_id = $1
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            order_clause
        );

        let threads = sqlx::query_as::<_, Thread>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(threads)
    }

    /// Delete a thread, cascading to its messages and participant rows
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Existence probe: is the user a participant of the thread?
    ///
    /// Used as a cheap guard before other operations; loads no collections.
    pub async fn is_participant(&self, thread_id: Uuid, user_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM thread_participants
                WHERE thread_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(thread_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Batch-fetch participants for a page of threads in a single query
    pub async fn participants_for(&self, thread_ids: &[Uuid]) -> Result<Vec<ParticipantRow>> {
        if thread_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT tp.thread_id, u.id AS user_id, u.handle
            FROM thread_participants tp
            INNER JOIN users u ON u.id = tp.user_id
            WHERE tp.thread_id = ANY($1)
            ORDER BY u.handle ASC
            "#,
        )
        .bind(thread_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
