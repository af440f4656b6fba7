//! Domain entities for the Messaging domain
//!
//! A thread is a private conversation between exactly two distinct users.
//! The participant pair is stored normalized as `(user_low, user_high)` so
//! the unordered pair is unique at the store level and a self-thread is
//! unrepresentable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_common::{Error, Result};

use crate::domain::error::MessagingError;

/// Maximum message text length (CHECK char_length(text) <= 1000)
pub const MAX_TEXT_LENGTH: usize = 1000;

/// Normalized unordered participant pair.
///
/// Construction fails for a self-pair; the two ids are ordered so that
/// `(a, b)` and `(b, a)` produce the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadPair {
    low: Uuid,
    high: Uuid,
}

impl ThreadPair {
    pub fn new(a: Uuid, b: Uuid) -> std::result::Result<Self, MessagingError> {
        if a == b {
            return Err(MessagingError::SelfThread);
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { low, high })
    }

    pub fn low(&self) -> Uuid {
        self.low
    }

    pub fn high(&self) -> Uuid {
        self.high
    }
}

/// Thread entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Thread {
    pub id: Uuid,
    pub user_low: Uuid,
    pub user_high: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    /// Create a new thread between a validated participant pair
    pub fn new(pair: ThreadPair) -> Self {
        let now = Utc::now();
        Thread {
            id: Uuid::new_v4(),
            user_low: pair.low(),
            user_high: pair.high(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether a user is one of the two participants
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.user_low == user_id || self.user_high == user_id
    }
}

/// Sort key for thread listings. The default is newest-updated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadOrdering {
    CreatedAsc,
    CreatedDesc,
    UpdatedAsc,
    #[default]
    UpdatedDesc,
}

impl ThreadOrdering {
    /// Parse the `ordering` query parameter (`created`, `-created`,
    /// `updated`, `-updated`). A leading `-` means descending.
    pub fn from_param(param: &str) -> Result<Self> {
        match param {
            "created" => Ok(Self::CreatedAsc),
            "-created" => Ok(Self::CreatedDesc),
            "updated" => Ok(Self::UpdatedAsc),
            "-updated" => Ok(Self::UpdatedDesc),
            other => Err(Error::Validation(format!(
                "Unknown ordering field: {}",
                other
            ))),
        }
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new unread message
    pub fn new(thread_id: Uuid, sender_id: Uuid, text: String) -> Result<Self> {
        Self::validate_text(&text)?;

        Ok(Message {
            id: Uuid::new_v4(),
            thread_id,
            sender_id,
            text,
            is_read: false,
            created_at: Utc::now(),
        })
    }

    /// Validate message text (non-empty after trimming, at most 1000 chars)
    fn validate_text(text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::Validation(
                "Message text cannot be empty or whitespace-only".to_string(),
            ));
        }
        if text.chars().count() > MAX_TEXT_LENGTH {
            return Err(Error::Validation(format!(
                "Message text must be at most {} characters",
                MAX_TEXT_LENGTH
            )));
        }
        Ok(())
    }
}

/// Lightweight user reference embedded in thread and message payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRef {
    pub id: Uuid,
    pub handle: String,
}
