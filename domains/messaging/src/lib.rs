//! Messaging domain: two-party threads, messages, read state

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Message, Thread, ThreadOrdering, ThreadPair, UserRef, MAX_TEXT_LENGTH};
pub use domain::error::MessagingError;
pub use domain::policy;

// Re-export repository types
pub use repository::{MessageRepository, MessagingRepositories, ThreadRepository, UserRepository};

// Re-export API types
pub use api::routes;
pub use api::MessagingState;
