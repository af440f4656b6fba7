//! Repository implementations for the Messaging domain

pub mod messages;
pub mod threads;
pub mod users;

use sqlx::PgPool;

pub use messages::MessageRepository;
pub use threads::ThreadRepository;
pub use users::UserRepository;

/// Combined repository access for the Messaging domain
#[derive(Clone)]
pub struct MessagingRepositories {
    pool: PgPool,
    pub threads: ThreadRepository,
    pub messages: MessageRepository,
    pub users: UserRepository,
}

impl MessagingRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            threads: ThreadRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
