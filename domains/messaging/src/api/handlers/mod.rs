//! API handlers for the Messaging domain

pub mod messages;
pub mod threads;
pub mod users;
