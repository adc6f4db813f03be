//! Domain model for blog posts and their creators.
//!
//! # Responsibility
//! - Define the data structures shared by repository and service layers.
//!
//! # Invariants
//! - Posts reference creators by resolved `User`, persisted as `creatorId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod blog_post;
pub mod user;
