//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for blog posts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths require a resolvable creator before any SQL mutation.
//! - Read paths reject rows that cannot be mapped instead of masking them.

pub mod blog_repo;
