//! SQLite storage bootstrap for tests and standalone binaries.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Create the `blog_post` table when the store does not have it yet.
//!
//! # Invariants
//! - Bootstrap never alters an existing `blog_post` table.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::apply_schema;

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure, surfaced to callers unchanged.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
