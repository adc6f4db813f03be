//! `blog_post` table definition for stores this crate opens itself.
//!
//! Stores owned by an embedding application bring their own table; the
//! repository only checks its shape.

use crate::db::DbResult;
use log::debug;
use rusqlite::Connection;

const BLOG_POST_SCHEMA_SQL: &str = include_str!("blog_post.sql");

/// Creates the `blog_post` table and its `time` index when absent.
///
/// Existing tables and rows are left untouched.
pub fn apply_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(BLOG_POST_SCHEMA_SQL)?;
    debug!("event=db_schema module=db status=ok table=blog_post");
    Ok(())
}
