//! Blog post repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Insert, update, fetch, list and hard-delete rows of `blog_post`.
//! - Resolve `creatorId` to a `User` through the injected lookup.
//!
//! # Invariants
//! - `save_post` rejects posts without a creator before touching the store.
//! - Id presence alone decides insert vs update.
//! - "Now" comes from the injected clock and is bound as a parameter; no
//!   server-side time functions are used.
//! - A row whose creator cannot be resolved fails the whole read.
//! - `false` from a write means "no row affected"; failures are `Err`.

use crate::clock::{truncate_to_minute, truncate_to_second, Clock, SystemClock};
use crate::db::DbError;
use crate::model::blog_post::{BlogPost, PostId, SecurityLevel};
use crate::model::user::{UserId, UserLookup};
use chrono::NaiveDateTime;
use log::debug;
use rusqlite::types::{FromSql, Value};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const POST_TABLE: &str = "blog_post";
const POST_COLUMNS: [&str; 6] = ["id", "time", "subject", "body", "security", "creatorId"];

const POST_SELECT_SQL: &str = "SELECT
    id,
    time,
    subject,
    body,
    security,
    creatorId
FROM blog_post";

const POST_SELECT_NO_BODY_SQL: &str = "SELECT
    id,
    time,
    subject,
    NULL AS body,
    security,
    creatorId
FROM blog_post";

/// Stored text format of `blog_post.time`. Lexical order is chronological.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIME_FORMAT_MINUTES: &str = "%Y-%m-%d %H:%M";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for blog post persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Structurally invalid post, or a row whose creator does not resolve.
    InvalidParameter(String),
    /// Caller-supplied scalar rejected before any store access.
    InvalidArgument(String),
    /// Persisted row could not be mapped onto a `BlogPost`.
    InvalidData(String),
    Db(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter(message) => write!(f, "invalid parameter: {message}"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted post data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Visibility filters for post listings. Flags combine with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Only posts whose security level is `SecurityLevel::PUBLIC`.
    pub public_only: bool,
    /// Only posts whose time is at or before the current minute.
    pub past_only: bool,
}

impl PostFilter {
    /// Every stored post.
    pub fn all() -> Self {
        Self::default()
    }

    /// What an anonymous reader may see: public and already published.
    pub fn published() -> Self {
        Self {
            public_only: true,
            past_only: true,
        }
    }
}

/// Write operation selected for one `save_post` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update(PostId),
}

impl SaveMode {
    pub fn for_post(post: &BlogPost) -> Self {
        match post.id {
            Some(id) => Self::Update(id),
            None => Self::Create,
        }
    }
}

/// Repository interface for blog post storage.
pub trait BlogRepository {
    /// Inserts or updates `post`, chosen by id presence.
    ///
    /// On a successful insert the store-assigned id (and a defaulted time)
    /// are written back into `post`.
    fn save_post(&self, post: &mut BlogPost) -> RepoResult<bool>;
    /// Loads one post with its body; `None` when no row has this id.
    fn fetch_post_by_id(&self, id: PostId) -> RepoResult<Option<BlogPost>>;
    /// Loads at most `count` posts with bodies, newest first.
    fn fetch_recent_posts(&self, count: i64, filter: PostFilter) -> RepoResult<Vec<BlogPost>>;
    /// Loads every matching post without bodies, newest first.
    fn fetch_all_posts_no_body(&self, filter: PostFilter) -> RepoResult<Vec<BlogPost>>;
    /// Hard-deletes one post. `false` when no row had this id.
    fn delete_post_by_id(&self, id: PostId) -> RepoResult<bool>;
}

/// SQLite-backed blog repository.
///
/// Borrows the connection and the user lookup; owns only its clock.
pub struct SqliteBlogRepository<'conn, U: ?Sized, C = SystemClock> {
    conn: &'conn Connection,
    users: &'conn U,
    clock: C,
}

impl<'conn, U: UserLookup + ?Sized> SqliteBlogRepository<'conn, U> {
    /// Constructs a repository over a connection that already has `blog_post`.
    ///
    /// The table may come from `db::open_db` or from the owning application;
    /// only its shape is checked.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the `blog_post` shape.
    pub fn try_new(conn: &'conn Connection, users: &'conn U) -> RepoResult<Self> {
        ensure_blog_connection_ready(conn)?;
        Ok(Self {
            conn,
            users,
            clock: SystemClock,
        })
    }
}

impl<'conn, U: ?Sized, C> SqliteBlogRepository<'conn, U, C> {
    /// Replaces the time source used for defaulting and `past_only`.
    pub fn with_clock<D: Clock>(self, clock: D) -> SqliteBlogRepository<'conn, U, D> {
        SqliteBlogRepository {
            conn: self.conn,
            users: self.users,
            clock,
        }
    }
}

impl<U: UserLookup + ?Sized, C: Clock> SqliteBlogRepository<'_, U, C> {
    fn insert_post(&self, post: &mut BlogPost, creator_id: UserId) -> RepoResult<bool> {
        let time = post
            .time
            .unwrap_or_else(|| truncate_to_second(self.clock.now()));

        let changed = self.conn.execute(
            "INSERT INTO blog_post (
                time,
                subject,
                body,
                security,
                creatorId
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                format_time(time),
                post.subject.as_str(),
                post.body.as_deref(),
                post.security.0,
                creator_id,
            ],
        )?;
        if changed == 0 {
            debug!("event=post_save module=repo status=no_effect mode=create");
            return Ok(false);
        }

        let id = self.conn.last_insert_rowid();
        if id == 0 {
            debug!("event=post_save module=repo status=missing_id mode=create");
            return Ok(false);
        }

        post.id = Some(id);
        post.time = Some(time);
        debug!("event=post_save module=repo status=ok mode=create post_id={id}");
        Ok(true)
    }

    fn update_post(&self, post: &BlogPost, id: PostId, creator_id: UserId) -> RepoResult<bool> {
        let time = post.time.ok_or_else(|| {
            RepoError::InvalidParameter(format!("post {id} has no time to store"))
        })?;

        let changed = self.conn.execute(
            "UPDATE blog_post
             SET
                time = ?1,
                subject = ?2,
                body = ?3,
                security = ?4,
                creatorId = ?5
             WHERE id = ?6;",
            params![
                format_time(time),
                post.subject.as_str(),
                post.body.as_deref(),
                post.security.0,
                creator_id,
                id,
            ],
        )?;

        let status = if changed == 0 { "no_match" } else { "ok" };
        debug!("event=post_save module=repo status={status} mode=update post_id={id}");
        Ok(changed > 0)
    }

    fn query_posts(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<BlogPost>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();

        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row, self.users)?);
        }

        Ok(posts)
    }
}

impl<U: UserLookup + ?Sized, C: Clock> BlogRepository for SqliteBlogRepository<'_, U, C> {
    fn save_post(&self, post: &mut BlogPost) -> RepoResult<bool> {
        let creator_id = post.creator_id().ok_or_else(|| {
            RepoError::InvalidParameter("invalid user: post has no creator".to_string())
        })?;

        match SaveMode::for_post(post) {
            SaveMode::Create => self.insert_post(post, creator_id),
            SaveMode::Update(id) => self.update_post(post, id, creator_id),
        }
    }

    fn fetch_post_by_id(&self, id: PostId) -> RepoResult<Option<BlogPost>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_post_row(row, self.users)?));
        }

        Ok(None)
    }

    fn fetch_recent_posts(&self, count: i64, filter: PostFilter) -> RepoResult<Vec<BlogPost>> {
        if count < 0 {
            return Err(RepoError::InvalidArgument(format!(
                "count must be a non-negative integer, got {count}"
            )));
        }

        let (where_clause, mut bind_values) = build_filter_clause(filter, self.clock.now());
        let sql = format!("{POST_SELECT_SQL}{where_clause} ORDER BY time DESC LIMIT ?");
        bind_values.push(Value::Integer(count));

        self.query_posts(&sql, bind_values)
    }

    fn fetch_all_posts_no_body(&self, filter: PostFilter) -> RepoResult<Vec<BlogPost>> {
        let (where_clause, bind_values) = build_filter_clause(filter, self.clock.now());
        let sql = format!("{POST_SELECT_NO_BODY_SQL}{where_clause} ORDER BY time DESC");

        self.query_posts(&sql, bind_values)
    }

    fn delete_post_by_id(&self, id: PostId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM blog_post WHERE id = ?1;", [id])?;

        let status = if changed == 0 { "no_match" } else { "ok" };
        debug!("event=post_delete module=repo status={status} post_id={id}");
        Ok(changed > 0)
    }
}

fn format_time(value: NaiveDateTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

fn parse_time(value: &str) -> RepoResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, TIME_FORMAT_MINUTES))
        .map_err(|_| RepoError::InvalidData(format!("invalid time `{value}` in blog_post.time")))
}

/// Builds the optional WHERE clause for listing filters.
///
/// `past_only` compares against `now` truncated to the minute.
fn build_filter_clause(filter: PostFilter, now: NaiveDateTime) -> (String, Vec<Value>) {
    let mut parts: Vec<&str> = Vec::new();
    let mut bind_values = Vec::new();

    if filter.public_only {
        parts.push("security = ?");
        bind_values.push(Value::Integer(SecurityLevel::PUBLIC.0));
    }

    if filter.past_only {
        parts.push("time <= ?");
        bind_values.push(Value::Text(format_time(truncate_to_minute(now))));
    }

    if parts.is_empty() {
        return (String::new(), bind_values);
    }

    (format!(" WHERE {}", parts.join(" AND ")), bind_values)
}

fn parse_post_row<U: UserLookup + ?Sized>(row: &Row<'_>, users: &U) -> RepoResult<BlogPost> {
    let id: PostId = column(row, "id")?;
    let time_text: String = column(row, "time")?;
    let creator_id: UserId = column(row, "creatorId")?;

    let creator = users.get_user(creator_id).ok_or_else(|| {
        RepoError::InvalidParameter(format!(
            "no such user {creator_id} for blog_post.id={id}"
        ))
    })?;

    Ok(BlogPost {
        id: Some(id),
        time: Some(parse_time(&time_text)?),
        subject: column(row, "subject")?,
        body: column(row, "body")?,
        security: SecurityLevel(column(row, "security")?),
        creator: Some(creator),
    })
}

fn column<T: FromSql>(row: &Row<'_>, name: &'static str) -> RepoResult<T> {
    row.get(name)
        .map_err(|err| RepoError::InvalidData(format!("column `{name}` in blog_post: {err}")))
}

fn ensure_blog_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, POST_TABLE)? {
        return Err(RepoError::MissingRequiredTable(POST_TABLE));
    }

    for column in POST_COLUMNS {
        if !table_has_column(conn, POST_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: POST_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current.eq_ignore_ascii_case(column) {
            return Ok(true);
        }
    }
    Ok(false)
}
