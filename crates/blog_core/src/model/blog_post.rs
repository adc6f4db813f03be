//! Blog post domain model.
//!
//! # Responsibility
//! - Define the in-memory shape of one `blog_post` row.
//! - Carry the creator as a resolved `User`, never as a bare id.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one on first insert.
//! - Identity is by `id` only; unsaved posts never compare as the same record.
//! - No validation happens here; repositories enforce save-time rules.

use crate::clock::truncate_to_minute;
use crate::model::user::{User, UserId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned primary key of a blog post.
pub type PostId = i64;

/// Visibility classification stored in `blog_post.security`.
///
/// Only `PUBLIC` carries behavior (listing filters). Any other value is an
/// opaque non-public level owned by the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityLevel(pub i64);

impl SecurityLevel {
    /// Visible to everyone.
    pub const PUBLIC: SecurityLevel = SecurityLevel(1);

    /// Returns whether this level is the public level.
    pub fn is_public(self) -> bool {
        self == Self::PUBLIC
    }
}

impl Display for SecurityLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_public() {
            write!(f, "public")
        } else {
            write!(f, "level-{}", self.0)
        }
    }
}

/// One blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Primary key; `None` before first successful insert.
    pub id: Option<PostId>,
    /// Publication time. Future values schedule the post.
    pub time: Option<NaiveDateTime>,
    pub subject: String,
    /// `None` when the post was loaded for a listing without content.
    pub body: Option<String>,
    pub security: SecurityLevel,
    /// Author, resolved through the user lookup. Required for saving.
    pub creator: Option<User>,
}

impl BlogPost {
    /// Creates an unsaved post with no scheduled time.
    ///
    /// The insert path defaults `time` to "now" when it is still unset.
    pub fn new(
        creator: User,
        subject: impl Into<String>,
        body: impl Into<String>,
        security: SecurityLevel,
    ) -> Self {
        Self {
            id: None,
            time: None,
            subject: subject.into(),
            body: Some(body.into()),
            security,
            creator: Some(creator),
        }
    }

    /// Sets the publication time, builder style.
    pub fn with_time(mut self, time: NaiveDateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Replaces the body, builder style.
    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    /// Returns the creator id when a creator is attached.
    pub fn creator_id(&self) -> Option<UserId> {
        self.creator.as_ref().map(|creator| creator.id)
    }

    /// Returns whether the post has been persisted at least once.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns whether both values refer to the same stored row.
    ///
    /// Two posts without an id are never the same record, even when every
    /// other field matches.
    pub fn is_same_record(&self, other: &BlogPost) -> bool {
        matches!((self.id, other.id), (Some(left), Some(right)) if left == right)
    }

    /// Returns whether `PostFilter::published()` would list the post at `now`.
    ///
    /// Publication has minute granularity: the time must be at or before the
    /// start of the minute containing `now`.
    pub fn is_published_at(&self, now: NaiveDateTime) -> bool {
        let cutoff = truncate_to_minute(now);
        self.security.is_public() && self.time.is_some_and(|time| time <= cutoff)
    }
}
