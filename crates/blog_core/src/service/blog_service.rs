//! Blog use-case service.
//!
//! # Responsibility
//! - Provide reader-facing listings (front page, archive).
//! - Provide a publish flow that returns the stored post.
//!
//! # Invariants
//! - Reader-facing listings only return public posts whose time has passed.
//! - Service APIs never bypass repository validation/persistence contracts.

use crate::model::blog_post::{BlogPost, PostId, SecurityLevel};
use crate::model::user::User;
use crate::repo::blog_repo::{BlogRepository, PostFilter, RepoError, RepoResult};
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of posts shown on the front page when callers have no preference.
pub const DEFAULT_FRONT_PAGE_COUNT: i64 = 5;

/// Service error for publish flows.
#[derive(Debug)]
pub enum BlogServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write reported success/failure inconsistent with the request.
    InconsistentState(&'static str),
}

impl Display for BlogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent post state: {details}"),
        }
    }
}

impl Error for BlogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for BlogServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Request model for publishing a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPostRequest {
    pub subject: String,
    pub body: String,
    pub security: SecurityLevel,
    /// Scheduled time; `None` publishes at save time.
    pub time: Option<NaiveDateTime>,
}

/// Blog service facade over repository implementations.
pub struct BlogService<R: BlogRepository> {
    repo: R,
}

impl<R: BlogRepository> BlogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts or updates a post through the repository.
    pub fn save_post(&self, post: &mut BlogPost) -> RepoResult<bool> {
        self.repo.save_post(post)
    }

    /// Gets one post by id, regardless of visibility.
    pub fn get_post(&self, id: PostId) -> RepoResult<Option<BlogPost>> {
        self.repo.fetch_post_by_id(id)
    }

    /// Hard-deletes one post.
    pub fn delete_post(&self, id: PostId) -> RepoResult<bool> {
        self.repo.delete_post_by_id(id)
    }

    /// Creates and stores a new post for `creator`.
    ///
    /// # Contract
    /// - Returns the stored post with its assigned id and effective time.
    /// - An insert that reports no effect is `InconsistentState`.
    pub fn publish(
        &self,
        creator: User,
        request: NewPostRequest,
    ) -> Result<BlogPost, BlogServiceError> {
        let mut post = BlogPost::new(creator, request.subject, request.body, request.security);
        post.time = request.time;

        if !self.repo.save_post(&mut post)? {
            return Err(BlogServiceError::InconsistentState(
                "insert reported no stored row",
            ));
        }
        Ok(post)
    }

    /// Most recent published posts with bodies, newest first.
    pub fn front_page(&self, count: i64) -> RepoResult<Vec<BlogPost>> {
        self.repo.fetch_recent_posts(count, PostFilter::published())
    }

    /// Every published post without bodies, newest first.
    pub fn archive(&self) -> RepoResult<Vec<BlogPost>> {
        self.repo.fetch_all_posts_no_body(PostFilter::published())
    }
}
