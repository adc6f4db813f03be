//! Data access for blog posts.
//! Entity, SQLite repository and reader-facing service for `blog_post` rows.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::blog_post::{BlogPost, PostId, SecurityLevel};
pub use model::user::{User, UserId, UserLookup};
pub use repo::blog_repo::{
    BlogRepository, PostFilter, RepoError, RepoResult, SaveMode, SqliteBlogRepository,
};
pub use service::blog_service::{
    BlogService, BlogServiceError, NewPostRequest, DEFAULT_FRONT_PAGE_COUNT,
};

/// Minimal health-check API for smoke probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
