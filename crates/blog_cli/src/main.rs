//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `blog_core` linkage and storage bootstrap from a plain binary.
//! - Keep output deterministic for quick local sanity checks.

use blog_core::db::open_db_in_memory;
use blog_core::{BlogRepository, PostFilter, SqliteBlogRepository, User, UserId};
use std::collections::HashMap;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("blog_core ping={}", blog_core::ping());
    println!("blog_core version={}", blog_core::core_version());

    match probe_store() {
        Ok(post_count) => {
            println!("blog_core store=ready");
            println!("blog_core posts={post_count}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("blog_core store_probe_error={err}");
            ExitCode::FAILURE
        }
    }
}

fn probe_store() -> Result<usize, Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let users: HashMap<UserId, User> = HashMap::new();
    let repo = SqliteBlogRepository::try_new(&conn, &users)?;
    let posts = repo.fetch_all_posts_no_body(PostFilter::all())?;
    Ok(posts.len())
}
