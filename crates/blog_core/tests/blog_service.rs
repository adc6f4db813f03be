use blog_core::db::open_db_in_memory;
use blog_core::{
    BlogPost, BlogService, BlogServiceError, FixedClock, NewPostRequest, RepoError,
    SecurityLevel, SqliteBlogRepository, User, UserId, DEFAULT_FRONT_PAGE_COUNT,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

#[test]
fn publish_returns_stored_post_with_defaulted_time() {
    let conn = open_db_in_memory().unwrap();
    let users = users();
    let repo = SqliteBlogRepository::try_new(&conn, &users)
        .unwrap()
        .with_clock(FixedClock(now()));
    let service = BlogService::new(repo);

    let post = service
        .publish(ada(), request("hello", SecurityLevel::PUBLIC, None))
        .unwrap();

    assert!(post.id.is_some());
    assert_eq!(post.time, Some(now()));

    let loaded = service.get_post(post.id.unwrap()).unwrap().unwrap();
    assert!(loaded.is_same_record(&post));
    assert_eq!(loaded.subject, "hello");
}

#[test]
fn front_page_and_archive_show_only_published_posts() {
    let conn = open_db_in_memory().unwrap();
    let users = users();
    let repo = SqliteBlogRepository::try_new(&conn, &users)
        .unwrap()
        .with_clock(FixedClock(now()));
    let service = BlogService::new(repo);

    let visible = service
        .publish(ada(), request("visible", SecurityLevel::PUBLIC, Some(at(2024, 6, 1, 9))))
        .unwrap();
    service
        .publish(ada(), request("private", SecurityLevel(2), Some(at(2024, 6, 1, 10))))
        .unwrap();
    service
        .publish(ada(), request("scheduled", SecurityLevel::PUBLIC, Some(at(2024, 6, 2, 9))))
        .unwrap();

    let front = service.front_page(DEFAULT_FRONT_PAGE_COUNT).unwrap();
    assert_eq!(ids(&front), vec![visible.id.unwrap()]);
    assert!(front[0].body.is_some());

    let archive = service.archive().unwrap();
    assert_eq!(ids(&archive), vec![visible.id.unwrap()]);
    assert!(archive[0].body.is_none());
}

#[test]
fn front_page_is_capped_by_count() {
    let conn = open_db_in_memory().unwrap();
    let users = users();
    let repo = SqliteBlogRepository::try_new(&conn, &users)
        .unwrap()
        .with_clock(FixedClock(now()));
    let service = BlogService::new(repo);

    for hour in 0..7 {
        service
            .publish(ada(), request("post", SecurityLevel::PUBLIC, Some(at(2024, 5, 1, hour))))
            .unwrap();
    }

    let front = service.front_page(DEFAULT_FRONT_PAGE_COUNT).unwrap();
    assert_eq!(front.len(), 5);
    assert_eq!(front[0].time, Some(at(2024, 5, 1, 6)));

    assert!(matches!(
        service.front_page(-3),
        Err(RepoError::InvalidArgument(_))
    ));
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let users = users();
    let repo = SqliteBlogRepository::try_new(&conn, &users).unwrap();
    let service = BlogService::new(repo);

    let mut post = BlogPost::new(ada(), "draft", "text", SecurityLevel(2))
        .with_time(at(2024, 1, 1, 0));
    assert!(service.save_post(&mut post).unwrap());

    post.subject = "edited".to_string();
    assert!(service.save_post(&mut post).unwrap());
    let id = post.id.unwrap();
    assert_eq!(service.get_post(id).unwrap().unwrap().subject, "edited");

    assert!(service.delete_post(id).unwrap());
    assert!(!service.delete_post(id).unwrap());
    assert_eq!(service.get_post(id).unwrap(), None);
}

#[test]
fn publish_surfaces_repository_errors() {
    let conn = open_db_in_memory().unwrap();
    let users = users();
    let repo = SqliteBlogRepository::try_new(&conn, &users).unwrap();
    let service = BlogService::new(repo);

    conn.execute_batch("DROP TABLE blog_post;").unwrap();

    let err = service
        .publish(ada(), request("lost", SecurityLevel::PUBLIC, None))
        .unwrap_err();
    assert!(matches!(err, BlogServiceError::Repo(RepoError::Db(_))));
}

fn request(subject: &str, security: SecurityLevel, time: Option<NaiveDateTime>) -> NewPostRequest {
    NewPostRequest {
        subject: subject.to_string(),
        body: format!("{subject} body"),
        security,
        time,
    }
}

fn ids(posts: &[BlogPost]) -> Vec<i64> {
    posts.iter().map(|post| post.id.unwrap()).collect()
}

fn now() -> NaiveDateTime {
    at(2024, 6, 1, 12)
}

fn ada() -> User {
    User::new(1, "ada")
}

fn users() -> HashMap<UserId, User> {
    HashMap::from([(1, ada())])
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}
