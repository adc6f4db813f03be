use blog_core::db::{apply_schema, open_db, open_db_in_memory};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_blog_post_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_schema_object_exists(&conn, "table", "blog_post");
    assert_schema_object_exists(&conn, "index", "idx_blog_post_time");
    assert_eq!(post_count(&conn), 0);
}

#[test]
fn in_memory_stores_are_independent() {
    let first = open_db_in_memory().unwrap();
    insert_row(&first, "only here");

    let second = open_db_in_memory().unwrap();
    assert_eq!(post_count(&first), 1);
    assert_eq!(post_count(&second), 0);
}

#[test]
fn reopening_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.db");

    let conn_first = open_db(&path).unwrap();
    insert_row(&conn_first, "kept");
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(post_count(&conn_second), 1);
}

#[test]
fn apply_schema_leaves_existing_table_alone() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE blog_post (
            id INTEGER PRIMARY KEY,
            time TEXT NOT NULL,
            subject TEXT NOT NULL,
            body TEXT,
            security INTEGER NOT NULL,
            creatorId INTEGER NOT NULL,
            slug TEXT
        );",
    )
    .unwrap();
    insert_row(&conn, "owned elsewhere");

    apply_schema(&conn).unwrap();
    apply_schema(&conn).unwrap();

    assert_eq!(post_count(&conn), 1);
    let has_slug: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('blog_post') WHERE name = 'slug';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(has_slug, 1);
}

fn insert_row(conn: &Connection, subject: &str) {
    conn.execute(
        "INSERT INTO blog_post (time, subject, body, security, creatorId)
         VALUES ('2024-01-01 00:00:00', ?1, NULL, 1, 1);",
        [subject],
    )
    .unwrap();
}

fn post_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM blog_post;", [], |row| row.get(0))
        .unwrap()
}

fn assert_schema_object_exists(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
