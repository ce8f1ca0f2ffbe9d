use rusqlite::{params, Connection};
use std::error::Error;
use tasklist_core::db::{latest_version, open_db, open_db_in_memory, schema_version, DbError};
use tasklist_core::{SqliteTaskStore, StoreError};

fn insert_task(
    conn: &Connection,
    uuid: &str,
    title: &str,
    completed: i64,
    created_at: i64,
) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO tasks (uuid, title, completed, created_at) VALUES (?1, ?2, ?3, ?4);",
        params![uuid, title, completed, created_at],
    )
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::ConstraintViolation)
    )
}

#[test]
fn fresh_database_reaches_latest_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    let columns: Vec<String> = conn
        .prepare("SELECT name FROM pragma_table_info('tasks') ORDER BY cid;")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(columns, vec!["uuid", "title", "completed", "created_at"]);
}

#[test]
fn completed_flag_only_accepts_zero_or_one() {
    let conn = open_db_in_memory().unwrap();

    insert_task(&conn, "done", "done", 1, 1).unwrap();
    insert_task(&conn, "open", "open", 0, 2).unwrap();
    let err = insert_task(&conn, "bad", "bad", 2, 3).unwrap_err();
    assert!(is_constraint_violation(&err));

    let err = conn
        .execute("UPDATE tasks SET completed = -1 WHERE uuid = 'done';", [])
        .unwrap_err();
    assert!(is_constraint_violation(&err));
}

#[test]
fn completed_defaults_to_false() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO tasks (uuid, title, created_at) VALUES ('a', 'fresh', 1);",
        [],
    )
    .unwrap();

    let completed: i64 = conn
        .query_row("SELECT completed FROM tasks WHERE uuid = 'a';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(completed, 0);
}

#[test]
fn blank_titles_and_duplicate_ids_are_rejected() {
    let conn = open_db_in_memory().unwrap();

    for blank in ["", "   ", "\t"] {
        let err = insert_task(&conn, "blank", blank, 0, 1).unwrap_err();
        assert!(is_constraint_violation(&err), "accepted title {blank:?}");
    }

    insert_task(&conn, "same", "first", 0, 1).unwrap();
    let err = insert_task(&conn, "same", "second", 0, 2).unwrap_err();
    assert!(is_constraint_violation(&err));
}

#[test]
fn created_at_index_is_newest_first() {
    let conn = open_db_in_memory().unwrap();

    let indexed: String = conn
        .query_row(
            "SELECT tbl_name FROM sqlite_master WHERE type = 'index' AND name = 'idx_tasks_created_at';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(indexed, "tasks");

    let (column, descending): (String, i64) = conn
        .query_row(
            "SELECT name, \"desc\" FROM pragma_index_xinfo('idx_tasks_created_at') WHERE key = 1;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(column, "created_at");
    assert_eq!(descending, 1);
}

#[test]
fn reopening_file_database_keeps_tasks_without_rerunning_steps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasklist.db");

    let first = open_db(&path).unwrap();
    insert_task(&first, "kept", "kept", 1, 7).unwrap();
    drop(first);

    let reopened = open_db(&path).unwrap();
    assert_eq!(schema_version(&reopened).unwrap(), latest_version());
    let (title, completed): (String, i64) = reopened
        .query_row(
            "SELECT title, completed FROM tasks WHERE uuid = 'kept';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(title, "kept");
    assert_eq!(completed, 1);
}

#[test]
fn database_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.pragma_update(None, "user_version", 999).unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found: 999, supported } if supported == latest_version()
    ));

    // The store surface keeps the reason in its single message.
    let store_err = StoreError::from(err);
    assert!(store_err.message().starts_with("task storage unavailable"));
    assert!(store_err.message().contains("999"));

    let untouched = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&untouched).unwrap(), 999);
}

#[test]
fn open_failure_names_the_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tasks.db");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Open { .. }));
    assert!(err.source().is_some());
    assert!(err.to_string().contains(&path.display().to_string()));

    let store_err = SqliteTaskStore::open(&path).err().unwrap();
    assert!(store_err.message().contains("tasks.db"));
}
