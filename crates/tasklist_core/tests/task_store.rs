use rusqlite::params;
use tasklist_core::db::open_db_in_memory;
use tasklist_core::{InMemoryTaskStore, SqliteTaskStore, Task, TaskStore, TaskUpdate};
use uuid::Uuid;

#[tokio::test]
async fn sqlite_create_assigns_id_timestamp_and_default_flag() {
    let store = SqliteTaskStore::open_in_memory().unwrap();

    let created = store.create("  Buy milk  ").await.unwrap();
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);
    assert!(created.created_at > 0);

    let listed = store.list().await.unwrap();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn sqlite_create_rejects_blank_title() {
    let store = SqliteTaskStore::open_in_memory().unwrap();

    let err = store.create("   ").await.unwrap_err();
    assert!(err.message().contains("empty"));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_list_orders_by_creation_time() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let first = store.create("first").await.unwrap();
    let second = store.create("second").await.unwrap();
    let third = store.create("third").await.unwrap();
    assert!(first.created_at < second.created_at);
    assert!(second.created_at < third.created_at);

    let newest_first = store.list().await.unwrap();
    let ids: Vec<_> = newest_first.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn sqlite_update_returns_full_record() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let created = store.create("write report").await.unwrap();

    let updated = store
        .update(created.id, TaskUpdate { completed: true })
        .await
        .unwrap();
    assert_eq!(
        updated,
        Task {
            completed: true,
            ..created.clone()
        }
    );

    let reverted = store
        .update(created.id, TaskUpdate { completed: false })
        .await
        .unwrap();
    assert_eq!(reverted, created);
}

#[tokio::test]
async fn sqlite_update_and_delete_unknown_id_fail_with_not_found() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let missing = Uuid::new_v4();

    let update_err = store
        .update(missing, TaskUpdate { completed: true })
        .await
        .unwrap_err();
    assert!(update_err.message().contains("not found"));

    let delete_err = store.delete(missing).await.unwrap_err();
    assert!(delete_err.message().contains(&missing.to_string()));
}

#[tokio::test]
async fn sqlite_delete_removes_row() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let keep = store.create("keep").await.unwrap();
    let dropped = store.create("dropped").await.unwrap();

    store.delete(dropped.id).await.unwrap();

    assert_eq!(store.list().await.unwrap(), vec![keep]);
    assert!(store.delete(dropped.id).await.is_err());
}

#[tokio::test]
async fn sqlite_list_rejects_corrupted_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO tasks (uuid, title, completed, created_at) VALUES (?1, ?2, 0, 1);",
        params!["not-a-uuid", "broken"],
    )
    .unwrap();
    let store = SqliteTaskStore::new(conn);

    let err = store.list().await.unwrap_err();
    assert!(err.message().contains("invalid persisted task data"));
}

#[tokio::test]
async fn sqlite_file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    let created = {
        let store = SqliteTaskStore::open(&path).unwrap();
        let created = store.create("survive restart").await.unwrap();
        store
            .update(created.id, TaskUpdate { completed: true })
            .await
            .unwrap()
    };

    let reopened = SqliteTaskStore::open(&path).unwrap();
    assert_eq!(
        reopened.list().await.unwrap(),
        vec![created]
    );
}

#[tokio::test]
async fn memory_store_follows_same_contract() {
    let store = InMemoryTaskStore::new();
    let first = store.create("first").await.unwrap();
    let second = store.create(" second ").await.unwrap();
    assert_eq!(second.title, "second");
    assert!(store.create("").await.is_err());

    let listed = store.list().await.unwrap();
    assert_eq!(listed, vec![second.clone(), first.clone()]);

    let toggled = store
        .update(first.id, TaskUpdate { completed: true })
        .await
        .unwrap();
    assert!(toggled.completed);

    store.delete(second.id).await.unwrap();
    assert!(store.delete(second.id).await.is_err());
    assert_eq!(
        store.list().await.unwrap(),
        vec![toggled]
    );
}

#[tokio::test]
async fn memory_store_keeps_newest_first_for_seeded_records() {
    let older = Task {
        id: Uuid::new_v4(),
        title: "older".to_string(),
        completed: false,
        created_at: 10,
    };
    let newer = Task {
        id: Uuid::new_v4(),
        title: "newer".to_string(),
        completed: true,
        created_at: 20,
    };
    let store = InMemoryTaskStore::with_tasks(vec![newer.clone(), older.clone()]);

    assert_eq!(
        store.list().await.unwrap(),
        vec![newer, older]
    );
}

#[test]
fn task_serializes_with_store_field_names() {
    let task = Task {
        id: Uuid::nil(),
        title: "Buy milk".to_string(),
        completed: false,
        created_at: 1_700_000_000_000,
    };

    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(value["title"], "Buy milk");
    assert_eq!(value["completed"], false);
    assert_eq!(value["created_at"], 1_700_000_000_000_i64);
    assert_eq!(value["id"], "00000000-0000-0000-0000-000000000000");
}
