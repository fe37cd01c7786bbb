use std::collections::HashSet;

use rusqlite::Connection;
use todolist_core::db::migrations::latest_version;
use todolist_core::{
    open_db_in_memory, RepoError, SqliteTodoListRepository, TodoItemList, TodoListRepository,
    TodoListValidationError,
};

#[test]
fn add_then_get_by_id_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let added = repo.add(&TodoItemList::new("groceries", "user-1")).unwrap();
    assert!(added.id > 0);

    let loaded = repo.get_by_id(added.id).unwrap().unwrap();
    assert_eq!(loaded.id, added.id);
    assert_eq!(loaded.name, "groceries");
    assert_eq!(loaded.user_id, "user-1");
}

#[test]
fn get_by_id_of_unknown_id_is_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    repo.add(&TodoItemList::new("only", "user-1")).unwrap();

    assert!(repo.get_by_id(999).unwrap().is_none());
    assert!(repo.get_by_id(0).unwrap().is_none());
}

#[test]
fn add_increases_row_count_by_one() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();
    repo.add(&TodoItemList::new("first", "user-1")).unwrap();

    let before = row_count(&conn);
    repo.add(&TodoItemList::new("second", "user-1")).unwrap();
    assert_eq!(row_count(&conn), before + 1);
}

#[test]
fn add_generates_increasing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let first = repo.add(&TodoItemList::new("a", "user-1")).unwrap();
    let second = repo.add(&TodoItemList::new("b", "user-2")).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn add_rejects_already_persisted_entity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let added = repo.add(&TodoItemList::new("a", "user-1")).unwrap();
    let err = repo.add(&added).unwrap_err();
    assert!(matches!(err, RepoError::AlreadyPersisted(id) if id == added.id));
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn get_all_returns_exactly_persisted_set() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let mut expected = HashSet::new();
    for (name, user) in [("a", "user-1"), ("b", "user-2"), ("c", "user-1")] {
        expected.insert(repo.add(&TodoItemList::new(name, user)).unwrap().id);
    }

    let all: HashSet<_> = repo
        .get_all()
        .unwrap()
        .into_iter()
        .map(|list| list.id)
        .collect();
    assert_eq!(all, expected);
}

#[test]
fn get_all_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn get_by_user_id_excludes_other_owners() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let mine_a = repo.add(&TodoItemList::new("mine a", "alice")).unwrap();
    repo.add(&TodoItemList::new("theirs", "bob")).unwrap();
    let mine_b = repo.add(&TodoItemList::new("mine b", "alice")).unwrap();

    let lists = repo.get_by_user_id("alice").unwrap();
    let ids: Vec<_> = lists.iter().map(|list| list.id).collect();
    assert_eq!(ids, vec![mine_a.id, mine_b.id]);
    assert!(lists.iter().all(|list| list.user_id == "alice"));

    assert!(repo.get_by_user_id("carol").unwrap().is_empty());
}

#[test]
fn update_persists_new_fields_without_new_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let mut list = repo.add(&TodoItemList::new("draft", "user-1")).unwrap();
    let before = row_count(&conn);

    list.name = "final".to_string();
    list.user_id = "user-2".to_string();
    repo.update(&list).unwrap();

    assert_eq!(row_count(&conn), before);
    let loaded = repo.get_by_id(list.id).unwrap().unwrap();
    assert_eq!(loaded, list);
}

#[test]
fn update_unknown_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let mut ghost = TodoItemList::new("ghost", "user-1");
    ghost.id = 41;
    let err = repo.update(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(41)));
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn validation_failure_blocks_add_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let add_err = repo.add(&TodoItemList::new(" ", "user-1")).unwrap_err();
    assert!(matches!(
        add_err,
        RepoError::Validation(TodoListValidationError::EmptyName)
    ));

    let mut list = repo.add(&TodoItemList::new("valid", "user-1")).unwrap();
    list.user_id = String::new();
    let update_err = repo.update(&list).unwrap_err();
    assert!(matches!(
        update_err,
        RepoError::Validation(TodoListValidationError::EmptyUserId)
    ));

    let stored = repo.get_by_id(list.id).unwrap().unwrap();
    assert_eq!(stored.user_id, "user-1");
}

#[test]
fn delete_removes_row_and_decrements_count() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let keep = repo.add(&TodoItemList::new("keep", "user-1")).unwrap();
    let gone = repo.add(&TodoItemList::new("gone", "user-1")).unwrap();
    let before = row_count(&conn);

    repo.delete(gone.id).unwrap();

    assert!(repo.get_by_id(gone.id).unwrap().is_none());
    assert!(repo.get_by_id(keep.id).unwrap().is_some());
    assert_eq!(row_count(&conn), before - 1);
}

#[test]
fn delete_unknown_id_is_silent_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();
    repo.add(&TodoItemList::new("keep", "user-1")).unwrap();

    repo.delete(12345).unwrap();
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn deleted_ids_are_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let first = repo.add(&TodoItemList::new("a", "user-1")).unwrap();
    let second = repo.add(&TodoItemList::new("b", "user-1")).unwrap();
    repo.delete(second.id).unwrap();

    let third = repo.add(&TodoItemList::new("c", "user-1")).unwrap();
    assert!(third.id > second.id);
    assert!(third.id > first.id);
}

#[test]
fn count_by_user_id_counts_only_owned_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    repo.add(&TodoItemList::new("a", "alice")).unwrap();
    repo.add(&TodoItemList::new("b", "alice")).unwrap();
    repo.add(&TodoItemList::new("c", "bob")).unwrap();

    assert_eq!(repo.count_by_user_id("alice").unwrap(), 2);
    assert_eq!(repo.count_by_user_id("bob").unwrap(), 1);
    assert_eq!(repo.count_by_user_id("carol").unwrap(), 0);
}

#[test]
fn read_rejects_invalid_persisted_row() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todo_item_lists (name, user_id) VALUES ('', 'user-1');",
        [],
    )
    .unwrap();
    let repo = SqliteTodoListRepository::try_new(&conn).unwrap();

    let err = repo.get_by_id(conn.last_insert_rowid()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTodoListRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_lists_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoListRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("todo_item_lists"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE todo_item_lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoListRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "todo_item_lists",
            column: "user_id"
        })
    ));
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM todo_item_lists;", [], |row| {
        row.get(0)
    })
    .unwrap()
}
