//! To-do list repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `todo_item_lists` storage.
//! - Provide owner-scoped seek pagination ordered by id.
//!
//! # Invariants
//! - Write paths call `TodoItemList::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Paged reads never return an id less than or equal to the cursor id.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::page::{CursorError, PageCursor, PagedResult, PaginationRequest};
use crate::model::todo_list::{TodoItemList, TodoListId, TodoListValidationError};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_LIST_TABLE: &str = "todo_item_lists";
const TODO_LIST_REQUIRED_COLUMNS: &[&str] = &["id", "name", "user_id", "updated_at"];

const TODO_LIST_SELECT_SQL: &str = "SELECT
    id,
    name,
    user_id
FROM todo_item_lists";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for to-do list persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoListValidationError),
    Db(DbError),
    NotFound(TodoListId),
    /// `add` was handed an entity that already carries a storage id.
    AlreadyPersisted(TodoListId),
    InvalidData(String),
    InvalidPageSize(u32),
    InvalidCursor(CursorError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo list not found: {id}"),
            Self::AlreadyPersisted(id) => {
                write!(f, "todo list already persisted with id {id}")
            }
            Self::InvalidData(message) => {
                write!(f, "invalid persisted todo list data: {message}")
            }
            Self::InvalidPageSize(size) => {
                write!(f, "page size must be positive, got {size}")
            }
            Self::InvalidCursor(err) => write!(f, "invalid page cursor: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidCursor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoListValidationError> for RepoError {
    fn from(value: TodoListValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CursorError> for RepoError {
    fn from(value: CursorError) -> Self {
        Self::InvalidCursor(value)
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

/// Repository interface for to-do list CRUD and paging.
pub trait TodoListRepository {
    /// Gets one list by id; `None` when no such id exists.
    fn get_by_id(&self, id: TodoListId) -> RepoResult<Option<TodoItemList>>;
    /// Lists every persisted list ordered by id.
    fn get_all(&self) -> RepoResult<Vec<TodoItemList>>;
    /// Lists every list owned by `user_id` ordered by id.
    fn get_by_user_id(&self, user_id: &str) -> RepoResult<Vec<TodoItemList>>;
    /// Inserts an unsaved list and returns it with the storage-generated id.
    fn add(&self, list: &TodoItemList) -> RepoResult<TodoItemList>;
    /// Persists `name` and `user_id` of an existing list identified by id.
    fn update(&self, list: &TodoItemList) -> RepoResult<()>;
    /// Removes a list. Removing an unknown id succeeds without effect.
    fn delete(&self, id: TodoListId) -> RepoResult<()>;
    /// Returns one page of `user_id`'s lists resuming after the request cursor.
    fn get_paged(
        &self,
        user_id: &str,
        request: &PaginationRequest,
    ) -> RepoResult<PagedResult<TodoItemList>>;
    /// Counts lists owned by `user_id`.
    fn count_by_user_id(&self, user_id: &str) -> RepoResult<u64>;
}

/// SQLite-backed to-do list repository bound to a caller-held connection.
pub struct SqliteTodoListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoListRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema does
    ///   not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TodoListRepository for SqliteTodoListRepository<'_> {
    fn get_by_id(&self, id: TodoListId) -> RepoResult<Option<TodoItemList>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_LIST_SELECT_SQL} WHERE id = ?1;"))?;
        let list = stmt.query_row([id], read_row).optional()?;
        list.map(check_row).transpose()
    }

    fn get_all(&self) -> RepoResult<Vec<TodoItemList>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_LIST_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], read_row)?;
        collect_rows(rows)
    }

    fn get_by_user_id(&self, user_id: &str) -> RepoResult<Vec<TodoItemList>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_LIST_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY id ASC;"
        ))?;
        let rows = stmt.query_map([user_id], read_row)?;
        collect_rows(rows)
    }

    fn add(&self, list: &TodoItemList) -> RepoResult<TodoItemList> {
        list.validate()?;
        if list.is_persisted() {
            return Err(RepoError::AlreadyPersisted(list.id));
        }

        self.conn.execute(
            "INSERT INTO todo_item_lists (name, user_id) VALUES (?1, ?2);",
            params![list.name.as_str(), list.user_id.as_str()],
        )?;

        Ok(TodoItemList {
            id: self.conn.last_insert_rowid(),
            ..list.clone()
        })
    }

    fn update(&self, list: &TodoItemList) -> RepoResult<()> {
        list.validate()?;

        let changed = self.conn.execute(
            "UPDATE todo_item_lists
             SET
                name = ?1,
                user_id = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![list.name.as_str(), list.user_id.as_str(), list.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(list.id));
        }

        Ok(())
    }

    fn delete(&self, id: TodoListId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todo_item_lists WHERE id = ?1;", [id])?;
        if changed == 0 {
            debug!("event=todo_list_delete module=repo status=noop id={id}");
        }
        Ok(())
    }

    fn get_paged(
        &self,
        user_id: &str,
        request: &PaginationRequest,
    ) -> RepoResult<PagedResult<TodoItemList>> {
        if request.page_size == 0 {
            return Err(RepoError::InvalidPageSize(request.page_size));
        }

        // Ids start at 1, so 0 means "from the beginning".
        let after_id = request
            .decoded_cursor()?
            .map_or(0, |cursor| cursor.last_id);
        let page_size = request.page_size as usize;
        let probe_limit = i64::from(request.page_size) + 1;

        let mut stmt = self.conn.prepare(&format!(
            "{TODO_LIST_SELECT_SQL}
             WHERE user_id = ?1
               AND id > ?2
             ORDER BY id ASC
             LIMIT ?3;"
        ))?;
        let rows = stmt.query_map(params![user_id, after_id, probe_limit], read_row)?;
        let mut items = collect_rows(rows)?;

        let next_cursor = if items.len() > page_size {
            items.truncate(page_size);
            items.last().map(|last| PageCursor::new(last.id).encode())
        } else {
            None
        };

        debug!(
            "event=todo_list_page module=repo status=ok after_id={after_id} page_size={} returned={} has_next={}",
            request.page_size,
            items.len(),
            next_cursor.is_some()
        );

        Ok(PagedResult::new(items, next_cursor))
    }

    fn count_by_user_id(&self, user_id: &str) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM todo_item_lists WHERE user_id = ?1;",
            [user_id],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<TodoItemList> {
    Ok(TodoItemList {
        id: row.get("id")?,
        name: row.get("name")?,
        user_id: row.get("user_id")?,
    })
}

fn check_row(list: TodoItemList) -> RepoResult<TodoItemList> {
    list.validate().map_err(|err| {
        RepoError::InvalidData(format!("row id {} in todo_item_lists: {err}", list.id))
    })?;
    Ok(list)
}

fn collect_rows<I>(rows: I) -> RepoResult<Vec<TodoItemList>>
where
    I: Iterator<Item = rusqlite::Result<TodoItemList>>,
{
    rows.map(|row| check_row(row?)).collect()
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, TODO_LIST_TABLE)? {
        return Err(RepoError::MissingRequiredTable(TODO_LIST_TABLE));
    }

    for &column in TODO_LIST_REQUIRED_COLUMNS {
        if !table_has_column(conn, TODO_LIST_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: TODO_LIST_TABLE,
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
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
