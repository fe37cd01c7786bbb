//! Core data access for the to-do list application.
//! Owns the list schema, the repository contract and seek pagination.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, with_transaction, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::page::{CursorError, PageCursor, PagedResult, PaginationRequest};
pub use model::todo_list::{TodoItemList, TodoListId, TodoListValidationError};
pub use repo::todo_list_repo::{
    RepoError, RepoResult, SqliteTodoListRepository, TodoListRepository,
};
pub use service::todo_list_service::TodoListService;

/// Minimal health-check API for wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
