//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `TodoItemList::validate()` before persistence.
//! - Point lookups report absence as `Ok(None)`, never as an error.

pub mod todo_list_repo;
