//! Domain model for to-do lists and cursor pagination.
//!
//! # Responsibility
//! - Define the `TodoItemList` record persisted by the repository layer.
//! - Define paging request/result shapes and the opaque cursor codec.
//!
//! # Invariants
//! - List ids are generated by storage, monotonic and never reused.
//! - A cursor only ever encodes the id of the last item a caller has seen.

pub mod page;
pub mod todo_list;
