//! To-do list entity.
//!
//! # Invariants
//! - `id == 0` marks an entity that has not been persisted yet.
//! - `name` and `user_id` are non-blank for every persisted row.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-generated surrogate key of a to-do list.
pub type TodoListId = i64;

/// Id carried by entities that storage has not assigned an id to yet.
pub const UNSAVED_ID: TodoListId = 0;

/// Validation failures for `TodoItemList` write paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoListValidationError {
    EmptyName,
    EmptyUserId,
}

impl Display for TodoListValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "todo list name cannot be blank"),
            Self::EmptyUserId => write!(f, "todo list owner user id cannot be blank"),
        }
    }
}

impl Error for TodoListValidationError {}

/// A named to-do list owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItemList {
    /// Assigned by storage on insert; `UNSAVED_ID` before that.
    pub id: TodoListId,
    pub name: String,
    /// Owner scoping visibility of this list.
    pub user_id: String,
}

impl TodoItemList {
    /// Creates an unsaved list. Storage assigns the id on insert.
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            name: name.into(),
            user_id: user_id.into(),
        }
    }

    /// Returns whether storage has assigned an id to this list.
    pub fn is_persisted(&self) -> bool {
        self.id > UNSAVED_ID
    }

    /// Checks field invariants enforced before every write.
    pub fn validate(&self) -> Result<(), TodoListValidationError> {
        if self.name.trim().is_empty() {
            return Err(TodoListValidationError::EmptyName);
        }
        if self.user_id.trim().is_empty() {
            return Err(TodoListValidationError::EmptyUserId);
        }
        Ok(())
    }
}
