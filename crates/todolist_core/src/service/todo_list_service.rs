//! To-do list use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for list CRUD and paging.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::page::{PagedResult, PaginationRequest};
use crate::model::todo_list::{TodoItemList, TodoListId};
use crate::repo::todo_list_repo::{RepoError, RepoResult, TodoListRepository};
use log::{info, warn};
use std::time::Instant;

/// Use-case service wrapper for to-do list operations.
pub struct TodoListService<R: TodoListRepository> {
    repo: R,
}

impl<R: TodoListRepository> TodoListService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and persists a new list for `user_id`.
    pub fn create_list(
        &self,
        name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> RepoResult<TodoItemList> {
        let started_at = Instant::now();
        let result = self.repo.add(&TodoItemList::new(name, user_id));
        match &result {
            Ok(list) => info!(
                "event=todo_list_create module=service status=ok id={} duration_ms={}",
                list.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=todo_list_create module=service status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    /// Renames an existing list and returns its new state.
    ///
    /// Returns `RepoError::NotFound` when the id does not exist.
    pub fn rename_list(&self, id: TodoListId, name: impl Into<String>) -> RepoResult<TodoItemList> {
        let mut list = self.repo.get_by_id(id)?.ok_or(RepoError::NotFound(id))?;
        list.name = name.into();
        self.repo.update(&list)?;
        info!("event=todo_list_rename module=service status=ok id={id}");
        Ok(list)
    }

    pub fn get_list(&self, id: TodoListId) -> RepoResult<Option<TodoItemList>> {
        self.repo.get_by_id(id)
    }

    pub fn all_lists(&self) -> RepoResult<Vec<TodoItemList>> {
        self.repo.get_all()
    }

    pub fn lists_for_user(&self, user_id: &str) -> RepoResult<Vec<TodoItemList>> {
        self.repo.get_by_user_id(user_id)
    }

    /// Persists all mutable fields of an existing list.
    pub fn update_list(&self, list: &TodoItemList) -> RepoResult<()> {
        self.repo.update(list)
    }

    /// Deletes a list; unknown ids are ignored.
    pub fn delete_list(&self, id: TodoListId) -> RepoResult<()> {
        self.repo.delete(id)?;
        info!("event=todo_list_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Fetches one page of `user_id`'s lists.
    pub fn list_page(
        &self,
        user_id: &str,
        page_size: u32,
        cursor: Option<String>,
    ) -> RepoResult<PagedResult<TodoItemList>> {
        self.repo
            .get_paged(user_id, &PaginationRequest { page_size, cursor })
    }

    /// Follows cursors until the last page and returns every owned list.
    pub fn collect_all_pages(
        &self,
        user_id: &str,
        page_size: u32,
    ) -> RepoResult<Vec<TodoItemList>> {
        let mut collected = Vec::new();
        let mut request = PaginationRequest::first(page_size);
        loop {
            let page = self.repo.get_paged(user_id, &request)?;
            collected.extend(page.items);
            match page.next_cursor {
                Some(cursor) => request.cursor = Some(cursor),
                None => return Ok(collected),
            }
        }
    }

    pub fn count_for_user(&self, user_id: &str) -> RepoResult<u64> {
        self.repo.count_by_user_id(user_id)
    }
}
