//! Seek-pagination request/result shapes and the opaque cursor codec.
//!
//! # Responsibility
//! - Carry page size and resume position from callers to repositories.
//! - Encode the last-seen id as an opaque, URL-safe token.
//!
//! # Invariants
//! - `PagedResult::has_next_page` is true iff `next_cursor` is present.
//! - Cursor tokens are `base64url(json{"v":1,"id":N})` without padding.

use crate::model::todo_list::TodoListId;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CURSOR_VERSION: u32 = 1;

/// Reasons a cursor token cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// The token is empty or only whitespace.
    Empty,
    InvalidBase64,
    InvalidJson,
    UnsupportedVersion(u32),
    InvalidId(TodoListId),
}

impl Display for CursorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "cursor is empty"),
            Self::InvalidBase64 => write!(f, "cursor is not valid base64url"),
            Self::InvalidJson => write!(f, "cursor payload is not valid json"),
            Self::UnsupportedVersion(version) => {
                write!(f, "cursor version {version} is not supported")
            }
            Self::InvalidId(id) => write!(f, "cursor id {id} must be positive"),
        }
    }
}

impl Error for CursorError {}

#[derive(Deserialize)]
struct CursorPayload {
    v: u32,
    id: TodoListId,
}

/// Decoded resume position: the id of the last item already returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub last_id: TodoListId,
}

impl PageCursor {
    pub fn new(last_id: TodoListId) -> Self {
        Self { last_id }
    }

    /// Encodes this cursor into its opaque token form.
    pub fn encode(&self) -> String {
        let payload = serde_json::json!({ "v": CURSOR_VERSION, "id": self.last_id });
        URL_SAFE_NO_PAD.encode(payload.to_string())
    }

    /// Decodes an opaque token previously produced by `encode`.
    ///
    /// An empty or blank token is rejected with `CursorError::Empty`; it is
    /// not treated as a request for the first page. Callers asking for the
    /// first page pass no cursor at all.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CursorError::Empty);
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| CursorError::InvalidBase64)?;
        let payload: CursorPayload =
            serde_json::from_slice(&bytes).map_err(|_| CursorError::InvalidJson)?;
        if payload.v != CURSOR_VERSION {
            return Err(CursorError::UnsupportedVersion(payload.v));
        }
        if payload.id <= 0 {
            return Err(CursorError::InvalidId(payload.id));
        }
        Ok(Self::new(payload.id))
    }
}

/// Page request: how many items to return and where to resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationRequest {
    /// Must be positive; zero is rejected by repositories.
    pub page_size: u32,
    /// Token from a previous `PagedResult::next_cursor`, `None` for page one.
    pub cursor: Option<String>,
}

impl PaginationRequest {
    /// Requests the first page.
    pub fn first(page_size: u32) -> Self {
        Self {
            page_size,
            cursor: None,
        }
    }

    /// Requests the page following `cursor`.
    pub fn after(page_size: u32, cursor: impl Into<String>) -> Self {
        Self {
            page_size,
            cursor: Some(cursor.into()),
        }
    }

    /// Decodes the cursor token, if any.
    pub fn decoded_cursor(&self) -> Result<Option<PageCursor>, CursorError> {
        self.cursor.as_deref().map(PageCursor::decode).transpose()
    }
}

/// One page of items plus the token needed to fetch the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

impl<T> PagedResult<T> {
    /// Builds a page; `has_next_page` follows `next_cursor`.
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        let has_next_page = next_cursor.is_some();
        Self {
            items,
            next_cursor,
            has_next_page,
        }
    }

    /// A page with no items and no continuation.
    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Maps items while keeping the continuation unchanged.
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_next_page: self.has_next_page,
        }
    }
}
