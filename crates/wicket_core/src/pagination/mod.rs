//! Keyset (cursor) pagination engine.
//!
//! # Responsibility
//! - Encode/decode opaque cursors around one positive integer key.
//! - Turn relay-style pagination arguments into a bounded fetch plan.
//! - Assemble fetched rows into a connection with page metadata.
//!
//! # Invariants
//! - Argument validation happens before any query executes.
//! - Pages are always returned in the collection's natural ascending key
//!   order, regardless of fetch direction.
//! - `total_count` reflects the caller's filter, never the page window.
//!
//! Cursors carry only the row key, not the originating collection or
//! filter. A cursor minted under one filter is syntactically valid when
//! replayed against a differently filtered listing of the same entity and
//! may skip or duplicate rows there. Known gap, kept as-is.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod args;
mod connection;
mod cursor;
mod planner;

pub use args::{PaginationArgs, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use connection::{assemble_connection, Connection, CursorKeyed, Edge, PageInfo};
pub use cursor::{decode_cursor, encode_cursor};
pub use planner::{finish_window, plan_page, FetchDirection, FetchPlan, PageWindow};

pub type PaginationResult<T> = Result<T, PaginationError>;

/// Client-side pagination errors.
///
/// Both variants are terminal for the current request and are raised
/// before the windowed query runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// Conflicting or out-of-range pagination arguments.
    InvalidArgs(String),
    /// Malformed or foreign cursor token.
    InvalidCursor(String),
}

impl Display for PaginationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgs(details) => write!(f, "invalid pagination arguments: {details}"),
            Self::InvalidCursor(token) => write!(f, "invalid cursor: `{token}`"),
        }
    }
}

impl Error for PaginationError {}
