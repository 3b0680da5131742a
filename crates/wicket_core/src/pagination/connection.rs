//! Connection assembly for finished page windows.
//!
//! # Responsibility
//! - Build edges and page metadata from a finished window.
//! - Keep assembly independent of which store produced the rows.
//!
//! # Invariants
//! - `edges` and `nodes` have identical length and order.
//! - `start_cursor`/`end_cursor` are present iff the page is non-empty.
//! - In the direction the fetch did not probe, page availability is
//!   approximated from cursor presence rather than a second lookahead;
//!   this can be wrong at an exact boundary and is kept as-is.

use crate::pagination::cursor::encode_cursor;
use crate::pagination::planner::{FetchDirection, FetchPlan, PageWindow};
use serde::Serialize;

/// Row contract for cursor assembly: exposes the positive keyset key.
pub trait CursorKeyed {
    fn cursor_key(&self) -> i64;
}

/// One node plus the cursor that resumes iteration at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge<T> {
    pub node: T,
    pub cursor: String,
}

/// Page boundary metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Paginated result envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    /// Same rows as `edges`, in the same order, without cursors.
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
    /// Size of the filtered-but-unpaginated collection.
    pub total_count: u64,
}

/// Assembles a finished window into a connection.
///
/// `total_count` must come from an independent count of the caller's
/// filter, not from the windowed fetch.
pub fn assemble_connection<T: CursorKeyed + Clone>(
    window: PageWindow<T>,
    plan: &FetchPlan,
    total_count: u64,
) -> Connection<T> {
    let edges: Vec<Edge<T>> = window
        .rows
        .iter()
        .map(|row| Edge {
            node: row.clone(),
            cursor: encode_cursor(row.cursor_key()),
        })
        .collect();

    let (has_next_page, has_previous_page) = match plan.direction {
        FetchDirection::Forward => (window.has_more, plan.after_key.is_some()),
        FetchDirection::Backward => (plan.before_key.is_some(), window.has_more),
    };

    let page_info = PageInfo {
        start_cursor: edges.first().map(|edge| edge.cursor.clone()),
        end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        has_next_page,
        has_previous_page,
    };

    Connection {
        edges,
        nodes: window.rows,
        page_info,
        total_count,
    }
}
