//! Page query planning and window finishing.
//!
//! # Responsibility
//! - Derive limit, fetch direction and key bounds from validated
//!   arguments.
//! - Post-process fetched rows: drop the lookahead sentinel and normalize
//!   backward pages into ascending order.
//!
//! # Invariants
//! - Plans always fetch `limit + 1` rows; the extra row only signals that
//!   more rows exist and never reaches the caller.
//! - The executing store must break primary-sort ties by key in the
//!   plan's key order, so pages form a total order without duplicate or
//!   missing rows.

use crate::pagination::args::{PaginationArgs, SortOrder, DEFAULT_PAGE_SIZE};
use crate::pagination::cursor::decode_cursor;
use crate::pagination::PaginationResult;

/// Traversal direction of one page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDirection {
    Forward,
    Backward,
}

/// Bounded fetch plan for one page of a keyset listing.
///
/// The executing store applies the key bounds as strict comparisons
/// (`key > after_key`, `key < before_key`), orders by the key in
/// [`FetchPlan::key_order`] (after any caller-declared primary sort) and
/// fetches [`FetchPlan::fetch_count`] rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub limit: u32,
    pub direction: FetchDirection,
    pub after_key: Option<i64>,
    pub before_key: Option<i64>,
}

impl FetchPlan {
    /// Rows to request from the store: the page plus one lookahead row.
    pub fn fetch_count(&self) -> u32 {
        self.limit + 1
    }

    /// Key sort direction for this fetch.
    pub fn key_order(&self) -> SortOrder {
        match self.direction {
            FetchDirection::Forward => SortOrder::Asc,
            FetchDirection::Backward => SortOrder::Desc,
        }
    }
}

/// Plans one page fetch from pagination arguments.
///
/// Direction is forward when `first` is set, or when neither `last` nor
/// `before` is set; otherwise backward.
///
/// # Errors
/// - `InvalidArgs` on conflicting argument combinations.
/// - `InvalidCursor` when `after`/`before` fail to decode.
pub fn plan_page(args: &PaginationArgs) -> PaginationResult<FetchPlan> {
    args.validate()?;

    let limit = args.first.or(args.last).unwrap_or(DEFAULT_PAGE_SIZE);
    let forward = args.first.is_some() || (args.last.is_none() && args.before.is_none());

    let after_key = args.after.as_deref().map(decode_cursor).transpose()?;
    let before_key = args.before.as_deref().map(decode_cursor).transpose()?;

    Ok(FetchPlan {
        limit,
        direction: if forward {
            FetchDirection::Forward
        } else {
            FetchDirection::Backward
        },
        after_key,
        before_key,
    })
}

/// One finished page window, ready for assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow<T> {
    /// At most `plan.limit` rows in ascending key order.
    pub rows: Vec<T>,
    /// Whether the lookahead row existed beyond this page.
    pub has_more: bool,
}

/// Finishes a fetched row sequence into a page window.
///
/// Drops the lookahead sentinel when present and reverses backward
/// fetches, so the window is always in the collection's natural order.
pub fn finish_window<T>(mut rows: Vec<T>, plan: &FetchPlan) -> PageWindow<T> {
    let has_more = rows.len() > plan.limit as usize;
    if has_more {
        rows.truncate(plan.limit as usize);
    }
    if plan.direction == FetchDirection::Backward {
        rows.reverse();
    }

    PageWindow { rows, has_more }
}
