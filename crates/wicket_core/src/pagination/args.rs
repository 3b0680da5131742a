//! Relay-style pagination arguments and validation.

use crate::pagination::{PaginationError, PaginationResult};
use serde::{Deserialize, Serialize};

/// Page size applied when neither `first` nor `last` is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound for both `first` and `last`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort direction for ordered listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Cursor pagination arguments.
///
/// # Invariants
/// - `first` and `last` are mutually exclusive.
/// - `after` and `before` are mutually exclusive.
/// - Page sizes must stay within `[1, MAX_PAGE_SIZE]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationArgs {
    pub first: Option<u32>,
    pub after: Option<String>,
    pub last: Option<u32>,
    pub before: Option<String>,
}

impl PaginationArgs {
    /// Forward page of `first` rows, optionally resuming after a cursor.
    pub fn forward(first: u32, after: Option<String>) -> Self {
        Self {
            first: Some(first),
            after,
            ..Self::default()
        }
    }

    /// Backward page of `last` rows, optionally ending before a cursor.
    pub fn backward(last: u32, before: Option<String>) -> Self {
        Self {
            last: Some(last),
            before,
            ..Self::default()
        }
    }

    /// Checks mutual-exclusion and range invariants.
    ///
    /// # Errors
    /// Returns `InvalidArgs` on any conflicting combination; the check runs
    /// before cursors are decoded or any query executes.
    pub fn validate(&self) -> PaginationResult<()> {
        if self.first.is_some() && self.last.is_some() {
            return Err(PaginationError::InvalidArgs(
                "cannot specify both first and last".to_string(),
            ));
        }
        if self.after.is_some() && self.before.is_some() {
            return Err(PaginationError::InvalidArgs(
                "cannot specify both after and before".to_string(),
            ));
        }
        validate_page_size("first", self.first)?;
        validate_page_size("last", self.last)?;
        Ok(())
    }
}

fn validate_page_size(name: &str, value: Option<u32>) -> PaginationResult<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value == 0 || value > MAX_PAGE_SIZE {
        return Err(PaginationError::InvalidArgs(format!(
            "{name} must be between 1 and {MAX_PAGE_SIZE}, got {value}"
        )));
    }
    Ok(())
}
