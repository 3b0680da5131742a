//! Opaque cursor codec.
//!
//! Cursors are standard base64 over a tagged decimal key. The tag keeps
//! malformed external input distinguishable from a bare integer, so foreign
//! tokens are rejected instead of silently misinterpreted. Clients must
//! treat the token as a black box.

use crate::pagination::{PaginationError, PaginationResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const CURSOR_TAG: &str = "cursor:";

/// Encodes one positive row key into an opaque cursor token.
pub fn encode_cursor(key: i64) -> String {
    STANDARD.encode(format!("{CURSOR_TAG}{key}"))
}

/// Decodes an opaque cursor token back into its row key.
///
/// # Errors
/// Returns `InvalidCursor` when the token is empty, not valid base64, not
/// UTF-8, missing the expected tag, or carries a non-numeric or
/// non-positive key.
pub fn decode_cursor(cursor: &str) -> PaginationResult<i64> {
    if cursor.is_empty() {
        return Err(invalid(cursor));
    }

    let payload = STANDARD.decode(cursor).map_err(|_| invalid(cursor))?;
    let decoded = String::from_utf8(payload).map_err(|_| invalid(cursor))?;
    let raw_key = decoded.strip_prefix(CURSOR_TAG).ok_or_else(|| invalid(cursor))?;

    let key: i64 = raw_key.parse().map_err(|_| invalid(cursor))?;
    if key <= 0 {
        return Err(invalid(cursor));
    }

    Ok(key)
}

fn invalid(cursor: &str) -> PaginationError {
    PaginationError::InvalidCursor(cursor.to_string())
}
