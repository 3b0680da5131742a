//! User domain model.
//!
//! # Responsibility
//! - Define the canonical account record and its write-side inputs.
//! - Validate account invariants before persistence.
//!
//! # Invariants
//! - `id` is a positive integer assigned by storage and never reused.
//! - `email` is unique per account and must look like an address.
//! - `password_hash` is supplied by the caller; core never derives it.

use crate::pagination::CursorKeyed;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Stable identifier for every account record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Storage assigns it from the integer primary key, so it doubles as the
/// keyset pagination key.
pub type UserId = i64;

/// Access tier for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular account limited to its own records.
    User,
    /// Elevated account with administrative reach.
    Admin,
}

impl UserRole {
    /// Stable string id used in storage columns.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Parses one role from its storage string value.
pub fn parse_user_role(value: &str) -> Option<UserRole> {
    match value {
        "user" => Some(UserRole::User),
        "admin" => Some(UserRole::Admin),
        _ => None,
    }
}

/// Canonical account record.
///
/// Secret columns stay readable inside core but are skipped during
/// serialization so API payloads can embed the record directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Storage-assigned stable ID; also the keyset pagination key.
    pub id: UserId,
    pub email: String,
    /// Caller-supplied hash; never a plaintext password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    /// Epoch milliseconds; meaningful only while a reset token is set.
    #[serde(skip_serializing)]
    pub reset_password_expires: Option<i64>,
    /// Epoch milliseconds, assigned by storage.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed by storage on every write.
    pub updated_at: i64,
}

impl User {
    /// Validates persisted-shape invariants.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        validate_email(&self.email)?;
        validate_password_hash(&self.password_hash)?;
        Ok(())
    }
}

impl CursorKeyed for User {
    fn cursor_key(&self) -> i64 {
        self.id
    }
}

/// Write model for account creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_verified: bool,
    pub verification_token: Option<String>,
}

impl NewUser {
    /// Creates a regular unverified account input.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            role: UserRole::User,
            is_verified: false,
            verification_token: None,
        }
    }

    /// Validates creation invariants.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        validate_email(&self.email)?;
        validate_password_hash(&self.password_hash)?;
        Ok(())
    }
}

/// Patch-style update input for one account.
///
/// `None` leaves a column untouched. The nullable token columns use a
/// nested option: `Some(None)` clears the stored value, `Some(Some(v))`
/// replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub is_verified: Option<bool>,
    pub verification_token: Option<Option<String>>,
    pub reset_password_token: Option<Option<String>>,
    pub reset_password_expires: Option<Option<i64>>,
}

/// Account validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidEmail(String),
    EmptyPasswordHash,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::EmptyPasswordHash => write!(f, "password hash must not be empty"),
        }
    }
}

impl Error for UserValidationError {}

fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(UserValidationError::InvalidEmail(email.to_string()))
    }
}

fn validate_password_hash(password_hash: &str) -> Result<(), UserValidationError> {
    if password_hash.trim().is_empty() {
        return Err(UserValidationError::EmptyPasswordHash);
    }
    Ok(())
}
