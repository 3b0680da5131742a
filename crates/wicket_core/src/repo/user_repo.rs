//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `users` table.
//! - Execute windowed keyset fetches and independent filtered counts for
//!   the pagination engine.
//!
//! # Invariants
//! - Write paths validate model invariants before SQL mutations.
//! - Windowed fetches always order by `id` (after any primary sort) in
//!   the plan's key order, so ties never reorder across pages.
//! - `count_users` ignores every windowing clause and sees only the
//!   filter.

use crate::db::DbError;
use crate::model::user::{parse_user_role, NewUser, User, UserId, UserValidationError};
use crate::pagination::{FetchPlan, SortOrder};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const USER_SELECT_SQL: &str = "SELECT
    id,
    email,
    password_hash,
    role,
    is_verified,
    verification_token,
    reset_password_token,
    reset_password_expires,
    created_at,
    updated_at
FROM users";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for user persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(UserValidationError),
    Db(DbError),
    NotFound(UserId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "user not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter criteria for user listings and counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring match on the email column.
    pub email_contains: Option<String>,
}

/// Optional primary sort for user listings.
///
/// At most one primary column is supported; `id` is always appended as
/// the tie-breaker by the windowed fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserSort {
    pub email: Option<SortOrder>,
}

/// Repository interface for user CRUD and listing operations.
pub trait UserRepository {
    /// Creates one account and returns its storage-assigned id.
    fn create_user(&self, user: &NewUser) -> RepoResult<UserId>;
    /// Gets one account by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Gets one account by exact email.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Gets one account by its verification token.
    fn find_by_verification_token(&self, token: &str) -> RepoResult<Option<User>>;
    /// Gets one account by its password-reset token.
    fn find_by_reset_token(&self, token: &str) -> RepoResult<Option<User>>;
    /// Replaces all mutable columns of one account.
    fn update_user(&self, user: &User) -> RepoResult<()>;
    /// Hard-deletes one account.
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
    /// Fetches one page window under filter, sort and fetch plan.
    fn fetch_user_window(
        &self,
        filter: &UserFilter,
        sort: &UserSort,
        plan: &FetchPlan,
    ) -> RepoResult<Vec<User>>;
    /// Counts accounts matching the filter, ignoring any window.
    fn count_users(&self, filter: &UserFilter) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<UserId> {
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (
                email,
                password_hash,
                role,
                is_verified,
                verification_token
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.email.as_str(),
                user.password_hash.as_str(),
                user.role.as_str(),
                bool_to_int(user.is_verified),
                user.verification_token.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.find_one(&format!("{USER_SELECT_SQL} WHERE id = ?1;"), params![id])
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_one(
            &format!("{USER_SELECT_SQL} WHERE email = ?1;"),
            params![email],
        )
    }

    fn find_by_verification_token(&self, token: &str) -> RepoResult<Option<User>> {
        self.find_one(
            &format!("{USER_SELECT_SQL} WHERE verification_token = ?1;"),
            params![token],
        )
    }

    fn find_by_reset_token(&self, token: &str) -> RepoResult<Option<User>> {
        self.find_one(
            &format!("{USER_SELECT_SQL} WHERE reset_password_token = ?1;"),
            params![token],
        )
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let changed = self.conn.execute(
            "UPDATE users
             SET
                email = ?1,
                password_hash = ?2,
                role = ?3,
                is_verified = ?4,
                verification_token = ?5,
                reset_password_token = ?6,
                reset_password_expires = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?8;",
            params![
                user.email.as_str(),
                user.password_hash.as_str(),
                user.role.as_str(),
                bool_to_int(user.is_verified),
                user.verification_token.as_deref(),
                user.reset_password_token.as_deref(),
                user.reset_password_expires,
                user.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(user.id));
        }

        Ok(())
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn fetch_user_window(
        &self,
        filter: &UserFilter,
        sort: &UserSort,
        plan: &FetchPlan,
    ) -> RepoResult<Vec<User>> {
        let mut sql = format!("{USER_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        push_filter_clause(&mut sql, &mut bind_values, filter);

        if let Some(after_key) = plan.after_key {
            sql.push_str(" AND id > ?");
            bind_values.push(Value::Integer(after_key));
        }
        if let Some(before_key) = plan.before_key {
            sql.push_str(" AND id < ?");
            bind_values.push(Value::Integer(before_key));
        }

        let key_order = plan.key_order().as_sql();
        match sort.email {
            // Primary sort stays as requested; id is the sole tie-breaker.
            Some(order) => {
                sql.push_str(&format!(
                    " ORDER BY email COLLATE NOCASE {}, id {key_order}",
                    order.as_sql()
                ));
            }
            None => sql.push_str(&format!(" ORDER BY id {key_order}")),
        }

        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(plan.fetch_count())));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }

    fn count_users(&self, filter: &UserFilter) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM users WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        push_filter_clause(&mut sql, &mut bind_values, filter);

        let count: i64 =
            self.conn
                .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

impl SqliteUserRepository<'_> {
    fn find_one(
        &self,
        sql: &str,
        query_params: impl rusqlite::Params,
    ) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(query_params)?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }
}

fn push_filter_clause(sql: &mut String, bind_values: &mut Vec<Value>, filter: &UserFilter) {
    if let Some(needle) = filter.email_contains.as_ref() {
        sql.push_str(" AND email LIKE ? ESCAPE '\\'");
        bind_values.push(Value::Text(format!("%{}%", escape_like(needle))));
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let role_text: String = row.get("role")?;
    let role = parse_user_role(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in users.role"))
    })?;

    let is_verified = match row.get::<_, i64>("is_verified")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_verified value `{other}` in users.is_verified"
            )));
        }
    };

    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        role,
        is_verified,
        verification_token: row.get("verification_token")?,
        reset_password_token: row.get("reset_password_token")?,
        reset_password_expires: row.get("reset_password_expires")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
