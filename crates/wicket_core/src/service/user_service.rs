//! User use-case service.
//!
//! # Responsibility
//! - Provide account create/show/update/destroy/list APIs.
//! - Enforce email uniqueness ahead of persistence.
//! - Wire the pagination engine into user listings.
//!
//! # Invariants
//! - Listing windows and total counts always agree on the caller's
//!   filter; the total is computed by an independent unwindowed count.
//! - Authorization is the boundary guard's concern; service APIs assume
//!   the caller already passed it.

use crate::model::user::{NewUser, User, UserId, UserPatch};
use crate::pagination::{
    assemble_connection, finish_window, plan_page, Connection, PaginationArgs, PaginationError,
};
use crate::repo::user_repo::{RepoError, RepoResult, UserFilter, UserRepository, UserSort};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for user use-cases.
#[derive(Debug)]
pub enum UserServiceError {
    /// Another account already owns the requested email.
    EmailAlreadyExists(String),
    /// Target account does not exist.
    UserNotFound(UserId),
    /// Invalid listing arguments or cursor token.
    Pagination(PaginationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailAlreadyExists(email) => {
                write!(f, "user with email `{email}` already exists")
            }
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Pagination(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent user state: {details}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pagination(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::UserNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<PaginationError> for UserServiceError {
    fn from(value: PaginationError) -> Self {
        Self::Pagination(value)
    }
}

/// Listing arguments: filter and sort criteria plus cursor pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersArgs {
    pub filter: UserFilter,
    pub sort: UserSort,
    pub page: PaginationArgs,
}

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one account after an email uniqueness check.
    pub fn create_user(&self, input: &NewUser) -> Result<User, UserServiceError> {
        input.validate().map_err(RepoError::from)?;

        if self.repo.find_by_email(&input.email)?.is_some() {
            return Err(UserServiceError::EmailAlreadyExists(input.email.clone()));
        }

        let id = self.repo.create_user(input)?;
        info!("event=user_create module=service status=ok user_id={id}");
        self.repo
            .get_user(id)?
            .ok_or(UserServiceError::InconsistentState(
                "created user not found in read-back",
            ))
    }

    /// Gets one account by id.
    ///
    /// Non-positive ids are reported as not-found, not as a distinct
    /// error.
    pub fn get_user(&self, id: UserId) -> Result<User, UserServiceError> {
        if id <= 0 {
            return Err(UserServiceError::UserNotFound(id));
        }
        self.repo
            .get_user(id)?
            .ok_or(UserServiceError::UserNotFound(id))
    }

    /// Gets one account by exact email.
    pub fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.repo.find_by_email(email)
    }

    /// Gets one account by its verification token.
    pub fn find_by_verification_token(&self, token: &str) -> RepoResult<Option<User>> {
        self.repo.find_by_verification_token(token)
    }

    /// Gets one account by its password-reset token.
    pub fn find_by_reset_token(&self, token: &str) -> RepoResult<Option<User>> {
        self.repo.find_by_reset_token(token)
    }

    /// Applies a patch to one account.
    ///
    /// A changed email is re-checked for uniqueness against other rows
    /// before persistence.
    pub fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<User, UserServiceError> {
        let mut user = self.get_user(id)?;

        if let Some(email) = patch.email.as_ref() {
            if let Some(existing) = self.repo.find_by_email(email)? {
                if existing.id != user.id {
                    return Err(UserServiceError::EmailAlreadyExists(email.clone()));
                }
            }
            user.email = email.clone();
        }
        if let Some(password_hash) = patch.password_hash.as_ref() {
            user.password_hash = password_hash.clone();
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(is_verified) = patch.is_verified {
            user.is_verified = is_verified;
        }
        if let Some(token) = patch.verification_token.as_ref() {
            user.verification_token = token.clone();
        }
        if let Some(token) = patch.reset_password_token.as_ref() {
            user.reset_password_token = token.clone();
        }
        if let Some(expires) = patch.reset_password_expires {
            user.reset_password_expires = expires;
        }

        self.repo.update_user(&user)?;
        info!("event=user_update module=service status=ok user_id={id}");
        self.repo
            .get_user(id)?
            .ok_or(UserServiceError::InconsistentState(
                "updated user not found in read-back",
            ))
    }

    /// Hard-deletes one account and returns the removed record.
    pub fn destroy_user(&self, id: UserId) -> Result<User, UserServiceError> {
        let user = self.get_user(id)?;
        self.repo.delete_user(id)?;
        info!("event=user_destroy module=service status=ok user_id={id}");
        Ok(user)
    }

    /// Lists accounts as a cursor-paginated connection.
    ///
    /// Plans the window from the pagination arguments, fetches it under
    /// the caller's filter/sort, and pairs it with an independent
    /// filtered count. A failed count fails the whole page request.
    pub fn list_users(&self, args: &UsersArgs) -> Result<Connection<User>, UserServiceError> {
        let plan = plan_page(&args.page)?;
        let fetched = self.repo.fetch_user_window(&args.filter, &args.sort, &plan)?;
        let window = finish_window(fetched, &plan);
        let total_count = self.repo.count_users(&args.filter)?;
        Ok(assemble_connection(window, &plan, total_count))
    }
}
