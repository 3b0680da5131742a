//! Core domain logic for Wicket, a user-administration backend.
//! This crate is the single source of truth for pagination and
//! authorization invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod policy;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::user::{NewUser, User, UserId, UserPatch, UserRole, UserValidationError};
pub use pagination::{
    assemble_connection, decode_cursor, encode_cursor, finish_window, plan_page, Connection,
    CursorKeyed, Edge, FetchDirection, FetchPlan, PageInfo, PageWindow, PaginationArgs,
    PaginationError, PaginationResult, SortOrder,
};
pub use policy::{
    bind_user_operations, register_user_policy, AccessDenied, AccessGuard, Policy, PolicyAction,
    PolicyBinding, PolicyContext, PolicyEvaluator, PolicyRegistry, PolicyResult, Principal,
    ResourceRef, UserPolicy, NO_POLICY_MESSAGE, OP_USERS_CREATE, OP_USERS_DESTROY, OP_USERS_LIST,
    OP_USERS_SHOW, OP_USERS_UPDATE, USER_ENTITY,
};
pub use repo::user_repo::{
    RepoError, RepoResult, SqliteUserRepository, UserFilter, UserRepository, UserSort,
};
pub use service::authorization::{authorization_summary, AuthorizationSummary};
pub use service::user_service::{UserService, UserServiceError, UsersArgs};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
