//! Policy-based authorization engine.
//!
//! # Responsibility
//! - Define the per-entity policy contract and its evaluation context.
//! - Wire entity policies into an explicit registry/evaluator/guard chain.
//!
//! # Invariants
//! - Policies are pure and stateless; every evaluation is independent.
//! - Registries are populated at startup and read-only afterwards, so
//!   evaluation is lock-free under concurrency.
//! - Unregistered entities are denied by default, never allowed.

use crate::model::user::{UserId, UserRole};
use serde::Serialize;

mod evaluator;
mod guard;
mod registry;
mod user_policy;

pub use evaluator::{PolicyEvaluator, NO_POLICY_MESSAGE};
pub use guard::{
    bind_user_operations, AccessDenied, AccessGuard, PolicyBinding, OP_USERS_CREATE,
    OP_USERS_DESTROY, OP_USERS_LIST, OP_USERS_SHOW, OP_USERS_UPDATE,
};
pub use registry::PolicyRegistry;
pub use user_policy::{register_user_policy, UserPolicy, USER_ENTITY};

/// Guarded operation kinds, one per CRUD surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    Index,
    Show,
    Create,
    Update,
    Delete,
}

impl PolicyAction {
    /// Stable string id used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Show => "show",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Whether this action targets one specific record.
    ///
    /// Per-record actions expect a `resource` in the evaluation context.
    pub fn is_per_record(self) -> bool {
        matches!(self, Self::Show | Self::Update | Self::Delete)
    }
}

/// Authenticated requester identity as seen by policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: UserId,
    pub role: UserRole,
}

/// Reference to the record a per-record action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub id: i64,
}

/// Evaluation context handed to every policy method.
///
/// `actor` is absent for anonymous calls; `resource` is present only for
/// per-record actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyContext {
    pub actor: Option<Principal>,
    pub resource: Option<ResourceRef>,
}

impl PolicyContext {
    /// Context for an anonymous request.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for an authenticated request without a target record.
    pub fn for_actor(actor: Principal) -> Self {
        Self {
            actor: Some(actor),
            resource: None,
        }
    }

    /// Attaches the targeted record reference.
    pub fn with_resource(mut self, id: i64) -> Self {
        self.resource = Some(ResourceRef { id });
        self
    }
}

/// Allow/deny verdict with an optional denial reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolicyResult {
    pub value: bool,
    /// Populated only when `value` is false.
    pub message: Option<String>,
}

impl PolicyResult {
    pub fn allow() -> Self {
        Self {
            value: true,
            message: None,
        }
    }

    pub fn deny(message: impl Into<String>) -> Self {
        Self {
            value: false,
            message: Some(message.into()),
        }
    }
}

/// Per-entity decision logic, one method per guarded action.
///
/// Implementations must be pure: no I/O, no interior mutability, the same
/// context always yields the same verdict.
pub trait Policy: Send + Sync {
    fn can_index(&self, context: &PolicyContext) -> PolicyResult;
    fn can_show(&self, context: &PolicyContext) -> PolicyResult;
    fn can_create(&self, context: &PolicyContext) -> PolicyResult;
    fn can_update(&self, context: &PolicyContext) -> PolicyResult;
    fn can_delete(&self, context: &PolicyContext) -> PolicyResult;
}
