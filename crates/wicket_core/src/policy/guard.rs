//! Access guard boundary contract.
//!
//! # Responsibility
//! - Hold the explicit operation-id to `{entity, action}` binding map.
//! - Build the evaluation context from inbound request data.
//! - Turn a deny verdict into a rejected-request signal.
//!
//! # Invariants
//! - An operation without a binding is unguarded by design and allowed.
//! - `resource` is attached only for per-record actions, from the
//!   request's id argument.
//! - Bindings are installed at startup; the guard is read-only afterwards.

use crate::policy::evaluator::PolicyEvaluator;
use crate::policy::user_policy::USER_ENTITY;
use crate::policy::{PolicyAction, PolicyContext, Principal};
use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Operation id for the user listing surface.
pub const OP_USERS_LIST: &str = "users.list";
/// Operation id for fetching one user.
pub const OP_USERS_SHOW: &str = "users.show";
/// Operation id for creating a user.
pub const OP_USERS_CREATE: &str = "users.create";
/// Operation id for updating a user.
pub const OP_USERS_UPDATE: &str = "users.update";
/// Operation id for destroying a user.
pub const OP_USERS_DESTROY: &str = "users.destroy";

const FALLBACK_DENIAL_MESSAGE: &str = "Access denied";

/// Policy metadata attached to one guarded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyBinding {
    pub entity: String,
    pub action: PolicyAction,
}

/// Rejected-request signal carrying the policy's denial reason.
///
/// Distinct from not-found: callers can tell "you may not see this" apart
/// from "this does not exist".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    pub message: String,
}

impl Display for AccessDenied {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for AccessDenied {}

/// Boundary guard consulted before every guarded operation.
pub struct AccessGuard {
    evaluator: PolicyEvaluator,
    bindings: BTreeMap<String, PolicyBinding>,
}

impl AccessGuard {
    /// Creates a guard with no bindings; every operation starts unguarded.
    pub fn new(evaluator: PolicyEvaluator) -> Self {
        Self {
            evaluator,
            bindings: BTreeMap::new(),
        }
    }

    /// Binds one operation id to policy metadata. Last binding wins.
    pub fn bind(&mut self, operation: &str, entity: &str, action: PolicyAction) {
        self.bindings.insert(
            operation.to_string(),
            PolicyBinding {
                entity: entity.to_string(),
                action,
            },
        );
    }

    /// Returns the binding installed for one operation id.
    pub fn binding(&self, operation: &str) -> Option<&PolicyBinding> {
        self.bindings.get(operation)
    }

    /// Authorizes one inbound request against its operation binding.
    ///
    /// Unbound operations are allowed unconditionally. For per-record
    /// actions the request's id argument becomes the context resource.
    ///
    /// # Errors
    /// Returns `AccessDenied` with the policy message (or a generic
    /// fallback) when the verdict is negative.
    pub fn authorize(
        &self,
        operation: &str,
        actor: Option<&Principal>,
        resource_id: Option<i64>,
    ) -> Result<(), AccessDenied> {
        let Some(binding) = self.bindings.get(operation) else {
            return Ok(());
        };

        let mut context = PolicyContext {
            actor: actor.copied(),
            resource: None,
        };
        if binding.action.is_per_record() {
            if let Some(id) = resource_id {
                context = context.with_resource(id);
            }
        }

        let result = self
            .evaluator
            .evaluate(&binding.entity, binding.action, &context);
        if result.value {
            Ok(())
        } else {
            debug!(
                "event=access_denied module=policy operation={operation} entity={} action={}",
                binding.entity,
                binding.action.as_str()
            );
            Err(AccessDenied {
                message: result
                    .message
                    .unwrap_or_else(|| FALLBACK_DENIAL_MESSAGE.to_string()),
            })
        }
    }
}

/// Installs the default bindings for the user administration surface.
pub fn bind_user_operations(guard: &mut AccessGuard) {
    guard.bind(OP_USERS_LIST, USER_ENTITY, PolicyAction::Index);
    guard.bind(OP_USERS_SHOW, USER_ENTITY, PolicyAction::Show);
    guard.bind(OP_USERS_CREATE, USER_ENTITY, PolicyAction::Create);
    guard.bind(OP_USERS_UPDATE, USER_ENTITY, PolicyAction::Update);
    guard.bind(OP_USERS_DESTROY, USER_ENTITY, PolicyAction::Delete);
}
