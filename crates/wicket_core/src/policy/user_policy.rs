//! Built-in policy for the `User` entity.
//!
//! # Invariants
//! - Administrators may do everything except delete their own account.
//! - Regular accounts may only view and update themselves.
//! - Anonymous requests are denied every action.

use crate::model::user::UserRole;
use crate::policy::registry::PolicyRegistry;
use crate::policy::{Policy, PolicyContext, PolicyResult};
use std::sync::Arc;

/// Registry key for the user entity policy.
pub const USER_ENTITY: &str = "User";

/// Reference policy for administered accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserPolicy;

impl UserPolicy {
    fn is_admin(context: &PolicyContext) -> bool {
        context
            .actor
            .map_or(false, |actor| actor.role == UserRole::Admin)
    }

    fn is_self(context: &PolicyContext) -> bool {
        match (context.actor, context.resource) {
            (Some(actor), Some(resource)) => actor.id == resource.id,
            _ => false,
        }
    }
}

impl Policy for UserPolicy {
    fn can_index(&self, context: &PolicyContext) -> PolicyResult {
        if Self::is_admin(context) {
            return PolicyResult::allow();
        }
        PolicyResult::deny("You do not have permission to view users list")
    }

    fn can_show(&self, context: &PolicyContext) -> PolicyResult {
        if Self::is_admin(context) || Self::is_self(context) {
            return PolicyResult::allow();
        }
        PolicyResult::deny("You do not have permission to view this user")
    }

    fn can_create(&self, context: &PolicyContext) -> PolicyResult {
        if Self::is_admin(context) {
            return PolicyResult::allow();
        }
        PolicyResult::deny("You do not have permission to create users")
    }

    fn can_update(&self, context: &PolicyContext) -> PolicyResult {
        if Self::is_admin(context) || Self::is_self(context) {
            return PolicyResult::allow();
        }
        PolicyResult::deny("You do not have permission to update this user")
    }

    fn can_delete(&self, context: &PolicyContext) -> PolicyResult {
        if Self::is_admin(context) {
            // Even administrators must not remove the account they are
            // acting as.
            if Self::is_self(context) {
                return PolicyResult::deny("You cannot delete your own account");
            }
            return PolicyResult::allow();
        }
        PolicyResult::deny("You do not have permission to delete users")
    }
}

/// Registers the built-in user policy under [`USER_ENTITY`].
pub fn register_user_policy(registry: &mut PolicyRegistry) {
    registry.register(USER_ENTITY, Arc::new(UserPolicy));
}
