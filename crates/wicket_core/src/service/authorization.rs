//! Pre-flight authorization summary for UI gating.
//!
//! Lets a client ask "what could this actor do" before rendering admin
//! affordances, without attempting the operations themselves.

use crate::policy::{
    PolicyAction, PolicyContext, PolicyEvaluator, PolicyResult, Principal, USER_ENTITY,
};
use serde::Serialize;

/// Collection-level verdicts for the user administration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationSummary {
    pub can_index_users: PolicyResult,
    pub can_create_user: PolicyResult,
}

/// Evaluates the collection-level user permissions for one actor.
pub fn authorization_summary(
    evaluator: &PolicyEvaluator,
    actor: Option<Principal>,
) -> AuthorizationSummary {
    let context = PolicyContext {
        actor,
        resource: None,
    };

    AuthorizationSummary {
        can_index_users: evaluator.evaluate(USER_ENTITY, PolicyAction::Index, &context),
        can_create_user: evaluator.evaluate(USER_ENTITY, PolicyAction::Create, &context),
    }
}

#[cfg(test)]
mod tests {
    use super::authorization_summary;
    use crate::model::user::UserRole;
    use crate::policy::{register_user_policy, PolicyEvaluator, PolicyRegistry, Principal};
    use std::sync::Arc;

    fn evaluator() -> PolicyEvaluator {
        let mut registry = PolicyRegistry::new();
        register_user_policy(&mut registry);
        PolicyEvaluator::new(Arc::new(registry))
    }

    #[test]
    fn admin_summary_allows_both_collection_actions() {
        let summary = authorization_summary(
            &evaluator(),
            Some(Principal {
                id: 1,
                role: UserRole::Admin,
            }),
        );
        assert!(summary.can_index_users.value);
        assert!(summary.can_create_user.value);
    }

    #[test]
    fn regular_and_anonymous_summaries_deny_both_actions() {
        let regular = authorization_summary(
            &evaluator(),
            Some(Principal {
                id: 5,
                role: UserRole::User,
            }),
        );
        assert!(!regular.can_index_users.value);
        assert!(!regular.can_create_user.value);

        let anonymous = authorization_summary(&evaluator(), None);
        assert!(!anonymous.can_index_users.value);
        assert!(!anonymous.can_create_user.value);
    }
}
