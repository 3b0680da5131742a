//! Policy evaluation dispatch.

use crate::policy::registry::PolicyRegistry;
use crate::policy::{PolicyAction, PolicyContext, PolicyResult};
use std::sync::Arc;

/// Denial reason returned for entities without a registered policy.
pub const NO_POLICY_MESSAGE: &str = "No policy found for this entity";

/// Dispatches `(entity, action, context)` tuples to registered policies.
///
/// Evaluation performs no caching and no logging: every call re-evaluates
/// and the caller decides what to do with the denial message.
#[derive(Clone)]
pub struct PolicyEvaluator {
    registry: Arc<PolicyRegistry>,
}

impl PolicyEvaluator {
    /// Creates an evaluator over a startup-populated registry.
    pub fn new(registry: Arc<PolicyRegistry>) -> Self {
        Self { registry }
    }

    /// Evaluates one action against one entity's registered policy.
    ///
    /// An entity without a registered policy is denied with
    /// [`NO_POLICY_MESSAGE`]; a missing registration never fails open.
    pub fn evaluate(
        &self,
        entity_name: &str,
        action: PolicyAction,
        context: &PolicyContext,
    ) -> PolicyResult {
        let Some(policy) = self.registry.lookup(entity_name) else {
            return PolicyResult::deny(NO_POLICY_MESSAGE);
        };

        match action {
            PolicyAction::Index => policy.can_index(context),
            PolicyAction::Show => policy.can_show(context),
            PolicyAction::Create => policy.can_create(context),
            PolicyAction::Update => policy.can_update(context),
            PolicyAction::Delete => policy.can_delete(context),
        }
    }
}
