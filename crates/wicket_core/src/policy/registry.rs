//! In-process policy registry.
//!
//! The registry is an explicit object constructed during process startup
//! and passed by handle to every consumer, so tests can build isolated
//! registries. After startup registration it is only read.

use crate::policy::Policy;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Entity-name to policy mapping.
#[derive(Default)]
pub struct PolicyRegistry {
    policies: BTreeMap<String, Arc<dyn Policy>>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one policy under an entity name.
    ///
    /// Registration is an idempotent overwrite: the last registration for
    /// a name wins and duplicates are not an error.
    pub fn register(&mut self, entity_name: &str, policy: Arc<dyn Policy>) {
        self.policies.insert(entity_name.to_string(), policy);
    }

    /// Returns the policy registered for one entity name.
    pub fn lookup(&self, entity_name: &str) -> Option<Arc<dyn Policy>> {
        self.policies.get(entity_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Returns sorted registered entity names.
    pub fn entity_names(&self) -> Vec<String> {
        self.policies.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::PolicyRegistry;
    use crate::policy::{Policy, PolicyContext, PolicyResult};
    use std::sync::Arc;

    struct FixedPolicy {
        verdict: bool,
    }

    impl Policy for FixedPolicy {
        fn can_index(&self, _context: &PolicyContext) -> PolicyResult {
            self.verdict()
        }

        fn can_show(&self, _context: &PolicyContext) -> PolicyResult {
            self.verdict()
        }

        fn can_create(&self, _context: &PolicyContext) -> PolicyResult {
            self.verdict()
        }

        fn can_update(&self, _context: &PolicyContext) -> PolicyResult {
            self.verdict()
        }

        fn can_delete(&self, _context: &PolicyContext) -> PolicyResult {
            self.verdict()
        }
    }

    impl FixedPolicy {
        fn verdict(&self) -> PolicyResult {
            if self.verdict {
                PolicyResult::allow()
            } else {
                PolicyResult::deny("fixed deny")
            }
        }
    }

    #[test]
    fn registers_and_looks_up_by_entity_name() {
        let mut registry = PolicyRegistry::new();
        assert!(registry.is_empty());

        registry.register("Invoice", Arc::new(FixedPolicy { verdict: true }));
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("Invoice").is_some());
        assert!(registry.lookup("Order").is_none());
    }

    #[test]
    fn re_registration_overwrites_without_error() {
        let mut registry = PolicyRegistry::new();
        registry.register("Invoice", Arc::new(FixedPolicy { verdict: false }));
        registry.register("Invoice", Arc::new(FixedPolicy { verdict: true }));

        assert_eq!(registry.len(), 1);
        let policy = registry.lookup("Invoice").expect("registered policy");
        assert!(policy.can_index(&PolicyContext::anonymous()).value);
    }

    #[test]
    fn entity_names_are_sorted() {
        let mut registry = PolicyRegistry::new();
        registry.register("Order", Arc::new(FixedPolicy { verdict: true }));
        registry.register("Invoice", Arc::new(FixedPolicy { verdict: true }));
        assert_eq!(registry.entity_names(), vec!["Invoice", "Order"]);
    }
}
