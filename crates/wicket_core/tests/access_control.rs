use std::sync::Arc;
use wicket_core::db::open_db_in_memory;
use wicket_core::{
    authorization_summary, bind_user_operations, register_user_policy, AccessGuard, NewUser,
    PolicyAction, PolicyContext, PolicyEvaluator, PolicyRegistry, Principal, SqliteUserRepository,
    UserRole, UserService, NO_POLICY_MESSAGE, OP_USERS_CREATE, OP_USERS_DESTROY, OP_USERS_LIST,
    OP_USERS_SHOW, OP_USERS_UPDATE, USER_ENTITY,
};

fn guard_with_defaults() -> AccessGuard {
    let mut registry = PolicyRegistry::new();
    register_user_policy(&mut registry);
    let mut guard = AccessGuard::new(PolicyEvaluator::new(Arc::new(registry)));
    bind_user_operations(&mut guard);
    guard
}

fn admin(id: i64) -> Principal {
    Principal {
        id,
        role: UserRole::Admin,
    }
}

fn regular(id: i64) -> Principal {
    Principal {
        id,
        role: UserRole::User,
    }
}

#[test]
fn anonymous_request_is_denied_on_every_user_operation() {
    let guard = guard_with_defaults();
    for operation in [
        OP_USERS_LIST,
        OP_USERS_SHOW,
        OP_USERS_CREATE,
        OP_USERS_UPDATE,
        OP_USERS_DESTROY,
    ] {
        let err = guard
            .authorize(operation, None, Some(1))
            .expect_err("anonymous request must be denied");
        assert!(
            err.message.starts_with("You do not have permission"),
            "unexpected denial message: {}",
            err.message
        );
    }
}

#[test]
fn admin_self_destroy_is_denied_but_other_destroy_passes() {
    let guard = guard_with_defaults();
    let actor = admin(1);

    let err = guard
        .authorize(OP_USERS_DESTROY, Some(&actor), Some(1))
        .expect_err("self destroy must be denied");
    assert_eq!(err.message, "You cannot delete your own account");

    guard
        .authorize(OP_USERS_DESTROY, Some(&actor), Some(2))
        .expect("destroying another account must pass");
}

#[test]
fn regular_account_may_only_pass_show_and_update_for_itself() {
    let guard = guard_with_defaults();
    let actor = regular(5);

    guard
        .authorize(OP_USERS_SHOW, Some(&actor), Some(5))
        .expect("own show must pass");
    guard
        .authorize(OP_USERS_UPDATE, Some(&actor), Some(5))
        .expect("own update must pass");

    assert!(guard.authorize(OP_USERS_SHOW, Some(&actor), Some(6)).is_err());
    assert!(guard
        .authorize(OP_USERS_UPDATE, Some(&actor), Some(6))
        .is_err());
    assert!(guard.authorize(OP_USERS_LIST, Some(&actor), None).is_err());
    assert!(guard
        .authorize(OP_USERS_CREATE, Some(&actor), None)
        .is_err());
    assert!(guard
        .authorize(OP_USERS_DESTROY, Some(&actor), Some(5))
        .is_err());
}

#[test]
fn operation_bound_to_unregistered_entity_fails_closed() {
    let registry = PolicyRegistry::new();
    let mut guard = AccessGuard::new(PolicyEvaluator::new(Arc::new(registry)));
    guard.bind("orders.list", "Order", PolicyAction::Index);

    let err = guard
        .authorize("orders.list", Some(&admin(1)), None)
        .expect_err("unregistered entity must be denied");
    assert_eq!(err.message, NO_POLICY_MESSAGE);
}

#[test]
fn rebinding_an_operation_keeps_the_last_binding() {
    let mut registry = PolicyRegistry::new();
    register_user_policy(&mut registry);
    let mut guard = AccessGuard::new(PolicyEvaluator::new(Arc::new(registry)));

    guard.bind(OP_USERS_LIST, USER_ENTITY, PolicyAction::Index);
    guard.bind(OP_USERS_LIST, USER_ENTITY, PolicyAction::Show);

    let binding = guard.binding(OP_USERS_LIST).expect("binding installed");
    assert_eq!(binding.action, PolicyAction::Show);
}

#[test]
fn evaluator_re_evaluates_against_latest_registration() {
    // Last registration wins, and evaluation performs no caching.
    let mut registry = PolicyRegistry::new();
    register_user_policy(&mut registry);
    register_user_policy(&mut registry);
    let evaluator = PolicyEvaluator::new(Arc::new(registry));

    let context = PolicyContext::for_actor(admin(1));
    assert!(evaluator
        .evaluate(USER_ENTITY, PolicyAction::Index, &context)
        .value);
    assert!(evaluator
        .evaluate(USER_ENTITY, PolicyAction::Index, &context)
        .value);
}

#[test]
fn guarded_listing_flow_checks_policy_before_the_service_runs() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));
    let guard = guard_with_defaults();

    let stored_admin = service
        .create_user(&NewUser {
            role: UserRole::Admin,
            ..NewUser::new("root@example.com", "argon2id$stub-hash")
        })
        .unwrap();
    service
        .create_user(&NewUser::new("member@example.com", "argon2id$stub-hash"))
        .unwrap();

    let actor = admin(stored_admin.id);
    guard
        .authorize(OP_USERS_LIST, Some(&actor), None)
        .expect("admin listing must pass the guard");
    let connection = service.list_users(&Default::default()).unwrap();
    assert_eq!(connection.total_count, 2);

    let member = regular(2);
    let err = guard
        .authorize(OP_USERS_LIST, Some(&member), None)
        .expect_err("member listing must be rejected at the boundary");
    assert_eq!(err.message, "You do not have permission to view users list");
}

#[test]
fn authorization_summary_matches_guard_verdicts() {
    let mut registry = PolicyRegistry::new();
    register_user_policy(&mut registry);
    let evaluator = PolicyEvaluator::new(Arc::new(registry));

    let summary = authorization_summary(&evaluator, Some(admin(1)));
    assert!(summary.can_index_users.value);
    assert!(summary.can_create_user.value);

    let denied = authorization_summary(&evaluator, Some(regular(9)));
    assert!(!denied.can_index_users.value);
    assert_eq!(
        denied.can_index_users.message.as_deref(),
        Some("You do not have permission to view users list")
    );
}
