use wicket_core::db::open_db_in_memory;
use wicket_core::{
    NewUser, SqliteUserRepository, User, UserPatch, UserRepository, UserRole, UserService,
    UserServiceError,
};

fn new_user(email: &str) -> NewUser {
    NewUser::new(email, "argon2id$stub-hash")
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let created = service.create_user(&new_user("first@example.com")).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.email, "first@example.com");
    assert_eq!(created.role, UserRole::User);
    assert!(!created.is_verified);
    assert!(created.created_at > 0);

    let loaded = service.get_user(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_assigns_monotonic_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let first = service.create_user(&new_user("a@example.com")).unwrap();
    let second = service.create_user(&new_user("b@example.com")).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn duplicate_email_create_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    service.create_user(&new_user("taken@example.com")).unwrap();
    let err = service
        .create_user(&new_user("taken@example.com"))
        .unwrap_err();
    assert!(matches!(
        err,
        UserServiceError::EmailAlreadyExists(email) if email == "taken@example.com"
    ));
}

#[test]
fn get_rejects_non_positive_and_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    for id in [0, -3, 9999] {
        let err = service.get_user(id).unwrap_err();
        assert!(matches!(err, UserServiceError::UserNotFound(found) if found == id));
    }
}

#[test]
fn patch_updates_only_requested_columns() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let created = service.create_user(&new_user("patch@example.com")).unwrap();
    let patch = UserPatch {
        role: Some(UserRole::Admin),
        is_verified: Some(true),
        ..UserPatch::default()
    };
    let updated = service.update_user(created.id, &patch).unwrap();

    assert_eq!(updated.role, UserRole::Admin);
    assert!(updated.is_verified);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.password_hash, created.password_hash);
}

#[test]
fn patch_can_set_and_clear_nullable_token_columns() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));
    let created = service.create_user(&new_user("tokens@example.com")).unwrap();

    let set = UserPatch {
        reset_password_token: Some(Some("reset-token".to_string())),
        reset_password_expires: Some(Some(1_900_000_000_000)),
        ..UserPatch::default()
    };
    let with_token = service.update_user(created.id, &set).unwrap();
    assert_eq!(with_token.reset_password_token.as_deref(), Some("reset-token"));
    assert_eq!(with_token.reset_password_expires, Some(1_900_000_000_000));

    let clear = UserPatch {
        reset_password_token: Some(None),
        reset_password_expires: Some(None),
        ..UserPatch::default()
    };
    let cleared = service.update_user(created.id, &clear).unwrap();
    assert!(cleared.reset_password_token.is_none());
    assert!(cleared.reset_password_expires.is_none());
}

#[test]
fn patch_to_email_of_another_account_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    service.create_user(&new_user("owner@example.com")).unwrap();
    let victim = service.create_user(&new_user("victim@example.com")).unwrap();

    let patch = UserPatch {
        email: Some("owner@example.com".to_string()),
        ..UserPatch::default()
    };
    let err = service.update_user(victim.id, &patch).unwrap_err();
    assert!(matches!(err, UserServiceError::EmailAlreadyExists(_)));

    // Re-asserting the current email is not a conflict with itself.
    let same = UserPatch {
        email: Some("victim@example.com".to_string()),
        ..UserPatch::default()
    };
    service.update_user(victim.id, &same).unwrap();
}

#[test]
fn destroy_returns_removed_record_and_second_destroy_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let created = service.create_user(&new_user("gone@example.com")).unwrap();
    let removed = service.destroy_user(created.id).unwrap();
    assert_eq!(removed.id, created.id);

    let err = service.destroy_user(created.id).unwrap_err();
    assert!(matches!(err, UserServiceError::UserNotFound(id) if id == created.id));
}

#[test]
fn token_lookups_find_matching_accounts() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let mut input = new_user("lookup@example.com");
    input.verification_token = Some("verify-me".to_string());
    let created = service.create_user(&input).unwrap();

    let by_verification = service
        .find_by_verification_token("verify-me")
        .unwrap()
        .unwrap();
    assert_eq!(by_verification.id, created.id);
    assert!(service.find_by_verification_token("other").unwrap().is_none());

    let patch = UserPatch {
        reset_password_token: Some(Some("reset-me".to_string())),
        ..UserPatch::default()
    };
    service.update_user(created.id, &patch).unwrap();
    let by_reset = service.find_by_reset_token("reset-me").unwrap().unwrap();
    assert_eq!(by_reset.id, created.id);

    let by_email = service.find_by_email("lookup@example.com").unwrap().unwrap();
    assert_eq!(by_email.id, created.id);
}

#[test]
fn create_rejects_malformed_email_before_persistence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let err = service.create_user(&new_user("not-an-address")).unwrap_err();
    assert!(matches!(err, UserServiceError::Repo(_)));
    assert_eq!(repo.count_users(&Default::default()).unwrap(), 0);
}

#[test]
fn serialized_user_hides_credential_columns() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let mut input = new_user("secret@example.com");
    input.verification_token = Some("hidden-token".to_string());
    let created = service.create_user(&input).unwrap();

    let json = serde_json::to_value(&created).unwrap();
    let object = json.as_object().unwrap();
    assert!(object.contains_key("id"));
    assert!(object.contains_key("email"));
    assert!(object.contains_key("role"));
    assert!(!object.contains_key("password_hash"));
    assert!(!object.contains_key("verification_token"));
    assert!(!object.contains_key("reset_password_token"));
    assert!(!object.contains_key("reset_password_expires"));
}

#[test]
fn updated_at_refreshes_on_update() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));
    let created = service.create_user(&new_user("clock@example.com")).unwrap();

    // Bypass the service to backdate the stored timestamp, then patch.
    conn.execute(
        "UPDATE users SET updated_at = updated_at - 60000 WHERE id = ?1;",
        [created.id],
    )
    .unwrap();
    let backdated: User = {
        let repo = SqliteUserRepository::new(&conn);
        repo.get_user(created.id).unwrap().unwrap()
    };

    let patch = UserPatch {
        is_verified: Some(true),
        ..UserPatch::default()
    };
    let updated = service.update_user(created.id, &patch).unwrap();
    assert!(updated.updated_at > backdated.updated_at);
}
