//! Session lifecycle: restore, login, logout and the route gate on top.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{BrokenStore, ScriptedAuthGateway, login_response, store_with};
use streamfront_application::{GateWatcher, SessionStore};
use streamfront_core::api::ApiError;
use streamfront_core::auth::{AuthOperation, RegisterRequest};
use streamfront_core::routing::{
    CATALOG_ROUTE, GateState, LANDING_ROUTE, RouteAccess, RouteGate, RouteTable,
};
use streamfront_core::session::{
    Identity, PersistedIdentity, Resolution, Role, SessionSnapshot, TOKEN_KEY, USER_KEY,
};
use streamfront_core::storage::KeyValueStore;
use streamfront_infrastructure::JsonFileKeyValueStore;
use tempfile::TempDir;

fn stored_identity(role: Role) -> String {
    PersistedIdentity::encode(&Identity::from_login("a@b.com", "A B", role, None)).unwrap()
}

fn accepting_admin() -> Arc<ScriptedAuthGateway> {
    Arc::new(ScriptedAuthGateway::accepting(login_response(
        "a@b.com",
        "A B",
        Role::Admin,
    )))
}

// ============================================================================
// initialize()
// ============================================================================

#[tokio::test]
async fn test_initialize_restores_complete_session() {
    let user = stored_identity(Role::User);
    let (store, _) = store_with(
        accepting_admin(),
        &[(TOKEN_KEY, "abc"), (USER_KEY, user.as_str())],
    );
    assert_eq!(store.resolution(), Resolution::Unresolved);

    let snapshot = store.initialize().await;

    assert!(snapshot.is_resolved());
    assert!(store.is_authenticated());
    assert_eq!(store.credential().unwrap().as_str(), "abc");
    assert_eq!(store.identity().unwrap().display_name, "A B");
    assert!(!store.is_admin());
}

#[tokio::test]
async fn test_initialize_discards_unparseable_identity() {
    let (store, storage) = store_with(
        accepting_admin(),
        &[(TOKEN_KEY, "abc"), (USER_KEY, "{not valid json")],
    );

    store.initialize().await;

    assert!(!store.is_authenticated());
    assert_eq!(store.resolution(), Resolution::Resolved);
    assert!(!storage.contains_key(TOKEN_KEY).await);
    assert!(!storage.contains_key(USER_KEY).await);
}

#[tokio::test]
async fn test_initialize_discards_partial_sessions() {
    let user = stored_identity(Role::Admin);
    let partial_states: Vec<Vec<(&str, &str)>> = vec![
        vec![(TOKEN_KEY, "abc")],
        vec![(USER_KEY, user.as_str())],
        vec![(TOKEN_KEY, "   "), (USER_KEY, user.as_str())],
        vec![(TOKEN_KEY, "abc"), (USER_KEY, "[]")],
        vec![(TOKEN_KEY, "abc"), (USER_KEY, r#"{"schemaVersion":99}"#)],
    ];

    for entries in partial_states {
        let (store, storage) = store_with(accepting_admin(), &entries);
        let snapshot = store.initialize().await;

        assert!(snapshot.is_resolved(), "entries: {:?}", entries);
        assert!(!store.is_authenticated(), "entries: {:?}", entries);
        assert!(!store.is_admin());
        assert!(storage.is_empty().await, "entries: {:?}", entries);
    }
}

#[tokio::test]
async fn test_initialize_accepts_legacy_identity_record() {
    let legacy = r#"{"email":"old@b.com","fullName":"Old Timer","role":"ADMIN"}"#;
    let (store, _) = store_with(accepting_admin(), &[(TOKEN_KEY, "abc"), (USER_KEY, legacy)]);

    store.initialize().await;

    let identity = store.identity().unwrap();
    assert_eq!(identity.email_address, "old@b.com");
    assert_eq!(identity.display_name, "Old Timer");
    assert!(store.is_admin());
}

#[tokio::test]
async fn test_initialize_survives_broken_storage() {
    let store = SessionStore::new(Arc::new(BrokenStore::broken()), accepting_admin());
    let snapshot = store.initialize().await;
    assert_eq!(snapshot, SessionSnapshot::resolved(None));
}

#[tokio::test]
async fn test_initialize_resolves_exactly_once() {
    let (store, storage) = store_with(accepting_admin(), &[]);
    let mut updates = store.subscribe();

    store.initialize().await;
    assert!(updates.has_changed().unwrap());
    updates.borrow_and_update();

    // Entries appearing later are not picked up by a second call.
    let user = stored_identity(Role::User);
    storage
        .set_many(&[(TOKEN_KEY, "abc"), (USER_KEY, user.as_str())])
        .await
        .unwrap();
    let again = store.initialize().await;

    assert!(!again.is_authenticated());
    assert!(!updates.has_changed().unwrap());
}

// ============================================================================
// login() / register() / logout()
// ============================================================================

#[tokio::test]
async fn test_login_with_admin_response_makes_admin() {
    let auth = accepting_admin();
    let (store, storage) = store_with(auth.clone(), &[]);
    store.initialize().await;

    let identity = store.login("a@b.com", "x").await.unwrap();

    assert!(store.is_authenticated());
    assert!(store.is_admin());
    assert_eq!(identity.role, Role::Admin);
    assert_eq!(identity.display_name, "A B");
    assert!(!identity.email_verified);
    assert!(identity.active);
    assert!(identity.favorite_categories.is_empty());

    let sent = auth.last_login.lock().unwrap().clone().unwrap();
    assert_eq!(sent.email_address, "a@b.com");
    assert_eq!(sent.password, "x");

    assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok1"));
    let persisted = storage.get(USER_KEY).await.unwrap().unwrap();
    assert_eq!(PersistedIdentity::decode(&persisted).unwrap(), identity);
}

#[tokio::test]
async fn test_login_role_matches_remote_role() {
    for role in [Role::User, Role::Admin] {
        let auth = Arc::new(ScriptedAuthGateway::accepting(login_response(
            "a@b.com", "A", role,
        )));
        let (store, _) = store_with(auth, &[]);
        store.initialize().await;
        store.login("a@b.com", "pw").await.unwrap();

        assert_eq!(store.identity().unwrap().role, role);
        assert_eq!(store.is_admin(), role == Role::Admin);
    }
}

#[tokio::test]
async fn test_failed_login_leaves_session_unchanged() {
    let failures = [
        ApiError::Unauthorized {
            message: Some("Invalid email or password".to_string()),
        },
        ApiError::Rejected {
            status: 500,
            message: None,
        },
        ApiError::Timeout,
        ApiError::Transport("connection refused".to_string()),
    ];

    for failure in failures {
        let auth = accepting_admin();
        let (store, storage) = store_with(auth.clone(), &[]);
        store.initialize().await;
        store.login("a@b.com", "x").await.unwrap();
        let before = store.snapshot();

        auth.set_login_result(Err(failure.clone()));
        let err = store.login("b@c.com", "y").await.unwrap_err();

        assert_eq!(store.snapshot(), before);
        assert!(!err.message.is_empty());
        assert_eq!(err.operation, AuthOperation::Login);
        assert_eq!(err.cause, failure);
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok1"));
    }
}

#[tokio::test]
async fn test_failed_login_message_prefers_server_text() {
    let auth = Arc::new(ScriptedAuthGateway::rejecting(ApiError::Unauthorized {
        message: Some("Invalid email or password".to_string()),
    }));
    let (store, _) = store_with(auth, &[]);
    store.initialize().await;

    let err = store.login("a@b.com", "x").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_blank_fields_fail_without_network_call() {
    let auth = accepting_admin();
    let (store, _) = store_with(auth.clone(), &[]);
    store.initialize().await;

    let err = store.login("   ", "x").await.unwrap_err();
    assert!(!err.message.is_empty());
    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_register_does_not_sign_in() {
    let (store, storage) = store_with(accepting_admin(), &[]);
    store.initialize().await;

    let message = store
        .register(&RegisterRequest::new("A B", "a@b.com", "secret"))
        .await
        .unwrap();

    assert_eq!(message, "User registered successfully");
    assert!(!store.is_authenticated());
    assert!(storage.is_empty().await);
}

#[tokio::test]
async fn test_register_failure_uses_fallback_message() {
    let auth = Arc::new(ScriptedAuthGateway::rejecting(ApiError::Rejected {
        status: 500,
        message: None,
    }));
    let (store, _) = store_with(auth, &[]);
    store.initialize().await;

    let err = store
        .register(&RegisterRequest::new("A B", "a@b.com", "secret"))
        .await
        .unwrap_err();
    assert_eq!(err.message, "Registration failed. Please try again.");
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let (store, storage) = store_with(accepting_admin(), &[]);
    store.initialize().await;
    store.login("a@b.com", "x").await.unwrap();

    store.logout().await;
    assert!(!store.is_authenticated());
    let once = store.snapshot();

    store.logout().await;
    assert_eq!(store.snapshot(), once);
    assert_eq!(once, SessionSnapshot::resolved(None));
    assert!(storage.is_empty().await);
}

#[tokio::test]
async fn test_logout_with_broken_storage_still_clears_session() {
    let storage = Arc::new(BrokenStore::default());
    let store = SessionStore::new(storage.clone(), accepting_admin());
    store.initialize().await;
    store.login("a@b.com", "x").await.unwrap();
    assert!(store.is_authenticated());

    storage.broken.store(true, Ordering::SeqCst);
    store.logout().await;
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_login_that_cannot_be_persisted_is_rejected() {
    let storage = Arc::new(BrokenStore::broken());
    let auth = accepting_admin();
    let store = SessionStore::new(storage.clone(), auth.clone());
    store.initialize().await;
    let before = store.snapshot();

    let err = store.login("a@b.com", "x").await.unwrap_err();

    assert_eq!(auth.login_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.snapshot(), before);
    assert!(!store.is_authenticated());
    assert_eq!(err.operation, AuthOperation::Login);
    assert_eq!(err.message, AuthOperation::Login.fallback_message());
    assert!(matches!(err.cause, ApiError::Persistence(_)));

    storage.broken.store(false, Ordering::SeqCst);
    assert!(storage.get(TOKEN_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_survives_restart_with_file_storage() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");

    let first = SessionStore::new(
        Arc::new(JsonFileKeyValueStore::new(path.clone())),
        accepting_admin(),
    );
    first.initialize().await;
    first.login("a@b.com", "x").await.unwrap();

    let second = SessionStore::new(Arc::new(JsonFileKeyValueStore::new(path)), accepting_admin());
    second.initialize().await;
    assert!(second.is_admin());
    assert_eq!(second.snapshot().session, first.snapshot().session);
}

#[tokio::test]
async fn test_update_identity_requires_session() {
    let (store, _) = store_with(accepting_admin(), &[]);
    store.initialize().await;

    let err = store
        .update_identity(|identity| identity.display_name = "X".to_string())
        .await
        .unwrap_err();
    assert!(err.is_no_session());
}

#[tokio::test]
async fn test_change_password_needs_session() {
    let (store, _) = store_with(accepting_admin(), &[]);
    store.initialize().await;

    let err = store.change_password("old", "new-secret").await.unwrap_err();
    assert_eq!(err.message, "Failed to change password");

    store.login("a@b.com", "x").await.unwrap();
    let message = store.change_password("old", "new-secret").await.unwrap();
    assert_eq!(message, "Password changed");
}

// ============================================================================
// Route gate over a live store
// ============================================================================

#[tokio::test]
async fn test_gate_is_pending_until_initialized() {
    let (store, _) = store_with(accepting_admin(), &[]);
    let mut watcher = GateWatcher::new(RouteGate::new(RouteAccess::protected()), store.subscribe());

    assert_eq!(watcher.current(), GateState::Pending);
    assert_eq!(watcher.current().redirect_target(), None);

    store.initialize().await;
    assert_eq!(
        watcher.changed().await.unwrap().redirect_target(),
        Some(LANDING_ROUTE)
    );
}

#[tokio::test]
async fn test_sign_in_page_redirects_signed_in_user() {
    let (store, _) = store_with(accepting_admin(), &[]);
    store.initialize().await;
    let table = RouteTable::storefront();
    let login_gate = table.resolve("/login").unwrap().route.gate;
    let mut watcher = GateWatcher::new(login_gate, store.subscribe());
    assert!(watcher.current().is_allowed());

    store.login("a@b.com", "x").await.unwrap();
    let state = watcher.changed().await.unwrap();
    assert_eq!(state.redirect_target(), Some(CATALOG_ROUTE));

    store.logout().await;
    assert_eq!(watcher.changed().await, Some(GateState::Allowed));
}

#[tokio::test]
async fn test_admin_dashboard_requires_admin_role() {
    let auth = Arc::new(ScriptedAuthGateway::accepting(login_response(
        "u@b.com",
        "U",
        Role::User,
    )));
    let (store, _) = store_with(auth.clone(), &[]);
    store.initialize().await;
    store.login("u@b.com", "x").await.unwrap();

    let table = RouteTable::storefront();
    let gate = table.resolve("/browse/admin-dashboard").unwrap().route.gate;
    assert_eq!(gate.evaluate(&store.snapshot()).redirect_target(), Some(CATALOG_ROUTE));

    auth.set_login_result(Ok(login_response("a@b.com", "A", Role::Admin)));
    store.login("a@b.com", "x").await.unwrap();
    assert!(gate.evaluate(&store.snapshot()).is_allowed());
}
