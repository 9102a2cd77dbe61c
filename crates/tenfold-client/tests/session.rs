mod common;

use common::MockBackend;
use serde_json::json;
use tempfile::tempdir;
use tenfold_client::db::{SessionDb, TENANT_KEY, USER_KEY};
use tenfold_client::error::LoginError;
use tenfold_client::SessionStore;

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn admin_login_populates_session_and_skips_tenant_entry() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(json!({
        "access_token": "tok1",
        "is_superuser": true,
        "user_id": 7,
        "email": "admin@example.com"
    }));

    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;

    let session = client
        .login("admin@example.com", "x")
        .await
        .expect("login succeeds");

    assert_eq!(session.token(), Some("tok1"));
    assert!(session.is_admin());
    assert!(session.is_authenticated());
    assert_eq!(session.tenant_id(), None);
    let user = session.user().expect("user present");
    assert_eq!(user.id, 7);
    assert!(user.is_superuser);

    // No tenant entry may survive an admin login, whatever the response
    // did or did not carry.
    let persisted = client.session().db().load().await.expect("snapshot loads");
    assert_eq!(persisted.token.as_deref(), Some("tok1"));
    assert!(persisted.user_json.is_some());
    assert_eq!(persisted.tenant_id, None);
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn tenant_login_without_tenant_id_falls_back_to_default() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(json!({
        "access_token": "tok3",
        "is_superuser": false
    }));

    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;

    let session = client.login("user@example.com", "pw").await.expect("login succeeds");

    assert!(!session.is_admin());
    assert_eq!(session.tenant_id().map(|t| t.as_str()), Some("1"));

    let persisted = client.session().db().load().await.expect("snapshot loads");
    assert_eq!(persisted.tenant_id.as_deref(), Some("1"));
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn tenant_login_persists_reported_tenant() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(json!({
        "access_token": "tok2",
        "is_superuser": false,
        "tenant_id": 42
    }));

    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;

    let session = client.login("user@example.com", "pw").await.expect("login succeeds");
    assert_eq!(session.tenant_id().map(|t| t.as_str()), Some("42"));

    let persisted = client.session().db().load().await.expect("snapshot loads");
    assert_eq!(persisted.tenant_id.as_deref(), Some("42"));
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn session_survives_reopen() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(json!({
        "access_token": "tok2",
        "is_superuser": false,
        "tenant_id": 42,
        "user_id": 3,
        "email": "user@example.com",
        "full_name": "Regular User"
    }));

    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;
    client.login("user@example.com", "pw").await.expect("login succeeds");
    drop(client);

    let client = common::client(&backend, &dir).await;
    let session = client.session().snapshot();
    assert!(session.is_authenticated());
    assert!(!session.is_admin());
    assert_eq!(session.token(), Some("tok2"));
    assert_eq!(session.tenant_id().map(|t| t.as_str()), Some("42"));
    assert_eq!(session.user().expect("user present").email, "user@example.com");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn logout_clears_all_durable_state() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(json!({
        "access_token": "tok2",
        "is_superuser": false,
        "tenant_id": 42
    }));

    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;
    client.login("user@example.com", "pw").await.expect("login succeeds");

    client.logout().await.expect("logout succeeds");
    assert!(!client.session().is_authenticated());

    let persisted = client.session().db().load().await.expect("snapshot loads");
    assert!(persisted.is_empty());
    drop(client);

    // A fresh restore sees nothing to pick up.
    let client = common::client(&backend, &dir).await;
    assert!(!client.session().is_authenticated());
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn corrupt_user_record_discards_whole_snapshot() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(json!({
        "access_token": "tok2",
        "is_superuser": false,
        "tenant_id": 42
    }));

    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;
    client.login("user@example.com", "pw").await.expect("login succeeds");
    drop(client);

    let db = SessionDb::open(common::session_db_path(&dir))
        .await
        .expect("db opens");
    db.store_raw(USER_KEY, "{definitely not json").await.expect("write ok");

    let store = SessionStore::restore(db).await.expect("restore runs");
    assert!(!store.is_authenticated());

    let persisted = store.db().load().await.expect("snapshot loads");
    assert!(persisted.is_empty(), "all keys removed: {persisted:?}");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn partial_snapshot_counts_as_no_session() {
    let dir = tempdir().expect("tempdir");

    let db = SessionDb::open(common::session_db_path(&dir))
        .await
        .expect("db opens");
    db.store_raw(tenfold_client::db::TOKEN_KEY, "orphan-token")
        .await
        .expect("write ok");

    let store = SessionStore::restore(db).await.expect("restore runs");
    assert!(!store.is_authenticated());
    assert!(store.db().load().await.expect("snapshot loads").is_empty());
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn restored_admin_ignores_stale_tenant_entry() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(json!({
        "access_token": "tok1",
        "is_superuser": true,
        "user_id": 7
    }));

    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;
    client.login("admin@example.com", "x").await.expect("login succeeds");
    drop(client);

    // Simulate a leftover tenant entry from before this account became an
    // admin.
    let db = SessionDb::open(common::session_db_path(&dir))
        .await
        .expect("db opens");
    db.store_raw(TENANT_KEY, "13").await.expect("write ok");

    let store = SessionStore::restore(db).await.expect("restore runs");
    let session = store.snapshot();
    assert!(session.is_admin());
    assert_eq!(session.tenant_id(), None);
    assert_eq!(session.scope().tenant_id, None);
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn rejected_login_leaves_session_untouched() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(json!({
        "access_token": "tok2",
        "is_superuser": false,
        "tenant_id": 42
    }));

    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;
    client.login("user@example.com", "pw").await.expect("login succeeds");

    backend.reject_logins();
    let err = client
        .login("user@example.com", "wrong")
        .await
        .expect_err("login must fail");
    assert_eq!(err.user_message(), "Incorrect email or password");

    // The failed attempt changed nothing, in memory or durably.
    let session = client.session().snapshot();
    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("tok2"));
    let persisted = client.session().db().load().await.expect("snapshot loads");
    assert_eq!(persisted.token.as_deref(), Some("tok2"));
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn empty_credentials_fail_before_any_request() {
    let backend = MockBackend::start().await;
    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;

    let err = client.login("", "pw").await.expect_err("must fail");
    assert!(matches!(err, LoginError::EmptyCredentials));
    let err = client.login("user@example.com", "").await.expect_err("must fail");
    assert!(matches!(err, LoginError::EmptyCredentials));
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn login_response_without_token_is_rejected() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(json!({"user_id": 3}));

    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;

    let err = client.login("user@example.com", "pw").await.expect_err("must fail");
    assert!(matches!(err, LoginError::MalformedResponse { .. }));
    assert_eq!(err.user_message(), tenfold_client::GENERIC_LOGIN_FAILURE);
    assert!(!client.session().is_authenticated());
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn superuser_string_flag_does_not_make_an_admin() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(json!({
        "access_token": "tok9",
        "is_superuser": "true"
    }));

    let dir = tempdir().expect("tempdir");
    let client = common::client(&backend, &dir).await;

    let session = client.login("user@example.com", "pw").await.expect("login succeeds");
    assert!(!session.is_admin());
    // Treated as a regular tenant session, fallback tenant included.
    assert_eq!(session.tenant_id().map(|t| t.as_str()), Some("1"));
}
