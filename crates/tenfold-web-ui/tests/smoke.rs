mod common;

use common::{MockBackend, TestServer, location};
use reqwest::StatusCode;
use serde_json::json;

fn tenant_login_response() -> serde_json::Value {
    json!({
        "access_token": "tok2",
        "is_superuser": false,
        "tenant_id": 42,
        "user_id": 3,
        "email": "user@example.com",
        "full_name": "Regular User"
    })
}

fn admin_login_response() -> serde_json::Value {
    json!({
        "access_token": "tok1",
        "is_superuser": true,
        "user_id": 7,
        "email": "admin@example.com"
    })
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn unauthenticated_pages_redirect_to_login() {
    let backend = MockBackend::start().await;
    let server = TestServer::start(&backend).await;
    let driver = server.driver();

    let resp = driver.get("/").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?redirect=%2F");

    let resp = driver.get("/contacts").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?redirect=%2Fcontacts");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn login_authenticates_and_scopes_backend_calls() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(tenant_login_response());
    let server = TestServer::start(&backend).await;
    let driver = server.driver();

    let resp = driver.login("user@example.com", "pw").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let resp = driver.get("/contacts").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body reads");
    assert!(body.contains("Contacts"), "page renders: {body}");

    let captured = backend.captured();
    let call = captured.last().expect("backend saw the call");
    assert_eq!(call.path, "/crm/contacts/");
    assert_eq!(call.authorization.as_deref(), Some("Bearer tok2"));
    assert_eq!(call.tenant.as_deref(), Some("42"));
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn login_honors_redirect_parameter() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(tenant_login_response());
    let server = TestServer::start(&backend).await;
    let driver = server.driver();

    let resp = driver
        .post_form(
            "/login",
            &[
                ("email", "user@example.com"),
                ("password", "pw"),
                ("redirect", "/leads"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/leads");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn failed_login_shows_backend_detail() {
    let backend = MockBackend::start().await;
    backend.reject_logins();
    let server = TestServer::start(&backend).await;
    let driver = server.driver();

    let resp = driver.login("user@example.com", "wrong").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body reads");
    assert!(
        body.contains("Incorrect email or password"),
        "notice shown: {body}"
    );

    // Still unauthenticated.
    let resp = driver.get("/").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn logout_lands_on_the_login_page() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(tenant_login_response());
    let server = TestServer::start(&backend).await;
    let driver = server.driver();

    driver.login("user@example.com", "pw").await;

    let resp = driver.post_form("/logout", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let resp = driver.get("/contacts").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?redirect=%2Fcontacts");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn expired_token_redirects_to_login_and_ends_the_session() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(tenant_login_response());
    let server = TestServer::start(&backend).await;
    let driver = server.driver();

    driver.login("user@example.com", "pw").await;

    backend.force_unauthorized(true);
    let resp = driver.get("/contacts").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    // The teardown stuck: even pages that would not hit the backend now
    // require a fresh sign-in.
    let resp = driver.get("/").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?redirect=%2F");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn non_admin_is_sent_home_from_the_admin_panel() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(tenant_login_response());
    let server = TestServer::start(&backend).await;
    let driver = server.driver();

    driver.login("user@example.com", "pw").await;

    let resp = driver.get("/admin").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn admin_panel_renders_for_superusers() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(admin_login_response());
    let server = TestServer::start(&backend).await;
    let driver = server.driver();

    driver.login("admin@example.com", "x").await;

    let resp = driver.get("/admin").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body reads");
    assert!(body.contains("Tenants"), "tenants section: {body}");
    assert!(body.contains("Users"), "users section: {body}");

    // Neither admin call carried a tenant scoping header.
    for call in backend.captured() {
        assert_eq!(call.tenant, None, "unscoped: {call:?}");
    }
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn login_page_redirects_away_when_already_signed_in() {
    let backend = MockBackend::start().await;
    backend.accept_logins_with(tenant_login_response());
    let server = TestServer::start(&backend).await;
    let driver = server.driver();

    driver.login("user@example.com", "pw").await;

    let resp = driver.get("/login").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
}
