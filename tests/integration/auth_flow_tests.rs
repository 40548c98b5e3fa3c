//! End-to-end account flows driven through the router.
use axum::http::StatusCode;

use crate::test_utils::{body_text, location, session_cookie, setup_test_env};

#[tokio::test]
async fn test_full_journal_flow() {
    let app = setup_test_env().await;

    let response = app.register("alice", "pw1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login?registered=1"));

    let response = app
        .post_form("/login", &[("username", "alice"), ("password", "pw1")], None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
    let cookie = session_cookie(&response).expect("login sets the session cookie");

    let response = app
        .post_form("/add", &[("content", "hello world")], Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let response = app.get("/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("hello world"));
    assert!(body.contains("alice"));

    let response = app.get("/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    // The old cookie no longer maps to a session
    let response = app.get("/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
    assert!(!body_text(response).await.contains("hello world"));
}

#[tokio::test]
async fn test_login_cookie_attributes() {
    let app = setup_test_env().await;
    app.register("alice", "pw1").await;

    let response = app
        .post_form("/login", &[("username", "alice"), ("password", "pw1")], None)
        .await;
    let set_cookie = response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    assert!(set_cookie.starts_with("journal_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age="));
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = setup_test_env().await;
    assert_eq!(app.register("alice", "pw1").await.status(), StatusCode::SEE_OTHER);

    let response = app.register("alice", "other").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_text(response).await.contains("Username already exists"));

    // The original password still works
    app.login("alice", "pw1").await;
}

#[tokio::test]
async fn test_registration_rejects_empty_fields() {
    let app = setup_test_env().await;

    for (username, password) in [("", "pw"), ("alice", ""), ("", "")] {
        let response = app.register(username, password).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response)
            .await
            .contains("Username and password are required"));
    }

    let long = "x".repeat(151);
    let response = app.register(&long, "pw").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_login_is_indistinguishable() {
    let app = setup_test_env().await;
    app.register("alice", "pw1").await;

    let wrong_password = app
        .post_form("/login", &[("username", "alice"), ("password", "nope")], None)
        .await;
    let unknown_user = app
        .post_form("/login", &[("username", "mallory"), ("password", "pw1")], None)
        .await;

    for response in [wrong_password, unknown_user] {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(session_cookie(&response).is_none());
        assert!(body_text(response).await.contains("Invalid credentials"));
    }
}

#[tokio::test]
async fn test_registered_notice_on_login_page() {
    let app = setup_test_env().await;

    let body = body_text(app.get("/login?registered=1", None).await).await;
    assert!(body.contains("Account created"));

    let body = body_text(app.get("/login", None).await).await;
    assert!(!body.contains("Account created"));
}

#[tokio::test]
async fn test_login_replaces_presented_session() {
    let app = setup_test_env().await;
    app.register("alice", "pw1").await;
    app.register("bob", "pw2").await;

    let stale = app.login("alice", "pw1").await;
    let response = app
        .post_form(
            "/login",
            &[("username", "bob"), ("password", "pw2")],
            Some(&stale),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let fresh = session_cookie(&response).expect("login sets the session cookie");
    assert_ne!(fresh, stale);

    let response = app.get("/", Some(&stale)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let body = body_text(app.get("/", Some(&fresh)).await).await;
    assert!(body.contains("bob"));
}

#[tokio::test]
async fn test_failed_login_keeps_presented_session() {
    let app = setup_test_env().await;
    app.register("alice", "pw1").await;
    let cookie = app.login("alice", "pw1").await;

    let response = app
        .post_form(
            "/login",
            &[("username", "alice"), ("password", "wrong")],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.get("/", Some(&cookie)).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let app = setup_test_env().await;
    app.register("alice", "pw1").await;

    let first = app.login("alice", "pw1").await;
    let second = app.login("alice", "pw1").await;
    assert_ne!(first, second);

    app.get("/logout", Some(&first)).await;
    assert_eq!(app.get("/", Some(&first)).await.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.get("/", Some(&second)).await.status(), StatusCode::OK);
}
