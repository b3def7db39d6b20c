//! Test login, bearer verification and token refresh over HTTP.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};

use crate::e2e_tests::helpers::*;

async fn assert_unauthorized(response: axum::http::Response<Body>) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "JWT realm=\"jwt auth\""
    );
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"Error": "Not Authorized"})
    );
}

#[tokio::test]
async fn test_login_and_auth_test() {
    let app = TestApp::new();
    let token = app.login().await;

    let response = app.get_with_token("/auth_test", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"authed": "admin"})
    );
}

#[tokio::test]
async fn test_login_accepts_username_alias() {
    let app = TestApp::new();

    let response = app
        .post_json("/login", r#"{"username": "admin", "password": "admin"}"#)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();

    let bad_password = app
        .post_json("/login", r#"{"userid": "admin", "password": "nope"}"#)
        .await;
    let unknown_user = app
        .post_json("/login", r#"{"userid": "mallory", "password": "admin"}"#)
        .await;

    assert_eq!(bad_password.status(), unknown_user.status());
    assert_eq!(body_bytes(bad_password).await, body_bytes(unknown_user).await);

    let response = app
        .post_json("/login", r#"{"userid": "admin", "password": "nope"}"#)
        .await;
    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_login_malformed_body() {
    let app = TestApp::new();
    assert_unauthorized(app.post_json("/login", "not json").await).await;
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::new();
    assert_unauthorized(app.get("/auth_test").await).await;
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let app = TestApp::new();
    assert_unauthorized(app.get_with_token("/auth_test", "a.b.c").await).await;
}

#[tokio::test]
async fn test_protected_route_with_wrong_scheme() {
    let app = TestApp::new();
    let token = app.login().await;

    let response = app
        .send(
            Request::get("/auth_test")
                .header(header::AUTHORIZATION, format!("Basic {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_unauthorized(response).await;
}

#[tokio::test]
async fn test_token_expires_after_timeout() {
    let app = TestApp::new();
    let token = app.login().await;

    app.time.advance(HOUR);
    assert_eq!(
        app.get_with_token("/auth_test", &token).await.status(),
        StatusCode::OK
    );

    app.time.advance(1);
    assert_unauthorized(app.get_with_token("/auth_test", &token).await).await;
}

#[tokio::test]
async fn test_refresh_within_window() {
    let app = TestApp::new();
    let token = app.login().await;

    // Expired, but still inside the refresh window.
    app.time.advance(3 * HOUR);
    let response = app.get_with_token("/refresh_token", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await["token"]
        .as_str()
        .expect("token")
        .to_string();

    let response = app.get_with_token("/auth_test", &refreshed).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"authed": "admin"})
    );
}

#[tokio::test]
async fn test_refresh_after_window() {
    let app = TestApp::new();
    let token = app.login().await;

    app.time.advance(24 * HOUR + 1);

    assert_unauthorized(app.get_with_token("/refresh_token", &token).await).await;
}

#[tokio::test]
async fn test_refresh_without_token() {
    let app = TestApp::new();
    assert_unauthorized(app.get("/refresh_token").await).await;
}

#[tokio::test]
async fn test_country_routes_are_public() {
    let app = TestApp::new();
    assert_eq!(app.get("/countries").await.status(), StatusCode::OK);
}
