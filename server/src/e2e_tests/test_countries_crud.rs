//! Test the create/read/list/delete cycle over HTTP.

use std::collections::HashSet;

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_list_empty_registry() {
    let app = TestApp::new();

    let response = app.get("/countries").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_read_missing_country() {
    let app = TestApp::new();

    let response = app.get("/countries/XX").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"Error": "Resource not found"})
    );
}

#[tokio::test]
async fn test_create_then_read() {
    let app = TestApp::new();

    let response = app
        .post_json("/countries", r#"{"code": "FR", "name": "France"}"#)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"Code": "FR", "Name": "France"})
    );

    let response = app.get("/countries/FR").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"Code": "FR", "Name": "France"})
    );
}

#[tokio::test]
async fn test_create_replaces_existing() {
    let app = TestApp::new();

    app.post_json("/countries", r#"{"Code": "US", "Name": "United States"}"#)
        .await;
    app.post_json("/countries", r#"{"Code": "US", "Name": "USA"}"#)
        .await;

    let response = app.get("/countries").await;
    assert_eq!(
        body_json(response).await,
        serde_json::json!([{"Code": "US", "Name": "USA"}])
    );
}

#[tokio::test]
async fn test_list_returns_every_country_once() {
    let app = TestApp::new();
    for (code, name) in [("FR", "France"), ("DE", "Germany"), ("IT", "Italy")] {
        let body = serde_json::json!({"Code": code, "Name": name}).to_string();
        assert_eq!(
            app.post_json("/countries", &body).await.status(),
            StatusCode::OK
        );
    }

    let json = body_json(app.get("/countries").await).await;
    let countries = json.as_array().expect("array");
    let codes: HashSet<&str> = countries
        .iter()
        .map(|c| c["Code"].as_str().expect("code"))
        .collect();

    assert_eq!(countries.len(), 3);
    assert_eq!(codes, HashSet::from(["FR", "DE", "IT"]));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = TestApp::new();
    app.post_json("/countries", r#"{"Code": "FR", "Name": "France"}"#)
        .await;

    let response = app.delete("/countries/FR").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());

    assert_eq!(app.get("/countries/FR").await.status(), StatusCode::NOT_FOUND);

    // Deleting again, or deleting something never stored, still succeeds.
    assert_eq!(app.delete("/countries/FR").await.status(), StatusCode::OK);
    assert_eq!(app.delete("/countries/XX").await.status(), StatusCode::OK);
    assert!(app.state.registry().is_empty().unwrap());
}

#[tokio::test]
async fn test_instances_are_isolated() {
    let first = TestApp::new();
    let second = TestApp::new();

    first
        .post_json("/countries", r#"{"Code": "FR", "Name": "France"}"#)
        .await;

    assert_eq!(
        second.get("/countries/FR").await.status(),
        StatusCode::NOT_FOUND
    );
}
