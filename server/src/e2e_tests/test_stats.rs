//! Test that the statistics middleware counts every completed request.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_stats_count_by_status() {
    let app = TestApp::new();

    app.get("/countries").await;
    app.get("/countries/XX").await;
    app.post_json("/countries", r#"{"Code": "", "Name": ""}"#)
        .await;
    app.get("/no/such/route").await;

    let response = app.get("/stats").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    // The /stats request itself is recorded after its snapshot is taken.
    assert_eq!(json["TotalCount"], 4);
    assert_eq!(json["StatusCodeCount"]["200"], 1);
    assert_eq!(json["StatusCodeCount"]["400"], 1);
    assert_eq!(json["StatusCodeCount"]["404"], 2);
    assert_eq!(json["Pid"], std::process::id());

    let snapshot = app.state.stats().snapshot().unwrap();
    assert_eq!(snapshot.total_count, 5);
}
