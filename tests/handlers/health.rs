//! Health endpoint tests

use crate::common::TestApp;

#[tokio::test]
async fn test_public_health_returns_status_ok() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(app.url("/api/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("application/json"));

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_public_health_no_sensitive_info() {
    let app = TestApp::new().await;

    let body: serde_json::Value = app
        .client
        .get(app.url("/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Should only have "status" field
    assert_eq!(body.as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_works_without_store_credentials() {
    let app = TestApp::with_options(crate::common::TestAppOptions {
        store: crate::common::StoreBackend::Unconfigured,
        ..Default::default()
    })
    .await;

    let response = app
        .client
        .get(app.url("/api/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}
