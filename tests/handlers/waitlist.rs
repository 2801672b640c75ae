use serde_json::{Value, json};

use crate::common::{
    MailerBackend, StoreBackend, TestApp, TestAppOptions, generate_test_email,
};

async fn json_of(response: reqwest::Response) -> Value {
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_valid_signup_returns_200_and_stores_record() {
    let app = TestApp::new().await;
    let email = generate_test_email();

    let response = app
        .post_signup(&json!({ "email": email, "consent": true }))
        .await;

    assert_eq!(response.status(), 200);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("application/json"));

    let body = json_of(response).await;
    assert_eq!(body, json!({ "ok": true, "emailStatus": "skipped" }));

    let row = app.store.get(&email).expect("row stored");
    assert!(row.consent);
    assert_eq!(row.full_name, "");
}

#[tokio::test]
async fn test_signup_stores_profile_and_attribution() {
    let app = TestApp::new().await;
    let email = generate_test_email();

    let response = app
        .post_signup(&json!({
            "email": email,
            "full_name": "Jane Doe",
            "country": "United Kingdom",
            "referral_code": "FRIEND123",
            "consent": true,
            "utm_source": "instagram",
            "utm_medium": "",
            "utm_campaign": "launch",
        }))
        .await;

    assert_eq!(response.status(), 200);

    let row = app.store.get(&email).unwrap();
    assert_eq!(row.full_name, "Jane Doe");
    assert_eq!(row.country, "United Kingdom");
    assert_eq!(row.referral_code, "FRIEND123");
    assert_eq!(row.source.as_deref(), Some("instagram"));
    assert_eq!(row.medium, None);
    assert_eq!(row.campaign.as_deref(), Some("launch"));
    assert_eq!(row.content, None);
    assert_eq!(row.term, None);
}

#[tokio::test]
async fn test_invalid_email_returns_400_validate() {
    let app = TestApp::new().await;

    let response = app
        .post_signup(&json!({ "email": "not-an-email", "consent": true }))
        .await;

    assert_eq!(response.status(), 400);
    let body = json_of(response).await;
    assert_eq!(
        body,
        json!({ "ok": false, "stage": "validate", "error": "Invalid email" })
    );
    assert_eq!(app.store.count(), 0);
}

#[tokio::test]
async fn test_emails_missing_at_or_domain_dot_are_rejected_without_writes() {
    let app = TestApp::new().await;

    let cases = [
        json!({ "consent": true }),
        json!({ "email": null, "consent": true }),
        json!({ "email": "", "consent": true }),
        json!({ "email": "user.example.com", "consent": true }),
        json!({ "email": "user@example", "consent": true }),
        json!({ "email": "user @example.com", "consent": true }),
        json!({ "email": 12345, "consent": true }),
    ];

    for body in cases {
        let response = app.post_signup(&body).await;
        assert_eq!(response.status(), 400, "{body}");
        assert_eq!(json_of(response).await["stage"], "validate");
    }

    assert_eq!(app.store.count(), 0);
}

#[tokio::test]
async fn test_missing_consent_returns_400_validate() {
    let app = TestApp::new().await;

    for consent in [json!(false), json!(0), json!(""), json!(null)] {
        let response = app
            .post_signup(&json!({ "email": "a@b.com", "consent": consent }))
            .await;

        assert_eq!(response.status(), 400);
        let body = json_of(response).await;
        assert_eq!(body["stage"], "validate");
        assert_eq!(body["error"], "Consent required");
    }

    let response = app.post_signup(&json!({ "email": "a@b.com" })).await;
    assert_eq!(response.status(), 400);
    assert_eq!(app.store.count(), 0);
}

#[tokio::test]
async fn test_duplicate_signup_succeeds_and_keeps_one_record() {
    let app = TestApp::new().await;
    let email = generate_test_email();

    for _ in 0..2 {
        let response = app
            .post_signup(&json!({ "email": email, "consent": true }))
            .await;
        assert_eq!(response.status(), 200);
        assert_eq!(json_of(response).await["ok"], true);
    }

    assert_eq!(app.store.count(), 1);
}

#[tokio::test]
async fn test_configured_mail_reports_sent() {
    let app = TestApp::with_options(TestAppOptions {
        mailer: MailerBackend::Accepting,
        ..Default::default()
    })
    .await;
    let email = generate_test_email();

    let response = app
        .post_signup(&json!({ "email": email, "full_name": "Jane", "consent": true }))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        json_of(response).await,
        json!({ "ok": true, "emailStatus": "sent" })
    );

    let attempts = app.mailer.attempts();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].to, email);
    assert!(attempts[0].html.contains("Hi Jane,"));
}

#[tokio::test]
async fn test_mail_failure_still_returns_success() {
    let app = TestApp::with_options(TestAppOptions {
        mailer: MailerBackend::Rejecting,
        ..Default::default()
    })
    .await;
    let email = generate_test_email();

    let response = app
        .post_signup(&json!({ "email": email, "consent": true }))
        .await;

    assert_eq!(response.status(), 200);
    let body = json_of(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["emailStatus"], "failed");
    assert!(!body["emailError"].as_str().unwrap().is_empty());

    assert_eq!(app.store.count(), 1);
}

#[tokio::test]
async fn test_missing_store_credentials_returns_500_before_mail() {
    let app = TestApp::with_options(TestAppOptions {
        store: StoreBackend::Unconfigured,
        mailer: MailerBackend::Accepting,
    })
    .await;

    let response = app
        .post_signup(&json!({ "email": "a@b.com", "consent": true }))
        .await;

    assert_eq!(response.status(), 500);
    assert_eq!(
        json_of(response).await,
        json!({ "ok": false, "stage": "env", "error": "Server not configured" })
    );
    assert!(app.mailer.attempts().is_empty());
}

#[tokio::test]
async fn test_invalid_input_is_reported_before_missing_configuration() {
    let app = TestApp::with_options(TestAppOptions {
        store: StoreBackend::Unconfigured,
        ..Default::default()
    })
    .await;

    let response = app
        .post_signup(&json!({ "email": "not-an-email", "consent": true }))
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_unparseable_body_returns_500_unhandled() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(app.url("/api/waitlist"))
        .header("content-type", "application/json")
        .body("{\"email\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body = json_of(response).await;
    assert_eq!(body["stage"], "unhandled");
    assert_eq!(body["error"], "Server error");
}

#[tokio::test]
async fn test_non_object_json_body_returns_400_invalid_email() {
    let app = TestApp::new().await;

    for body in [json!(null), json!([]), json!("a@b.com")] {
        let response = app.post_signup(&body).await;

        assert_eq!(response.status(), 400, "{body}");
        assert_eq!(
            json_of(response).await,
            json!({ "ok": false, "stage": "validate", "error": "Invalid email" })
        );
    }

    assert_eq!(app.store.count(), 0);
}

#[tokio::test]
async fn test_json_body_is_accepted_regardless_of_content_type() {
    let app = TestApp::new().await;
    let email = generate_test_email();

    let response = app
        .client
        .post(app.url("/api/waitlist"))
        .header("content-type", "text/plain")
        .body(json!({ "email": email, "consent": true }).to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(json_of(response).await["ok"], true);
    assert!(app.store.get(&email).is_some());
}

#[tokio::test]
async fn test_landing_page_is_served() {
    let app = TestApp::new().await;

    let response = app.client.get(app.url("/")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));
    let html = response.text().await.unwrap();
    assert!(html.contains("Join the waitlist"));
}
