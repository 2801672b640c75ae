use axum::{Json, body::Bytes, extract::State};
use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    models::waitlist::{JoinedResponse, WaitlistSignup},
    services::waitlist,
    state::AppState,
};

/// POST /api/waitlist
///
/// Adds an email to the waitlist and sends a best-effort welcome email.
///
/// # Request Body
/// Parsed as JSON whatever the content type. A JSON value that is not an
/// object is read as `{}`.
///
/// - `email`: required, `local@domain.tld`
/// - `consent`: required, must be truthy
/// - `full_name`, `country`, `referral_code`: optional
/// - `utm_source`, `utm_medium`, `utm_campaign`, `utm_content`, `utm_term`: optional
///
/// # Returns
/// `{ ok: true, emailStatus, emailError? }` once the signup is stored. A
/// signup for an email already on the list is reported the same way.
///
/// # HTTP Status Codes
/// - `200 OK`: stored, or already present
/// - `400 BAD_REQUEST`: `stage: "validate"`, invalid email or missing consent
/// - `500 INTERNAL_SERVER_ERROR`: `stage: "env"`, `"db"` or `"unhandled"`
#[tracing::instrument(
    name = "Adding a waitlist signup",
    skip(state, body),
    fields(email = tracing::field::Empty)
)]
pub async fn join_waitlist(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<JoinedResponse>> {
    let signup = parse_signup(&body)?;

    if let Some(email) = signup.email.as_deref() {
        tracing::Span::current().record("email", email);
    }

    let response = waitlist::join(state.store.as_deref(), state.mailer.as_deref(), signup).await?;

    Ok(Json(response))
}

fn parse_signup(body: &[u8]) -> Result<WaitlistSignup> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| Error::Unhandled(format!("request body is not JSON: {e}")))?;

    let value = match value {
        Value::Object(_) => value,
        _ => Value::Object(Map::new()),
    };

    serde_json::from_value(value).map_err(|e| Error::Unhandled(e.to_string()))
}
