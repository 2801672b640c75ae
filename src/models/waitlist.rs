use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Campaign attribution captured from the landing page URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmParams {
    #[serde(default, deserialize_with = "lenient_string")]
    pub utm_source: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub utm_medium: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub utm_campaign: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub utm_content: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub utm_term: String,
}

/// Body of `POST /api/waitlist`.
///
/// Browsers send loosely typed JSON, so every field decodes leniently: `null`
/// is absent, other scalars are stringified, and `consent` follows truthiness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistSignup {
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub referral_code: String,
    #[serde(default, deserialize_with = "truthy")]
    pub consent: bool,
    #[serde(flatten)]
    pub utm: UtmParams,
}

/// Row inserted into the `waitlist` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWaitlistEntry {
    pub email: String,
    pub full_name: String,
    pub country: String,
    pub referral_code: String,
    pub source: Option<String>,
    pub medium: Option<String>,
    pub campaign: Option<String>,
    pub content: Option<String>,
    pub term: Option<String>,
    pub consent: bool,
}

impl NewWaitlistEntry {
    /// Builds the row for an already validated signup. Empty UTM values are stored as `null`.
    pub fn new(email: String, signup: WaitlistSignup) -> Self {
        let WaitlistSignup {
            full_name,
            country,
            referral_code,
            consent,
            utm,
            ..
        } = signup;

        Self {
            email,
            full_name,
            country,
            referral_code,
            source: null_if_empty(utm.utm_source),
            medium: null_if_empty(utm.utm_medium),
            campaign: null_if_empty(utm.utm_campaign),
            content: null_if_empty(utm.utm_content),
            term: null_if_empty(utm.utm_term),
            consent,
        }
    }
}

/// What happened to the welcome email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Sent,
    Skipped,
    Failed,
}

/// Outcome of the best-effort notification that follows a successful insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    /// SMTP is not configured.
    Skipped,
    /// A send was attempted and rejected.
    Failed(String),
}

impl NotifyOutcome {
    pub fn status(&self) -> EmailStatus {
        match self {
            NotifyOutcome::Sent => EmailStatus::Sent,
            NotifyOutcome::Skipped => EmailStatus::Skipped,
            NotifyOutcome::Failed(_) => EmailStatus::Failed,
        }
    }
}

/// 200 response of `POST /api/waitlist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedResponse {
    pub ok: bool,
    pub email_status: EmailStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

impl From<NotifyOutcome> for JoinedResponse {
    fn from(outcome: NotifyOutcome) -> Self {
        let email_status = outcome.status();
        let email_error = match outcome {
            NotifyOutcome::Failed(reason) => Some(reason),
            _ => None,
        };

        Self {
            ok: true,
            email_status,
            email_error,
        }
    }
}

fn null_if_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_optional_string(deserializer).map(Option::unwrap_or_default)
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
