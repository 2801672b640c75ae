//! Waitlist persistence.
//!
//! The hosted store is a Postgres table behind a PostgREST API (Supabase).
//! Uniqueness of `email` is enforced by the table, not by this service.

use async_trait::async_trait;
use http::StatusCode;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::{config::StoreCredentials, models::waitlist::NewWaitlistEntry};

/// Postgres SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A row with this email already exists.
    #[error("unique violation: {0}")]
    UniqueViolation(String),

    /// The store answered with an error other than a duplicate.
    #[error("store rejected insert ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// No usable answer from the store.
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result of reconciling an insert attempt with the uniqueness rule.
#[derive(Debug)]
pub enum InsertOutcome {
    Created,
    AlreadyExists,
    Failed(StoreError),
}

impl InsertOutcome {
    pub fn classify(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => InsertOutcome::Created,
            Err(StoreError::UniqueViolation(_)) => InsertOutcome::AlreadyExists,
            Err(e) => InsertOutcome::Failed(e),
        }
    }
}

#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Inserts one row. A duplicate email must be reported as [`StoreError::UniqueViolation`].
    async fn insert(&self, entry: &NewWaitlistEntry) -> Result<(), StoreError>;
}

/// Error body returned by PostgREST.
#[derive(Debug, Default, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
}

/// Inserts rows through the Supabase REST interface using the service role key.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    endpoint: String,
    service_key: SecretString,
}

impl SupabaseStore {
    pub fn new(client: Client, credentials: &StoreCredentials) -> Self {
        Self {
            client,
            endpoint: format!("{}/rest/v1/{}", credentials.url, credentials.table),
            service_key: credentials.service_key.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WaitlistStore for SupabaseStore {
    #[tracing::instrument(name = "Inserting waitlist row", skip(self, entry))]
    async fn insert(&self, entry: &NewWaitlistEntry) -> Result<(), StoreError> {
        let key = self.service_key.expose_secret();
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Prefer", "return=minimal")
            .json(&[entry])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_rejection(status, &body))
    }
}

fn classify_rejection(status: StatusCode, body: &str) -> StoreError {
    let error: PostgrestError = serde_json::from_str(body).unwrap_or_default();
    let message = error
        .message
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    match error.code.as_deref() {
        Some(UNIQUE_VIOLATION) => StoreError::UniqueViolation(message),
        None if status == StatusCode::CONFLICT => StoreError::UniqueViolation(message),
        _ => StoreError::Rejected {
            status: status.as_u16(),
            code: error.code,
            message,
        },
    }
}
