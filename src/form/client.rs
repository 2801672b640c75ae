use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::{
    form::{FormError, FormStatus, SignupForm},
    models::waitlist::{JoinedResponse, WaitlistSignup},
};

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The endpoint answered but did not accept the signup.
    #[error("signup rejected with status {0}")]
    Rejected(u16),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Posts signups to a running waitlist service.
#[derive(Debug, Clone)]
pub struct WaitlistClient {
    client: Client,
    endpoint: Url,
}

impl WaitlistClient {
    pub fn new(client: Client, base_url: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            endpoint: base_url.join("/api/waitlist")?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one signup. Any non-2xx answer or `ok: false` body is a rejection.
    pub async fn post(&self, signup: &WaitlistSignup) -> Result<JoinedResponse, SubmitError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(signup)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Rejected(status.as_u16()));
        }

        let body: JoinedResponse = response.json().await?;
        if !body.ok {
            return Err(SubmitError::Rejected(status.as_u16()));
        }

        Ok(body)
    }

    /// Runs the form's checks, posts the payload and records the outcome on the form.
    pub async fn submit(&self, form: &mut SignupForm) -> Result<FormStatus, FormError> {
        let payload = form.begin_submit()?;
        let result = self.post(&payload).await;
        Ok(form.finish_submit(result))
    }
}
