//! Client-side waitlist form.
//!
//! Mirrors what the landing page does in the browser: UTM values are captured
//! from the page URL once, the inputs are checked before anything is sent, and
//! only one submission may be in flight.

pub mod client;

pub use client::{SubmitError, WaitlistClient};

use thiserror::Error;
use url::Url;

use crate::{
    models::waitlist::{JoinedResponse, UtmParams, WaitlistSignup},
    validation::is_valid_email,
};

pub const ENTER_VALID_EMAIL: &str = "Please enter a valid email.";
pub const TICK_CONSENT: &str = "Please tick the consent box to join the waitlist.";
pub const JOINED: &str = "You're on the list! Check your inbox.";
pub const TRY_AGAIN: &str = "Couldn't save your signup. Please try again.";

pub const SUBMIT_LABEL: &str = "Join the waitlist";
pub const SUBMITTING_LABEL: &str = "Adding you…";

impl UtmParams {
    /// Reads the five `utm_*` parameters from a page URL. Empty values count as absent.
    pub fn from_url(url: &Url) -> Self {
        let first = |key: &str| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default()
        };

        Self {
            utm_source: first("utm_source"),
            utm_medium: first("utm_medium"),
            utm_campaign: first("utm_campaign"),
            utm_content: first("utm_content"),
            utm_term: first("utm_term"),
        }
    }
}

/// Text shown under the submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    pub ok: bool,
    pub message: String,
}

impl FormStatus {
    fn success(message: &str) -> Self {
        Self {
            ok: true,
            message: message.to_string(),
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            ok: false,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("a submission is already in flight")]
    AlreadySubmitting,

    #[error("{0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub full_name: String,
    pub country: String,
    pub referral_code: String,
    pub consent: bool,
    utm: UtmParams,
    submitting: bool,
    status: Option<FormStatus>,
}

impl SignupForm {
    pub fn new(utm: UtmParams) -> Self {
        Self {
            utm,
            ..Default::default()
        }
    }

    /// A blank form for the page at `url`, with its UTM snapshot taken now.
    pub fn for_page(url: &Url) -> Self {
        Self::new(UtmParams::from_url(url))
    }

    pub fn utm(&self) -> &UtmParams {
        &self.utm
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn status(&self) -> Option<&FormStatus> {
        self.status.as_ref()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// Checks the inputs and marks the form as submitting.
    ///
    /// Returns the payload to post. On a failed check the status shows why and
    /// no request should be made.
    pub fn begin_submit(&mut self) -> Result<WaitlistSignup, FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }

        if !is_valid_email(&self.email) {
            return Err(self.reject(ENTER_VALID_EMAIL));
        }
        if !self.consent {
            return Err(self.reject(TICK_CONSENT));
        }

        self.submitting = true;
        self.status = None;

        Ok(WaitlistSignup {
            email: Some(self.email.clone()),
            full_name: self.full_name.clone(),
            country: self.country.clone(),
            referral_code: self.referral_code.clone(),
            consent: self.consent,
            utm: self.utm.clone(),
        })
    }

    /// Records the outcome of the request started by [`begin_submit`](Self::begin_submit).
    ///
    /// Failures of any kind show the same retry message. Success clears the inputs.
    pub fn finish_submit<E>(&mut self, result: Result<JoinedResponse, E>) -> FormStatus
    where
        E: std::fmt::Display,
    {
        self.submitting = false;

        let status = match result {
            Ok(response) if response.ok => {
                self.clear_inputs();
                FormStatus::success(JOINED)
            }
            Ok(_) => FormStatus::failure(TRY_AGAIN),
            Err(e) => {
                tracing::debug!(error = %e, "Waitlist submission failed");
                FormStatus::failure(TRY_AGAIN)
            }
        };

        self.status = Some(status.clone());
        status
    }

    fn reject(&mut self, message: &'static str) -> FormError {
        self.status = Some(FormStatus::failure(message));
        FormError::Invalid(message)
    }

    fn clear_inputs(&mut self) {
        self.email.clear();
        self.full_name.clear();
        self.country.clear();
        self.referral_code.clear();
        self.consent = false;
    }
}
