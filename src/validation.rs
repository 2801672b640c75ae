//! Input validation for waitlist signups.
//!
//! The same checks run in the signup form before a request is issued and in
//! the endpoint before anything is written. Only the endpoint is authoritative.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{Error, Result},
    models::waitlist::{NewWaitlistEntry, WaitlistSignup},
};

/// `local@domain.tld` with no whitespace and exactly one `@` per part.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

pub const INVALID_EMAIL: &str = "Invalid email";
pub const CONSENT_REQUIRED: &str = "Consent required";

/// Returns true when `email` has the `local@domain.tld` shape.
///
/// # Examples
/// ```
/// use cleenscore::validation::is_valid_email;
///
/// assert!(is_valid_email("a@b.com"));
/// assert!(!is_valid_email("not-an-email"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validates email format
///
/// # Returns
/// * `Ok(())` if the email is present and well formed
/// * `Err(Error::Validation)` otherwise
pub fn validate_email(email: Option<&str>) -> Result<()> {
    match email {
        Some(email) if is_valid_email(email) => Ok(()),
        _ => Err(Error::Validation(INVALID_EMAIL.to_string())),
    }
}

pub fn validate_consent(consent: bool) -> Result<()> {
    if consent {
        Ok(())
    } else {
        Err(Error::Validation(CONSENT_REQUIRED.to_string()))
    }
}

/// Validates a signup and turns it into the row to insert.
///
/// Both checks must pass. The email check is reported first.
pub fn validate_signup(signup: WaitlistSignup) -> Result<NewWaitlistEntry> {
    validate_email(signup.email.as_deref())?;
    validate_consent(signup.consent)?;

    let email = signup.email.clone().unwrap_or_default();
    Ok(NewWaitlistEntry::new(email, signup))
}
