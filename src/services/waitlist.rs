use crate::{
    error::{Error, Result},
    models::waitlist::{JoinedResponse, NewWaitlistEntry, NotifyOutcome, WaitlistSignup},
    services::{
        mailer::{Mailer, WelcomeEmail},
        store::{InsertOutcome, WaitlistStore},
    },
    validation::validate_signup,
};

/// Adds a signup to the waitlist.
///
/// Validates, persists, then sends the welcome email. Persistence must
/// succeed before any mail is attempted; a duplicate email counts as
/// success. Mail failures never fail the call.
pub async fn join(
    store: Option<&dyn WaitlistStore>,
    mailer: Option<&dyn Mailer>,
    signup: WaitlistSignup,
) -> Result<JoinedResponse> {
    let entry = validate_signup(signup)?;

    let store = store.ok_or_else(|| {
        Error::Config("store URL or service key is not configured".to_string())
    })?;

    persist(store, &entry).await?;

    let outcome = notify(mailer, &entry).await;
    Ok(JoinedResponse::from(outcome))
}

/// Inserts the row, treating an existing row for the same email as success.
pub async fn persist(store: &dyn WaitlistStore, entry: &NewWaitlistEntry) -> Result<()> {
    match InsertOutcome::classify(store.insert(entry).await) {
        InsertOutcome::Created => {
            tracing::info!("New waitlist signup stored");
            Ok(())
        }
        InsertOutcome::AlreadyExists => {
            tracing::info!("Email already on the waitlist");
            Ok(())
        }
        InsertOutcome::Failed(e) => Err(Error::Storage(e.to_string())),
    }
}

/// Sends the welcome email if a mailer is configured. Never fails.
pub async fn notify(mailer: Option<&dyn Mailer>, entry: &NewWaitlistEntry) -> NotifyOutcome {
    let Some(mailer) = mailer else {
        tracing::debug!("SMTP not configured, skipping welcome email");
        return NotifyOutcome::Skipped;
    };

    let email = WelcomeEmail::new(&entry.email, &entry.full_name);
    match mailer.send(&email).await {
        Ok(()) => NotifyOutcome::Sent,
        Err(e) => {
            tracing::warn!(error = %e, "Welcome email failed");
            NotifyOutcome::Failed(e.to_string())
        }
    }
}
