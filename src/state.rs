use crate::{
    config::Config,
    services::{
        mailer::{MailError, Mailer, SmtpMailer},
        store::{SupabaseStore, WaitlistStore},
    },
};
use std::sync::Arc;

/// Application state shared across all HTTP handlers
///
/// Built once at startup from [`Config`]. Each collaborator is `None` when
/// its credentials are absent.
#[derive(Clone, Default)]
pub struct AppState {
    /// Waitlist table client, `None` when store credentials are missing
    pub store: Option<Arc<dyn WaitlistStore>>,
    /// Welcome email sender, `None` when SMTP is not configured
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn WaitlistStore>>, mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self { store, mailer }
    }

    /// Create the production collaborators described by `config`.
    ///
    /// # Errors
    /// Fails when SMTP is configured but its sender address or relay is unusable.
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let store = match config.store_credentials() {
            Some(credentials) => {
                let store = SupabaseStore::new(reqwest::Client::new(), &credentials);
                tracing::info!(endpoint = store.endpoint(), "Waitlist store configured");
                Some(Arc::new(store) as Arc<dyn WaitlistStore>)
            }
            None => {
                tracing::warn!("Store credentials missing, signups will fail with stage=env");
                None
            }
        };

        let mailer = match config.smtp_credentials() {
            Some(credentials) => {
                let mailer = SmtpMailer::new(&credentials)?;
                tracing::info!(
                    host = %credentials.host,
                    port = credentials.port,
                    implicit_tls = credentials.implicit_tls(),
                    "SMTP configured"
                );
                Some(Arc::new(mailer) as Arc<dyn Mailer>)
            }
            None => {
                tracing::info!("SMTP not configured, welcome emails will be skipped");
                None
            }
        };

        Ok(Self::new(store, mailer))
    }
}
