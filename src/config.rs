use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Port on which SMTP relays expect implicit TLS rather than STARTTLS.
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// Hosting-platform variable names accepted alongside the `CLEENSCORE__` ones.
const PLATFORM_OVERRIDES: [(&str, &str); 7] = [
    ("store.url", "SUPABASE_URL"),
    ("store.service_key", "SUPABASE_SERVICE_ROLE_KEY"),
    ("smtp.host", "WORKMAIL_SMTP_HOST"),
    ("smtp.port", "WORKMAIL_SMTP_PORT"),
    ("smtp.user", "WORKMAIL_USER"),
    ("smtp.password", "WORKMAIL_PASS"),
    ("smtp.from", "FROM_EMAIL"),
];

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Hosted waitlist table reachable over its REST interface.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub url: Option<String>,
    #[serde(skip_serializing)]
    pub service_key: Option<SecretString>,
    pub table: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<SecretString>,
    /// Sender mailbox, e.g. `CleenScore <info@cleenscore.com>`.
    pub from: Option<String>,
}

/// Everything needed to talk to the store. Only exists when none of it is blank.
#[derive(Debug, Clone)]
pub struct StoreCredentials {
    pub url: String,
    pub service_key: SecretString,
    pub table: String,
}

#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub from: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            // Override with environment variables using `CLEENSCORE__` prefix and `__` separator
            // e.g., CLEENSCORE__STORE__URL="https://project.supabase.co"
            .add_source(
                config::Environment::with_prefix("CLEENSCORE")
                    .prefix_separator("__")
                    .separator("__"),
            );

        for (key, var) in PLATFORM_OVERRIDES {
            let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Store credentials, or `None` when the URL or service key is missing.
    pub fn store_credentials(&self) -> Option<StoreCredentials> {
        let url = non_blank(self.store.url.as_deref())?;
        let service_key = self
            .store
            .service_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())?;

        Some(StoreCredentials {
            url: url.trim_end_matches('/').to_string(),
            service_key: service_key.clone(),
            table: self.store.table.clone(),
        })
    }

    /// SMTP credentials, or `None` when any of host, user, password or sender is missing.
    pub fn smtp_credentials(&self) -> Option<SmtpCredentials> {
        let host = non_blank(self.smtp.host.as_deref())?;
        let user = non_blank(self.smtp.user.as_deref())?;
        let from = non_blank(self.smtp.from.as_deref())?;
        let password = self
            .smtp
            .password
            .as_ref()
            .filter(|password| !password.expose_secret().is_empty())?;

        Some(SmtpCredentials {
            host: host.to_string(),
            port: self.smtp.port,
            user: user.to_string(),
            password: password.clone(),
            from: from.to_string(),
        })
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SmtpCredentials {
    pub fn implicit_tls(&self) -> bool {
        self.port == IMPLICIT_TLS_PORT
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            table: "waitlist".to_string(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 587,
            user: None,
            password: None,
            from: None,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets are skipped by serde
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}
