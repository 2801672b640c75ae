//! Welcome email delivery over SMTP.
//!
//! Port 465 relays use implicit TLS, every other port upgrades with STARTTLS.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SmtpCredentials;

pub const WELCOME_SUBJECT: &str = "You're on the CleenScore waitlist 🎉";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// Message sent to a new waitlist member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl WelcomeEmail {
    pub fn new(to: &str, full_name: &str) -> Self {
        let greeting = match full_name.trim() {
            "" => "Hi,".to_string(),
            name => format!("Hi {name},"),
        };

        Self {
            to: to.to_string(),
            subject: WELCOME_SUBJECT.to_string(),
            html: render_html(&greeting),
            text: render_text(&greeting),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &WelcomeEmail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport. Nothing connects until the first send.
    pub fn new(credentials: &SmtpCredentials) -> Result<Self, MailError> {
        let from: Mailbox = credentials
            .from
            .parse()
            .map_err(|_| MailError::InvalidAddress(credentials.from.clone()))?;

        let relay = if credentials.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&credentials.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&credentials.host)
        };
        let builder = relay.map_err(|e| MailError::Smtp(e.to_string()))?;

        let transport = builder
            .port(credentials.port)
            .credentials(Credentials::new(
                credentials.user.clone(),
                credentials.password.expose_secret().to_string(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(name = "Sending welcome email", skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: &WelcomeEmail) -> Result<(), MailError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|_| MailError::InvalidAddress(email.to.clone()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        Ok(())
    }
}

fn render_html(greeting: &str) -> String {
    let greeting = escape_html(greeting);
    format!(
        r#"<div style="font-family:system-ui,Segoe UI,Arial,sans-serif;line-height:1.5;color:#111">
  <h2>Welcome to CleenScore 🎉</h2>
  <p>{greeting}</p>
  <p>Thanks for joining the CleenScore waitlist. You'll be among the first to get early access.</p>
  <p>What to expect next:</p>
  <ul>
    <li>Early beta invites</li>
    <li>Progress updates</li>
    <li>Perks for early supporters</li>
  </ul>
  <p>Team CleenScore</p>
  <hr style="border:none;border-top:1px solid #eee;margin:16px 0" />
  <p style="font-size:12px;color:#666">AddsArt Ltd (CleenScore is a trading name), United Kingdom.</p>
</div>"#
    )
}

fn render_text(greeting: &str) -> String {
    format!(
        "{greeting}\n\n\
         Thanks for joining the CleenScore waitlist. You'll be among the first to get early access.\n\n\
         What to expect next:\n\
         - Early beta invites\n\
         - Progress updates\n\
         - Perks for early supporters\n\n\
         Team CleenScore\n\n\
         AddsArt Ltd (CleenScore is a trading name), United Kingdom.\n"
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
