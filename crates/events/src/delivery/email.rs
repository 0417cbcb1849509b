//! Outbound notification email over SMTP.
//!
//! Email is optional: without `SMTP_HOST`, [`EmailConfig::from_env`] yields
//! `None` and the server runs with in-app notifications only.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::bus::{TimelineEvent, EVENT_MILESTONE_ADDED, EVENT_MILESTONE_DUE, EVENT_PROJECT_SHARED};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(#[from] lettre::error::Error),
}

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "Timeline <noreply@timeline.local>";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Sender mailbox, e.g. `Timeline <noreply@example.com>`.
    pub from_address: String,
    /// Used only when `smtp_password` is also set.
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// `SMTP_HOST` switches email on. `SMTP_PORT`, `SMTP_FROM`, `SMTP_USER`
    /// and `SMTP_PASSWORD` are optional.
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty())?;

        let smtp_port = match std::env::var("SMTP_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Ignoring invalid SMTP_PORT");
                DEFAULT_SMTP_PORT
            }),
            Err(_) => DEFAULT_SMTP_PORT,
        };

        Some(Self {
            smtp_host,
            smtp_port,
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Subject line for an event email.
pub fn subject_for(event: &TimelineEvent) -> String {
    let topic = match event.event_type.as_str() {
        EVENT_PROJECT_SHARED => "A project was shared with you",
        EVENT_MILESTONE_DUE => "Milestone due soon",
        EVENT_MILESTONE_ADDED => "New milestone",
        other => other,
    };
    format!("[Timeline] {topic}")
}

/// Build the plain-text message for `event` without sending it.
pub fn compose(from: &Mailbox, to_email: &str, event: &TimelineEvent) -> Result<Message, EmailError> {
    let body = format!(
        "{}\n\nSent: {}\n",
        event.message,
        event.timestamp.format("%Y-%m-%d %H:%M UTC")
    );

    Ok(Message::builder()
        .from(from.clone())
        .to(to_email.parse()?)
        .subject(subject_for(event))
        .header(ContentType::TEXT_PLAIN)
        .body(body)?)
}

/// A ready SMTP connection pool and sender identity.
pub struct EmailDelivery {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    /// Validate the sender and set up a STARTTLS transport. Nothing is sent yet.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config.from_address.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            from,
            mailer: builder.build(),
        })
    }

    pub async fn deliver(&self, to_email: &str, event: &TimelineEvent) -> Result<(), EmailError> {
        let message = compose(&self.from, to_email, event)?;
        self.mailer.send(message).await?;

        tracing::info!(to = to_email, event_type = %event.event_type, "Notification email sent");
        Ok(())
    }
}
