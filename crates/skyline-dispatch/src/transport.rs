use std::fmt;
use std::time::Duration;

use futures::future::BoxFuture;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MailAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::error::DispatchError;
use crate::message::OutboundMessage;

/// Delivers a composed message. Implementations never retry.
pub trait MailTransport: Send + Sync {
    fn send<'a>(&'a self, message: &'a OutboundMessage) -> BoxFuture<'a, Result<(), DispatchError>>;

    /// Check that the transport can reach its server.
    fn verify(&self) -> BoxFuture<'_, Result<(), DispatchError>>;
}

#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// STARTTLS SMTP relay; connections are pooled by lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, DispatchError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| DispatchError::Transport(e.to_string()))?
            .port(settings.port)
            .timeout(Some(settings.timeout));

        match (&settings.username, &settings.password) {
            (Some(user), Some(password)) => {
                builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!("SMTP credentials are incomplete, connecting without authentication");
            }
            (None, None) => {}
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

impl MailTransport for SmtpMailer {
    fn send<'a>(&'a self, message: &'a OutboundMessage) -> BoxFuture<'a, Result<(), DispatchError>> {
        Box::pin(async move {
            let email = to_lettre(message)?;
            let response = self
                .transport
                .send(email)
                .await
                .map_err(|e| DispatchError::Transport(e.to_string()))?;
            info!(
                code = %response.code(),
                attachments = message.attachments.len(),
                "message accepted by mail server"
            );
            Ok(())
        })
    }

    fn verify(&self) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(async move {
            match self.transport.test_connection().await {
                Ok(true) => Ok(()),
                Ok(false) => Err(DispatchError::Transport(
                    "mail server did not accept the connection test".to_string(),
                )),
                Err(e) => Err(DispatchError::Transport(e.to_string())),
            }
        })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address.parse().map_err(|e: lettre::address::AddressError| DispatchError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Convert to a `multipart/mixed` lettre message: HTML body, then attachments.
pub fn to_lettre(message: &OutboundMessage) -> Result<Message, DispatchError> {
    let mut body = MultiPart::mixed().singlepart(SinglePart::html(message.html_body.clone()));

    for attachment in &message.attachments {
        let content_type = ContentType::parse(&attachment.media_type).map_err(|e| {
            DispatchError::Attachment {
                filename: attachment.filename.clone(),
                reason: e.to_string(),
            }
        })?;
        body = body.singlepart(
            MailAttachment::new(attachment.filename.clone())
                .body(attachment.content.clone(), content_type),
        );
    }

    Message::builder()
        .from(mailbox(&message.from)?)
        .to(mailbox(&message.to)?)
        .subject(message.subject.clone())
        .multipart(body)
        .map_err(|e| DispatchError::Build(e.to_string()))
}
