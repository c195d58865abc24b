//! SMTP relay implementation

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        self,
        authentication::{Credentials, DEFAULT_MECHANISMS},
        client::{AsyncSmtpConnection, TlsParameters},
        extension::ClientId,
    },
    Message,
};
use tracing::debug;

use crate::domain::delivery::{
    DeliveryError, MailRelay, OutboundMessage, RelaySession, SenderCredentials,
};

/// Where the SMTP relay lives
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpRelayConfig {
    /// The SMTP host
    pub host: String,

    /// The SMTP submission port
    pub port: u16,

    /// Connection and command timeout
    pub timeout: Duration,

    /// Upgrade the connection with STARTTLS before authenticating
    pub starttls: bool,
}

/// SMTP relay authenticating each sender on its own connection
#[derive(Clone, Debug)]
pub struct SmtpRelay {
    config: SmtpRelayConfig,
}

impl SmtpRelay {
    /// Create a new SMTP relay
    pub fn new(config: SmtpRelayConfig) -> Self {
        Self { config }
    }

    async fn secure(
        &self,
        connection: &mut AsyncSmtpConnection,
        hello_name: &ClientId,
    ) -> Result<(), DeliveryError> {
        if !self.config.starttls {
            return Ok(());
        }

        let tls = TlsParameters::new(self.config.host.clone()).map_err(connection_error)?;

        connection
            .starttls(tls, hello_name)
            .await
            .map_err(connection_error)
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn connect(
        &self,
        credentials: &SenderCredentials,
    ) -> Result<Box<dyn RelaySession>, DeliveryError> {
        debug!(
            host = %self.config.host,
            port = self.config.port,
            starttls = self.config.starttls,
            "connecting to SMTP relay"
        );

        let hello_name = ClientId::default();

        let mut connection = AsyncSmtpConnection::connect_tokio1(
            (self.config.host.as_str(), self.config.port),
            Some(self.config.timeout),
            &hello_name,
            None,
            None,
        )
        .await
        .map_err(connection_error)?;

        if let Err(err) = self.secure(&mut connection, &hello_name).await {
            connection.abort().await;
            return Err(err);
        }

        let creds = Credentials::new(credentials.username.clone(), credentials.password.clone());

        if let Err(err) = connection.auth(DEFAULT_MECHANISMS, &creds).await {
            connection.abort().await;
            return Err(auth_error(err));
        }

        debug!("authenticated with SMTP relay");

        Ok(Box::new(SmtpSession {
            connection: Some(connection),
        }))
    }
}

/// An authenticated SMTP connection, released by [`RelaySession::close`]
struct SmtpSession {
    connection: Option<AsyncSmtpConnection>,
}

#[async_trait]
impl RelaySession for SmtpSession {
    async fn send(&mut self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let connection = self
            .connection
            .as_mut()
            .ok_or_else(|| DeliveryError::Connection("session is closed".to_string()))?;

        let email = build_message(message)?;

        connection
            .send(email.envelope(), &email.formatted())
            .await
            .map(|_| ())
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout
                } else {
                    DeliveryError::Send(e.to_string())
                }
            })
    }

    async fn close(&mut self) {
        let Some(mut connection) = self.connection.take() else {
            return;
        };

        if let Err(err) = connection.quit().await {
            debug!(error = %err, "SMTP relay did not acknowledge QUIT");
            connection.abort().await;
        }

        debug!("SMTP relay session closed");
    }
}

fn build_message(message: &OutboundMessage) -> Result<Message, DeliveryError> {
    let from: Mailbox = message
        .from
        .as_str()
        .parse()
        .map_err(|e: lettre::address::AddressError| DeliveryError::InvalidMessage(e.to_string()))?;
    let to: Mailbox = message
        .to
        .as_str()
        .parse()
        .map_err(|e: lettre::address::AddressError| DeliveryError::InvalidMessage(e.to_string()))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|e| DeliveryError::InvalidMessage(e.to_string()))
}

fn connection_error(err: smtp::Error) -> DeliveryError {
    if err.is_timeout() {
        DeliveryError::Timeout
    } else {
        DeliveryError::Connection(err.to_string())
    }
}

fn auth_error(err: smtp::Error) -> DeliveryError {
    if err.is_timeout() {
        DeliveryError::Timeout
    } else {
        DeliveryError::Authentication(err.to_string())
    }
}
