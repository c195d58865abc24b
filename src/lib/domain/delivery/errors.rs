//! Error types for reply delivery

use thiserror::Error;

/// Why a delivery was not carried out.
///
/// The messages are safe to show to an end user.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DeliveryRejection {
    /// The sender, the sender's credential or the receiver is missing
    #[error("missing credentials or addresses")]
    MissingFields,

    /// The sender or the receiver is not an email address
    #[error("invalid email address")]
    InvalidAddress,

    /// The relay could not deliver the message
    #[error("delivery failed")]
    Failed,
}

/// Errors raised by a [`MailRelay`](super::MailRelay) or its sessions.
///
/// These carry transport diagnostics and are only logged.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The relay could not be reached or refused the connection
    #[error("connection failed: {0}")]
    Connection(String),

    /// The relay rejected the credentials
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The relay refused the message
    #[error("send failed: {0}")]
    Send(String),

    /// The message could not be built
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The relay did not answer in time
    #[error("timeout")]
    Timeout,
}
