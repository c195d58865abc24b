//! Outbound mail relay

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::{
    errors::DeliveryError,
    request::{OutboundMessage, SenderCredentials},
};

/// An outbound mail relay
#[async_trait]
pub trait MailRelay: Send + Sync + 'static {
    /// Opens an authenticated session with the relay.
    ///
    /// # Arguments
    /// * `credentials` - The sender's [`SenderCredentials`].
    ///
    /// # Returns
    /// A [`RelaySession`] that must be closed once the message has been handed over.
    async fn connect(
        &self,
        credentials: &SenderCredentials,
    ) -> Result<Box<dyn RelaySession>, DeliveryError>;
}

/// An open, authenticated session with a [`MailRelay`]
#[async_trait]
pub trait RelaySession: Send {
    /// Transmits a message
    async fn send(&mut self, message: &OutboundMessage) -> Result<(), DeliveryError>;

    /// Releases the connection
    async fn close(&mut self);
}

#[cfg(test)]
mock! {
    pub MailRelay {}

    #[async_trait]
    impl MailRelay for MailRelay {
        async fn connect(
            &self,
            credentials: &SenderCredentials,
        ) -> Result<Box<dyn RelaySession>, DeliveryError>;
    }
}

#[cfg(test)]
mock! {
    pub RelaySession {}

    #[async_trait]
    impl RelaySession for RelaySession {
        async fn send(&mut self, message: &OutboundMessage) -> Result<(), DeliveryError>;
        async fn close(&mut self);
    }
}
