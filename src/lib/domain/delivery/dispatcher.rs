//! Reply dispatcher service

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

#[cfg(test)]
use mockall::mock;

use super::{
    errors::{DeliveryError, DeliveryRejection},
    relay::MailRelay,
    request::{DeliveryRequest, OutboundMessage, SenderCredentials},
};

/// The result of a delivery attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The relay accepted the message
    Sent,

    /// No relay is configured; nothing left the process
    Simulated,

    /// The message was not delivered
    Rejected(DeliveryRejection),
}

impl DeliveryOutcome {
    /// The outcome's lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Simulated => "simulated",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Dispatcher configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Upper bound for each relay operation
    pub timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Reply dispatcher
#[async_trait]
pub trait Dispatcher: Clone + Send + Sync + 'static {
    /// Delivers a reply.
    ///
    /// # Arguments
    /// * `request` - The [`DeliveryRequest`] with the sender, credential, receiver and body.
    ///
    /// # Returns
    /// A [`DeliveryOutcome`]; failures are reported as [`DeliveryOutcome::Rejected`].
    async fn deliver(&self, request: &DeliveryRequest) -> DeliveryOutcome;
}

#[cfg(test)]
mock! {
    pub Dispatcher {}

    impl Clone for Dispatcher {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Dispatcher for Dispatcher {
        async fn deliver(&self, request: &DeliveryRequest) -> DeliveryOutcome;
    }
}

/// Dispatcher implementation
#[derive(Clone)]
pub struct DispatcherImpl {
    relay: Option<Arc<dyn MailRelay>>,
    config: DispatcherConfig,
}

impl DispatcherImpl {
    /// Creates a dispatcher that delivers through `relay`.
    pub fn new(relay: Arc<dyn MailRelay>, config: DispatcherConfig) -> Self {
        Self {
            relay: Some(relay),
            config,
        }
    }

    /// Creates a dispatcher without a relay; valid requests are simulated.
    pub fn simulate_only(config: DispatcherConfig) -> Self {
        Self {
            relay: None,
            config,
        }
    }

    /// Connects, sends and always closes the session once it was opened.
    async fn relay_message(
        &self,
        relay: &dyn MailRelay,
        credentials: &SenderCredentials,
        message: &OutboundMessage,
    ) -> Result<(), DeliveryError> {
        let mut session = timeout(self.config.timeout, relay.connect(credentials))
            .await
            .map_err(|_| DeliveryError::Timeout)??;

        let result = timeout(self.config.timeout, session.send(message))
            .await
            .unwrap_or(Err(DeliveryError::Timeout));

        if timeout(self.config.timeout, session.close()).await.is_err() {
            warn!("closing the relay session timed out");
        }

        result
    }
}

impl fmt::Debug for DispatcherImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherImpl")
            .field("relay_configured", &self.relay.is_some())
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl Dispatcher for DispatcherImpl {
    async fn deliver(&self, request: &DeliveryRequest) -> DeliveryOutcome {
        let (credentials, message) = match request.prepare() {
            Ok(prepared) => prepared,
            Err(rejection) => {
                debug!(%rejection, "delivery request rejected");
                return DeliveryOutcome::Rejected(rejection);
            }
        };

        let Some(relay) = &self.relay else {
            info!(to = %message.to, "no mail relay configured, simulating delivery");
            return DeliveryOutcome::Simulated;
        };

        match self
            .relay_message(relay.as_ref(), &credentials, &message)
            .await
        {
            Ok(()) => {
                info!(to = %message.to, "reply delivered");
                DeliveryOutcome::Sent
            }
            Err(err) => {
                error!(error = %err, to = %message.to, "reply delivery failed");
                DeliveryOutcome::Rejected(DeliveryRejection::Failed)
            }
        }
    }
}
