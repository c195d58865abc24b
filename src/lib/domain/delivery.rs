//! Reply delivery through an outbound mail relay.

mod dispatcher;
mod errors;
mod relay;
mod request;

pub use dispatcher::{DeliveryOutcome, Dispatcher, DispatcherConfig, DispatcherImpl};
pub use errors::{DeliveryError, DeliveryRejection};
pub use relay::{MailRelay, RelaySession};
pub use request::{DeliveryRequest, OutboundMessage, SenderCredentials, REPLY_SUBJECT};
