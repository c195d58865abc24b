//! Delivery request and the message handed to a relay

use std::fmt;

use crate::domain::email_address::EmailAddress;

use super::errors::DeliveryRejection;

/// Subject line of every delivered reply
pub const REPLY_SUBJECT: &str = "Re: Your Email";

/// A request to deliver a reply.
///
/// Every field is optional so that a partially filled form can be handed over as is.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DeliveryRequest {
    /// The address the reply is sent from
    pub sender_address: Option<String>,

    /// The credential used to authenticate `sender_address` with the relay
    pub sender_credential: Option<String>,

    /// The address the reply is sent to
    pub receiver_address: Option<String>,

    /// The reply text
    pub body_text: String,
}

impl DeliveryRequest {
    /// Splits the request into relay credentials and the message to send.
    ///
    /// Blank fields count as missing.
    pub fn prepare(&self) -> Result<(SenderCredentials, OutboundMessage), DeliveryRejection> {
        let (Some(sender), Some(credential), Some(receiver)) = (
            present(&self.sender_address),
            present(&self.sender_credential),
            present(&self.receiver_address),
        ) else {
            return Err(DeliveryRejection::MissingFields);
        };

        let from = EmailAddress::new(sender).map_err(|_| DeliveryRejection::InvalidAddress)?;
        let to = EmailAddress::new(receiver).map_err(|_| DeliveryRejection::InvalidAddress)?;

        let credentials = SenderCredentials {
            username: from.to_string(),
            password: credential.to_string(),
        };

        let message = OutboundMessage {
            from,
            to,
            subject: REPLY_SUBJECT.to_string(),
            body: self.body_text.clone(),
        };

        Ok((credentials, message))
    }
}

impl fmt::Debug for DeliveryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryRequest")
            .field("sender_address", &self.sender_address)
            .field(
                "sender_credential",
                &self.sender_credential.as_ref().map(|_| "<redacted>"),
            )
            .field("receiver_address", &self.receiver_address)
            .field("body_text", &self.body_text)
            .finish()
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

/// Credentials presented to the relay
#[derive(Clone, PartialEq, Eq)]
pub struct SenderCredentials {
    /// The login, the sender's address
    pub username: String,

    /// The password or app token
    pub password: String,
}

impl fmt::Debug for SenderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A plain-text message ready for the relay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// The sender
    pub from: EmailAddress,

    /// The recipient
    pub to: EmailAddress,

    /// The subject line
    pub subject: String,

    /// The plain-text body
    pub body: String,
}
