//! Error types for reply composition

use thiserror::Error;

/// Errors that can occur when building a [`ReplyRequest`](super::ReplyRequest)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplyRequestError {
    /// The pasted email is empty or only whitespace
    #[error("email body is empty")]
    EmptyEmailBody,

    /// The tone is not one of the supported tones
    #[error("unknown tone \"{0}\"")]
    UnknownTone(String),
}

/// Errors returned to the caller of
/// [`ReplyComposer::compose`](super::ReplyComposer::compose).
///
/// Provider failures never appear here, they are absorbed into a fallback reply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// The request cannot be sent to a provider
    #[error("email body is empty")]
    InvalidInput,
}

/// Errors raised by a [`TextGenerationProvider`](super::TextGenerationProvider)
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No credential is available for the provider
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The provider rejected the credential
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The provider is rate limiting requests
    #[error("rate limited")]
    RateLimited,

    /// The request could not be completed
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The provider answered with something that is not a usable reply
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The provider did not answer in time
    #[error("timeout")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tone_display() {
        let err = ReplyRequestError::UnknownTone("sarcastic".to_string());

        assert_eq!(err.to_string(), "unknown tone \"sarcastic\"");
    }

    #[test]
    fn test_generation_error_display() {
        assert_eq!(
            GenerationError::AuthFailed("bad key".to_string()).to_string(),
            "authentication failed: bad key"
        );
        assert_eq!(GenerationError::Timeout.to_string(), "timeout");
    }
}
