//! Reply composer service

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, warn};

#[cfg(test)]
use mockall::mock;

use super::{
    errors::{ComposeError, GenerationError},
    prompt::{build_prompt, FALLBACK_REPLY},
    provider::TextGenerationProvider,
    request::ReplyRequest,
};

/// Where the text of a reply came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationMode {
    /// Produced by the text generation provider
    Generated,

    /// The static fallback reply
    Fallback,
}

impl GenerationMode {
    /// The mode's lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Fallback => "fallback",
        }
    }
}

/// A composed reply
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// The reply text
    pub reply_text: String,

    /// Whether the text was generated or is the fallback
    pub mode: GenerationMode,
}

impl GenerationOutcome {
    /// A reply produced by the provider
    pub fn generated(reply_text: String) -> Self {
        Self {
            reply_text,
            mode: GenerationMode::Generated,
        }
    }

    /// The fallback reply
    pub fn fallback() -> Self {
        Self {
            reply_text: FALLBACK_REPLY.to_string(),
            mode: GenerationMode::Fallback,
        }
    }
}

/// Reply composer configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposerConfig {
    /// The model identifier passed to the provider
    pub model: String,

    /// How long to wait for the provider before falling back
    pub timeout: Duration,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Reply composer
#[async_trait]
pub trait ReplyComposer: Clone + Send + Sync + 'static {
    /// Composes a reply to the email in `request`.
    ///
    /// # Arguments
    /// * `request` - The received email and the requested [`Tone`](super::Tone).
    ///
    /// # Returns
    /// - [`Ok`] with a [`GenerationOutcome`]; provider failures yield the fallback reply.
    /// - [`Err`] with [`ComposeError::InvalidInput`] if the email body is empty.
    async fn compose(&self, request: &ReplyRequest) -> Result<GenerationOutcome, ComposeError>;
}

#[cfg(test)]
mock! {
    pub ReplyComposer {}

    impl Clone for ReplyComposer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl ReplyComposer for ReplyComposer {
        async fn compose(&self, request: &ReplyRequest) -> Result<GenerationOutcome, ComposeError>;
    }
}

/// Reply composer implementation
pub struct ReplyComposerImpl<P>
where
    P: TextGenerationProvider,
{
    provider: Option<Arc<P>>,
    config: ComposerConfig,
}

impl<P> ReplyComposerImpl<P>
where
    P: TextGenerationProvider,
{
    /// Creates a composer that generates replies with `provider`.
    pub fn new(provider: Arc<P>, config: ComposerConfig) -> Self {
        Self {
            provider: Some(provider),
            config,
        }
    }

    /// Creates a composer with no provider; every reply is the fallback.
    pub fn without_provider(config: ComposerConfig) -> Self {
        Self {
            provider: None,
            config,
        }
    }

    /// Whether a provider is configured
    pub fn provider_configured(&self) -> bool {
        self.provider.is_some()
    }

    async fn generate(&self, provider: &P, prompt: &str) -> Result<String, GenerationError> {
        timeout(
            self.config.timeout,
            provider.generate(&self.config.model, prompt),
        )
        .await
        .map_err(|_| GenerationError::Timeout)?
    }
}

impl<P> Clone for ReplyComposerImpl<P>
where
    P: TextGenerationProvider,
{
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            config: self.config.clone(),
        }
    }
}

impl<P> fmt::Debug for ReplyComposerImpl<P>
where
    P: TextGenerationProvider,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyComposerImpl")
            .field("provider_configured", &self.provider_configured())
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl<P> ReplyComposer for ReplyComposerImpl<P>
where
    P: TextGenerationProvider,
{
    async fn compose(&self, request: &ReplyRequest) -> Result<GenerationOutcome, ComposeError> {
        if request.email_body().trim().is_empty() {
            return Err(ComposeError::InvalidInput);
        }

        let Some(provider) = &self.provider else {
            debug!("no text generation provider configured, using fallback reply");
            return Ok(GenerationOutcome::fallback());
        };

        let prompt = build_prompt(request);

        debug!(model = %self.config.model, tone = %request.tone(), "generating reply");

        match self.generate(provider, &prompt).await {
            Ok(reply_text) => Ok(GenerationOutcome::generated(reply_text)),
            Err(err) => {
                warn!(error = %err, "reply generation failed, using fallback reply");

                Ok(GenerationOutcome::fallback())
            }
        }
    }
}
