//! Text generation provider

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::errors::GenerationError;

/// A hosted language model that turns a prompt into text
#[async_trait]
pub trait TextGenerationProvider: Send + Sync + 'static {
    /// Generates text for `prompt` with the given model.
    ///
    /// # Arguments
    /// * `model` - The model identifier understood by the provider.
    /// * `prompt` - The complete instruction prompt.
    ///
    /// # Returns
    /// The generated text, or a [`GenerationError`] describing why no text was produced.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
}

#[cfg(test)]
mock! {
    pub TextGenerationProvider {}

    #[async_trait]
    impl TextGenerationProvider for TextGenerationProvider {
        async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
    }
}
