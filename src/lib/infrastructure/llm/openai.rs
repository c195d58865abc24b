//! OpenAI Responses API provider

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::replies::{GenerationError, TextGenerationProvider};

/// The default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,

    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,

    #[serde(default)]
    text: Option<String>,
}

impl ResponsesBody {
    /// Joins the `output_text` parts of every output message
    fn into_text(self) -> Option<String> {
        if let Some(text) = self.output_text {
            return Some(text);
        }

        let parts: Vec<String> = self
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }
}

/// Text generation through the OpenAI Responses API
#[derive(Clone)]
pub struct OpenAiProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Creates a provider for `base_url` authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TextGenerationProvider for OpenAiProvider {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        if self.api_key.trim().is_empty() {
            return Err(GenerationError::NotConfigured("empty API key".to_string()));
        }

        debug!(model, prompt_len = prompt.len(), "sending responses request");

        let response = self
            .http
            .post(self.responses_url())
            .bearer_auth(&self.api_key)
            .json(&ResponsesRequest {
                model,
                input: prompt,
            })
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    GenerationError::AuthFailed(body)
                }
                StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited,
                _ => GenerationError::RequestFailed(format!("HTTP {status}: {body}")),
            });
        }

        let body: ResponsesBody = response.json().await.map_err(|e| {
            GenerationError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        body.into_text()
            .ok_or_else(|| GenerationError::InvalidResponse("response has no output text".into()))
    }
}

fn request_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::RequestFailed(err.to_string())
    }
}
