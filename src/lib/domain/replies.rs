//! Reply composition: prompt building, text generation and the offline fallback.

mod composer;
mod errors;
mod prompt;
mod provider;
mod request;

pub use composer::{
    ComposerConfig, GenerationMode, GenerationOutcome, ReplyComposer, ReplyComposerImpl,
};
pub use errors::{ComposeError, GenerationError, ReplyRequestError};
pub use prompt::{build_prompt, FALLBACK_REPLY};
pub use provider::TextGenerationProvider;
pub use request::{ReplyRequest, Tone};
