//! Compose reply handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{
        delivery::Dispatcher,
        replies::{ReplyComposer, ReplyRequest, Tone},
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Compose reply request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ComposeReplyBody {
    /// The email that was received
    #[schema(example = "Hi, can we reschedule our meeting to Friday?")]
    email: String,

    /// One of Formal, Professional or Friendly
    #[schema(example = "Friendly")]
    tone: String,

    /// Who sent the received email, echoed back as `reply_to`
    #[schema(example = "sam@example.com")]
    #[serde(default)]
    sender_email: Option<String>,
}

/// Compose reply response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComposeReplyResponse {
    /// The reply text
    reply: String,

    /// `generated` if the language model wrote the reply, `fallback` otherwise
    #[schema(example = "generated")]
    mode: String,

    /// The address the reply is prepared for
    #[schema(example = "sam@example.com")]
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
}

/// Compose a reply to a received email
#[utoipa::path(
    post,
    operation_id = "compose_reply",
    tag = "Replies",
    path = "/api/v1/replies",
    request_body = ComposeReplyBody,
    responses(
        (status = StatusCode::OK, description = "Reply composed", body = ComposeReplyResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Unprocessable entity", body = ErrorResponse, example = json!({ "error": "Please paste an email" })),
    )
)]
pub async fn handler<C: ReplyComposer, D: Dispatcher>(
    State(state): State<AppState<C, D>>,
    request: Result<Json<ComposeReplyBody>, JsonRejection>,
) -> Result<Json<ComposeReplyResponse>, ApiError> {
    let Json(body) = request?;

    let tone: Tone = body.tone.parse()?;
    let reply_request = ReplyRequest::new(&body.email, tone)?;

    let reply_to = body
        .sender_email
        .as_deref()
        .map(str::trim)
        .filter(|sender| !sender.is_empty())
        .map(str::to_string);

    let outcome = state.composer.compose(&reply_request).await?;

    Ok(Json(ComposeReplyResponse {
        reply: outcome.reply_text,
        mode: outcome.mode.as_str().to_string(),
        reply_to,
    }))
}
