//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{errors::ErrorResponse, handlers::v1::*};

/// The API's OpenAPI document
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Reply Desk"),
    paths(
        replies::compose_reply::handler,
        replies::send_reply::handler,
        uptime::handler
    ),
    components(schemas(
        replies::compose_reply::ComposeReplyBody,
        replies::compose_reply::ComposeReplyResponse,
        replies::send_reply::SendReplyBody,
        replies::send_reply::SendReplyResponse,
        uptime::UptimeResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
