//! Version 1 of the API

use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::{delivery::Dispatcher, replies::ReplyComposer},
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod replies;
pub mod uptime;

/// The version 1 routes
pub fn router<C: ReplyComposer, D: Dispatcher>() -> Router<AppState<C, D>> {
    Router::new()
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler::<C, D>))
        .route("/replies", post(replies::compose_reply::handler::<C, D>))
        .route("/replies/send", post(replies::send_reply::handler::<C, D>))
}
