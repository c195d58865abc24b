//! Send reply handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{
        delivery::{DeliveryOutcome, DeliveryRequest, Dispatcher},
        replies::ReplyComposer,
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Send reply request body
#[derive(Clone, Deserialize, Serialize, ToSchema)]
pub struct SendReplyBody {
    /// The address the reply is sent from
    #[schema(example = "me@example.com")]
    #[serde(default)]
    sender_email: Option<String>,

    /// The sender's SMTP password or app password
    #[schema(example = "app-password")]
    #[serde(default)]
    sender_password: Option<String>,

    /// The address the reply is sent to
    #[schema(example = "sam@example.com")]
    #[serde(default)]
    receiver_email: Option<String>,

    /// The reply text
    #[schema(example = "Hi Sam,\n\nFriday works for me.")]
    reply: String,
}

impl std::fmt::Debug for SendReplyBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendReplyBody")
            .field("sender_email", &self.sender_email)
            .field("receiver_email", &self.receiver_email)
            .finish_non_exhaustive()
    }
}

impl From<SendReplyBody> for DeliveryRequest {
    fn from(body: SendReplyBody) -> Self {
        Self {
            sender_address: body.sender_email,
            sender_credential: body.sender_password,
            receiver_address: body.receiver_email,
            body_text: body.reply,
        }
    }
}

/// Send reply response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendReplyResponse {
    /// `sent` if the relay accepted the reply, `simulated` if no relay is configured
    #[schema(example = "sent")]
    outcome: String,
}

/// Send a composed reply through the mail relay
#[utoipa::path(
    post,
    operation_id = "send_reply",
    tag = "Replies",
    path = "/api/v1/replies/send",
    request_body = SendReplyBody,
    responses(
        (status = StatusCode::OK, description = "Reply sent or simulated", body = SendReplyResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Missing or invalid fields", body = ErrorResponse, example = json!({ "error": "missing credentials or addresses" })),
        (status = StatusCode::BAD_GATEWAY, description = "The relay did not accept the reply", body = ErrorResponse, example = json!({ "error": "delivery failed" })),
    )
)]
pub async fn handler<C: ReplyComposer, D: Dispatcher>(
    State(state): State<AppState<C, D>>,
    request: Result<Json<SendReplyBody>, JsonRejection>,
) -> Result<(StatusCode, Json<SendReplyResponse>), ApiError> {
    let Json(body) = request?;

    let request: DeliveryRequest = body.into();

    let outcome = state.dispatcher.deliver(&request).await;

    match outcome {
        DeliveryOutcome::Sent | DeliveryOutcome::Simulated => Ok((
            StatusCode::OK,
            Json(SendReplyResponse {
                outcome: outcome.as_str().to_string(),
            }),
        )),
        DeliveryOutcome::Rejected(rejection) => Err(rejection.into()),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::{
        domain::{
            delivery::{
                tests::MockDispatcher, DeliveryOutcome, DeliveryRejection, DeliveryRequest,
                Dispatcher, DispatcherConfig, DispatcherImpl,
            },
            replies::tests::MockReplyComposer,
        },
        infrastructure::http::{
            errors::ErrorResponse,
            handlers::v1::replies::send_reply::{SendReplyBody, SendReplyResponse},
            router,
            state::{tests::test_state, AppState},
        },
    };

    impl SendReplyBody {
        fn new(sender: Option<&str>, password: Option<&str>, receiver: Option<&str>) -> Self {
            Self {
                sender_email: sender.map(str::to_string),
                sender_password: password.map(str::to_string),
                receiver_email: receiver.map(str::to_string),
                reply: "Friday works for me.".to_string(),
            }
        }
    }

    fn complete_body() -> SendReplyBody {
        SendReplyBody::new(
            Some("me@example.com"),
            Some("app-password"),
            Some("sam@example.com"),
        )
    }

    #[tokio::test]
    async fn test_send_reply_sent() -> TestResult {
        let mut dispatcher = MockDispatcher::new();

        dispatcher
            .expect_deliver()
            .times(1)
            .withf(|request| {
                request.sender_address.as_deref() == Some("me@example.com")
                    && request.sender_credential.as_deref() == Some("app-password")
                    && request.receiver_address.as_deref() == Some("sam@example.com")
                    && request.body_text == "Friday works for me."
            })
            .returning(|_| DeliveryOutcome::Sent);

        let response = TestServer::new(router(test_state(None, Some(dispatcher))))?
            .post("/api/v1/replies/send")
            .json(&complete_body())
            .await;

        response.assert_status_ok();

        assert_eq!(response.json::<SendReplyResponse>().outcome, "sent");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_reply_simulated_without_relay() -> TestResult {
        let state = AppState::new(
            MockReplyComposer::new(),
            DispatcherImpl::simulate_only(DispatcherConfig::default()),
        );

        let response = TestServer::new(router(state))?
            .post("/api/v1/replies/send")
            .json(&complete_body())
            .await;

        response.assert_status_ok();

        assert_eq!(response.json::<SendReplyResponse>().outcome, "simulated");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_reply_missing_fields_is_rejected() -> TestResult {
        let dispatcher = DispatcherImpl::simulate_only(DispatcherConfig::default());
        let state = AppState::new(MockReplyComposer::new(), dispatcher.clone());

        let body = SendReplyBody::new(Some("me@example.com"), None, Some("sam@example.com"));

        let request: DeliveryRequest = body.clone().into();

        assert_eq!(
            dispatcher.deliver(&request).await,
            DeliveryOutcome::Rejected(DeliveryRejection::MissingFields)
        );

        let response = TestServer::new(router(state))?
            .post("/api/v1/replies/send")
            .json(&body)
            .expect_failure()
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json.error, "missing credentials or addresses");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_reply_delivery_failure_is_bad_gateway() -> TestResult {
        let mut dispatcher = MockDispatcher::new();

        dispatcher
            .expect_deliver()
            .times(1)
            .returning(|_| DeliveryOutcome::Rejected(DeliveryRejection::Failed));

        let response = TestServer::new(router(test_state(None, Some(dispatcher))))?
            .post("/api/v1/replies/send")
            .json(&complete_body())
            .expect_failure()
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(json.error, "delivery failed");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_reply_malformed_json_is_rejected() -> TestResult {
        let mut dispatcher = MockDispatcher::new();

        dispatcher.expect_deliver().times(0);

        let response = TestServer::new(router(test_state(None, Some(dispatcher))))?
            .post("/api/v1/replies/send")
            .text("{ not json")
            .content_type("application/json")
            .expect_failure()
            .await;

        assert!(response.status_code().is_client_error());

        Ok(())
    }
}
