//! Route definitions

use axum::{Router, routing::get};
use tower_http::limit::RequestBodyLimitLayer;

use crate::{handlers, state::AppState};

/// Create the main router with all routes
///
/// Request bodies larger than `server.max_body_size_bytes` are rejected with 413.
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_body_size_bytes;

    Router::new()
        // WhatsApp webhook: verification handshake and event delivery
        .route(
            "/",
            get(handlers::whatsapp::verify_webhook).post(handlers::whatsapp::handle_webhook),
        )
        // Liveness
        .route("/health", get(handlers::health::health_check))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        // Attach state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use application::{ApplicationError, MessengerPort, QueryPort, RelayService};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use domain::{InboundEvent, OutboundReply};
    use infrastructure::AppConfig;
    use tower::ServiceExt;

    use super::*;

    struct Silent;

    #[async_trait]
    impl MessengerPort for Silent {
        async fn send_typing_indicator(&self, _: &InboundEvent) -> Result<(), ApplicationError> {
            Ok(())
        }

        async fn send_reply(&self, _: &OutboundReply) -> Result<(), ApplicationError> {
            Ok(())
        }
    }

    #[async_trait]
    impl QueryPort for Silent {
        async fn query(&self, _: &str) -> Result<String, ApplicationError> {
            Ok(String::new())
        }
    }

    fn router_with_limit(limit: usize) -> Router {
        let mut config = AppConfig::default();
        config.server.max_body_size_bytes = limit;
        config.whatsapp.verify_token = Some("secret".to_string());
        let relay = RelayService::new(Arc::new(Silent), Arc::new(Silent));
        create_router(AppState::new(relay, config))
    }

    fn post(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .header("content-length", body.len())
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let response = router_with_limit(16)
            .oneshot(post(r#"{"object":"whatsapp_business_account"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn body_within_limit_is_accepted() {
        let response = router_with_limit(1024)
            .oneshot(post(r#"{"object":"page"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn verify(query: &str) -> (StatusCode, axum::body::Bytes) {
        let response = router_with_limit(1024)
            .oneshot(
                Request::builder()
                    .uri(format!("/?{query}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn verification_echoes_challenge() {
        let (status, body) =
            verify("hub.mode=subscribe&hub.verify_token=secret&hub.challenge=c").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"c");
    }

    #[tokio::test]
    async fn repeated_hub_parameter_is_forbidden() {
        let (status, body) =
            verify("hub.mode=subscribe&hub.mode=x&hub.verify_token=secret&hub.challenge=c").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.is_empty());

        let (status, body) = verify(
            "hub.mode=subscribe&hub.verify_token=secret&hub.verify_token=secret&hub.challenge=c",
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn webhook_route_rejects_other_methods() {
        let response = router_with_limit(1024)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
