//! HTTP API gateway for WriteBuddy.
//!
//! Exposes the writing operations, synonym lookup, key issuance, and a
//! health check. Built on Axum.
//!
//! Security layers:
//! - Bearer API-key authentication on all operation routes
//! - Key issuance guarded by an admin code
//! - Request body size limit (1 MB)
//! - CORS for browser-based editors
//! - HTTP trace logging

pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::{Router, extract::State};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use writebuddy_assist::AssistEngine;
use writebuddy_providers::{GenerationLadder, OpenAiProvider, ThesaurusClient};
use writebuddy_security::KeyStore;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub engine: AssistEngine,
    pub thesaurus: ThesaurusClient,
    pub keys: KeyStore,
    pub admin_code: Option<String>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the full router: public routes plus authenticated operations.
pub fn build_router(state: SharedState) -> Router {
    let ops = routes::op_router(state.clone()).layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/keys", post(issue_key_handler))
        .with_state(state)
        .merge(ops)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: writebuddy_config::AppConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = Arc::new(OpenAiProvider::from_config(&config)?);
    let ladder = GenerationLadder::new(
        provider,
        config.models.primary.clone(),
        config.models.fallback.clone(),
        std::time::Duration::from_secs(config.provider.timeout_secs),
    );

    let state = Arc::new(GatewayState {
        engine: AssistEngine::new(ladder, &config.models),
        thesaurus: ThesaurusClient::from_config(&config),
        keys: KeyStore::new(config.gateway.api_keys.clone()),
        admin_code: config.gateway.admin_code.clone(),
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Authentication middleware for operation routes.
///
/// Requires a valid `Authorization: Bearer <key>` header checked against
/// the key store. The store is an allow-list: no keys configured means no
/// access (secure by default), and rejection happens before any core
/// logic runs.
async fn auth_middleware(
    State(state): State<SharedState>,
    req: axum::extract::Request,
    next: Next,
) -> axum::response::Response {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match bearer {
        Some(key) if state.keys.contains(key) => next.run(req).await,
        _ => {
            warn!("Rejected request — missing or invalid API key");
            routes::error_response(StatusCode::UNAUTHORIZED, "Invalid API key")
        }
    }
}

// --- Public handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct IssueKeyResponse {
    key: String,
}

/// Mint a new client API key. Guarded by the configured admin code sent in
/// the `X-Admin-Code` header; disabled entirely when no code is configured.
async fn issue_key_handler(
    State(state): State<SharedState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Response {
    let Some(expected) = state.admin_code.as_deref() else {
        return routes::error_response(StatusCode::FORBIDDEN, "Key issuance is disabled");
    };

    let provided = headers.get("X-Admin-Code").and_then(|v| v.to_str().ok());
    if provided != Some(expected) {
        return routes::error_response(StatusCode::UNAUTHORIZED, "Invalid admin code");
    }

    let key = state.keys.issue();
    Json(IssueKeyResponse { key }).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;
    use writebuddy_config::ModelsConfig;
    use writebuddy_core::error::ProviderError;
    use writebuddy_core::provider::{CompletionRequest, CompletionResponse, Provider};

    /// Mock provider: canned reply, optional failure, call counting.
    pub(crate) struct MockProvider {
        pub reply: String,
        pub fail: bool,
        pub calls: Mutex<usize>,
    }

    impl MockProvider {
        pub fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.into(),
                fail: false,
                calls: Mutex::new(0),
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: String::new(),
                fail: true,
                calls: Mutex::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(ProviderError::ApiError {
                    status_code: 500,
                    message: "boom".into(),
                });
            }
            Ok(CompletionResponse {
                text: self.reply.clone(),
                model: request.model,
                usage: None,
            })
        }
    }

    pub(crate) fn test_state(provider: Arc<MockProvider>) -> SharedState {
        let ladder = GenerationLadder::new(
            provider,
            "gpt-4",
            "gpt-3.5-turbo",
            Duration::from_secs(5),
        );
        Arc::new(GatewayState {
            engine: AssistEngine::new(ladder, &ModelsConfig::default()),
            thesaurus: ThesaurusClient::new(
                "http://127.0.0.1:9",
                10,
                Duration::from_millis(100),
            ),
            keys: KeyStore::new(vec!["valid-key".into()]),
            admin_code: Some("admin-code".into()),
        })
    }

    fn post_json(uri: &str, key: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(key) = key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_auth() {
        let app = build_router(test_state(MockProvider::replying("x")));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_key_is_rejected_before_core_logic() {
        let provider = MockProvider::replying("x");
        let app = build_router(test_state(provider.clone()));

        let response = app
            .oneshot(post_json(
                "/v2/assist",
                None,
                serde_json::json!({"text": "hello"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn wrong_key_is_rejected() {
        let app = build_router(test_state(MockProvider::replying("x")));
        let response = app
            .oneshot(post_json(
                "/v2/assist",
                Some("wrong"),
                serde_json::json!({"text": "hello"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_text_is_400_with_no_provider_call() {
        let provider = MockProvider::replying("x");
        let app = build_router(test_state(provider.clone()));

        let response = app
            .oneshot(post_json("/v2/assist", Some("valid-key"), serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No text provided");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn assist_v2_returns_suggestion() {
        let app = build_router(test_state(MockProvider::replying("market today")));
        let response = app
            .oneshot(post_json(
                "/v2/assist",
                Some("valid-key"),
                serde_json::json!({"text": "Hello there. I went to the", "style": 3}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["suggestion"], "market today");
        assert!(body.get("response").is_none());
    }

    #[tokio::test]
    async fn legacy_buddy_returns_response_field() {
        let app = build_router(test_state(MockProvider::replying("market today")));
        let response = app
            .oneshot(post_json(
                "/buddy",
                Some("valid-key"),
                serde_json::json!({"text": "I went to the"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["response"], "market today");
    }

    #[tokio::test]
    async fn improve_returns_text_field() {
        let app = build_router(test_state(MockProvider::replying("Better text")));
        let response = app
            .oneshot(post_json(
                "/v2/improve",
                Some("valid-key"),
                serde_json::json!({"text": "gud text"}),
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["text"], "Better text");
    }

    #[tokio::test]
    async fn formalize_accepts_topic_and_sources() {
        let app = build_router(test_state(MockProvider::replying("Formal text")));
        let response = app
            .oneshot(post_json(
                "/v2/formalize",
                Some("valid-key"),
                serde_json::json!({
                    "text": "hey",
                    "prompt": "a cover letter",
                    "sources": [{"title": "CV", "text": "Ten years of experience"}],
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["response"], "Formal text");
    }

    #[tokio::test]
    async fn invalid_style_is_400() {
        let provider = MockProvider::replying("x");
        let app = build_router(test_state(provider.clone()));

        let response = app
            .oneshot(post_json(
                "/v2/assist",
                Some("valid-key"),
                serde_json::json!({"text": "hello", "style": 9}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn generation_failure_maps_to_400_error() {
        let provider = MockProvider::failing();
        let app = build_router(test_state(provider.clone()));

        let response = app
            .oneshot(post_json(
                "/v2/assist",
                Some("valid-key"),
                serde_json::json!({"text": "hello"}),
            ))
            .await
            .unwrap();

        // Upstream failure and input errors share the 400 status.
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Text generation failed");
        // Primary plus the single fallback retry.
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn issued_key_grants_access() {
        let app = build_router(test_state(MockProvider::replying("ok")));

        let issue = Request::post("/keys")
            .header("X-Admin-Code", "admin-code")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(issue).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let key = body_json(response).await["key"].as_str().unwrap().to_string();

        let response = app
            .oneshot(post_json(
                "/v2/assist",
                Some(&key),
                serde_json::json!({"text": "hello"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn key_issuance_requires_admin_code() {
        let app = build_router(test_state(MockProvider::replying("ok")));
        let response = app
            .oneshot(Request::post("/keys").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
