//! Operation routes — thin policies over the assist engine.
//!
//! Every route shares one request shape and one error shape. Input errors
//! and upstream generation failures both map to HTTP 400 `{"error": ...}`;
//! the distinction is logged, not surfaced (preserved legacy behavior).
//!
//! The `/buddy` route is the legacy deployment generation and answers with
//! a `response` field; `/v2/assist` answers with `suggestion`. Both run
//! the same operation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::SharedState;
use writebuddy_assist::Operation;
use writebuddy_core::{Draft, Source, StyleDirective};

/// Build the router for all authenticated operation routes.
pub fn op_router(state: SharedState) -> Router {
    Router::new()
        .route("/buddy", post(buddy_handler))
        .route("/v2/assist", post(assist_handler))
        .route("/v2/improve", post(improve_handler))
        .route("/v2/formalize", post(formalize_handler))
        .route("/v2/niceify", post(niceify_handler))
        .route("/v2/ask", post(ask_handler))
        .route("/v2/synonyms/{word}", get(synonyms_handler))
        .with_state(state)
}

// --- Request / response shapes ---

#[derive(Deserialize)]
pub struct OpRequest {
    /// The draft text. Modeled as Option so a missing field produces the
    /// legacy `No text provided` error instead of a framework rejection.
    #[serde(default)]
    text: Option<String>,

    /// Optional user-declared topic.
    #[serde(default)]
    prompt: Option<String>,

    /// Optional cited sources, in order.
    #[serde(default)]
    sources: Vec<SourceDto>,

    /// Style as a wire integer 0..=4; absent means neutral.
    #[serde(default)]
    style: Option<u8>,
}

#[derive(Deserialize)]
struct SourceDto {
    title: String,
    text: String,
}

#[derive(Serialize)]
struct SuggestionResponse {
    suggestion: String,
}

#[derive(Serialize)]
struct TextResponse {
    text: String,
}

#[derive(Serialize)]
struct GenericResponse {
    response: String,
}

#[derive(Serialize)]
struct SynonymsResponse {
    synonyms: Vec<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Build a `{"error": ...}` response with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status, self.message)
    }
}

// --- Shared operation plumbing ---

/// Validate the request, run the operation, return the generated text.
async fn run_op(
    state: &SharedState,
    op: Operation,
    req: OpRequest,
) -> Result<String, ApiError> {
    let Some(text) = req.text else {
        return Err(ApiError::bad_request("No text provided"));
    };

    let style = match req.style {
        None => StyleDirective::default(),
        Some(value) => StyleDirective::try_from(value)
            .map_err(|v| ApiError::bad_request(format!("Invalid style: {v}")))?,
    };

    let mut draft = Draft::new(text);
    if let Some(topic) = req.prompt {
        draft = draft.with_topic(topic);
    }
    if !req.sources.is_empty() {
        draft = draft.with_sources(
            req.sources
                .into_iter()
                .map(|s| Source {
                    title: s.title,
                    body: s.text,
                })
                .collect(),
        );
    }

    let generation = state.engine.run(op, draft, style).await.map_err(|e| {
        error!(op = op.name(), error = %e, "Generation failed on both tiers");
        // Upstream detail stays in the logs; clients get a generic 400.
        ApiError::bad_request("Text generation failed")
    })?;

    Ok(generation.text)
}

// --- Handlers ---

async fn buddy_handler(
    State(state): State<SharedState>,
    Json(req): Json<OpRequest>,
) -> Result<Json<GenericResponse>, ApiError> {
    let response = run_op(&state, Operation::Assist, req).await?;
    Ok(Json(GenericResponse { response }))
}

async fn assist_handler(
    State(state): State<SharedState>,
    Json(req): Json<OpRequest>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let suggestion = run_op(&state, Operation::Assist, req).await?;
    Ok(Json(SuggestionResponse { suggestion }))
}

async fn improve_handler(
    State(state): State<SharedState>,
    Json(req): Json<OpRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    let text = run_op(&state, Operation::Improve, req).await?;
    Ok(Json(TextResponse { text }))
}

async fn formalize_handler(
    State(state): State<SharedState>,
    Json(req): Json<OpRequest>,
) -> Result<Json<GenericResponse>, ApiError> {
    let response = run_op(&state, Operation::Formalize, req).await?;
    Ok(Json(GenericResponse { response }))
}

async fn niceify_handler(
    State(state): State<SharedState>,
    Json(req): Json<OpRequest>,
) -> Result<Json<GenericResponse>, ApiError> {
    let response = run_op(&state, Operation::Niceify, req).await?;
    Ok(Json(GenericResponse { response }))
}

async fn ask_handler(
    State(state): State<SharedState>,
    Json(req): Json<OpRequest>,
) -> Result<Json<GenericResponse>, ApiError> {
    let response = run_op(&state, Operation::FreeAsk, req).await?;
    Ok(Json(GenericResponse { response }))
}

async fn synonyms_handler(
    State(state): State<SharedState>,
    Path(word): Path<String>,
) -> Result<Json<SynonymsResponse>, ApiError> {
    let synonyms = state.thesaurus.synonyms(&word).await.map_err(|e| {
        error!(word = %word, error = %e, "Synonym lookup failed");
        ApiError::bad_request("No synonyms found")
    })?;
    Ok(Json(SynonymsResponse { synonyms }))
}
