use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::{future, stream, Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tower_http::cors::{Any, CorsLayer};
use vibeshift_core::extract::extract_code;
use vibeshift_core::prompt::{build_prompt, Prompt};
use vibeshift_core::samples::ExampleLibrary;
use vibeshift_core::types::{ResponseMode, TransformRequest, TransformResponse};
use vibeshift_core::TransformError;

use crate::provider::{ChunkStream, CompletionProvider};

/// Everything a request handler needs, built once at start-up.
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    pub library: ExampleLibrary,
    pub mode: ResponseMode,
    pub timeout: Duration,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/transform", post(transform_handler).get(status_handler))
        .route("/samples", get(samples_handler))
        .layer(cors)
        .with_state(state)
}

/// Error returned to HTTP callers. Only the public message leaves the server.
#[derive(Debug)]
pub struct ApiError(TransformError);

impl From<TransformError> for ApiError {
    fn from(error: TransformError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.public_message() });
        (status, Json(body)).into_response()
    }
}

async fn transform_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransformRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        log::debug!("Rejected transform body: {}", rejection.body_text());
        TransformError::InvalidRequest("Invalid request body".to_string())
    })?;

    let transform = request.validate()?;
    let prompt = build_prompt(&transform);
    let deadline = Instant::now() + state.timeout;

    log::info!(
        "Transforming {} bytes of {} into {}",
        transform.code.len(),
        transform.language,
        transform.style
    );

    let response = match state.mode {
        ResponseMode::Batch => respond_batch(state.provider.as_ref(), &prompt, deadline).await,
        ResponseMode::Stream => respond_stream(state.provider.as_ref(), &prompt, deadline).await,
    };

    response.map_err(|error| {
        log::error!("Error in transform route: {error}");
        ApiError::from(error)
    })
}

async fn respond_batch(
    provider: &dyn CompletionProvider,
    prompt: &Prompt,
    deadline: Instant,
) -> Result<Response, TransformError> {
    let text = timeout_at(deadline, provider.complete(prompt))
        .await
        .map_err(|_| TransformError::failed("Provider timed out"))?
        .map_err(|e| TransformError::failed(format!("{e:#}")))?;

    let transformed_code = extract_code(&text);
    if transformed_code.is_empty() {
        return Err(TransformError::failed("Completion contained no code"));
    }

    Ok(Json(TransformResponse { transformed_code }).into_response())
}

async fn respond_stream(
    provider: &dyn CompletionProvider,
    prompt: &Prompt,
    deadline: Instant,
) -> Result<Response, TransformError> {
    let mut chunks = timeout_at(deadline, provider.stream(prompt))
        .await
        .map_err(|_| TransformError::failed("Provider timed out before streaming"))?
        .map_err(|e| TransformError::failed(format!("{e:#}")))?;

    // Hold the response until the first chunk so that early failures can
    // still be reported with a proper status code.
    let first = match timeout_at(deadline, chunks.next()).await {
        Err(_) => return Err(TransformError::failed("Provider timed out before the first chunk")),
        Ok(None) => return Err(TransformError::failed("Provider stream ended without content")),
        Ok(Some(Err(e))) => return Err(TransformError::failed(format!("{e:#}"))),
        Ok(Some(Ok(chunk))) => chunk,
    };

    let body = stream::once(future::ready(Ok::<_, std::io::Error>(first)))
        .chain(relay(chunks, deadline));

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response())
}

/// Forward the remaining chunks unchanged and in order.
///
/// A provider error or an expired deadline ends the body with an error, which
/// aborts the transfer instead of completing it cleanly.
fn relay(
    chunks: ChunkStream,
    deadline: Instant,
) -> impl Stream<Item = Result<String, std::io::Error>> + Send + 'static {
    stream::unfold(Some(chunks), move |chunks| async move {
        let Some(mut chunks) = chunks else {
            return None;
        };

        match timeout_at(deadline, chunks.next()).await {
            Ok(None) => None,
            Ok(Some(Ok(chunk))) => Some((Ok(chunk), Some(chunks))),
            Ok(Some(Err(e))) => {
                log::error!("Error in transform stream: {e:#}");
                Some((Err(std::io::Error::other("provider stream failed")), None))
            }
            Err(_) => {
                log::error!("Transform stream exceeded its deadline");
                Some((Err(std::io::Error::other("provider stream timed out")), None))
            }
        }
    })
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "mode": state.mode,
        "model": state.provider.model(),
    }))
}

async fn samples_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.library.iter().copied().collect::<Vec<_>>())
}
