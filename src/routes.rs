use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{errors::AppError, fallback::FallbackCounter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub count: u64,
}

/// Optional increment body. Visitor ids are accepted for compatibility and not stored.
/// Missing, unreadable or oversized bodies are all treated as no body.
#[derive(Deserialize)]
struct IncrementRequest {
    id: Option<i64>,
}

/// `GET /counts/get` and `POST /counts/increment`. Any other method on those
/// paths gets the same 404 as an unknown path.
pub fn counts() -> Router {
    Router::new()
        .route("/counts/get", get(get_count).fallback(not_found))
        .route("/counts/increment", post(increment).fallback(not_found))
}

async fn get_count(Extension(counter): Extension<FallbackCounter>) -> Json<Count> {
    Json(Count {
        count: counter.get().await,
    })
}

async fn increment(
    Extension(counter): Extension<FallbackCounter>,
    body: Option<Json<IncrementRequest>>,
) -> Json<Count> {
    if let Some(Json(IncrementRequest { id: Some(id) })) = body {
        debug!(id, "Ignoring visitor id");
    }
    Json(Count {
        count: counter.increment().await,
    })
}

pub(crate) async fn not_found() -> AppError {
    AppError::not_found()
}
