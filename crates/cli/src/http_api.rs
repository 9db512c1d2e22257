use crate::session::Session;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use codenn_ast::SampleLocator;
use codenn_cluster::Algorithm;
use codenn_scene::SceneError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex, TryLockError};

/// One session shared by every request; appends are serialised by the lock
pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct SampleRequest {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClustersQuery {
    #[serde(default)]
    pub algorithm: Option<String>,
}

pub fn router(session: SharedSession) -> Router {
    Router::new()
        .route("/sample", post(post_sample))
        .route("/clusters", get(get_clusters))
        .route("/health", get(health))
        .with_state(session)
}

/// HTTP status for an error kind
#[must_use]
pub fn status_for_kind(kind: &str) -> StatusCode {
    match kind {
        "invalid_request" | "input" | "json" | "decode" | "unknown_category" | "range"
        | "invalid_algorithm" => StatusCode::BAD_REQUEST,
        "model_input" | "insufficient_data" | "invalid_dimension" | "fetch" | "io" => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(kind: &str, message: String) -> Response {
    let status = status_for_kind(kind);
    if status.is_server_error() {
        log::error!("{kind}: {message}");
    } else {
        log::debug!("Rejected request ({kind}): {message}");
    }
    json_response(
        status,
        &ErrorBody {
            status: "error",
            kind: kind.to_string(),
            message,
        },
    )
}

fn scene_error(err: &SceneError) -> Response {
    error_response(err.kind(), err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Run `f` on a blocking worker with the session locked
async fn with_session<T, F>(session: SharedSession, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&mut Session) -> codenn_scene::Result<T> + Send + 'static,
{
    let joined = tokio::task::spawn_blocking(move || {
        let mut guard = session
            .lock()
            .map_err(|_| error_response("internal", "session lock poisoned".to_string()))?;
        f(&mut guard).map_err(|err| scene_error(&err))
    })
    .await;

    match joined {
        Ok(result) => result,
        Err(err) => Err(error_response("internal", format!("worker failed: {err}"))),
    }
}

async fn post_sample(State(session): State<SharedSession>, body: Bytes) -> Response {
    let request: SampleRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => return error_response("invalid_request", err.to_string()),
    };
    let locator = match SampleLocator::from_parts(request.path.as_deref(), request.url.as_deref())
    {
        Ok(locator) => locator,
        Err(err) => return error_response(err.kind(), err.to_string()),
    };

    log::info!("POST /sample {locator}");
    match with_session(session, move |s| s.submit(locator)).await {
        Ok(report) => json_response(StatusCode::OK, &report),
        Err(response) => response,
    }
}

async fn get_clusters(
    State(session): State<SharedSession>,
    Query(query): Query<ClustersQuery>,
) -> Response {
    let algorithm = match query.algorithm.as_deref().map(str::parse::<Algorithm>) {
        None => None,
        Some(Ok(algorithm)) => Some(algorithm),
        Some(Err(message)) => return error_response("invalid_algorithm", message),
    };

    match with_session(session, move |s| s.clusters(algorithm)).await {
        Ok(scene) => json_response(StatusCode::OK, &scene),
        Err(response) => response,
    }
}

/// Never waits on the session: while a submission holds the lock the
/// server reports `busy` without a store size.
async fn health(State(session): State<SharedSession>) -> Response {
    let body = match session.try_lock() {
        Ok(guard) => json!({ "status": "ok", "store_size": guard.store().size() }),
        Err(TryLockError::WouldBlock) => json!({ "status": "busy", "store_size": null }),
        Err(TryLockError::Poisoned(_)) => {
            return error_response("internal", "session lock poisoned".to_string())
        }
    };
    json_response(StatusCode::OK, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_statuses() {
        assert_eq!(status_for_kind("input"), StatusCode::BAD_REQUEST);
        assert_eq!(status_for_kind("unknown_category"), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for_kind("insufficient_data"),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for_kind("model_input"), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_for_kind("projection"),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
