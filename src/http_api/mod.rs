use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    ExportFormat, LoadState, Refusal, RoutineData, RoutineEdit, RoutineError, RoutineOptions,
    RoutineSession,
};

#[derive(Clone)]
pub struct AppState {
    session: Arc<RwLock<RoutineSession>>,
}

impl AppState {
    pub fn new(session: RoutineSession) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }

    pub fn with_shared(session: Arc<RwLock<RoutineSession>>) -> Self {
        Self { session }
    }

    fn session(&self) -> Arc<RwLock<RoutineSession>> {
        self.session.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Forbidden(String),
    Invalid(String),
}

impl From<Refusal> for ApiError {
    fn from(value: Refusal) -> Self {
        match value {
            Refusal::ReadOnly => ApiError::Forbidden(value.to_string()),
            Refusal::Rejected(
                RoutineError::DateOutOfRange { .. } | RoutineError::ClassOutOfRange { .. },
            ) => ApiError::NotFound(value.to_string()),
            Refusal::Rejected(RoutineError::Shape(_)) => ApiError::Invalid(value.to_string()),
            Refusal::Loading | Refusal::NotEditing | Refusal::Rejected(_) => {
                ApiError::Conflict(value.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, "forbidden", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct RoutineView {
    title: String,
    load_state: LoadState,
    routine: RoutineData,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/options", get(get_options))
        .route("/routine", get(get_routine))
        .route("/routine/edit", put(apply_edit))
        .route("/routine/classes", post(add_class))
        .route("/routine/classes/:row", delete(delete_class))
        .route("/routine/dates", post(add_date))
        .route("/routine/dates/:col", delete(delete_date))
        .route("/routine/export/:format", get(export_routine))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, session: RoutineSession) -> std::io::Result<()> {
    let state = AppState::new(session);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "routine HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_options(State(state): State<AppState>) -> Json<RoutineOptions> {
    let session = state.session();
    let options = session.read().options().clone();
    Json(options)
}

async fn get_routine(State(state): State<AppState>) -> Json<RoutineView> {
    let session = state.session();
    let guard = session.read();
    Json(RoutineView {
        title: guard.title().to_string(),
        load_state: guard.load_state(),
        routine: guard.snapshot().clone(),
    })
}

fn apply_and_snapshot(state: &AppState, edit: RoutineEdit) -> Result<RoutineData, ApiError> {
    let session = state.session();
    let mut guard = session.write();
    guard.apply(edit)?;
    Ok(guard.snapshot().clone())
}

async fn apply_edit(
    State(state): State<AppState>,
    Json(edit): Json<RoutineEdit>,
) -> Result<Json<RoutineData>, ApiError> {
    apply_and_snapshot(&state, edit).map(Json)
}

async fn add_class(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RoutineData>), ApiError> {
    let routine = apply_and_snapshot(&state, RoutineEdit::AddClass)?;
    Ok((StatusCode::CREATED, Json(routine)))
}

async fn add_date(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RoutineData>), ApiError> {
    let routine = apply_and_snapshot(&state, RoutineEdit::AddDate)?;
    Ok((StatusCode::CREATED, Json(routine)))
}

async fn delete_class(
    State(state): State<AppState>,
    Path(row): Path<usize>,
) -> Result<Json<RoutineData>, ApiError> {
    apply_and_snapshot(&state, RoutineEdit::DeleteClass { row }).map(Json)
}

async fn delete_date(
    State(state): State<AppState>,
    Path(col): Path<usize>,
) -> Result<Json<RoutineData>, ApiError> {
    apply_and_snapshot(&state, RoutineEdit::DeleteDate { col }).map(Json)
}

async fn export_routine(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> Result<Response, ApiError> {
    let format = format
        .parse::<ExportFormat>()
        .map_err(|err| ApiError::Invalid(err.to_string()))?;
    let payload = {
        let session = state.session();
        let guard = session.read();
        guard.export(format)
    };
    let disposition = format!("attachment; filename=\"{}\"", payload.filename);
    Ok((
        [
            (header::CONTENT_TYPE, payload.mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        payload.content,
    )
        .into_response())
}
