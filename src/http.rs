//! REST surface over the scheduling service (feature `http`).
//!
//! | Verb | Path | Body |
//! |------|------|------|
//! | GET | `/api/schedule?startDate&endDate&customerId` | `{ "appointments": [...] }` |
//! | GET | `/api/schedule/{id}` | `{ "appointment": {...} }` |
//! | POST | `/api/schedule` | 201, `{ "appointment": {...} }` |
//! | PUT | `/api/schedule/{id}` | `{ "appointment": {...} }` |
//! | DELETE | `/api/schedule/{id}` | `{ "success": true, "message": "..." }` |
//!
//! Failures render as `{ "error": true, "message": "..." }` with 404 for
//! unknown ids, 400 for malformed payloads and 500 for store failures.

use crate::appointment::{AppointmentPatch, NewAppointment};
use crate::config::ScheduleConfig;
use crate::error::{Error, Result};
use crate::filter::AppointmentFilter;
use crate::repository::JsonFileRepository;
use crate::service::ScheduleService;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

/// Service type shared by all handlers.
pub type AppState = ScheduleService<JsonFileRepository>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::StoreCorrupt(_)
            | Error::StoreRead(_)
            | Error::StoreWrite(_)
            | Error::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            debug!("Request rejected ({}): {}", status, self);
        }

        (
            status,
            Json(json!({ "error": true, "message": self.to_string() })),
        )
            .into_response()
    }
}

/// Build the application router.
pub fn router(service: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/api/schedule",
            get(list_appointments).post(create_appointment),
        )
        .route(
            "/api/schedule/{id}",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .with_state(service)
}

/// Bind to the configured address and serve until the process exits.
///
/// # Errors
///
/// Returns `Error::ConfigError` if the address cannot be bound.
pub async fn serve(config: &ScheduleConfig) -> Result<()> {
    let service = ScheduleService::new(JsonFileRepository::new(&config.store_path));
    let app = router(service);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::ConfigError(format!("failed to bind {}: {}", addr, e)))?;

    info!(
        "Schedule server running on http://{} (store: {})",
        addr,
        config.store_path.display()
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::ConfigError(format!("server error: {}", e)))
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Schedule backend is running" }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "schedule-kit",
        "version": crate::VERSION
    }))
}

async fn list_appointments(
    State(service): State<AppState>,
    filter: std::result::Result<Query<AppointmentFilter>, QueryRejection>,
) -> Result<Json<serde_json::Value>> {
    let Query(filter) = filter.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let appointments = service.list(&filter).await?;
    Ok(Json(json!({ "appointments": appointments })))
}

async fn get_appointment(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let appointment = service.get(&id).await?;
    Ok(Json(json!({ "appointment": appointment })))
}

async fn create_appointment(
    State(service): State<AppState>,
    payload: std::result::Result<Json<NewAppointment>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let Json(input) = payload.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let appointment = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "appointment": appointment })),
    ))
}

async fn update_appointment(
    State(service): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<AppointmentPatch>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(patch) = payload.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let appointment = service.update(&id, patch).await?;
    Ok(Json(json!({ "appointment": appointment })))
}

async fn delete_appointment(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<crate::appointment::Deletion>> {
    Ok(Json(service.delete(&id).await?))
}
