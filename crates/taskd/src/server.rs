//! HTTP gateway for the task store.
//!
//! Translates requests into validated store operations and maps typed store
//! outcomes back to status codes. Every non-2xx response carries a JSON
//! error body with the message and the time of failure.

use anyhow::Result;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::store::TaskStore;
use crate::task::Task;

/// Build the HTTP router.
pub fn build_router(store: Arc<TaskStore>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{title}",
            get(get_task_handler)
                .patch(update_task_handler)
                .delete(delete_task_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Start the HTTP server.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails while
/// serving.
pub async fn run_server(store: Arc<TaskStore>, addr: &str) -> Result<()> {
    let app = build_router(store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Task server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Body of `POST /tasks`.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl CreateTaskRequest {
    /// Check that both fields are present and non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        Ok(())
    }
}

/// Body of `PATCH /tasks/{title}`.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub complete: bool,
}

/// Query parameters of `GET /tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// `completed=true` narrows the listing to still-open tasks
    pub completed: Option<bool>,
}

/// Rejected request input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task title is required")]
    MissingTitle,
    #[error("task description is required")]
    MissingDescription,
}

/// Error body attached to every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub time: DateTime<Utc>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        message: message.into(),
        time: Utc::now(),
    };
    (status, Json(body)).into_response()
}

fn store_error_response(err: &StoreError) -> Response {
    let status = match err {
        StoreError::AlreadyExists { .. } => StatusCode::CONFLICT,
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
    };
    error_response(status, err.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /tasks` — create a task.
async fn create_task_handler(
    State(store): State<Arc<TaskStore>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected create request: {rejection}");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    if let Err(err) = request.validate() {
        warn!("Rejected create request: {err}");
        return error_response(StatusCode::BAD_REQUEST, err.to_string());
    }

    let task = Task::new(request.title, request.description);
    match store.add(task.clone()).await {
        Ok(()) => {
            info!("Created task '{}'", task.title);
            (StatusCode::CREATED, Json(task)).into_response()
        }
        Err(err) => {
            warn!("Failed to create task '{}': {err}", task.title);
            store_error_response(&err)
        }
    }
}

/// `GET /tasks/{title}` — fetch a single task.
async fn get_task_handler(
    State(store): State<Arc<TaskStore>>,
    Path(title): Path<String>,
) -> Response {
    match store.get(&title).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

/// `GET /tasks` — list every task, or only the still-open ones when the
/// request asks to filter by completion.
async fn list_tasks_handler(
    State(store): State<Arc<TaskStore>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            warn!("Rejected list request: {rejection}");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let tasks = if params.completed == Some(true) {
        store.list_incomplete().await
    } else {
        store.list_all().await
    };

    (StatusCode::OK, Json(tasks)).into_response()
}

/// `PATCH /tasks/{title}` — complete or uncomplete a task.
async fn update_task_handler(
    State(store): State<Arc<TaskStore>>,
    Path(title): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected update request: {rejection}");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let result = if request.complete {
        store.complete(&title).await
    } else {
        store.uncomplete(&title).await
    };

    match result {
        Ok(task) => {
            info!(
                "Task '{title}' marked {}",
                if task.completed { "complete" } else { "incomplete" }
            );
            (StatusCode::OK, Json(task)).into_response()
        }
        Err(err) => {
            warn!("Failed to update task '{title}': {err}");
            store_error_response(&err)
        }
    }
}

/// `DELETE /tasks/{title}` — remove a task.
async fn delete_task_handler(
    State(store): State<Arc<TaskStore>>,
    Path(title): Path<String>,
) -> Response {
    match store.delete(&title).await {
        Ok(()) => {
            info!("Deleted task '{title}'");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => {
            warn!("Failed to delete task '{title}': {err}");
            store_error_response(&err)
        }
    }
}
