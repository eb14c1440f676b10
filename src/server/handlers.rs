//! Route handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::api::{CommandRequest, ExecuteResponse, HealthResponse};
use crate::error::ServiceError;

/// `POST /execute/`: run the command and return stdout or stderr
pub async fn execute(
    State(state): State<AppState>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<ExecuteResponse>, ServiceError> {
    let Json(request) = payload?;

    let result = state.runner.run(&request.command).await?;
    tracing::debug!("Command exited with {:?}", result.exit_code);

    Ok(Json(result.into_response()))
}

/// `GET /healthz`
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
