//! Request and response bodies of the HTTP API
//!
//! * `POST /execute/` takes a [`CommandRequest`] and answers with an [`ExecuteResponse`].
//! * `GET /healthz` answers with a [`HealthResponse`].

use serde::{Deserialize, Serialize};

/// Body of `POST /execute/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Whitespace-separated executable and arguments
    pub command: String,
}

/// Outcome of a command that ran to completion.
///
/// Serializes as `{"output": ...}` or `{"error": ...}`, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteResponse {
    /// Captured stdout of a process that exited with code 0
    Output(String),
    /// Captured stderr of a process that exited nonzero
    Error(String),
}

/// Body returned when a request is rejected before anything runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub detail: String,
}

/// Body of `GET /healthz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server is accepting requests
    pub status: String,
    /// Crate version of the running binary
    pub version: String,
}

impl HealthResponse {
    /// Healthy status tagged with the current version
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
