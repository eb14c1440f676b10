//! HTTP server exposing the command endpoint
//!
//! Each request is handled on its own task, so a long-running child only
//! holds up the request that started it.

mod handlers;

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::host::CommandRunner;

/// Shared handler state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub runner: CommandRunner,
}

/// The listener could not be bound
#[derive(Debug, Error)]
#[error("Failed to bind {addr}: {source}")]
pub struct BindError {
    pub addr: SocketAddr,
    #[source]
    pub source: io::Error,
}

/// Build the router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/execute/", post(handlers::execute))
        .route("/execute", post(handlers::execute))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
        .layer(middleware::from_fn(log_request))
}

/// Log method, path and status of every request, rejections included
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    tracing::info!("{} {} {}", method, path, response.status().as_u16());

    response
}

/// A bound, not yet serving, HTTP server
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Bind the listener described by `config`
    pub async fn bind(config: &ServerConfig) -> Result<Self, BindError> {
        let listener = TcpListener::bind(config.bind)
            .await
            .map_err(|source| BindError {
                addr: config.bind,
                source,
            })?;
        Ok(Self {
            listener,
            router: router(AppState::default()),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` resolves, letting in-flight requests finish
    pub async fn run<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Listening on {}", self.local_addr()?);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server");
}
