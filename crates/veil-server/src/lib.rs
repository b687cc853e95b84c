//! Veil Server - HTTP submission API.
//!
//! Validates incoming whispers and tributes, runs them through the
//! moderator, persists the outcome, and alerts the operators in the
//! background.
//!
//! ## Endpoints
//!
//! - `POST /api/whispers` - Submit a whisper
//! - `POST /api/tributes` - Submit a memorial tribute
//! - `GET /api/resources` - Crisis support resources
//! - `GET /api/health` - Liveness check
//!
//! ## Example
//!
//! ```no_run
//! use veil_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::new(ServerConfig::default()).await.unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod error;
mod handlers;
pub mod mailer;
pub mod models;
pub mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use veil_storage::Database;

pub use error::{ApiError, Result};
pub use mailer::{AlertSender, HttpMailer, LogMailer, MailError, MailerConfig};
pub use state::AppState;

/// Default server port.
pub const DEFAULT_PORT: u16 = 8787;

/// Default server host (localhost only; put a reverse proxy in front).
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1).
    pub host: String,
    /// Port to bind to (default: 8787).
    pub port: u16,
    /// Database path (None = in-memory).
    pub db_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: None,
        }
    }
}

impl ServerConfig {
    /// Creates a config with a specific database path.
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("failed to bind to {0}: {1}")]
    BindError(SocketAddr, std::io::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] veil_storage::StorageError),

    /// Server runtime error.
    #[error("server error: {0}")]
    Runtime(String),
}

/// Builds the API router over `state`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/whispers",
            post(handlers::submit_whisper)
                .options(handlers::options_ok)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/tributes",
            post(handlers::submit_tribute)
                .options(handlers::options_ok)
                .fallback(handlers::method_not_allowed),
        )
        .route("/api/resources", get(handlers::get_resources))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// The HTTP API server.
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Creates a new server with the given configuration.
    pub async fn new(config: ServerConfig) -> std::result::Result<Self, ServerError> {
        let db = if let Some(ref path) = config.db_path {
            Database::with_path(path)?
        } else {
            Database::in_memory()?
        };

        Self::with_state(config, AppState::new(db))
    }

    /// Creates a server with custom application state.
    pub fn with_state(
        config: ServerConfig,
        state: AppState,
    ) -> std::result::Result<Self, ServerError> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| ServerError::Runtime(format!("invalid address: {}", e)))?;

        Ok(Self {
            router: router(state),
            addr,
        })
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Runs the server until shutdown.
    pub async fn run(self) -> std::result::Result<(), ServerError> {
        info!("Starting Veil API server on {}", self.addr);

        let domain = if self.addr.is_ipv6() {
            Domain::IPV6
        } else {
            Domain::IPV4
        };
        let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        // Allow rebinding while old sockets linger in TIME_WAIT
        socket
            .set_reuse_address(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        socket
            .bind(&self.addr.into())
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .listen(128)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        // Set non-blocking for tokio
        socket
            .set_nonblocking(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        let std_listener: std::net::TcpListener = socket.into();
        let listener = tokio::net::TcpListener::from_std(std_listener)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        axum::serve(listener, self.router)
            .await
            .map_err(|e| ServerError::Runtime(e.to_string()))?;

        Ok(())
    }

    /// Returns the router for testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
