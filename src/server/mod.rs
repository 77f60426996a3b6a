//! HTTP surface of the gateway.
//!
//! | Method | Path          | Behaviour                                      |
//! |--------|---------------|------------------------------------------------|
//! | GET    | `/`           | 301 redirect to `/ui/`                         |
//! | GET    | `/ping`       | `{"message":"pong"}`, no engine call           |
//! | GET    | `/containers` | every container, including stopped ones        |
//! | POST   | `/pull`       | pull `{"image": ...}` and wait for completion  |
//! | POST   | `/run`        | create and start `{"image": ...}`              |
//! | GET    | `/ui/*`       | static files from the configured directory     |
//!
//! Malformed bodies receive 400 `{"error":"Invalid request"}`; engine
//! failures receive 500 with the engine's message in `error`.

mod handlers;
mod response;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use camino::Utf8Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::engine::{ConnectEngine, EngineConnector, EngineSettings};
use crate::error::{Result, ServerError};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct GatewayState {
    connector: Arc<dyn ConnectEngine>,
}

impl GatewayState {
    /// Wrap the connector used to open engine clients.
    #[must_use]
    pub const fn new(connector: Arc<dyn ConnectEngine>) -> Self {
        Self { connector }
    }

    /// Return the connector.
    #[must_use]
    pub fn connector(&self) -> &dyn ConnectEngine {
        self.connector.as_ref()
    }
}

/// Build the gateway router.
///
/// Static assets under `static_dir` are served at `/ui/`; a missing file
/// yields 404.
#[must_use]
pub fn router(state: GatewayState, static_dir: &Utf8Path) -> Router {
    Router::new()
        .route("/", get(handlers::redirect_to_ui))
        .route("/ping", get(handlers::ping))
        .route("/containers", get(handlers::list_containers))
        .route("/pull", post(handlers::pull_image))
        .route("/run", post(handlers::run_container))
        .nest_service("/ui", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until a shutdown signal arrives.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for an unparseable listen address,
/// `ServerError::BindFailed` when the address cannot be bound, and
/// `ServerError::ServeFailed` if the server stops with an I/O error.
pub async fn serve(config: &ServerConfig, settings: EngineSettings) -> Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::BindFailed {
            addr: addr.to_string(),
            message: e.to_string(),
        })?;

    info!(
        %addr,
        engine = %settings.endpoint(),
        static_dir = %config.static_dir,
        "podgate listening"
    );

    let state = GatewayState::new(Arc::new(EngineConnector::new(settings)));
    let app = router(state, &config.static_dir);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::ServeFailed {
            message: e.to_string(),
        })?;

    info!("podgate stopped");
    Ok(())
}

/// Resolve once Ctrl-C or, on Unix, SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                if sigterm.recv().await.is_none() {
                    std::future::pending::<()>().await;
                }
            }
            Err(error) => {
                warn!(%error, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received; draining in-flight requests");
}
