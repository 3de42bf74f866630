use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Router, middleware};
use log::{error, info, warn};
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::middleware::{add_security_headers, log_request};
use crate::server::AppState;
use crate::server::handlers::{auth, files};
use crate::session::require_login;
use crate::storage::filesystem::directory_exists;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// Build the router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    let body_limit = (state.policy.max_size_bytes() + MULTIPART_OVERHEAD) as usize;

    // Everything touching files sits behind the session gate
    let protected = Router::new()
        .route("/", get(files::index))
        .route("/logout", get(auth::logout))
        .route("/list-files", get(files::list_files))
        .route("/upload", post(files::upload))
        .route("/files/{name}", get(files::download))
        .route("/view/{name}", get(files::view))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    let public = Router::new().route("/login", get(auth::login_form).post(auth::login));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(files::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(add_security_headers))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Prepares the storage root and binds the listener.
    pub async fn new(config: &AppConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config);

        if !directory_exists(state.storage_root()) {
            warn!(
                "Storage root {} does not exist, creating it",
                state.storage_root().display()
            );
        }
        state.gateway.ensure_root()?;

        let addr = config.server.socket_addr();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            error!("Failed to bind to {}: {}", addr, e);
            e
        })?;
        info!("Server bound to {}", addr);

        if config.server.bind_address == "0.0.0.0" {
            warn!("Binding to 0.0.0.0 exposes the file vault to the network");
        }

        Ok(Self {
            listener,
            router: router(state),
        })
    }

    pub async fn start(self) -> Result<(), AppError> {
        info!("Starting file vault on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
