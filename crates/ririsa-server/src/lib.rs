#![allow(clippy::missing_errors_doc)]

//! HTTP assembly: routes, middleware, and the listener

mod auth;
mod cors;
mod health;

use std::{net::SocketAddr, sync::Arc};

use axum::{Json, Router, extract::DefaultBodyLimit, response::IntoResponse};
use http::StatusCode;
use ririsa_config::Config;
use ririsa_core::ErrorBody;
use ririsa_modes::ModeStore;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Port used when the configuration names no listen address
pub const DEFAULT_PORT: u16 = 5000;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)));

        let dispatch = ririsa_imagegen::build_dispatch(&config)?;

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app.merge(ririsa_imagegen::endpoint_router().with_state(dispatch));

        if config.modes.enabled {
            app = app.merge(ririsa_modes::router().with_state(Arc::new(ModeStore::new())));
        }

        app = app
            .fallback(not_found)
            .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
            .layer(TraceLayer::new_for_http());

        if let Some(mut auth_config) = config.server.auth.clone()
            && auth_config.enabled
        {
            let health = &config.server.health;
            if health.enabled && !auth_config.public_paths.contains(&health.path) {
                auth_config.public_paths.push(health.path.clone());
            }

            tracing::info!(keys = auth_config.keys.len(), "API key authentication enabled");
            app = app.layer(axum::middleware::from_fn(move |req, next| {
                let config = auth_config.clone();
                async move { auth::auth_middleware(config, req, next).await }
            }));
        }

        // Outermost so preflights and 401s still carry CORS headers
        if let Some(cors_config) = &config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` is cancelled
    pub async fn serve(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

async fn not_found(uri: http::Uri) -> impl IntoResponse {
    let body = ErrorBody {
        error: "NotFound".to_string(),
        status_code: StatusCode::NOT_FOUND.as_u16(),
        message: format!("no route for {}", uri.path()),
    };

    (StatusCode::NOT_FOUND, Json(body))
}
