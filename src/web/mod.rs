//! Web layer
//!
//! HTTP adapter over the icon resolution service. Handlers stay thin: the
//! router maps paths onto one [`IconResolver`](crate::services::IconResolver)
//! instance constructed at startup with its collaborators injected, which
//! is also what lets the integration tests drive the real router with a
//! fake fetcher.

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, services::IconResolver};

pub mod handlers;

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config, resolver: IconResolver) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = Self::create_router(AppState { config, resolver });

        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/health", get(handlers::health))
            .route("/api/:domain/32.png", get(handlers::icon))
            // Middleware (applied in reverse order)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            // Shared state
            .with_state(state)
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub resolver: IconResolver,
}
