mod health;
mod info;

use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use tactus_config::Config;
use tactus_core::{EngineState, ServiceInfo};
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let listen_address = config.server.listen_address;

        let engine = Arc::new(EngineState::new(config.engine.settings()));
        let info = ServiceInfo::new(config.service_name.as_str(), engine);

        let stt_state = stt::build_server(config, info.clone());
        let converter = convert::build_converter(config, info.clone());

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Service description
        app = app.merge(info::info_router().with_state(info));

        // Speech routes
        app = app.merge(stt::endpoint_router().with_state(stt_state));

        // Braille, sign and document routes
        app = app.merge(convert::endpoint_router().with_state(converter));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        Self {
            router: app,
            listen_address,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Replace the configured listen address
    #[must_use]
    pub const fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
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
