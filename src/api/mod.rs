pub mod auth;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod security;


use crate::address::AddressRepository;
use crate::config::Config;
use std::net::SocketAddr;
use std::sync::Arc;

/// State shared by every handler and by the bearer-token gate.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AddressRepository>,
    pub api_token: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn AddressRepository>, api_token: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            api_token: api_token.into(),
        }
    }
}

pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    pub fn new(store: Arc<dyn AddressRepository>, config: &Config) -> Self {
        Self {
            state: AppState::new(store, config.api_token.as_str()),
        }
    }

    /// Binds the server to the configured port and serves until Ctrl+C or SIGTERM.
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        let app = router::build(self.state, config.environment);
        let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));

        tracing::info!("API server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
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
                tracing::error!("failed to listen for SIGTERM: {e}");
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

    tracing::info!("Shutting down...");
}
