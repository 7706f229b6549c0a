//! API Gateway service - HTTP server lifecycle.

use axum::Router;
use rewards_core::{IdentityProvider, RewardsApi, RewardsService, StaticTokenIdentity};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::middleware::create_cors_layer;
use crate::routes::{self, AppState};

/// Rewards API Gateway
pub struct RewardsGateway {
    config: GatewayConfig,
    state: AppState,
}

impl RewardsGateway {
    /// Create a gateway over explicit ports.
    pub fn new(
        config: GatewayConfig,
        rewards: Arc<dyn RewardsApi>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self {
            config,
            state: AppState { rewards, identity },
        })
    }

    /// Create a gateway with the in-memory store and the configured static
    /// tokens.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        let rewards = RewardsService::in_memory(config.rewards.clone());
        let identity: StaticTokenIdentity = config
            .auth
            .tokens
            .iter()
            .map(|grant| (grant.token.clone(), grant.principal()))
            .collect();
        if identity.is_empty() {
            info!("no auth tokens configured, protected routes will answer 401");
        }
        Self::new(config, Arc::new(rewards), Arc::new(identity))
    }

    /// Active configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Router with CORS and request tracing applied.
    pub fn router(&self) -> Router {
        routes::router(self.state.clone())
            .layer(create_cors_layer(&self.config.cors))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn serve(self) -> Result<(), GatewayError> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown(
        self,
        signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;
        info!(%addr, "Starting HTTP server");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await
            .map_err(GatewayError::Serve)?;

        info!("API Gateway stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{AuthConfig, HttpConfig};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_invalid_config_rejected() {
        let config = GatewayConfig {
            http: HttpConfig {
                port: 0,
                ..HttpConfig::default()
            },
            ..GatewayConfig::default()
        };
        assert!(matches!(
            RewardsGateway::from_config(config),
            Err(GatewayError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        // Reserve a free port, then hand it to the gateway.
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let config = GatewayConfig {
            http: HttpConfig {
                host: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port,
            },
            auth: AuthConfig::parse("t:alice").unwrap(),
            ..GatewayConfig::default()
        };
        let gateway = RewardsGateway::from_config(config).unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(gateway.serve_with_shutdown(async {
            let _ = rx.await;
        }));

        let mut connected = false;
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
                connected = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(connected);

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
