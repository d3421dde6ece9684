//! Network module with deferred startup lifecycle.
//!
//! `new()` assembles shared state, `start()` binds the TCP listener and
//! `serve()` accepts connections until shutdown. Binding before serving lets
//! callers learn the OS-assigned port first.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::{NetworkConfig, TlsConfig};
use super::handlers::{
    events_handler, health_handler, index_handler, liveness_handler, readiness_handler, AppState,
};
use super::middleware::build_http_layers;
use super::shutdown::ShutdownController;
use crate::service::{build_dispatch_pipeline, Dispatcher, EndpointConfig, EventRegistry};

/// Owns the HTTP server lifecycle for the event endpoint.
pub struct NetworkModule {
    config: NetworkConfig,
    endpoint: EndpointConfig,
    registry: Arc<EventRegistry>,
    listener: Option<TcpListener>,
    shutdown: Arc<ShutdownController>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, endpoint: EndpointConfig, registry: Arc<EventRegistry>) -> Self {
        Self {
            config,
            endpoint,
            registry,
            listener: None,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// Shared controller, for health checks or to trigger shutdown from elsewhere.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Port the listener is bound to, or the configured one before `start()`.
    fn port(&self) -> u16 {
        self.listener
            .as_ref()
            .and_then(|listener| listener.local_addr().ok())
            .map_or(self.config.port, |addr| addr.port())
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes, with `<root>` the configured URL name:
    /// - `GET /health`, `GET /health/live`, `GET /health/ready`
    /// - `GET /<root>` and `GET /<root>/`: the event documentation page
    /// - `POST /<root>/` and `POST /<root>/<anything>`: event dispatch
    pub fn build_router(&self) -> Router {
        let dispatcher = Dispatcher::new(Arc::clone(&self.registry), &self.endpoint.url_name);
        let state = AppState {
            dispatcher: build_dispatch_pipeline(dispatcher),
            registry: Arc::clone(&self.registry),
            root_url: self
                .endpoint
                .root_url_or(&self.config.host, self.port())
                .into(),
            endpoint: Arc::new(self.endpoint.clone()),
            shutdown: Arc::clone(&self.shutdown),
            start_time: Instant::now(),
        };

        let root = format!("/{}", self.endpoint.url_name);

        Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .route(&root, get(index_handler))
            .route(&format!("{root}/"), get(index_handler).post(events_handler))
            .route(&format!("{root}/{{*event}}"), post(events_handler))
            .layer(build_http_layers(&self.config))
            .with_state(state)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the bound port, which differs from the configured one when
    /// port 0 asks for an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!(host = %self.config.host, port, "TCP listener bound");

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves or the controller is triggered.
    ///
    /// After the signal the health state moves to `Draining`, then waits up
    /// to `drain_timeout` for in-flight event requests before `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first, if the TLS
    /// material cannot be loaded, or on a fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .take()
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;
        let shutdown_ctrl = self.shutdown;
        let config = self.config;

        let signal = {
            let ctrl = Arc::clone(&shutdown_ctrl);
            async move {
                tokio::select! {
                    () = shutdown => {}
                    () = ctrl.shutdown_requested() => {}
                }
            }
        };

        shutdown_ctrl.set_ready();
        info!(url_name = %self.endpoint.url_name, "accepting team events");

        if let Some(ref tls) = config.tls {
            serve_tls(listener, router, tls, signal).await?;
        } else {
            serve_plain(listener, router, signal).await?;
        }

        drain(&shutdown_ctrl, config.drain_timeout).await;
        Ok(())
    }
}

async fn serve_plain(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("Serving plain HTTP connections");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Serves HTTPS through `axum-server`, reusing the already bound listener.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls: &TlsConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {e}"))?;

    let addr = listener.local_addr()?;
    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown.await;
        shutdown_handle.graceful_shutdown(None);
    });

    info!("Serving TLS connections on {}", addr);

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}

/// Moves to `Draining` and waits for in-flight event requests.
async fn drain(shutdown_ctrl: &ShutdownController, timeout: Duration) {
    shutdown_ctrl.trigger_shutdown();

    let in_flight = shutdown_ctrl.in_flight_count();
    if in_flight > 0 {
        info!(in_flight, "Draining in-flight event requests");
    }

    if shutdown_ctrl.wait_for_drain(timeout).await {
        info!("Shutdown complete");
    } else {
        warn!(
            in_flight = shutdown_ctrl.in_flight_count(),
            "Drain timeout expired with in-flight requests remaining"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HealthState;

    fn module() -> NetworkModule {
        NetworkModule::new(
            NetworkConfig {
                host: "127.0.0.1".to_string(),
                ..NetworkConfig::default()
            },
            EndpointConfig::default(),
            Arc::new(EventRegistry::builder().build()),
        )
    }

    #[test]
    fn new_creates_module_without_binding() {
        let module = module();
        assert!(module.listener.is_none());
        assert_eq!(module.port(), 0);
    }

    #[test]
    fn shutdown_controller_returns_shared_arc() {
        let module = module();
        assert!(Arc::ptr_eq(
            &module.shutdown_controller(),
            &module.shutdown_controller()
        ));
    }

    #[tokio::test]
    async fn start_binds_to_os_assigned_port() {
        let mut module = module();
        let port = module.start().await.unwrap();
        assert!(port > 0);
        assert_eq!(module.port(), port);
    }

    #[tokio::test]
    async fn serve_without_start_is_an_error() {
        let err = module()
            .serve(std::future::pending::<()>())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("start() must be called"));
    }

    #[tokio::test]
    async fn controller_trigger_stops_server() {
        let mut module = module();
        module.start().await.unwrap();
        let ctrl = module.shutdown_controller();

        let server = tokio::spawn(module.serve(std::future::pending::<()>()));
        while ctrl.health_state() != HealthState::Ready {
            tokio::task::yield_now().await;
        }
        ctrl.trigger_shutdown();

        server.await.unwrap().unwrap();
        assert_eq!(ctrl.health_state(), HealthState::Stopped);
    }
}
