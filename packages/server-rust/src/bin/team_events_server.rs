//! Team events server binary.
//!
//! ```text
//! team-events-server --port 8080 --jobs-file jobs.json
//! curl -X POST -d '{}' http://localhost:8080/team-events/ping
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use metrics_exporter_prometheus::PrometheusBuilder;
use team_events_server::{
    default_registry, EndpointConfig, JobCatalog, NetworkConfig, NetworkModule, TlsConfig,
};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "team-events-server")]
#[command(version, about = "Receives TFS / Team Services events and schedules builds")]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "TEAM_EVENTS_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "TEAM_EVENTS_PORT", default_value_t = 8080)]
    port: u16,

    /// Root path segment: events are posted to `/<url-name>/<eventName>`.
    #[arg(long, env = "TEAM_EVENTS_URL_NAME", default_value = "team-events")]
    url_name: String,

    /// Public base URL shown on the index page. Defaults to `http://<host>:<port>/`.
    #[arg(long, env = "TEAM_EVENTS_ROOT_URL")]
    root_url: Option<String>,

    /// JSON file listing the jobs to poll or build. Without it no job is triggered.
    #[arg(long, env = "TEAM_EVENTS_JOBS_FILE")]
    jobs_file: Option<PathBuf>,

    #[arg(long, env = "TEAM_EVENTS_LOG_FORMAT", value_enum, default_value = "pretty")]
    log_format: LogFormat,

    #[arg(long, env = "TEAM_EVENTS_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// Comma-separated allowed origins, `*` for any.
    #[arg(long, env = "TEAM_EVENTS_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    cors_origins: Vec<String>,

    /// PEM certificate; serving HTTPS requires `--tls-key` too.
    #[arg(long, env = "TEAM_EVENTS_TLS_CERT", requires = "tls_key")]
    tls_cert: Option<PathBuf>,

    #[arg(long, env = "TEAM_EVENTS_TLS_KEY", requires = "tls_cert")]
    tls_key: Option<PathBuf>,

    /// Expose Prometheus metrics on this port.
    #[arg(long, env = "TEAM_EVENTS_METRICS_PORT")]
    metrics_port: Option<u16>,
}

impl Cli {
    fn network_config(&self) -> NetworkConfig {
        let tls = match (&self.tls_cert, &self.tls_key) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path: cert_path.clone(),
                key_path: key_path.clone(),
            }),
            _ => None,
        };
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            tls,
            cors_origins: self.cors_origins.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..NetworkConfig::default()
        }
    }

    fn endpoint_config(&self) -> EndpointConfig {
        EndpointConfig {
            url_name: self.url_name.trim_matches('/').to_string(),
            root_url: self.root_url.clone(),
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C; shutting down"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Some(port) = cli.metrics_port {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("installing Prometheus exporter")?;
        info!(%addr, "Prometheus metrics exporter listening");
    }

    let catalog = match &cli.jobs_file {
        Some(path) => JobCatalog::from_file(path).await?,
        None => {
            warn!("No job file configured; events will not trigger any job");
            JobCatalog::default()
        }
    };

    let registry = Arc::new(default_registry(Arc::new(catalog)));
    let mut network = NetworkModule::new(cli.network_config(), cli.endpoint_config(), registry);
    let port = network.start().await?;
    info!(port, url_name = %cli.url_name, "team events server started");

    network.serve(shutdown_signal()).await
}
