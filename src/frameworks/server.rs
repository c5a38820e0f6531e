// Framework bootstrap for the guest gateway.

use crate::domain::GuestStore;
use crate::frameworks::config::{self, ConfigError};
use crate::interface_adapters::clients::{ClientError, CloudantClient};
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{BootstrapError, EnsureCollectionUseCase};
use std::net::SocketAddr;
use std::{fmt, io, sync::Arc};

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Any of these stops the process before the listener is bound.
#[derive(Debug)]
pub enum StartupError {
    Config(ConfigError),
    Client(ClientError),
    Bootstrap(BootstrapError),
    Io(io::Error),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Config(err) => write!(f, "configuration error: {err}"),
            StartupError::Client(err) => write!(f, "store client error: {err}"),
            StartupError::Bootstrap(err) => write!(f, "{err}"),
            StartupError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for StartupError {}

impl From<ConfigError> for StartupError {
    fn from(err: ConfigError) -> Self {
        StartupError::Config(err)
    }
}

impl From<ClientError> for StartupError {
    fn from(err: ClientError) -> Self {
        StartupError::Client(err)
    }
}

impl From<BootstrapError> for StartupError {
    fn from(err: BootstrapError) -> Self {
        StartupError::Bootstrap(err)
    }
}

impl From<io::Error> for StartupError {
    fn from(err: io::Error) -> Self {
        StartupError::Io(err)
    }
}

// Make sure the collection exists, then hand back the request-handler state.
pub async fn bootstrap(
    store: Arc<dyn GuestStore>,
    collection: &str,
) -> Result<Arc<AppState>, BootstrapError> {
    EnsureCollectionUseCase {
        store: store.as_ref(),
    }
    .execute(collection)
    .await?;

    Ok(Arc::new(AppState::new(store, collection)))
}

pub async fn run(listener: tokio::net::TcpListener, state: Arc<AppState>) -> io::Result<()> {
    let address = listener.local_addr()?;
    let app = routes::app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

// Credentials, store client and collection bootstrap, in that order. Nothing
// is bound here, so any failure leaves the process without a listener.
pub async fn prepare<F>(lookup: F) -> Result<Arc<AppState>, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = config::resolve_credentials(&lookup)?;
    let auth_url = config::resolve_auth_url(&lookup);
    let store = CloudantClient::new(&credentials.url, &auth_url, &credentials.apikey)?;
    tracing::debug!(
        service_url = %store.base_url(),
        auth_url = %auth_url,
        "store client configured."
    );

    Ok(bootstrap(Arc::new(store), config::COLLECTION_NAME).await?)
}

pub async fn run_with_config() -> Result<(), StartupError> {
    init_runtime();

    let state = prepare(config::env_lookup).await?;

    let address = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, state).await?;
    Ok(())
}
