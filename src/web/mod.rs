mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::classifier::{LlmClassifier, OrderClassifier};
use crate::config::Config;
use crate::forum::PostFetcher;

/// Shared application state.
///
/// Everything here is immutable and built once at startup; no request data
/// is kept between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: PostFetcher,
    pub classifier: Arc<dyn OrderClassifier>,
}

impl AppState {
    /// Build the state with the model-backed classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: Config) -> Result<Self> {
        let classifier =
            LlmClassifier::new(&config).context("Failed to initialize classifier")?;
        if classifier.is_enabled() {
            info!(model = %config.classifier_model, "Order classifier enabled");
        } else {
            info!("No classifier API key set, all orders will be reported as uncompleted");
        }
        Self::with_classifier(config, Arc::new(classifier))
    }

    /// Build the state around any classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the forum HTTP client cannot be built.
    pub fn with_classifier(config: Config, classifier: Arc<dyn OrderClassifier>) -> Result<Self> {
        let fetcher = PostFetcher::new(&config).context("Failed to initialize forum fetcher")?;
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            classifier,
        })
    }
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let state = AppState::from_config(config)?;
    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
