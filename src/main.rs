use anyhow::Result;

mod config;
mod error;
mod logging;
mod routes;
mod services;
mod session;
pub mod models;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration, then logging filtered by it
    let config = config::load_config()?;
    logging::init_logging(&config.log_filter)?;
    config::log_config(&config);
    let addr = config.bind_addr;

    // Build our application state
    let state = std::sync::Arc::new(AppState::new(config)?);
    let app = routes::router(state);

    // Run it
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Application state
pub struct AppState {
    pub config: config::Config,
    pub http: reqwest::Client,
    pub sessions: session::SessionStore,
}

impl AppState {
    fn new(config: config::Config) -> Result<Self, error::AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;
        let sessions = session::SessionStore::new(config.session_idle);

        Ok(Self {
            config,
            http,
            sessions,
        })
    }
}
