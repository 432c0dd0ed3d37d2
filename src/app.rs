use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter};

use crate::application::{ActionService, Datasets};
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::storage::ActionStore;
use crate::interfaces::http::{start_server, HttpState};

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Before config load so config errors are logged too. RUST_LOG wins over
    // the configured filter.
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let initial = EnvFilter::new(rust_log.as_deref().unwrap_or("info"));
    let (filter_layer, filter_handle) = reload::Layer::new(initial);
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer())
        .try_init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    if rust_log.is_none() {
        if let Err(e) = filter_handle.reload(EnvFilter::new(&config.log_filter)) {
            error!(error = %e, "Failed to apply log_filter");
        }
    }

    info!(
        data_dir = %config.data_dir.display(),
        subject = %config.subject_municipality,
        "Starting housing site API"
    );

    let datasets = Datasets::load(&config);
    let actions = ActionService::new(ActionStore::new(config.action_data_path.clone()));

    let state = HttpState {
        datasets: Arc::new(datasets),
        actions: Arc::new(actions),
    };

    start_server(state, &config.host, config.port)?.await
}

/// Load and validate the configuration
fn load_config() -> Result<AppConfig> {
    let config = AppConfig::load()?;
    config.validate()?;
    Ok(config)
}
