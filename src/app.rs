use std::sync::{Arc, Mutex};

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::domain::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{add_log, start_server};

pub async fn run() -> Result<()> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.filter.as_str()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let logs = Arc::new(Mutex::new(Vec::new()));
    let state = bootstrap::setup(&config, logs.clone()).await?;

    let server = start_server(state, &config.server.host, config.server.port)?;
    add_log(
        &logs,
        "INFO",
        "HttpApi",
        &format!(
            "Listening on http://{}:{}",
            config.server.host, config.server.port
        ),
    );

    server.await?;
    info!("Server stopped");
    Ok(())
}
