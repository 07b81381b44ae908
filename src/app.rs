use std::sync::Arc;

use actix_web::web;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::application::SourceResolver;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http::HttpFetcher;
use crate::interfaces::http::{start_server, HttpState};

pub fn run() -> std::io::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = AppConfig::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let fetcher = Arc::new(HttpFetcher::new(&config.ingestion));
    let resolver = Arc::new(SourceResolver::new(config.ingestion.clone(), fetcher));
    let state = web::Data::new(HttpState::new(resolver));

    info!(host = %config.host, port = config.port, "starting tablescout API");

    actix_web::rt::System::new().block_on(async move {
        start_server(state, &config.host, config.port)?.await
    })
}
