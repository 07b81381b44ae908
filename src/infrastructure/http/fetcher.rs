use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::domain::error::{AppError, Result};
use crate::domain::source::IngestionConfig;

/// Downloaded body plus the bits of the response format resolution needs
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedResource {
    pub url: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Blocking download of a remote resource.
pub trait ResourceFetcher: Send + Sync {
    /// Transport failures and non-2xx statuses are `AppError::Network`.
    fn fetch(&self, url: &str) -> Result<FetchedResource>;
}

/// `reqwest` blocking fetcher.
///
/// The client is built per request so that it is created and dropped on
/// the calling (blocking) thread, never inside an async executor.
pub struct HttpFetcher {
    timeout: Duration,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(config: &IngestionConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }

    fn client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedResource> {
        info!(url, "downloading source");

        let response = self
            .client()?
            .get(url)
            .send()
            .map_err(|e| AppError::Network(format!("Failed to fetch URL {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!("HTTP error {}: {}", status, url)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?
            .to_vec();

        debug!(url, bytes = bytes.len(), content_type = ?content_type, "download complete");

        Ok(FetchedResource {
            url: url.to_string(),
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_host_is_network_error() {
        let config = IngestionConfig {
            fetch_timeout_secs: 2,
            ..Default::default()
        };
        let fetcher = HttpFetcher::new(&config);

        // Port 9 on localhost (discard) is closed on test machines
        let err = fetcher.fetch("http://127.0.0.1:9/data.csv").unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }

    #[test]
    fn test_invalid_url_is_network_error() {
        let fetcher = HttpFetcher::new(&IngestionConfig::default());
        let err = fetcher.fetch("not a url").unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }
}
