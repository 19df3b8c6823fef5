use std::time::Duration;

use congress_client::transport::API_BASE_URL;

use crate::error::{IngestError, Result};

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| IngestError::Config("DATABASE_URL not set".into()))?;

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            database_url,
            max_connections,
        })
    }

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 5,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

/// Congress.gov API settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub rate_limit: Duration,
    pub page_size: u32,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CONGRESS_API_KEY")
            .map_err(|_| IngestError::Config("CONGRESS_API_KEY not set".into()))?;

        let base_url =
            std::env::var("CONGRESS_API_BASE_URL").unwrap_or_else(|_| API_BASE_URL.to_string());

        let rate_limit_ms: u64 = std::env::var("CONGRESS_RATE_LIMIT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(750);

        let page_size: u32 = std::env::var("CONGRESS_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(congress_client::page::DEFAULT_PAGE_SIZE);

        Ok(Self {
            api_key,
            base_url,
            rate_limit: Duration::from_millis(rate_limit_ms),
            page_size,
        })
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: API_BASE_URL.to_string(),
            rate_limit: Duration::from_millis(750),
            page_size: congress_client::page::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_config_builder() {
        let config = IngestConfig::new("postgres://localhost/congress").with_max_connections(10);
        assert_eq!(config.database_url, "postgres://localhost/congress");
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::new("key");
        assert_eq!(config.base_url, API_BASE_URL);
        assert_eq!(config.rate_limit, Duration::from_millis(750));
        assert_eq!(config.page_size, 250);
    }
}
