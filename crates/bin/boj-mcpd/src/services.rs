use boj_core::catalog::CatalogConfig;
use boj_core::fetch::{FetchClient, FetchError, FetchOptions};
use boj_core::SolvedAcClient;

use crate::config::BojConfig;

pub const fn fetch_options(config: &BojConfig) -> FetchOptions {
    FetchOptions::new()
        .with_max_retries(config.max_retries)
        .with_retry_delay(config.retry_delay)
        .with_timeout(config.timeout)
}

pub const fn catalog_config(config: &BojConfig) -> CatalogConfig {
    CatalogConfig::new()
        .with_ttl(config.tag_cache_ttl)
        .with_max_pages(config.tag_max_pages)
}

/// Builds the solved.ac client shared by every MCP session.
pub fn build_client(config: &BojConfig) -> Result<SolvedAcClient, FetchError> {
    let client = FetchClient::new(fetch_options(config))?;
    Ok(SolvedAcClient::new(
        client,
        config.api_base.clone(),
        catalog_config(config),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> BojConfig {
        BojConfig {
            handle: None,
            api_base: "http://127.0.0.1:9/api/v3".to_string(),
            max_retries: 1,
            retry_delay: Duration::from_millis(250),
            timeout: Duration::ZERO,
            tag_cache_ttl: Duration::from_secs(60),
            tag_max_pages: 2,
            enable_stdio: true,
            mcp_http_addr: None,
            log: "info".to_string(),
        }
    }

    #[test]
    fn zero_timeout_disables_enforcement() {
        let options = fetch_options(&config());
        assert_eq!(options.max_retries, 1);
        assert_eq!(options.retry_delay, Duration::from_millis(250));
        assert!(options.timeout.is_none());
    }

    #[test]
    fn catalog_settings_flow_through() {
        let catalog = catalog_config(&config());
        assert_eq!(catalog.ttl, Duration::from_secs(60));
        assert_eq!(catalog.max_pages, 2);
    }

    #[test]
    fn client_targets_configured_base() {
        let client = build_client(&config()).expect("client should build");
        assert_eq!(client.base_url(), "http://127.0.0.1:9/api/v3");
    }
}
