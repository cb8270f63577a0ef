pub mod http;

use crate::domain::error::Result;
use async_trait::async_trait;

pub use http::HttpPortalFetcher;

/// Fetches a court-portal page and returns its body text.
#[async_trait]
pub trait PortalFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Serves an empty portal shell without touching the network.
pub struct OfflinePortalFetcher;

const OFFLINE_PAGE: &str =
    "<html><head><title>Offline portal</title></head><body></body></html>";

#[async_trait]
impl PortalFetcher for OfflinePortalFetcher {
    async fn fetch(&self, _url: &str) -> Result<String> {
        Ok(OFFLINE_PAGE.to_string())
    }
}
