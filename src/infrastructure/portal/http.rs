use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::PortalFetcher;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::PortalConfig;

/// One reqwest client shared by every portal request.
pub struct HttpPortalFetcher {
    client: Client,
}

impl HttpPortalFetcher {
    pub fn new(config: &PortalConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PortalFetcher for HttpPortalFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url = %url, "Fetching portal page");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::PortalError(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Portal answered with a non-success status");
        }

        response
            .text()
            .await
            .map_err(|e| AppError::PortalError(format!("Failed to read response body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpResponse, HttpServer};

    async fn start_portal() -> String {
        let server = HttpServer::new(|| {
            App::new()
                .route(
                    "/main.php",
                    web::get().to(|| async {
                        HttpResponse::Ok().body("<html><head><title>eCourts</title></head></html>")
                    }),
                )
                .route(
                    "/blocked",
                    web::get().to(|| async {
                        HttpResponse::Forbidden().body("<html><head><title>Access Denied</title></head></html>")
                    }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        tokio::spawn(server.run());
        format!("http://{}", addr)
    }

    #[actix_web::test]
    async fn test_fetch_returns_body() {
        let base = start_portal().await;
        let fetcher = HttpPortalFetcher::new(&PortalConfig::default()).unwrap();

        let body = fetcher.fetch(&format!("{}/main.php", base)).await.unwrap();
        assert!(body.contains("eCourts"));
    }

    #[actix_web::test]
    async fn test_fetch_non_success_still_returns_body() {
        let base = start_portal().await;
        let fetcher = HttpPortalFetcher::new(&PortalConfig::default()).unwrap();

        let body = fetcher.fetch(&format!("{}/blocked", base)).await.unwrap();
        assert!(body.contains("Access Denied"));
    }

    #[actix_web::test]
    async fn test_fetch_unreachable_is_portal_error() {
        let fetcher = HttpPortalFetcher::new(&PortalConfig::default()).unwrap();

        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let url = format!("http://{}/", addr);

        let result = fetcher.fetch(&url).await;
        assert!(matches!(result, Err(AppError::PortalError(msg)) if msg.starts_with("Failed to fetch")));
    }
}
