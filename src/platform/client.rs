//! HTTP fetch layer for pages and player scripts

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::{debug, warn};

use crate::error::SigripError;

/// Desktop browser user agent sent with page requests
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Echo service that returns the caller's public IP as plain text
const PUBLIC_IP_URL: &str = "https://api.ipify.org";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string, desktop browser by default
    pub user_agent: Option<String>,
    /// Proxy URL
    pub proxy_url: Option<String>,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: Some(DESKTOP_USER_AGENT.to_string()),
            proxy_url: None,
            accept_invalid_certs: false,
        }
    }
}

/// HTTP client that returns response bodies as text and maps authorization
/// and other non-success statuses to typed errors.
pub struct WebClient {
    client: Client,
    config: HttpClientConfig,
}

impl WebClient {
    /// Create a client with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Self {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if let Some(proxy_url) = &config.proxy_url {
            if let Ok(proxy) = reqwest::Proxy::all(proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// GET `url` and return the response body as text
    pub async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<String, SigripError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        Self::read_body(response).await
    }

    /// POST `body` to `url` and return the response body as text.
    ///
    /// A `Content-Encoding: gzip` request header makes the body be
    /// gzip-compressed before sending.
    pub async fn post(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &str,
    ) -> Result<String, SigripError> {
        debug!("POST {} ({} bytes)", url, body.len());

        let mut request = self.client.post(url);
        let mut gzip_body = false;
        for (name, value) in headers {
            if name == "Content-Encoding" && value == "gzip" {
                gzip_body = true;
            }
            request = request.header(name, value);
        }

        let request = if gzip_body {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(body.as_bytes())?;
            request.body(encoder.finish()?)
        } else {
            request.body(body.to_string())
        };

        let response = request.send().await?;
        Self::read_body(response).await
    }

    /// Public IP as reported by an external echo service.
    ///
    /// The lookup is joined with the configured timeout; failures and
    /// timeouts are reported as `None`. This is diagnostic information and
    /// never blocks extraction.
    pub async fn public_ip(&self) -> Option<String> {
        match tokio::time::timeout(self.config.timeout, self.ip_from_service(PUBLIC_IP_URL)).await
        {
            Ok(ip) => ip,
            Err(_) => {
                warn!("Public IP lookup timed out");
                None
            }
        }
    }

    async fn ip_from_service(&self, url: &str) -> Option<String> {
        match self.get(url, &HashMap::new()).await {
            Ok(body) => {
                let ip = body.trim();
                if ip.is_empty() {
                    None
                } else {
                    Some(ip.to_string())
                }
            }
            Err(e) => {
                warn!("Public IP lookup failed: {}", e);
                None
            }
        }
    }

    async fn read_body(response: reqwest::Response) -> Result<String, SigripError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let message = response.text().await.unwrap_or_default();
            return Err(SigripError::Unauthorized(message));
        }

        if !status.is_success() {
            return Err(SigripError::Http {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unrecognized status")
                    .to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

impl Default for WebClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, Some(DESKTOP_USER_AGENT.to_string()));
        assert_eq!(config.proxy_url, None);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_client_with_config() {
        let config = HttpClientConfig {
            timeout: Duration::from_secs(60),
            user_agent: Some("Custom Agent".to_string()),
            proxy_url: None,
            accept_invalid_certs: false,
        };

        let client = WebClient::with_config(config);
        assert_eq!(client.config().timeout, Duration::from_secs(60));
        assert_eq!(client.config().user_agent, Some("Custom Agent".to_string()));
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("page source")
            .create_async()
            .await;

        let client = WebClient::new();
        let body = client
            .get(&format!("{}/page", server.url()), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(body, "page source");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_forwards_request_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("x-probe", "1")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let mut headers = HashMap::new();
        headers.insert("x-probe".to_string(), "1".to_string());

        let client = WebClient::new();
        let body = client
            .get(&format!("{}/page", server.url()), &headers)
            .await
            .unwrap();

        assert_eq!(body, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/private")
            .with_status(401)
            .with_body("login required")
            .create_async()
            .await;

        let client = WebClient::new();
        let result = client
            .get(&format!("{}/private", server.url()), &HashMap::new())
            .await;

        assert!(
            matches!(result, Err(SigripError::Unauthorized(message)) if message == "login required")
        );
    }

    #[tokio::test]
    async fn test_get_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/broken")
            .with_status(500)
            .create_async()
            .await;

        let client = WebClient::new();
        let result = client
            .get(&format!("{}/broken", server.url()), &HashMap::new())
            .await;

        assert!(matches!(result, Err(SigripError::Http { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_get_decodes_gzip_response() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"compressed page").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/gz")
            .with_status(200)
            .with_header("content-encoding", "gzip")
            .with_body(compressed)
            .create_async()
            .await;

        let client = WebClient::new();
        let body = client
            .get(&format!("{}/gz", server.url()), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(body, "compressed page");
    }

    #[tokio::test]
    async fn test_post_plain_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/submit")
            .match_body("payload")
            .with_status(200)
            .with_body("accepted")
            .create_async()
            .await;

        let client = WebClient::new();
        let body = client
            .post(&format!("{}/submit", server.url()), &HashMap::new(), "payload")
            .await
            .unwrap();

        assert_eq!(body, "accepted");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_gzip_compresses_body() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"payload").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/submit")
            .match_header("content-encoding", "gzip")
            .match_body(compressed)
            .with_status(200)
            .with_body("accepted")
            .create_async()
            .await;

        let mut headers = HashMap::new();
        headers.insert("Content-Encoding".to_string(), "gzip".to_string());

        let client = WebClient::new();
        let body = client
            .post(&format!("{}/submit", server.url()), &headers, "payload")
            .await
            .unwrap();

        assert_eq!(body, "accepted");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ip_from_service() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_body("203.0.113.7\n")
            .create_async()
            .await;

        let client = WebClient::new();
        let ip = client.ip_from_service(&server.url()).await;
        assert_eq!(ip, Some("203.0.113.7".to_string()));
    }

    #[tokio::test]
    async fn test_ip_from_service_failure_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(500)
            .create_async()
            .await;

        let client = WebClient::new();
        assert_eq!(client.ip_from_service(&server.url()).await, None);
    }
}
