//! HTTP transport for the CVP API
//!
//! The client core never touches the network directly: it goes through the
//! [`Transport`] trait, which performs authenticated GET/POST round trips and
//! hands back raw body bytes. [`HttpTransport`] is the reqwest-backed
//! implementation; tests substitute an in-memory one.

use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Authenticated request/response transport to a CVP instance
///
/// All methods must be `Send` to work with Tokio's work-stealing runtime.
/// Implementations own authentication, timeouts, and cancellation; the
/// client layer adds nothing on top of a single round trip.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET and return the raw response body
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, TransportError>;

    /// Issue a POST with an optional JSON body and return the raw response body
    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, TransportError>;
}

/// reqwest-backed [`Transport`] using service-account token authentication
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    /// Create a new transport
    ///
    /// # Arguments
    /// * `base_url` - CVP base URL (e.g., "https://cvp.example.com/cvpservice")
    /// * `token` - service-account token for authentication
    pub fn new(base_url: String, token: String) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn build_url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let query_string = query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url = format!("{url}?{query_string}");
        }
        url
    }

    async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }
        let bytes = response.bytes().await.map_err(TransportError::Http)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, TransportError> {
        let url = self.build_url(path, query);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(TransportError::Http)?;

        Self::read_body(response).await
    }

    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.build_url(path, query);
        debug!("POST {}", url);

        let mut request = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(TransportError::Http)?;
        Self::read_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let transport =
            HttpTransport::new("https://cvp.example.com/".to_string(), "tok".to_string()).unwrap();
        assert_eq!(transport.base_url(), "https://cvp.example.com");
    }

    #[test]
    fn build_url_encodes_query_values() {
        let transport =
            HttpTransport::new("https://cvp.example.com".to_string(), "tok".to_string()).unwrap();
        let url = transport.build_url(
            "/inventory/getInventory.do",
            &[
                ("queryparam", "leaf 1".to_string()),
                ("startIndex", "0".to_string()),
                ("endIndex", "0".to_string()),
            ],
        );
        assert_eq!(
            url,
            "https://cvp.example.com/inventory/getInventory.do?queryparam=leaf%201&startIndex=0&endIndex=0"
        );
    }

    #[test]
    fn build_url_without_query_has_no_separator() {
        let transport =
            HttpTransport::new("https://cvp.example.com".to_string(), "tok".to_string()).unwrap();
        let url = transport.build_url("/inventory/add/getNonConnectedDeviceCount.do", &[]);
        assert_eq!(
            url,
            "https://cvp.example.com/inventory/add/getNonConnectedDeviceCount.do"
        );
    }
}
