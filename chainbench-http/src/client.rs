//! HTTP client implementation

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::types::{HttpMethod, HttpRequest, HttpResponse};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// HTTP client trait for making HTTP requests
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// HTTP Manager for handling HTTP requests with mock support
#[derive(Debug, Clone)]
pub struct HttpManager {
    offline: bool,
    mocks: HashMap<String, HttpResponse>,
    client: Client,
}

impl HttpManager {
    /// Create a new HttpManager in online mode with default configuration
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HttpManager with specific configuration
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        debug!(
            "Creating HttpManager: timeout {}s, connect timeout {}s",
            config.timeout.as_secs(),
            config.connect_timeout.as_secs()
        );
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()?;

        Ok(Self {
            offline: false,
            mocks: HashMap::new(),
            client,
        })
    }

    /// Set offline mode
    pub fn set_offline(&mut self) {
        self.offline = true;
        debug!("HttpManager set to offline mode");
    }

    /// Add a single HTTP mock, keyed by method and URL without query string
    pub fn add_mock(&mut self, method: HttpMethod, url: &str, response: HttpResponse) {
        let key = format!("{}:{}", method.as_str(), url);
        self.mocks.insert(key, response);
        debug!("Added HTTP mock for {} {}", method, url);
    }

    fn find_mock(&self, method: HttpMethod, url: &str) -> Option<&HttpResponse> {
        let key = format!("{}:{}", method.as_str(), url);
        if let Some(response) = self.mocks.get(&key) {
            debug!("Found matching mock response for {} {}", method, url);
            return Some(response);
        }

        // Partial URL match, so a mock for `/servers` also serves `/v2.1/servers`
        self.mocks.iter().find_map(|(key, response)| {
            let (mock_method, mock_url) = key.split_once(':')?;
            let matches = mock_method.eq_ignore_ascii_case(method.as_str())
                && (url.contains(mock_url) || mock_url.contains(url));
            if matches {
                debug!("Found partial matching mock response for {} {}", method, url);
                Some(response)
            } else {
                None
            }
        })
    }

    fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, HttpError> {
        let mut header_map = HeaderMap::new();
        for (key, value) in headers {
            let name = HeaderName::from_str(key)
                .map_err(|_| HttpError::InvalidHeader(key.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeader(format!("value for {}", key)))?;
            header_map.insert(name, value);
        }
        Ok(header_map)
    }
}

#[async_trait::async_trait]
impl HttpClient for HttpManager {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let HttpRequest {
            method,
            url,
            query,
            headers,
            body,
        } = request;

        info!("Making HTTP request: {} {}", method, url);
        debug!("Request query: {:?}", query);

        if self.offline {
            return self
                .find_mock(method, &url)
                .cloned()
                .ok_or_else(|| HttpError::MissingMock {
                    method: method.to_string(),
                    url: url.clone(),
                });
        }

        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", url, e)))?;

        let mut builder = self
            .client
            .request(reqwest::Method::from(method), parsed)
            .headers(Self::header_map(&headers)?);

        if !query.is_empty() {
            builder = builder.query(&query);
        }

        if let Some(ref body) = body {
            debug!("Adding JSON body to request");
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        info!(
            "HTTP response received: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        );

        let response_headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            JsonValue::Null
        } else {
            match serde_json::from_str::<JsonValue>(&text) {
                Ok(json) => json,
                Err(_) => {
                    warn!("Failed to parse response as JSON, keeping it as text");
                    JsonValue::String(text)
                }
            }
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            headers: response_headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offline_manager() -> HttpManager {
        let mut manager = HttpManager::new().unwrap();
        manager.set_offline();
        manager
    }

    #[tokio::test]
    async fn test_offline_exact_mock() {
        let mut manager = offline_manager();
        manager.add_mock(
            HttpMethod::Get,
            "http://prom:9090/api/v1/query_range",
            HttpResponse::ok(json!({"status": "success"})),
        );

        let response = manager
            .send(HttpRequest::get("http://prom:9090/api/v1/query_range").query("step", 5))
            .await
            .unwrap();
        assert_eq!(response.body["status"], "success");
    }

    #[tokio::test]
    async fn test_offline_partial_mock_and_method_mismatch() {
        let mut manager = offline_manager();
        manager.add_mock(
            HttpMethod::Get,
            "/servers",
            HttpResponse::ok(json!({"servers": []})),
        );

        let response = manager
            .send(HttpRequest::get("http://nova:8774/v2.1/servers"))
            .await
            .unwrap();
        assert_eq!(response.body, json!({"servers": []}));

        let result = manager
            .send(HttpRequest::post("http://nova:8774/v2.1/servers", json!({})))
            .await;
        assert!(matches!(result, Err(HttpError::MissingMock { .. })));
    }

    #[tokio::test]
    async fn test_invalid_url_online() {
        let manager = HttpManager::new().unwrap();
        let result = manager.send(HttpRequest::get("not a url")).await;
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_header_name() {
        let headers = vec![("bad header".to_string(), "v".to_string())];
        assert!(matches!(
            HttpManager::header_map(&headers),
            Err(HttpError::InvalidHeader(_))
        ));
    }
}
