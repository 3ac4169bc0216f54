//! Minimal HTTP GET client
//!
//! One request per call, bounded by the client timeout, no retries. A 404 is
//! reported as `FetchError::NotFound` so callers can fall back to another URL.

use std::time::Duration;
use tracing::debug;

use crate::error::{FetchError, Result};

/// HTTP client with a fixed per-request timeout
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and return the body of a 200 response
    pub async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>> {
        debug!(url, "GET");

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| self.request_error(url, e))?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "response");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }

        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.request_error(url, e))?;
        Ok(body.to_vec())
    }

    fn request_error(&self, url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_ok_with_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_secs(5)).unwrap();
        let body = client
            .get(&format!("{}/file", server.uri()), &[("Accept", "application/json")])
            .await
            .unwrap();
        assert_eq!(body, b"body");
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_secs(5)).unwrap();
        let err = client.get(&format!("{}/missing", server.uri()), &[]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_secs(5)).unwrap();
        let err = client.get(&format!("{}/x", server.uri()), &[]).await.unwrap_err();
        assert!(matches!(err, FetchError::Http { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_millis(100)).unwrap();
        let err = client.get(&format!("{}/slow", server.uri()), &[]).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }
}
