//! HTTP client against the clipsync store service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use cs_core::config::SyncTuning;
use cs_core::device::DeviceId;
use cs_core::error::SyncError;
use cs_core::ports::SyncTransport;
use cs_core::protocol::{PublishAck, PublishRequest, RemoteRecord};

/// Transport-level timeouts. Reads are expected to come back fast; writes
/// get more headroom. A timeout counts as a failure for backoff purposes.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub base_url: String,
    pub fetch_timeout: Duration,
    pub publish_timeout: Duration,
    pub connect_timeout: Duration,
}

impl HttpTransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fetch_timeout: Duration::from_secs(3),
            publish_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(3),
        }
    }

    /// Timeouts from the engine tuning, base URL from settings.
    pub fn from_tuning(base_url: impl Into<String>, tuning: &SyncTuning) -> Self {
        Self {
            fetch_timeout: tuning.fetch_timeout(),
            publish_timeout: tuning.publish_timeout(),
            ..Self::new(base_url)
        }
    }
}

pub struct HttpSyncTransport {
    client: reqwest::Client,
    config: HttpTransportConfig,
}

impl HttpSyncTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| SyncError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Fetch up to `limit` records, newest first. Used by the history
    /// command, not by the sync loops.
    pub async fn fetch_history(
        &self,
        device_id: Option<&DeviceId>,
        limit: Option<i64>,
    ) -> Result<Vec<RemoteRecord>, SyncError> {
        let mut request = self
            .client
            .get(self.url("/clipboard/history"))
            .timeout(self.config.fetch_timeout);
        if let Some(device_id) = device_id {
            request = request.query(&[("device_id", device_id.as_str())]);
        }
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string().as_str())]);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Network(format!("unexpected status {}", status)));
        }
        response
            .json()
            .await
            .map_err(|e| SyncError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl SyncTransport for HttpSyncTransport {
    async fn publish(&self, device_id: &DeviceId, content: &str) -> Result<i64, SyncError> {
        let body = PublishRequest {
            content: content.to_string(),
            device_id: device_id.as_str().to_string(),
        };

        let response = self
            .client
            .post(self.url("/clipboard"))
            .timeout(self.config.publish_timeout)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match response.status() {
            StatusCode::BAD_REQUEST => {
                let detail = response.text().await.unwrap_or_default();
                Err(SyncError::Validation(detail))
            }
            status if !status.is_success() => {
                Err(SyncError::Network(format!("unexpected status {}", status)))
            }
            _ => {
                let ack: PublishAck = response
                    .json()
                    .await
                    .map_err(|e| SyncError::MalformedResponse(e.to_string()))?;
                debug!(id = ack.id, "store acknowledged publish");
                Ok(ack.id)
            }
        }
    }

    async fn fetch_latest(
        &self,
        device_id: &DeviceId,
    ) -> Result<Option<RemoteRecord>, SyncError> {
        let response = self
            .client
            .get(self.url("/clipboard/latest"))
            .query(&[("device_id", device_id.as_str())])
            .timeout(self.config.fetch_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match response.status() {
            // The device has no records yet; nothing to sync.
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::BAD_REQUEST => {
                let detail = response.text().await.unwrap_or_default();
                Err(SyncError::Validation(detail))
            }
            status if !status.is_success() => {
                Err(SyncError::Network(format!("unexpected status {}", status)))
            }
            _ => {
                let record: RemoteRecord = response
                    .json()
                    .await
                    .map_err(|e| SyncError::MalformedResponse(e.to_string()))?;
                Ok(Some(record))
            }
        }
    }
}

fn map_reqwest_error(error: reqwest::Error) -> SyncError {
    if error.is_timeout() {
        SyncError::Timeout
    } else {
        SyncError::Network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport_for(server: &mockito::ServerGuard) -> HttpSyncTransport {
        HttpSyncTransport::new(HttpTransportConfig::new(server.url())).unwrap()
    }

    #[tokio::test]
    async fn publish_returns_the_assigned_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/clipboard")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"status": "success", "id": 17}).to_string())
            .create_async()
            .await;

        let transport = transport_for(&server);
        let id = transport
            .publish(&DeviceId::from("aaaa1111"), "hello")
            .await
            .unwrap();
        assert_eq!(id, 17);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn publish_rejection_is_a_validation_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/clipboard")
            .with_status(400)
            .with_body(json!({"error": "Missing content or device_id"}).to_string())
            .create_async()
            .await;

        let transport = transport_for(&server);
        let err = transport
            .publish(&DeviceId::from("aaaa1111"), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn fetch_latest_parses_a_record() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/clipboard/latest")
            .match_query(mockito::Matcher::UrlEncoded(
                "device_id".into(),
                "aaaa1111".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 3,
                    "content": "hello",
                    "device_id": "aaaa1111",
                    "timestamp": "2025-03-01T12:30:45Z"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let transport = transport_for(&server);
        let record = transport
            .fetch_latest(&DeviceId::from("aaaa1111"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.content, "hello");
    }

    #[tokio::test]
    async fn missing_record_is_none_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/clipboard/latest")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body(json!({"message": "No data found"}).to_string())
            .create_async()
            .await;

        let transport = transport_for(&server);
        let result = transport
            .fetch_latest(&DeviceId::from("deadbeef"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn unexpected_shape_is_reported_distinctly() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/clipboard/latest")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>definitely not json</html>")
            .create_async()
            .await;

        let transport = transport_for(&server);
        let err = transport
            .fetch_latest(&DeviceId::from("aaaa1111"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::MalformedResponse(_)));
        // Still retried with backoff, like any network failure.
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        // Port 9 (discard) is not listening in the test environment.
        let transport =
            HttpSyncTransport::new(HttpTransportConfig::new("http://127.0.0.1:9")).unwrap();
        let err = transport
            .fetch_latest(&DeviceId::from("aaaa1111"))
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn fetch_history_passes_filters_through() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/clipboard/history")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("device_id".into(), "aaaa1111".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([{
                    "id": 2,
                    "content": "newest",
                    "device_id": "aaaa1111",
                    "timestamp": "2025-03-01T12:30:45Z"
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let transport = transport_for(&server);
        let records = transport
            .fetch_history(Some(&DeviceId::from("aaaa1111")), Some(5))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "newest");
    }
}
