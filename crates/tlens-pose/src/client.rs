//! Pose service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tlens_models::LandmarkSet;
use tracing::{debug, warn};

use crate::error::{PoseError, PoseResult};
use crate::types::{HealthResponse, PoseResponse};

/// Configuration for the pose client.
#[derive(Debug, Clone)]
pub struct PoseClientConfig {
    /// Base URL of the pose service
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for PoseClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl PoseClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("POSE_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("POSE_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

/// Pose estimation boundary: one image in, optional landmark set out.
#[async_trait]
pub trait PoseEstimator: Send + Sync {
    /// Detect a pose in one JPEG-encoded frame.
    ///
    /// `Ok(None)` means the frame was processed but no pose was found.
    async fn detect(&self, frame_jpeg: &[u8]) -> PoseResult<Option<LandmarkSet>>;
}

/// Client for the pose-estimation service.
pub struct PoseClient {
    http: Client,
    config: PoseClientConfig,
}

impl PoseClient {
    /// Create a new pose client.
    pub fn new(config: PoseClientConfig) -> PoseResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PoseError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> PoseResult<Self> {
        Self::new(PoseClientConfig::from_env())
    }

    /// Check if the pose service is healthy.
    pub async fn health_check(&self) -> PoseResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Pose service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Pose service health check error: {}", e);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl PoseEstimator for PoseClient {
    async fn detect(&self, frame_jpeg: &[u8]) -> PoseResult<Option<LandmarkSet>> {
        let url = format!("{}/pose", self.config.base_url);

        debug!("Sending {} byte frame to {}", frame_jpeg.len(), url);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(frame_jpeg.to_vec())
            .send()
            .await
            .map_err(PoseError::Network)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PoseError::RequestFailed(format!(
                "Pose service returned {}: {}",
                status, body
            )));
        }

        let pose: PoseResponse = response
            .json()
            .await
            .map_err(|e| PoseError::InvalidResponse(e.to_string()))?;

        Ok(pose.landmarks.map(LandmarkSet::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tlens_models::{Landmark, LEFT_HIP, POSE_LANDMARK_COUNT, RIGHT_HIP};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_config_defaults() {
        let config = PoseClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    fn client_for(server: &MockServer) -> PoseClient {
        PoseClient::new(PoseClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_detect_returns_landmarks() {
        let server = MockServer::start().await;
        let landmarks: Vec<Landmark> = (0..POSE_LANDMARK_COUNT)
            .map(|_| Landmark::new(0.5, 0.5))
            .collect();

        Mock::given(method("POST"))
            .and(path("/pose"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "landmarks": landmarks })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.detect(b"jpeg-bytes").await.unwrap();
        let set = result.expect("pose should be present");
        assert!(set.get(LEFT_HIP).is_some());
        assert!(set.get(RIGHT_HIP).is_some());
    }

    #[tokio::test]
    async fn test_detect_no_pose() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pose"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "landmarks": null })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.detect(b"jpeg-bytes").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_detect_service_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pose"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.detect(b"jpeg-bytes").await.unwrap_err();
        assert!(matches!(err, PoseError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "version": null })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.health_check().await.unwrap());
    }
}
