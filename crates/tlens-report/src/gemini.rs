//! Gemini AI client for scouting report generation.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tlens_models::{PlayerProfile, ScoutingReport};
use tracing::{debug, info, warn};

use crate::error::{ReportError, ReportResult};
use crate::prompt::build_prompt;

/// Report generation configuration.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Gemini API base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Request timeout; an unresponsive service fails the report, never
    /// hangs the run
    pub timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ReportConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            timeout: Duration::from_secs(
                std::env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Scouting report generator.
///
/// The credential is threaded in per run (request-supplied key or the
/// environment fallback); it is never read from a global at call time.
pub struct ReportGenerator {
    api_key: Option<String>,
    config: ReportConfig,
    client: Client,
}

impl ReportGenerator {
    /// Create a new generator. `api_key = None` is the valid degraded
    /// state: [`generate`](Self::generate) then returns
    /// [`ScoutingReport::NotConfigured`] without ever touching the network.
    pub fn new(api_key: Option<String>, config: ReportConfig) -> ReportResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ReportError::Network)?;

        Ok(Self {
            api_key,
            config,
            client,
        })
    }

    /// Generate a scouting report from the metric means and profile.
    ///
    /// Makes at most one Gemini call. Every failure mode is folded into the
    /// returned tag; this function never errors and never hangs past the
    /// configured timeout.
    pub async fn generate(
        &self,
        profile: &PlayerProfile,
        mean_speed: f64,
        mean_accuracy: f64,
    ) -> ScoutingReport {
        let Some(api_key) = &self.api_key else {
            info!("No Gemini credential configured, skipping report generation");
            return ScoutingReport::NotConfigured;
        };

        let prompt = build_prompt(profile, mean_speed, mean_accuracy);

        match self.call_gemini(api_key, &prompt).await {
            Ok(Some(text)) => {
                info!(model = %self.config.model, "Scouting report generated");
                ScoutingReport::Generated { text }
            }
            Ok(None) => {
                warn!("Gemini response contained no text content");
                ScoutingReport::Unavailable
            }
            Err(e) => {
                warn!("Report generation failed: {}", e);
                ScoutingReport::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Call the Gemini API once.
    ///
    /// `Ok(None)` means the call succeeded but the response carried no
    /// usable text.
    async fn call_gemini(&self, api_key: &str, prompt: &str) -> ReportResult<Option<String>> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.config.model, "Calling Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReportError::Timeout(self.config.timeout.as_secs())
                } else {
                    ReportError::Network(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::RequestFailed { status, body });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ReportError::InvalidResponse(e.to_string()))?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tlens_models::Position;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_profile() -> PlayerProfile {
        PlayerProfile {
            name: "Ada Striker".to_string(),
            age: 21,
            position: Position::Forward,
            height_cm: 168.0,
            weight_kg: 60.0,
            team: "Demo FC".to_string(),
        }
    }

    fn generator_for(server: &MockServer, api_key: Option<&str>) -> ReportGenerator {
        ReportGenerator::new(
            api_key.map(|s| s.to_string()),
            ReportConfig {
                base_url: server.uri(),
                model: "gemini-test".to_string(),
                timeout: Duration::from_secs(5),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_no_credential_never_calls_service() {
        let server = MockServer::start().await;
        // Any request at all would fail the expectation
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let generator = generator_for(&server, None);
        let report = generator.generate(&sample_profile(), 10.0, 85.0).await;
        assert_eq!(report, ScoutingReport::NotConfigured);
    }

    #[tokio::test]
    async fn test_successful_generation_calls_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "A promising forward." }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = generator_for(&server, Some("test-key"));
        let report = generator.generate(&sample_profile(), 10.0, 85.0).await;
        assert_eq!(
            report,
            ScoutingReport::Generated {
                text: "A promising forward.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_service_error_becomes_failed_report() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let generator = generator_for(&server, Some("test-key"));
        let report = generator.generate(&sample_profile(), 10.0, 85.0).await;
        match &report {
            ScoutingReport::Failed { reason } => {
                assert!(reason.contains("429"));
                assert!(reason.contains("quota exceeded"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        // The narrative carries the description too
        assert!(report.narrative().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_unresponsive_service_becomes_failed_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let generator = ReportGenerator::new(
            Some("test-key".to_string()),
            ReportConfig {
                base_url: server.uri(),
                model: "gemini-test".to_string(),
                timeout: Duration::from_secs(1),
            },
        )
        .unwrap();

        let report = generator.generate(&sample_profile(), 10.0, 85.0).await;
        match report {
            ScoutingReport::Failed { reason } => {
                assert!(reason.contains("timed out"), "reason was: {reason}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_candidates_becomes_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let generator = generator_for(&server, Some("test-key"));
        let report = generator.generate(&sample_profile(), 10.0, 85.0).await;
        assert_eq!(report, ScoutingReport::Unavailable);
    }

    #[test]
    fn test_config_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
