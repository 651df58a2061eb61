use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Input sent to the analysis service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub recipient_name: String,
    pub body_text: String,
}

/// Annotations returned by the analysis service
///
/// Every field is optional; a service that omits one simply leaves the
/// matching feedback column empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub sentiment: Option<String>,
    pub difficulty_category: Option<String>,
    pub suggested_goal: Option<String>,
    pub recommended_course: Option<String>,
    pub suggested_mentor: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis request failed: {0}")]
    Network(String),

    #[error("Analysis service returned status {0}")]
    Status(u16),

    #[error("Analysis response could not be decoded: {0}")]
    Decode(String),

    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),
}

/// Text classification over a feedback body
#[async_trait]
pub trait FeedbackAnalyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
}

/// In-process analyzer keyed on the word "difficult"
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    const DIFFICULTY_MARKERS: [&'static str; 2] = ["difficult", "difícil"];

    fn classify(body: &str) -> AnalysisResult {
        let lowered = body.to_lowercase();
        if Self::DIFFICULTY_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            AnalysisResult {
                sentiment: Some("NEGATIVE".to_string()),
                difficulty_category: Some("Task management".to_string()),
                suggested_goal: Some("Improve organization by 20% over the next month.".to_string()),
                recommended_course: Some("Advanced Productivity Course".to_string()),
                suggested_mentor: None,
            }
        } else {
            AnalysisResult {
                sentiment: Some("POSITIVE".to_string()),
                difficulty_category: Some("N/A".to_string()),
                suggested_goal: Some("Keep up the excellent work!".to_string()),
                recommended_course: None,
                suggested_mentor: None,
            }
        }
    }
}

#[async_trait]
impl FeedbackAnalyzer for KeywordAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        tracing::debug!("Keyword analysis for feedback to {}", request.recipient_name);
        Ok(Self::classify(&request.body_text))
    }
}

/// Analyzer backed by an external HTTP service
pub struct HttpAnalyzer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalyzer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("progress-backend")
            .build()
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl FeedbackAnalyzer for HttpAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalysisError::Status(response.status().as_u16()));
        }

        response
            .json::<AnalysisResult>()
            .await
            .map_err(|e| AnalysisError::Decode(e.to_string()))
    }
}

/// Runs the configured analyzer under a fixed timeout
///
/// Failures never propagate: they are logged and reported as `None` so the
/// feedback is stored without annotations.
pub struct AnalysisProvider {
    analyzer: Arc<dyn FeedbackAnalyzer>,
    timeout: Duration,
}

impl AnalysisProvider {
    pub fn new(analyzer: Arc<dyn FeedbackAnalyzer>, timeout: Duration) -> Self {
        Self { analyzer, timeout }
    }

    pub async fn annotate(&self, recipient_name: &str, body_text: &str) -> Option<AnalysisResult> {
        let request = AnalysisRequest {
            recipient_name: recipient_name.to_string(),
            body_text: body_text.to_string(),
        };

        let outcome = match tokio::time::timeout(self.timeout, self.analyzer.analyze(&request)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(result) => {
                tracing::info!(
                    "Feedback analysis for {} completed: sentiment={:?}",
                    recipient_name,
                    result.sentiment
                );
                Some(result)
            }
            Err(e) => {
                tracing::warn!("Feedback analysis skipped for {}: {}", recipient_name, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for AnalysisProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisProvider")
            .field("timeout", &self.timeout)
            .finish()
    }
}
