use crate::error::{AppError, AppResult};
use crate::models::{InsightQuery, InsightReply, SpendingInsight};
use crate::services::recommendations;
use crate::services::text_normalizer::normalize;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const FALLBACK_INSIGHT: &str = "Unable to generate AI insight at the moment. \
     The insight service could not be reached, so make sure the backend server is running.";
pub const FALLBACK_RECOMMENDATION: &str = "Please try again later.";

/// The AI text-generation backend, as seen by the engine.
#[async_trait]
pub trait InsightService: Send + Sync {
    async fn spending_analysis(&self) -> AppResult<SpendingInsight>;

    async fn budget_recommendations(&self) -> AppResult<SpendingInsight>;

    async fn ask(&self, query: &InsightQuery) -> AppResult<InsightReply>;
}

/// Shown in place of an insight when the service fails.
pub fn fallback_insight() -> SpendingInsight {
    SpendingInsight {
        insight: FALLBACK_INSIGHT.to_string(),
        category: "Error".to_string(),
        recommendation: FALLBACK_RECOMMENDATION.to_string(),
    }
}

pub async fn spending_analysis_or_fallback(service: &dyn InsightService) -> SpendingInsight {
    service.spending_analysis().await.unwrap_or_else(|e| {
        warn!(error = %e, "Spending analysis failed, using fallback");
        fallback_insight()
    })
}

pub async fn budget_recommendations_or_fallback(service: &dyn InsightService) -> SpendingInsight {
    service.budget_recommendations().await.unwrap_or_else(|e| {
        warn!(error = %e, "Budget recommendations failed, using fallback");
        fallback_insight()
    })
}

/// An insight ready to render: paragraphs plus a short action list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightDisplay {
    pub narrative: String,
    pub category: String,
    pub recommendations: Vec<String>,
}

impl InsightDisplay {
    pub fn from_insight(insight: &SpendingInsight) -> Self {
        Self {
            narrative: normalize(&insight.insight),
            category: insight.category.trim().to_string(),
            recommendations: recommendations::extract(&insight.recommendation),
        }
    }
}

/// Client for a remote insight backend.
pub struct HttpInsightService {
    client: Client,
    base_url: String,
}

impl HttpInsightService {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Insight backend returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse insight response: {}", e)))
    }

    async fn get_insight(&self, path: &str) -> AppResult<SpendingInsight> {
        let url = self.url(path);
        debug!(url = %url, "Requesting insight");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Insight request failed: {}", e)))?;

        Self::read_json(response).await
    }
}

#[async_trait]
impl InsightService for HttpInsightService {
    async fn spending_analysis(&self) -> AppResult<SpendingInsight> {
        self.get_insight("spending-analysis").await
    }

    async fn budget_recommendations(&self) -> AppResult<SpendingInsight> {
        self.get_insight("budget-recommendations").await
    }

    async fn ask(&self, query: &InsightQuery) -> AppResult<InsightReply> {
        let url = self.url("insights");
        debug!(url = %url, query_len = query.query.len(), "Sending insight query");

        let response = self
            .client
            .post(&url)
            .json(query)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Insight request failed: {}", e)))?;

        Self::read_json(response).await
    }
}
