//! Shared test utilities for integration tests.
//!
//! This module provides a `TestClient` that drives the application router
//! against an in-memory ledger snapshot and a scripted insight service.
//! Methods are intentionally broad to support various test scenarios across
//! different test files.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use finsight::config::{Config, InsightBackend};
use finsight::error::{AppError, AppResult};
use finsight::models::{
    AiSettings, Budget, Goal, InsightQuery, InsightReply, Settings, SpendingInsight, Transaction,
};
use finsight::server;
use finsight::services::insight_client::InsightService;
use finsight::state::AppState;
use finsight::store::{Snapshot, SnapshotStore};
use http_body_util::BodyExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tower::ServiceExt;

/// How the scripted insight service behaves.
pub enum Script {
    /// Answer every request with these values.
    Answer {
        insight: SpendingInsight,
        reply: InsightReply,
    },
    /// Fail every request as if the backend were down.
    Unreachable,
    /// Wait for `release` before answering.
    Gated {
        release: Arc<Notify>,
        reply: InsightReply,
    },
}

pub struct ScriptedInsights {
    script: Script,
    queries: Mutex<Vec<InsightQuery>>,
}

impl ScriptedInsights {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Questions received so far.
    pub fn queries(&self) -> Vec<InsightQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn insight(&self) -> AppResult<SpendingInsight> {
        match &self.script {
            Script::Answer { insight, .. } => Ok(insight.clone()),
            Script::Unreachable | Script::Gated { .. } => {
                Err(AppError::Upstream("connection refused".into()))
            }
        }
    }
}

#[async_trait]
impl InsightService for ScriptedInsights {
    async fn spending_analysis(&self) -> AppResult<SpendingInsight> {
        self.insight()
    }

    async fn budget_recommendations(&self) -> AppResult<SpendingInsight> {
        self.insight()
    }

    async fn ask(&self, query: &InsightQuery) -> AppResult<InsightReply> {
        self.queries.lock().unwrap().push(query.clone());
        match &self.script {
            Script::Answer { reply, .. } => Ok(reply.clone()),
            Script::Unreachable => Err(AppError::Upstream("connection refused".into())),
            Script::Gated { release, reply } => {
                release.notified().await;
                Ok(reply.clone())
            }
        }
    }
}

/// A typical answer from the insight backend.
pub fn sample_answer() -> Script {
    Script::Answer {
        insight: SpendingInsight {
            insight: "**Financial Insight:** Food takes 75% of your spending. Ok.".into(),
            category: "Spending".into(),
            recommendation: "1. Cut dining out. 2. Cancel unused subscriptions. \
                             3. Automate savings transfers every month."
                .into(),
        },
        reply: InsightReply::from_message("Your biggest expense is food."),
    }
}

/// A small ledger: Food 300, Transport 100, income 1000.
pub fn sample_snapshot() -> Snapshot {
    Snapshot {
        transactions: vec![
            Transaction::expense("Food", 200.0).with_date("2025-01-05"),
            Transaction::expense("Transport", "100").with_date("2025-01-20"),
            Transaction::expense("Food", "100.00").with_date("2025-02-03"),
            Transaction::income(1000.0).with_date("2025-01-01"),
        ],
        budgets: vec![
            Budget::new("Food", 400.0, 380.0),
            Budget::new("Transport", 200.0, "50"),
        ],
        goals: vec![Goal::new("Emergency fund", 10000.0, 2500.0)],
        settings: Settings::default(),
    }
}

/// A test client that sends requests straight into the router.
pub struct TestClient {
    state: AppState,
    insights: Arc<ScriptedInsights>,
}

impl TestClient {
    /// Create a test client with an empty ledger and a well-behaved insight service.
    pub fn new() -> Self {
        Self::with(Snapshot::default(), sample_answer())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self::with(snapshot, sample_answer())
    }

    pub fn with(snapshot: Snapshot, script: Script) -> Self {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 7070,
            snapshot_path: PathBuf::from("data/snapshot.json"),
            insight_backend: InsightBackend::Provider(AiSettings::default()),
            request_timeout: Duration::from_secs(5),
        };

        let insights = Arc::new(ScriptedInsights::new(script));
        let state = AppState::new(
            config,
            Arc::new(SnapshotStore::from_snapshot(snapshot)),
            insights.clone(),
        );

        Self { state, insights }
    }

    pub fn insights(&self) -> &ScriptedInsights {
        &self.insights
    }

    /// Get the router for making requests (mimics production setup).
    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        (status, parsed)
    }

    /// POST a JSON body and return status and parsed JSON response.
    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        let parsed = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);
        (status, parsed)
    }

    /// A chat request, for sending from a spawned task.
    pub fn chat_request(query: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::json!({ "query": query }).to_string()))
            .unwrap()
    }

    /// Ask the chat a question.
    pub async fn ask(&self, query: &str) -> (StatusCode, serde_json::Value) {
        self.post_json("/api/chat", serde_json::json!({ "query": query }))
            .await
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
