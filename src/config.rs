use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{AiProvider, AiSettings};

/// Where insight requests are sent.
#[derive(Debug, Clone)]
pub enum InsightBackend {
    /// A remote insight backend exposing the spending-analysis, budget-recommendations
    /// and insights endpoints under this base URL.
    Remote(String),
    /// Talk to an LLM provider directly.
    Provider(AiSettings),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub snapshot_path: PathBuf,
    pub insight_backend: InsightBackend,
    pub request_timeout: Duration,
}

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let insight_backend = match env::var("FINSIGHT_INSIGHT_URL") {
            Ok(url) if !url.trim().is_empty() => InsightBackend::Remote(url),
            _ => InsightBackend::Provider(ai_settings_from_env()),
        };

        Self {
            host: env::var("FINSIGHT_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("FINSIGHT_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7070),
            snapshot_path: env::var("FINSIGHT_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/snapshot.json")),
            insight_backend,
            request_timeout: Duration::from_secs(
                env::var("FINSIGHT_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn ai_settings_from_env() -> AiSettings {
    let provider: AiProvider = env::var("FINSIGHT_AI_PROVIDER")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    AiSettings::new(
        provider,
        env::var("FINSIGHT_AI_BASE_URL").ok(),
        env::var("FINSIGHT_AI_API_KEY").ok(),
        env::var("FINSIGHT_AI_MODEL").ok(),
    )
}
