//! Insight service backed directly by an LLM provider.
//!
//! The ledger is summarized into a financial-advisor prompt, sent to Ollama, an
//! OpenAI-compatible API or Anthropic, and the generated text is split into
//! insight, category and recommendation on the labels the prompt asks for.

use crate::error::{AppError, AppResult};
use crate::models::{AiProvider, AiSettings, InsightQuery, InsightReply, SpendingInsight};
use crate::services::financial_context::FinancialContext;
use crate::services::insight_client::InsightService;
use crate::services::text_normalizer::strip_emphasis;
use crate::store::TransactionStore;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::debug;

const SPENDING_ANALYSIS_QUERY: &str =
    "Analyze my spending patterns and tell me where I can cut back.";
const BUDGET_RECOMMENDATIONS_QUERY: &str =
    "Review my budgets against my spending and suggest adjustments.";

const DEFAULT_CATEGORY: &str = "General";
const DEFAULT_RECOMMENDATION: &str = "Follow the AI suggestions above.";

static CATEGORY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcategory\s*:").expect("valid regex"));
static RECOMMENDATION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:actionable\s+)?recommendations?\s*:").expect("valid regex")
});
static INSIGHT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:financial\s+)?insight\s*:").expect("valid regex"));
/// List numbers, stray markup and whitespace at either end of a section.
static SECTION_EDGES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s*#]*(?:\d+\.\s+)?[\s*#]*|(?:\s+\d+\.)?[\s*#]*$").expect("valid regex")
});

pub struct LlmInsightService {
    client: Client,
    settings: AiSettings,
    store: Arc<dyn TransactionStore>,
}

impl LlmInsightService {
    pub fn new(
        settings: AiSettings,
        store: Arc<dyn TransactionStore>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            settings,
            store,
        })
    }

    async fn answer(&self, query: &str, context: &str) -> AppResult<String> {
        if !self.settings.is_configured() {
            return Err(AppError::Upstream(format!(
                "{} provider is not configured",
                self.settings.provider.as_str()
            )));
        }

        let currency = self.store.load_settings()?.currency;
        let prompt = build_user_prompt(query, context);
        let system = build_system_prompt(&currency);

        match self.settings.provider {
            AiProvider::Ollama => self.generate_with_ollama(&system, &prompt).await,
            AiProvider::OpenAi => self.generate_with_openai_compatible(&system, &prompt).await,
            AiProvider::Anthropic => self.generate_with_anthropic(&system, &prompt).await,
        }
    }

    async fn analyze(&self, query: &str) -> AppResult<SpendingInsight> {
        let context = FinancialContext::collect(self.store.as_ref())?.describe();
        let text = self.answer(query, &context).await?;
        Ok(parse_generated(&text))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn generate_with_ollama(&self, system: &str, prompt: &str) -> AppResult<String> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            system: &'a str,
            stream: bool,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            response: String,
        }

        debug!(model = %self.settings.model, "Sending insight request to Ollama");

        let response = self
            .client
            .post(self.endpoint("api/generate"))
            .json(&OllamaRequest {
                model: &self.settings.model,
                prompt,
                system,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Ollama request failed: {}", e)))?;

        let body: OllamaResponse = read_json(response, "Ollama").await?;
        Ok(body.response)
    }

    async fn generate_with_openai_compatible(
        &self,
        system: &str,
        prompt: &str,
    ) -> AppResult<String> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct OpenAiRequest<'a> {
            model: &'a str,
            messages: Vec<Message<'a>>,
            temperature: f64,
        }

        #[derive(Deserialize)]
        struct OpenAiResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: Option<String>,
        }

        debug!(model = %self.settings.model, "Sending insight request to OpenAI-compatible API");

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .json(&OpenAiRequest {
                model: &self.settings.model,
                messages: vec![
                    Message {
                        role: "system",
                        content: system,
                    },
                    Message {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: 0.4,
            })
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("OpenAI request failed: {}", e)))?;

        let body: OpenAiResponse = read_json(response, "OpenAI API").await?;
        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn generate_with_anthropic(&self, system: &str, prompt: &str) -> AppResult<String> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct AnthropicRequest<'a> {
            model: &'a str,
            max_tokens: u32,
            system: &'a str,
            messages: Vec<Message<'a>>,
        }

        #[derive(Deserialize)]
        struct AnthropicResponse {
            content: Vec<ContentBlock>,
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            text: Option<String>,
        }

        debug!(model = %self.settings.model, "Sending insight request to Anthropic");

        let response = self
            .client
            .post(self.endpoint("v1/messages"))
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&AnthropicRequest {
                model: &self.settings.model,
                max_tokens: 1024,
                system,
                messages: vec![Message {
                    role: "user",
                    content: prompt,
                }],
            })
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Anthropic request failed: {}", e)))?;

        let body: AnthropicResponse = read_json(response, "Anthropic API").await?;
        Ok(body
            .content
            .into_iter()
            .find_map(|block| block.text)
            .unwrap_or_default())
    }
}

#[async_trait]
impl InsightService for LlmInsightService {
    async fn spending_analysis(&self) -> AppResult<SpendingInsight> {
        self.analyze(SPENDING_ANALYSIS_QUERY).await
    }

    async fn budget_recommendations(&self) -> AppResult<SpendingInsight> {
        self.analyze(BUDGET_RECOMMENDATIONS_QUERY).await
    }

    async fn ask(&self, query: &InsightQuery) -> AppResult<InsightReply> {
        let text = self.answer(&query.query, &query.context).await?;
        let parsed = parse_generated(&text);

        Ok(InsightReply {
            insight: Some(text.trim().to_string()),
            message: None,
            category: Some(parsed.category),
            recommendation: Some(parsed.recommendation),
        })
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    provider: &str,
) -> AppResult<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "{} returned {}: {}",
            provider, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to parse {} response: {}", provider, e)))
}

fn build_system_prompt(currency: &str) -> String {
    format!(
        "You are a financial advisor AI for a personal expense tracker. \
         Always express amounts in {currency}, using its currency symbol. \
         Keep responses concise and practical."
    )
}

fn build_user_prompt(query: &str, context: &str) -> String {
    format!(
        r#"Analyze the following financial data and provide insights.

Query: {}
Context:
{}

Please provide:
1. Financial Insight: a clear financial insight
2. Category: the category of the insight (Spending, Saving, Budget, Investment)
3. Actionable Recommendation: a numbered list of concrete steps"#,
        query.trim(),
        context.trim()
    )
}

/// Split generated text on its `Category:` and `Actionable Recommendation:` labels.
///
/// Text without labels becomes the insight as a whole.
pub fn parse_generated(text: &str) -> SpendingInsight {
    let text = strip_emphasis(text);

    let mut labels: Vec<(bool, usize, usize)> = Vec::new();
    if let Some(m) = CATEGORY_LABEL.find(&text) {
        labels.push((true, m.start(), m.end()));
    }
    if let Some(m) = RECOMMENDATION_LABEL.find(&text) {
        labels.push((false, m.start(), m.end()));
    }
    labels.sort_by_key(|&(_, start, _)| start);

    let insight_end = labels.first().map_or(text.len(), |&(_, start, _)| start);
    let insight = tidy_section(&text[..insight_end]);
    let insight = INSIGHT_LABEL.replace(&insight, "").trim().to_string();

    let mut category = None;
    let mut recommendation = None;
    for (i, &(is_category, _, end)) in labels.iter().enumerate() {
        let section_end = labels.get(i + 1).map_or(text.len(), |&(_, start, _)| start);
        let section = tidy_section(&text[end..section_end]);
        if is_category {
            let first_line = section.lines().next().unwrap_or_default();
            category = Some(first_line.trim().trim_end_matches('.').to_string());
        } else {
            recommendation = Some(section);
        }
    }

    SpendingInsight {
        insight,
        category: category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        recommendation: recommendation
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_RECOMMENDATION.to_string()),
    }
}

fn tidy_section(section: &str) -> String {
    SECTION_EDGES.replace_all(section, "").trim().to_string()
}
