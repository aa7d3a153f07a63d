use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ChatMessage, InsightQuery};
use crate::services::financial_context::{FinancialContext, InsightStats};
use crate::services::insight_client::{
    budget_recommendations_or_fallback, spending_analysis_or_fallback, InsightDisplay,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLogView {
    pub session_id: Uuid,
    pub awaiting_response: bool,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReplyView {
    /// False when the question was blank or another one was still pending.
    pub accepted: bool,
    #[serde(flatten)]
    pub log: ChatLogView,
}

fn chat_view(state: &AppState) -> AppResult<ChatLogView> {
    let chat = state.chat()?;
    Ok(ChatLogView {
        session_id: chat.id(),
        awaiting_response: chat.is_awaiting_response(),
        messages: chat.messages().to_vec(),
    })
}

pub async fn stats(State(state): State<AppState>) -> AppResult<Json<InsightStats>> {
    Ok(Json(InsightStats::collect(state.store.as_ref())?))
}

pub async fn spending_analysis(State(state): State<AppState>) -> Json<InsightDisplay> {
    let insight = spending_analysis_or_fallback(state.insights.as_ref()).await;
    Json(InsightDisplay::from_insight(&insight))
}

pub async fn budget_recommendations(State(state): State<AppState>) -> Json<InsightDisplay> {
    let insight = budget_recommendations_or_fallback(state.insights.as_ref()).await;
    Json(InsightDisplay::from_insight(&insight))
}

pub async fn chat_log(State(state): State<AppState>) -> AppResult<Json<ChatLogView>> {
    Ok(Json(chat_view(&state)?))
}

/// Ask the insight service and record the reply, or the apology on failure.
async fn settle_question(state: AppState, query: String) -> AppResult<()> {
    let result = match FinancialContext::collect(state.store.as_ref()) {
        Ok(context) => {
            let query = InsightQuery {
                query,
                context: context.describe(),
            };
            state.insights.ask(&query).await
        }
        Err(e) => Err(e),
    };

    let mut chat = state.chat()?;
    match result {
        Ok(reply) => chat.complete(&reply),
        Err(e) => chat.fail(&e),
    };
    Ok(())
}

pub async fn chat_ask(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatReplyView>> {
    let pending = state.chat()?.submit(&request.query);

    let Some(query) = pending else {
        return Ok(Json(ChatReplyView {
            accepted: false,
            log: chat_view(&state)?,
        }));
    };

    // Settled in its own task: the log leaves awaiting-response even when
    // this request is dropped.
    tokio::spawn(settle_question(state.clone(), query))
        .await
        .map_err(|e| AppError::Internal(format!("Chat task failed: {}", e)))??;

    Ok(Json(ChatReplyView {
        accepted: true,
        log: chat_view(&state)?,
    }))
}
