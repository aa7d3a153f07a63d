pub mod api;
pub mod insights;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Analytics (JSON for charts)
        .route("/api/analytics/summary", get(api::summary))
        .route(
            "/api/analytics/spending-by-category",
            get(api::spending_by_category),
        )
        .route("/api/analytics/monthly", get(api::monthly))
        .route("/api/analytics/category-trends", get(api::category_trends))
        .route("/api/budgets/status", get(api::budget_status))
        .route("/api/goals/progress", get(api::goal_progress))
        // Insights
        .route("/api/insights/stats", get(insights::stats))
        .route(
            "/api/insights/spending-analysis",
            get(insights::spending_analysis),
        )
        .route(
            "/api/insights/budget-recommendations",
            get(insights::budget_recommendations),
        )
        .route("/api/chat", get(insights::chat_log).post(insights::chat_ask))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
