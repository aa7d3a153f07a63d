pub mod ai_client;
pub mod amount;
pub mod analytics;
pub mod budget_progress;
pub mod chat_session;
pub mod colors;
pub mod financial_context;
pub mod insight_client;
pub mod monthly;
pub mod recommendations;
pub mod text_normalizer;
