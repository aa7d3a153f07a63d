use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::chat_session::ChatSessionLog;
use crate::services::insight_client::InsightService;
use crate::store::TransactionStore;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn TransactionStore>,
    pub insights: Arc<dyn InsightService>,
    pub chat: Arc<Mutex<ChatSessionLog>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn TransactionStore>,
        insights: Arc<dyn InsightService>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            insights,
            chat: Arc::new(Mutex::new(ChatSessionLog::new())),
        }
    }

    /// Lock the chat log. Never hold the guard across an `.await`.
    pub fn chat(&self) -> AppResult<MutexGuard<'_, ChatSessionLog>> {
        self.chat
            .lock()
            .map_err(|_| AppError::Internal("Chat session lock poisoned".into()))
    }
}
