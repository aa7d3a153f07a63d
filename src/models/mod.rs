pub mod ai_settings;
pub mod budget;
pub mod goal;
pub mod insight;
pub mod settings;
pub mod transaction;

pub use ai_settings::{AiProvider, AiSettings};
pub use budget::Budget;
pub use goal::Goal;
pub use insight::{ChatMessage, ChatRole, InsightQuery, InsightReply, SpendingInsight};
pub use settings::Settings;
pub use transaction::{RawAmount, Transaction, TransactionKind, UNCATEGORIZED};
