use crate::error::AppResult;
use crate::models::{Budget, Goal, Settings, Transaction};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Read-only source of ledger snapshots.
///
/// Every call returns the current state; callers never cache the result.
pub trait TransactionStore: Send + Sync {
    fn list_transactions(&self) -> AppResult<Vec<Transaction>>;

    fn list_budgets(&self) -> AppResult<Vec<Budget>>;

    fn list_goals(&self) -> AppResult<Vec<Goal>>;

    fn load_settings(&self) -> AppResult<Settings>;
}

/// Everything the engine reads, as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub settings: Settings,
}

pub struct SnapshotStore {
    snapshot: Snapshot,
}

impl SnapshotStore {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot file. A missing file gives an empty ledger.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Snapshot file not found, starting with an empty ledger");
            return Ok(Self::from_snapshot(Snapshot::default()));
        }

        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        info!(
            path = %path.display(),
            transactions = snapshot.transactions.len(),
            budgets = snapshot.budgets.len(),
            goals = snapshot.goals.len(),
            "Loaded ledger snapshot"
        );

        Ok(Self::from_snapshot(snapshot))
    }
}

impl TransactionStore for SnapshotStore {
    fn list_transactions(&self) -> AppResult<Vec<Transaction>> {
        Ok(self.snapshot.transactions.clone())
    }

    fn list_budgets(&self) -> AppResult<Vec<Budget>> {
        Ok(self.snapshot.budgets.clone())
    }

    fn list_goals(&self) -> AppResult<Vec<Goal>> {
        Ok(self.snapshot.goals.clone())
    }

    fn load_settings(&self) -> AppResult<Settings> {
        Ok(self.snapshot.settings.clone())
    }
}
