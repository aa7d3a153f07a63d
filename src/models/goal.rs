use serde::{Deserialize, Serialize};

use crate::models::transaction::lenient_text;
use crate::models::RawAmount;
use crate::services::amount::parse_amount;

/// A savings goal as kept by the ledger store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Goal {
    pub id: serde_json::Value,
    #[serde(deserialize_with = "lenient_text")]
    pub goal_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub category: Option<String>,
    pub target_amount: RawAmount,
    pub current_amount: RawAmount,
    #[serde(deserialize_with = "lenient_text")]
    pub deadline: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub priority: Option<String>,
}

impl Goal {
    pub fn new(name: &str, target: impl Into<RawAmount>, current: impl Into<RawAmount>) -> Self {
        Self {
            goal_name: Some(name.to_string()),
            target_amount: target.into(),
            current_amount: current.into(),
            ..Default::default()
        }
    }

    pub fn target(&self) -> f64 {
        parse_amount(&self.target_amount)
    }

    pub fn current(&self) -> f64 {
        parse_amount(&self.current_amount)
    }
}
