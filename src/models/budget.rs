use serde::{Deserialize, Serialize};

use crate::models::transaction::lenient_text;
use crate::models::RawAmount;
use crate::services::amount::parse_amount;
use crate::services::budget_progress::{self, BudgetProgress};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Budget {
    pub id: serde_json::Value,
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    pub limit: RawAmount,
    pub spent: RawAmount,
    #[serde(deserialize_with = "lenient_text")]
    pub period: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
}

impl Budget {
    pub fn new(name: &str, limit: impl Into<RawAmount>, spent: impl Into<RawAmount>) -> Self {
        Self {
            name: Some(name.to_string()),
            limit: limit.into(),
            spent: spent.into(),
            period: Some("monthly".into()),
            ..Default::default()
        }
    }

    pub fn limit_amount(&self) -> f64 {
        parse_amount(&self.limit)
    }

    pub fn spent_amount(&self) -> f64 {
        parse_amount(&self.spent)
    }

    /// Limit minus spent. Negative when the budget is overspent.
    pub fn remaining(&self) -> f64 {
        self.limit_amount() - self.spent_amount()
    }

    pub fn progress(&self) -> BudgetProgress {
        budget_progress::status(self.spent_amount(), Some(self.limit_amount()))
    }
}
