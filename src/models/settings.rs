use crate::filters;
use serde::{Deserialize, Serialize};

/// Per-user display preferences, loaded by the store and handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currency: String,
    pub locale: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "INR".into(),
            locale: "en-IN".into(),
        }
    }
}

impl Settings {
    pub fn currency_symbol(&self) -> &'static str {
        filters::currency_symbol(&self.currency)
    }

    /// Format an amount as plain text, e.g. `₹1,234.50`.
    pub fn format_amount(&self, amount: f64) -> String {
        filters::format_amount(amount, &self.currency, &self.locale)
    }
}
