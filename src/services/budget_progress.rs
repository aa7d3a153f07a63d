use serde::Serialize;

pub const WARNING_THRESHOLD: f64 = 75.0;
pub const CRITICAL_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Normal,
    Warning,
    Critical,
}

impl BudgetTier {
    pub fn from_ratio(ratio_percent: f64) -> Self {
        if ratio_percent > CRITICAL_THRESHOLD {
            Self::Critical
        } else if ratio_percent > WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    /// `spent / limit * 100`, not clamped to 100.
    pub ratio_percent: f64,
    pub tier: BudgetTier,
}

/// Spent-to-limit ratio and its tier. A zero, negative or missing limit divides by 1.
pub fn status(spent: f64, limit: Option<f64>) -> BudgetProgress {
    let ratio_percent = ratio_percent(spent, limit);
    BudgetProgress {
        ratio_percent,
        tier: BudgetTier::from_ratio(ratio_percent),
    }
}

fn ratio_percent(amount: f64, denominator: Option<f64>) -> f64 {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let denominator = match denominator {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => 1.0,
    };
    amount / denominator * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// `current / target * 100`, not clamped to 100.
    pub percent: f64,
    /// What is still missing to reach the target; never negative.
    pub remaining: f64,
    pub reached: bool,
}

pub fn goal_progress(current: f64, target: Option<f64>) -> GoalProgress {
    let percent = ratio_percent(current, target);
    let remaining = (target.unwrap_or(0.0) - current).max(0.0);
    GoalProgress {
        percent,
        remaining,
        reached: percent >= 100.0,
    }
}
