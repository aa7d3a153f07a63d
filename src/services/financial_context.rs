use crate::error::AppResult;
use crate::filters;
use crate::models::Settings;
use crate::services::analytics::{self, CategoryAggregate};
use crate::store::TransactionStore;
use serde::Serialize;

/// How many categories the advisor prompt mentions.
const PROMPT_CATEGORIES: usize = 5;

/// Headline numbers for the insights page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightStats {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub transactions: usize,
    pub budgets: usize,
    pub goals: usize,
}

impl InsightStats {
    pub fn collect(store: &dyn TransactionStore) -> AppResult<Self> {
        let report = analytics::aggregate(&store.list_transactions()?);
        Ok(Self {
            income: report.income_total,
            expenses: report.expense_total,
            net: report.net,
            transactions: report.transaction_count,
            budgets: store.list_budgets()?.len(),
            goals: store.list_goals()?.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub name: String,
    pub spent: f64,
    pub limit: f64,
    pub ratio_percent: f64,
}

/// The ledger summarized for an advisor prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialContext {
    pub stats: InsightStats,
    pub settings: Settings,
    pub top_categories: Vec<CategoryAggregate>,
    pub budgets: Vec<BudgetLine>,
}

impl FinancialContext {
    pub fn collect(store: &dyn TransactionStore) -> AppResult<Self> {
        let transactions = store.list_transactions()?;
        let budgets = store
            .list_budgets()?
            .iter()
            .map(|b| BudgetLine {
                name: b.name.clone().unwrap_or_default(),
                spent: b.spent_amount(),
                limit: b.limit_amount(),
                ratio_percent: b.progress().ratio_percent,
            })
            .collect();

        let mut top_categories = analytics::spending_by_category(&transactions);
        top_categories.truncate(PROMPT_CATEGORIES);

        Ok(Self {
            stats: InsightStats::collect(store)?,
            settings: store.load_settings()?,
            top_categories,
            budgets,
        })
    }

    /// Plain-text rendering, one fact per line, amounts in the user's currency.
    pub fn describe(&self) -> String {
        let money = |amount: f64| self.settings.format_amount(amount);
        let percent = |value: f64| filters::format_percent(value, &self.settings.locale);

        let mut lines = vec![
            format!("Currency: {}", self.settings.currency),
            format!("Total income: {}", money(self.stats.income)),
            format!("Total expenses: {}", money(self.stats.expenses)),
            format!("Net savings: {}", money(self.stats.net)),
            format!("Transactions: {}", self.stats.transactions),
        ];

        if !self.top_categories.is_empty() {
            let categories = self
                .top_categories
                .iter()
                .map(|c| format!("{} {} ({}%)", c.category, money(c.total_amount), c.percentage))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("Top spending categories: {}", categories));
        }

        for budget in &self.budgets {
            lines.push(format!(
                "Budget {}: {} of {} used ({})",
                budget.name,
                money(budget.spent),
                money(budget.limit),
                percent(budget.ratio_percent)
            ));
        }

        if self.stats.goals > 0 {
            lines.push(format!("Savings goals: {}", self.stats.goals));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Goal, Transaction};
    use crate::store::{Snapshot, SnapshotStore};

    fn store() -> SnapshotStore {
        SnapshotStore::from_snapshot(Snapshot {
            transactions: vec![
                Transaction::expense("Food", 300.0),
                Transaction::expense("Transport", "100"),
                Transaction::income(1000.0),
            ],
            budgets: vec![Budget::new("Food", 400.0, 300.0)],
            goals: vec![Goal::new("Car", 50000.0, 1000.0)],
            settings: Settings::default(),
        })
    }

    #[test]
    fn test_stats() {
        let stats = InsightStats::collect(&store()).unwrap();
        assert_eq!(stats.income, 1000.0);
        assert_eq!(stats.expenses, 400.0);
        assert_eq!(stats.net, 600.0);
        assert_eq!(stats.transactions, 3);
        assert_eq!(stats.budgets, 1);
        assert_eq!(stats.goals, 1);
    }

    #[test]
    fn test_describe() {
        let context = FinancialContext::collect(&store()).unwrap();
        let text = context.describe();
        assert!(text.contains("Currency: INR"));
        assert!(text.contains("Total expenses: ₹400.00"));
        assert!(text.contains("Food ₹300.00 (75%), Transport ₹100.00 (25%)"));
        assert!(text.contains("Budget Food: ₹300.00 of ₹400.00 used"));
        assert!(text.contains("Savings goals: 1"));
    }

    #[test]
    fn test_describe_empty_ledger() {
        let store = SnapshotStore::from_snapshot(Snapshot::default());
        let text = FinancialContext::collect(&store).unwrap().describe();
        assert!(text.contains("Transactions: 0"));
        assert!(!text.contains("Top spending categories"));
    }
}
