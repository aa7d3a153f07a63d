use axum::extract::{Query, State};
use axum::response::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::Transaction;
use crate::services::analytics::{self, AggregateReport, CategoryAggregate};
use crate::services::budget_progress::{self, BudgetTier};
use crate::services::monthly::{self, parse_ledger_date, CategoryTrend, MonthlyPoint};
use crate::state::AppState;

/// Optional `YYYY-MM-DD` bounds, both inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsParams {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl AnalyticsParams {
    fn bound(value: &Option<String>, name: &str) -> AppResult<Option<NaiveDate>> {
        match value.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| AppError::Validation(format!("Invalid {}: {}", name, s))),
        }
    }

    /// Keep transactions dated inside the range. Undated or unparseable
    /// transactions are only kept when no bound is given.
    pub fn apply(&self, transactions: Vec<Transaction>) -> AppResult<Vec<Transaction>> {
        let from = Self::bound(&self.from_date, "from_date")?;
        let to = Self::bound(&self.to_date, "to_date")?;
        if from.is_none() && to.is_none() {
            return Ok(transactions);
        }

        Ok(transactions
            .into_iter()
            .filter(|t| {
                let Some(date) = t.date.as_deref().and_then(|d| parse_ledger_date(d.trim()))
                else {
                    return false;
                };
                from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatusView {
    pub name: String,
    pub period: Option<String>,
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
    pub ratio_percent: f64,
    pub tier: BudgetTier,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressView {
    pub goal_name: String,
    pub category: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub percent: f64,
    pub remaining: f64,
    pub reached: bool,
    pub deadline: Option<String>,
}

fn ledger(state: &AppState, params: &AnalyticsParams) -> AppResult<Vec<Transaction>> {
    params.apply(state.store.list_transactions()?)
}

pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<Json<AggregateReport>> {
    let transactions = ledger(&state, &params)?;
    Ok(Json(analytics::aggregate(&transactions)))
}

pub async fn spending_by_category(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<Json<Vec<CategoryAggregate>>> {
    let transactions = ledger(&state, &params)?;
    Ok(Json(analytics::spending_by_category(&transactions)))
}

/// Monthly expense totals.
pub async fn monthly(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<Json<Vec<MonthlyPoint>>> {
    let expenses: Vec<Transaction> = ledger(&state, &params)?
        .into_iter()
        .filter(Transaction::is_expense)
        .collect();
    Ok(Json(monthly::by_month(&expenses)))
}

pub async fn category_trends(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<Json<Vec<CategoryTrend>>> {
    let transactions = ledger(&state, &params)?;
    Ok(Json(monthly::category_trends(&transactions)))
}

pub async fn budget_status(State(state): State<AppState>) -> AppResult<Json<Vec<BudgetStatusView>>> {
    let budgets = state.store.list_budgets()?;

    let views = budgets
        .into_iter()
        .map(|budget| {
            let progress = budget.progress();
            BudgetStatusView {
                limit: budget.limit_amount(),
                spent: budget.spent_amount(),
                remaining: budget.remaining(),
                ratio_percent: progress.ratio_percent,
                tier: progress.tier,
                name: budget.name.unwrap_or_default(),
                period: budget.period,
            }
        })
        .collect();

    Ok(Json(views))
}

pub async fn goal_progress(State(state): State<AppState>) -> AppResult<Json<Vec<GoalProgressView>>> {
    let goals = state.store.list_goals()?;

    let views = goals
        .into_iter()
        .map(|goal| {
            let target = goal.target();
            let current = goal.current();
            let progress = budget_progress::goal_progress(current, Some(target));
            GoalProgressView {
                goal_name: goal.goal_name.unwrap_or_default(),
                category: goal.category,
                target_amount: target,
                current_amount: current,
                percent: progress.percent,
                remaining: progress.remaining,
                reached: progress.reached,
                deadline: goal.deadline,
            }
        })
        .collect();

    Ok(Json(views))
}
