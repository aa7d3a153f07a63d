use crate::models::Transaction;
use crate::services::amount::round2;
use crate::services::analytics::category_totals;
use crate::services::colors::{self, brightness_variant};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// How many transactions a category card lists as recent.
const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownSummary {
    pub total: f64,
    /// `None` when there are no transactions.
    pub mean: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySlice {
    #[serde(flatten)]
    pub point: MonthlyPoint,
    pub color: String,
}

/// Per-category trend card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
    pub category: String,
    pub color: String,
    pub summary: BreakdownSummary,
    pub months: Vec<MonthlySlice>,
    pub recent: Vec<Transaction>,
}

/// Per-month totals, ascending by month. Undated transactions count for this month.
pub fn by_month(transactions: &[Transaction]) -> Vec<MonthlyPoint> {
    by_month_at(transactions, Local::now().date_naive())
}

pub fn by_month_at(transactions: &[Transaction], today: NaiveDate) -> Vec<MonthlyPoint> {
    let mut monthly: BTreeMap<String, f64> = BTreeMap::new();

    for transaction in transactions {
        let key = month_key(transaction.date.as_deref(), today);
        *monthly.entry(key).or_insert(0.0) += transaction.parsed_amount();
    }

    monthly
        .into_iter()
        .map(|(month, total)| MonthlyPoint {
            month,
            total_amount: round2(total),
        })
        .collect()
}

pub fn summarize(transactions: &[Transaction]) -> BreakdownSummary {
    let total: f64 = transactions.iter().map(Transaction::parsed_amount).sum();
    let count = transactions.len();
    let mean = if count > 0 {
        Some(round2(total / count as f64))
    } else {
        None
    };

    BreakdownSummary {
        total: round2(total),
        mean,
        count,
    }
}

pub fn category_trends(transactions: &[Transaction]) -> Vec<CategoryTrend> {
    category_trends_at(transactions, Local::now().date_naive())
}

/// One trend card per expense category, largest category first.
pub fn category_trends_at(transactions: &[Transaction], today: NaiveDate) -> Vec<CategoryTrend> {
    let mut totals = category_totals(transactions);
    let names: Vec<&str> = totals.iter().map(|(name, _)| name.as_str()).collect();
    let color_map = colors::assign(&names);

    totals.sort_by(|a, b| b.1.total_cmp(&a.1));

    totals
        .iter()
        .map(|(category, _)| {
            let members: Vec<Transaction> = transactions
                .iter()
                .filter(|t| t.is_expense() && t.category_label() == category.as_str())
                .cloned()
                .collect();
            let color = color_map.color_of(category);

            let months = by_month_at(&members, today)
                .into_iter()
                .enumerate()
                .map(|(i, point)| MonthlySlice {
                    point,
                    color: brightness_variant(color, -20.0 + 15.0 * i as f64),
                })
                .collect();

            CategoryTrend {
                category: category.clone(),
                color: color.to_string(),
                summary: summarize(&members),
                months,
                recent: members.iter().take(RECENT_LIMIT).cloned().collect(),
            }
        })
        .collect()
}

/// `YYYY-MM` for a ledger date; unparseable or missing dates map to `today`'s month.
pub fn month_key(date: Option<&str>, today: NaiveDate) -> String {
    let parsed = date.map(str::trim).and_then(parse_ledger_date);
    let date = parsed.unwrap_or(today);
    format!("{:04}-{:02}", date.year(), date.month())
}

pub(crate) fn parse_ledger_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    None
}
