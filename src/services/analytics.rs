use crate::models::Transaction;
use crate::services::amount::round2;
use crate::services::colors;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    pub category: String,
    pub total_amount: f64,
    pub percentage: u32,
    pub color: String,
}

/// Totals and category shares for one snapshot of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub income_total: f64,
    pub expense_total: f64,
    pub net: f64,
    pub transaction_count: usize,
    pub categories: Vec<CategoryAggregate>,
}

pub fn aggregate(transactions: &[Transaction]) -> AggregateReport {
    let income_total: f64 = transactions
        .iter()
        .filter(|t| t.is_income())
        .map(Transaction::parsed_amount)
        .sum();
    let expense_total: f64 = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(Transaction::parsed_amount)
        .sum();

    let income_total = round2(income_total);
    let expense_total = round2(expense_total);

    AggregateReport {
        income_total,
        expense_total,
        net: round2(income_total - expense_total),
        transaction_count: transactions.len(),
        categories: spending_by_category(transactions),
    }
}

/// Expense totals per category, largest first, with integer percentage shares.
///
/// Percentages are rounded independently, so their sum may be off 100 by up to
/// `n - 1`. With no expenses every percentage is 0.
pub fn spending_by_category(transactions: &[Transaction]) -> Vec<CategoryAggregate> {
    let totals = category_totals(transactions);

    let names: Vec<&str> = totals.iter().map(|(name, _)| name.as_str()).collect();
    let color_map = colors::assign(&names);

    let grand_total: f64 = totals.iter().map(|(_, total)| total).sum();

    let mut result: Vec<CategoryAggregate> = totals
        .iter()
        .map(|(category, total_amount)| CategoryAggregate {
            category: category.clone(),
            total_amount: *total_amount,
            percentage: share_percent(*total_amount, grand_total),
            color: color_map.color_of(category).to_string(),
        })
        .collect();

    // stable: ties keep encounter order
    result.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    result
}

/// Rounded expense totals per category label, in encounter order.
pub(crate) fn category_totals(transactions: &[Transaction]) -> Vec<(String, f64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, f64)> = Vec::new();

    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        let category = transaction.category_label();
        let slot = *index.entry(category).or_insert_with(|| {
            totals.push((category.to_string(), 0.0));
            totals.len() - 1
        });
        totals[slot].1 += transaction.parsed_amount();
    }

    for (_, total) in &mut totals {
        *total = round2(*total);
    }
    totals
}

fn share_percent(amount: f64, grand_total: f64) -> u32 {
    if grand_total > 0.0 {
        (amount / grand_total * 100.0).round() as u32
    } else {
        0
    }
}
