//! Ranks expense categories by how much was spent in each.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// The most categories a summary will contain.
pub const MAX_SUMMARY_CATEGORIES: usize = 8;

/// The spending in a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// The category name, exactly as recorded on the transactions.
    pub category: String,
    /// The sum of the amounts in this category.
    pub total: f64,
    /// How many transactions were counted.
    pub count: u32,
    /// `total` divided by the largest total in the summary, in `0.0..=1.0`.
    pub ratio: f64,
}

/// Group `transactions` by category and rank the groups by total, largest first.
///
/// Transactions with a zero amount or an empty category are skipped. Only the
/// [MAX_SUMMARY_CATEGORIES] largest categories are returned. Categories with
/// equal totals keep the order in which they were first seen.
pub fn summarize_by_category(transactions: &[Transaction]) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        if !is_countable(transaction) {
            continue;
        }

        let index = *index_by_category
            .entry(transaction.category.as_str())
            .or_insert_with(|| {
                summaries.push(CategorySummary {
                    category: transaction.category.clone(),
                    total: 0.0,
                    count: 0,
                    ratio: 0.0,
                });
                summaries.len() - 1
            });

        summaries[index].total += transaction.amount;
        summaries[index].count += 1;
    }

    // `sort_by` is stable, which keeps ties in first-seen order.
    summaries.sort_by(|a, b| b.total.total_cmp(&a.total));
    summaries.truncate(MAX_SUMMARY_CATEGORIES);

    let max_total = summaries.first().map_or(0.0, |summary| summary.total);
    if max_total > 0.0 {
        for summary in &mut summaries {
            summary.ratio = summary.total / max_total;
        }
    }

    summaries
}

fn is_countable(transaction: &Transaction) -> bool {
    let has_amount = transaction.amount != 0.0 && !transaction.amount.is_nan();

    has_amount && !transaction.category.is_empty()
}
