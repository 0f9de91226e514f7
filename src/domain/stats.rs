use serde::{Deserialize, Serialize};

use super::{Cents, DateWindow, Transaction, TransactionType, TypeFilter, average_cents};

/// Totals and counts for the transactions inside a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub total_expense: Cents,
    pub total_revenue: Cents,
    /// Revenue minus expense; may be negative
    pub net_income: Cents,
    pub expense_count: usize,
    pub revenue_count: usize,
    pub transaction_count: usize,
    pub average_expense: Cents,
    pub average_revenue: Cents,
}

impl PeriodStats {
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// Share of revenue kept after expenses, in percent. 0 without revenue.
    pub fn savings_rate(&self) -> f64 {
        if self.total_revenue <= 0 {
            0.0
        } else {
            self.net_income as f64 / self.total_revenue as f64 * 100.0
        }
    }
}

/// Aggregate the transactions dated inside `window` whose type passes
/// `filter`.
pub fn compute_stats(
    transactions: &[Transaction],
    window: &DateWindow,
    filter: TypeFilter,
) -> PeriodStats {
    let (total_expense, expense_count, total_revenue, revenue_count) = transactions
        .iter()
        .filter(|t| window.contains(t.date) && filter.matches(t.transaction_type))
        .fold((0 as Cents, 0, 0 as Cents, 0), |(exp, exp_n, rev, rev_n), t| {
            match t.transaction_type {
                TransactionType::Expense => (exp.saturating_add(t.amount), exp_n + 1, rev, rev_n),
                TransactionType::Revenue => (exp, exp_n, rev.saturating_add(t.amount), rev_n + 1),
            }
        });

    PeriodStats {
        total_expense,
        total_revenue,
        net_income: total_revenue.saturating_sub(total_expense),
        expense_count,
        revenue_count,
        transaction_count: expense_count + revenue_count,
        average_expense: average_cents(total_expense, expense_count),
        average_revenue: average_cents(total_revenue, revenue_count),
    }
}
