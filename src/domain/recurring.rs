use serde::{Deserialize, Serialize};

use super::{Cents, RecurringFrequency, Transaction, TransactionType};

/// Monthly-equivalent totals of recurring transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringSummary {
    pub monthly_expense: Cents,
    pub monthly_revenue: Cents,
    pub monthly_net: Cents,
    pub recurring_count: usize,
}

/// Recurring transactions without a frequency are treated as monthly.
pub fn summarize_recurring(transactions: &[Transaction]) -> RecurringSummary {
    let mut summary = RecurringSummary::default();

    for transaction in transactions.iter().filter(|t| t.is_recurring) {
        let frequency = transaction
            .recurring_frequency
            .unwrap_or(RecurringFrequency::Monthly);
        let monthly = frequency.monthly_equivalent(transaction.amount);
        match transaction.transaction_type {
            TransactionType::Expense => {
                summary.monthly_expense = summary.monthly_expense.saturating_add(monthly)
            }
            TransactionType::Revenue => {
                summary.monthly_revenue = summary.monthly_revenue.saturating_add(monthly)
            }
        }
        summary.recurring_count += 1;
    }

    summary.monthly_net = summary.monthly_revenue.saturating_sub(summary.monthly_expense);
    summary
}
