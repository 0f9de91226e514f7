use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::{Cents, MonthRef, Transaction, TransactionType};

/// Income and spending for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyOverviewItem {
    pub month: u32,
    pub year: i32,
    pub expense_total: Cents,
    pub revenue_total: Cents,
    pub net_income: Cents,
}

impl MonthlyOverviewItem {
    pub fn empty(month: MonthRef) -> Self {
        Self {
            month: month.month,
            year: month.year,
            expense_total: 0,
            revenue_total: 0,
            net_income: 0,
        }
    }

    pub fn month_ref(&self) -> MonthRef {
        MonthRef::new(self.year, self.month)
    }

    pub fn has_activity(&self) -> bool {
        self.expense_total != 0 || self.revenue_total != 0
    }
}

/// Twelve items, January to December, zero-filled for quiet months.
pub fn compute_monthly_overview(
    transactions: &[Transaction],
    year: i32,
) -> Vec<MonthlyOverviewItem> {
    let mut items: Vec<MonthlyOverviewItem> = (1..=12)
        .map(|month| MonthlyOverviewItem::empty(MonthRef::new(year, month)))
        .collect();

    for transaction in transactions.iter().filter(|t| t.date.year() == year) {
        let item = &mut items[transaction.date.month0() as usize];
        match transaction.transaction_type {
            TransactionType::Expense => {
                item.expense_total = item.expense_total.saturating_add(transaction.amount)
            }
            TransactionType::Revenue => {
                item.revenue_total = item.revenue_total.saturating_add(transaction.amount)
            }
        }
    }

    for item in &mut items {
        item.net_income = item.revenue_total.saturating_sub(item.expense_total);
    }

    items
}
