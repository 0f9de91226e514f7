use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CategoryId, Cents, DateWindow, MonthRef, percentage_of};

pub type BudgetId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[serde(alias = "Daily")]
    Daily,
    #[serde(alias = "Weekly")]
    Weekly,
    #[serde(alias = "Monthly")]
    Monthly,
    #[serde(alias = "Yearly")]
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Daily => "daily",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(BudgetPeriod::Daily),
            "weekly" => Some(BudgetPeriod::Weekly),
            "monthly" => Some(BudgetPeriod::Monthly),
            "yearly" => Some(BudgetPeriod::Yearly),
            _ => None,
        }
    }

    /// The period containing `today`. Weeks start on Monday.
    pub fn current_period(&self, today: NaiveDate) -> Option<DateWindow> {
        match self {
            BudgetPeriod::Daily => DateWindow::new(today, today).ok(),
            BudgetPeriod::Weekly => {
                let offset = today.weekday().num_days_from_monday() as u64;
                let start = today.checked_sub_days(Days::new(offset))?;
                let end = start.checked_add_days(Days::new(6))?;
                DateWindow::new(start, end).ok()
            }
            BudgetPeriod::Monthly => DateWindow::month(MonthRef::of(today)),
            BudgetPeriod::Yearly => DateWindow::year(today.year()),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending limit for one category over a recurring period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub category_id: CategoryId,
    pub limit: Cents,
    /// Maintained by the store, not derived by analytics
    #[serde(default)]
    pub spent: Cents,
    pub period: BudgetPeriod,
    /// Usage percentage (0-100) at which an alert fires
    pub alert_threshold: f64,
}

impl Budget {
    pub fn new(
        category_id: CategoryId,
        limit: Cents,
        period: BudgetPeriod,
        alert_threshold: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            limit,
            spent: 0,
            period,
            alert_threshold,
        }
    }

    pub fn usage_percentage(&self) -> f64 {
        percentage_of(self.spent, self.limit)
    }

    pub fn remaining(&self) -> Cents {
        self.limit.saturating_sub(self.spent)
    }

    pub fn is_exceeded(&self) -> bool {
        self.spent > self.limit
    }

    pub fn is_alert_triggered(&self) -> bool {
        if self.limit == 0 {
            return self.spent > 0;
        }
        self.usage_percentage() >= self.alert_threshold
    }

    pub fn current_period(&self, today: NaiveDate) -> Option<DateWindow> {
        self.period.current_period(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_budget_period_roundtrip() {
        for period in [
            BudgetPeriod::Daily,
            BudgetPeriod::Weekly,
            BudgetPeriod::Monthly,
            BudgetPeriod::Yearly,
        ] {
            assert_eq!(BudgetPeriod::from_str(period.as_str()), Some(period));
        }
    }

    #[test]
    fn test_weekly_period_starts_monday() {
        // 2024-01-17 is a Wednesday
        let window = BudgetPeriod::Weekly.current_period(date(2024, 1, 17)).unwrap();
        assert_eq!(window.start(), date(2024, 1, 15));
        assert_eq!(window.end(), date(2024, 1, 21));
    }

    #[test]
    fn test_monthly_period() {
        let window = BudgetPeriod::Monthly.current_period(date(2024, 1, 15)).unwrap();
        assert_eq!(window.start(), date(2024, 1, 1));
        assert_eq!(window.end(), date(2024, 1, 31));
    }

    #[test]
    fn test_yearly_period() {
        let window = BudgetPeriod::Yearly.current_period(date(2024, 6, 15)).unwrap();
        assert_eq!(window.start(), date(2024, 1, 1));
        assert_eq!(window.end(), date(2024, 12, 31));
    }

    #[test]
    fn test_usage_and_alerts() {
        let mut budget = Budget::new(Uuid::new_v4(), 40000, BudgetPeriod::Monthly, 80.0);
        budget.spent = 30000;
        assert_eq!(budget.usage_percentage(), 75.0);
        assert_eq!(budget.remaining(), 10000);
        assert!(!budget.is_alert_triggered());

        budget.spent = 32000;
        assert!(budget.is_alert_triggered());
        assert!(!budget.is_exceeded());

        budget.spent = 45000;
        assert!(budget.is_exceeded());
        assert_eq!(budget.remaining(), -5000);
    }

    #[test]
    fn test_zero_limit_budget() {
        let mut budget = Budget::new(Uuid::new_v4(), 0, BudgetPeriod::Daily, 50.0);
        assert!(!budget.is_alert_triggered());
        budget.spent = 1;
        assert!(budget.is_alert_triggered());
    }
}
