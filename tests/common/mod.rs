// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use finlens::domain::{Category, CategoryId, Cents, Transaction, TransactionType};
use finlens::{AnalyticsConfig, AnalyticsService, Store};

/// Helper to create a service over the preset categories
pub fn test_service() -> AnalyticsService {
    AnalyticsService::new(Store::with_presets(), AnalyticsConfig::default())
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Helper to look up a preset category by name
pub fn category(service: &AnalyticsService, name: &str) -> Category {
    service.resolve_category(name).unwrap()
}

/// Record one transaction against a category looked up by name
pub fn record(
    service: &mut AnalyticsService,
    transaction_type: TransactionType,
    amount: Cents,
    category_name: &str,
    date: &str,
) -> Result<Transaction> {
    let category_id: CategoryId = category(service, category_name).id;
    let transaction = Transaction::new(transaction_type, amount, category_id, parse_date(date));
    Ok(service.record_transaction(transaction)?)
}

/// Test fixture: a few months of salary and spending
pub struct SampleLedger;

impl SampleLedger {
    /// January and February 2024, as in the period stats example
    pub fn create_basic(service: &mut AnalyticsService) -> Result<()> {
        record(service, TransactionType::Expense, 100, "Food & Dining", "2024-01-05")?;
        record(service, TransactionType::Revenue, 500, "Salary", "2024-01-10")?;
        record(service, TransactionType::Expense, 50, "Transportation", "2024-02-01")?;
        Ok(())
    }

    /// Six months of salary with rent and groceries, ending June 2024
    pub fn create_half_year(service: &mut AnalyticsService) -> Result<()> {
        for month in 1..=6 {
            let day = |d: u32| format!("2024-{:02}-{:02}", month, d);
            record(service, TransactionType::Revenue, 300_000, "Salary", &day(1))?;
            record(service, TransactionType::Expense, 120_000, "Housing", &day(3))?;
            record(service, TransactionType::Expense, 45_000, "Food & Dining", &day(15))?;
        }
        Ok(())
    }
}
