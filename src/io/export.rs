use std::io::Write;

use anyhow::Result;

use crate::application::{AnalyticsService, BreakdownReport, OverviewReport, StatsReport};
use crate::domain::{BalanceTrend, OTHER_CATEGORY_NAME, Projection, format_cents};

use super::TRANSACTION_COLUMNS;

/// Writes store contents and reports as CSV or JSON.
pub struct Exporter<'a> {
    service: &'a AnalyticsService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a AnalyticsService) -> Self {
        Self { service }
    }

    /// Export transactions in the same layout the importer reads. Categories
    /// are written by name; a deleted category is written as "Other", the
    /// same bucket the breakdown uses.
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let store = self.service.store();
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(TRANSACTION_COLUMNS)?;

        let mut transactions: Vec<_> = store.transactions().iter().collect();
        transactions.sort_by_key(|t| t.date);

        for transaction in &transactions {
            let category = store
                .get_category(transaction.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| OTHER_CATEGORY_NAME.to_string());
            csv_writer.write_record([
                transaction.transaction_type.as_str().to_string(),
                format_cents(transaction.amount),
                category,
                transaction.date.format("%Y-%m-%d").to_string(),
                transaction.description.clone().unwrap_or_default(),
                transaction.is_recurring.to_string(),
                transaction
                    .recurring_frequency
                    .map(|f| f.as_str().to_string())
                    .unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export the whole store as a JSON snapshot the fixture loader can read.
    pub fn export_snapshot_json<W: Write>(&self, writer: W) -> Result<usize> {
        let data = self.service.store().to_data();
        let count = data.transactions.len() + data.categories.len() + data.budgets.len();
        data.to_writer(writer)?;
        Ok(count)
    }

    /// One header row and one value row; amounts in cents.
    pub fn export_stats_csv<W: Write>(&self, report: &StatsReport, writer: W) -> Result<usize> {
        let stats = &report.stats;
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "total_expense",
            "total_revenue",
            "net_income",
            "expense_count",
            "revenue_count",
            "transaction_count",
            "average_expense",
            "average_revenue",
        ])?;
        csv_writer.write_record([
            stats.total_expense.to_string(),
            stats.total_revenue.to_string(),
            stats.net_income.to_string(),
            stats.expense_count.to_string(),
            stats.revenue_count.to_string(),
            stats.transaction_count.to_string(),
            stats.average_expense.to_string(),
            stats.average_revenue.to_string(),
        ])?;
        csv_writer.flush()?;
        Ok(1)
    }

    pub fn export_breakdown_csv<W: Write>(
        &self,
        report: &BreakdownReport,
        writer: W,
    ) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["category", "amount_cents", "count", "percentage"])?;
        for item in &report.breakdown.items {
            csv_writer.write_record([
                item.name.clone(),
                item.amount.to_string(),
                item.count.to_string(),
                format!("{:.2}", item.percentage),
            ])?;
        }
        csv_writer.flush()?;
        Ok(report.breakdown.items.len())
    }

    pub fn export_overview_csv<W: Write>(
        &self,
        report: &OverviewReport,
        writer: W,
    ) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["year", "month", "expense_cents", "revenue_cents", "net_cents"])?;
        for item in &report.months {
            csv_writer.write_record([
                item.year.to_string(),
                item.month.to_string(),
                item.expense_total.to_string(),
                item.revenue_total.to_string(),
                item.net_income.to_string(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(report.months.len())
    }

    pub fn export_trend_csv<W: Write>(&self, trend: &BalanceTrend, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["period", "balance_cents"])?;
        for point in &trend.points {
            csv_writer.write_record([point.period.label(), point.balance.to_string()])?;
        }
        csv_writer.flush()?;
        Ok(trend.points.len())
    }

    pub fn export_projection_csv<W: Write>(
        &self,
        projection: &Projection,
        writer: W,
    ) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["month", "estimated_balance_cents", "status"])?;
        for point in &projection.points {
            csv_writer.write_record([
                point.month.to_string(),
                point.estimated_balance.to_string(),
                point.status.as_str().to_string(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(projection.points.len())
    }
}
