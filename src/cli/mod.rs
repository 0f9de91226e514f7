use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::application::{AnalyticsQuery, AnalyticsService};
use crate::config::AnalyticsConfig;
use crate::domain::{
    BalanceTrend, Cents, MonthRef, Notice, PeriodStats, Projection, Recommendation, TypeFilter,
    format_cents, parse_cents,
};
use crate::io::{Exporter, ImportOptions, Importer, parse_date};
use crate::storage::Store;

/// finlens - personal finance analytics
#[derive(Parser)]
#[command(name = "finlens")]
#[command(about = "Period stats, category breakdowns, balance trends and projections")]
#[command(version)]
pub struct Cli {
    /// JSON fixture with transactions, categories and budgets
    /// (preset categories only when omitted)
    #[arg(short, long, env = "FINLENS_DATA")]
    pub data: Option<PathBuf>,

    /// JSON file with analytics settings
    #[arg(short, long, env = "FINLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Totals and counts for a period
    Stats {
        #[command(flatten)]
        range: RangeArgs,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Spending or income grouped by category
    Breakdown {
        #[command(flatten)]
        range: RangeArgs,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Month-by-month totals for a calendar year
    Overview {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Past balances reconstructed from the current balance
    Trend {
        #[command(flatten)]
        balance: BalanceArgs,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Project the balance forward using the recent monthly average
    Project {
        #[command(flatten)]
        balance: BalanceArgs,

        /// Number of months to project (defaults to the configured value)
        #[arg(short, long)]
        months: Option<u32>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Suggestions based on the period and the projection
    Recommend {
        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        balance: BalanceArgs,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Every report at once
    Dashboard {
        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        balance: BalanceArgs,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Budget usage for the current period
    Budgets {
        /// Reference day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Monthly cost of recurring transactions
    Recurring {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List categories, pinned first
    Categories {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Import transactions from CSV
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Validate without importing
        #[arg(long)]
        dry_run: bool,

        /// Create categories that don't exist
        #[arg(long)]
        create_categories: bool,

        /// Write the resulting data set as a JSON fixture
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export data: transactions (csv) or snapshot (json)
    Export {
        /// What to export: transactions, snapshot
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
pub struct RangeArgs {
    /// Start date (YYYY-MM-DD or RFC 3339, defaults to start of current month)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD or RFC 3339, defaults to today)
    #[arg(long)]
    pub to: Option<String>,

    /// Transaction type: expense, revenue, both
    #[arg(short = 't', long = "type", default_value = "both")]
    pub type_filter: String,
}

#[derive(clap::Args)]
pub struct BalanceArgs {
    /// Current balance (defaults to the sum of all transactions up to --as-of)
    #[arg(short, long, allow_hyphen_values = true)]
    pub balance: Option<String>,

    /// Reference day (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub as_of: Option<String>,
}

impl Cli {
    fn build_service(&self) -> Result<AnalyticsService> {
        let config = AnalyticsConfig::load(self.config.as_deref())?;
        let store = match &self.data {
            Some(path) => Store::load_fixture(path)?,
            None => Store::with_presets(),
        };
        Ok(AnalyticsService::new(store, config))
    }

    pub fn run(self) -> Result<()> {
        let mut service = self.build_service()?;

        match self.command {
            Commands::Stats { range, format } => {
                let query = build_query(&range)?;
                let report = service.stats(&query)?;
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                    "csv" => {
                        Exporter::new(&service).export_stats_csv(&report, io::stdout())?;
                    }
                    _ => {
                        println!("Period Statistics ({})", report.type_filter);
                        println!(
                            "Period: {} to {}",
                            report.window.start(),
                            report.window.end()
                        );
                        println!();
                        print_stats(&report.stats);
                        print_notices(&report.notices);
                    }
                }
            }

            Commands::Breakdown { range, format } => {
                let query = build_query(&range)?;
                let report = service.category_breakdown(&query)?;
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                    "csv" => {
                        Exporter::new(&service).export_breakdown_csv(&report, io::stdout())?;
                    }
                    _ => {
                        println!("Category Breakdown ({})", report.type_filter);
                        println!(
                            "Period: {} to {}",
                            report.window.start(),
                            report.window.end()
                        );
                        println!();
                        println!(
                            "{:<20} {:>12} {:>8} {:>8}",
                            "CATEGORY", "AMOUNT", "COUNT", "PERCENT"
                        );
                        println!("{}", "-".repeat(51));
                        for item in &report.breakdown.items {
                            println!(
                                "{:<20} {:>12} {:>8} {:>7.1}%",
                                truncate(&item.name, 20),
                                format_cents(item.amount),
                                item.count,
                                item.percentage
                            );
                        }
                        println!("{}", "-".repeat(51));
                        println!("{:<20} {:>12}", "TOTAL", format_cents(report.breakdown.total));
                        print_notices(&report.notices);
                    }
                }
            }

            Commands::Overview { year, format } => {
                let year = year.unwrap_or_else(|| Utc::now().year());
                let report = service.monthly_overview(year);
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                    "csv" => {
                        Exporter::new(&service).export_overview_csv(&report, io::stdout())?;
                    }
                    _ => {
                        println!("Monthly Overview {}", report.year);
                        println!();
                        println!(
                            "{:<10} {:>12} {:>12} {:>12}",
                            "MONTH", "EXPENSE", "REVENUE", "NET"
                        );
                        println!("{}", "-".repeat(49));
                        for item in &report.months {
                            println!(
                                "{:<10} {:>12} {:>12} {:>12}",
                                item.month_ref().label(),
                                format_cents(item.expense_total),
                                format_cents(item.revenue_total),
                                format_cents(item.net_income)
                            );
                        }
                        println!("{}", "-".repeat(49));
                        println!(
                            "{:<10} {:>12} {:>12} {:>12}",
                            "TOTAL",
                            format_cents(report.total_expense),
                            format_cents(report.total_revenue),
                            format_cents(report.net_income)
                        );
                    }
                }
            }

            Commands::Trend { balance, format } => {
                let (as_of, current) = resolve_balance(&service, &balance)?;
                let trend = service.balance_trend(as_of, current);
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&trend)?),
                    "csv" => {
                        Exporter::new(&service).export_trend_csv(&trend, io::stdout())?;
                    }
                    _ => print_trend(&trend),
                }
            }

            Commands::Project {
                balance,
                months,
                format,
            } => {
                let (as_of, current) = resolve_balance(&service, &balance)?;
                let projection = service.projection(as_of, current, months);
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&projection)?),
                    "csv" => {
                        Exporter::new(&service).export_projection_csv(&projection, io::stdout())?;
                    }
                    _ => print_projection(&projection),
                }
            }

            Commands::Recommend {
                range,
                balance,
                format,
            } => {
                let query = build_query(&range)?;
                let (as_of, current) = resolve_balance(&service, &balance)?;
                let report = service.recommendations(&query, as_of, current)?;
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                    _ => print_recommendations(&report.recommendations),
                }
            }

            Commands::Dashboard {
                range,
                balance,
                format,
            } => {
                let query = build_query(&range)?;
                let (as_of, current) = resolve_balance(&service, &balance)?;
                let dashboard = service.dashboard(&query, as_of, current)?;
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&dashboard)?),
                    _ => {
                        println!(
                            "Dashboard: {} to {} (balance {})",
                            dashboard.window.start(),
                            dashboard.window.end(),
                            format_cents(current)
                        );
                        println!();
                        print_stats(&dashboard.stats);
                        println!();
                        println!("Top Categories:");
                        for (i, item) in dashboard.breakdown.items.iter().take(5).enumerate() {
                            println!(
                                "  {}. {:<18} {:>12} ({:.1}%)",
                                i + 1,
                                truncate(&item.name, 18),
                                format_cents(item.amount),
                                item.percentage
                            );
                        }
                        println!();
                        print_trend(&dashboard.trend);
                        println!();
                        print_projection(&dashboard.projection);
                        println!();
                        print_recommendations(&dashboard.recommendations);
                        print_notices(&dashboard.notices);
                    }
                }
            }

            Commands::Budgets { today, format } => {
                let today = match today {
                    Some(s) => parse_day(&s)?,
                    None => Utc::now().date_naive(),
                };
                service.refresh_budgets(today);
                let statuses = service.budget_statuses(today);
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&statuses)?),
                    _ => {
                        if statuses.is_empty() {
                            println!("No budgets defined.");
                            return Ok(());
                        }
                        println!(
                            "{:<20} {:<8} {:>12} {:>12} {:>8}  STATUS",
                            "CATEGORY", "PERIOD", "LIMIT", "SPENT", "USED"
                        );
                        println!("{}", "-".repeat(75));
                        for status in &statuses {
                            let flag = if status.exceeded {
                                "OVER"
                            } else if status.alert {
                                "ALERT"
                            } else {
                                "ok"
                            };
                            println!(
                                "{:<20} {:<8} {:>12} {:>12} {:>7.1}%  {}",
                                truncate(&status.category_name, 20),
                                status.budget.period.as_str(),
                                format_cents(status.budget.limit),
                                format_cents(status.budget.spent),
                                status.usage_percentage,
                                flag
                            );
                        }
                    }
                }
            }

            Commands::Recurring { format } => {
                let summary = service.recurring_summary();
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                    _ => {
                        println!("Recurring transactions: {}", summary.recurring_count);
                        println!("Monthly revenue:  {:>15}", format_cents(summary.monthly_revenue));
                        println!("Monthly expense:  {:>15}", format_cents(summary.monthly_expense));
                        println!("{}", "-".repeat(33));
                        println!("Monthly net:      {:>15}", format_cents(summary.monthly_net));
                    }
                }
            }

            Commands::Categories { format } => {
                let categories = service.list_categories();
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&categories)?),
                    _ => {
                        println!("{:<3} {:<24} {:<8} {:<8}", "", "NAME", "TYPE", "COLOR");
                        println!("{}", "-".repeat(46));
                        for category in &categories {
                            println!(
                                "{:<3} {:<24} {:<8} {:<8}",
                                if category.is_pinned { "*" } else { "" },
                                truncate(&category.name, 24),
                                category.category_type.as_str(),
                                category.color
                            );
                        }
                    }
                }
            }

            Commands::Import {
                input,
                dry_run,
                create_categories,
                output,
            } => {
                let options = ImportOptions {
                    dry_run,
                    create_missing_categories: create_categories,
                };
                let result = {
                    let mut importer = Importer::new(&mut service);
                    match &input {
                        Some(path) => {
                            let file = File::open(path)
                                .with_context(|| format!("Failed to open {}", path.display()))?;
                            importer.import_transactions_csv(BufReader::new(file), options)?
                        }
                        None => importer.import_transactions_csv(io::stdin().lock(), options)?,
                    }
                };

                if dry_run {
                    println!("Dry run: {} transaction(s) would be imported", result.imported);
                } else {
                    println!("Imported {} transaction(s)", result.imported);
                }
                if result.skipped > 0 {
                    println!("Skipped {} blank line(s)", result.skipped);
                }
                for error in &result.errors {
                    eprintln!(
                        "  line {}{}: {}",
                        error.line,
                        error
                            .field
                            .as_deref()
                            .map(|f| format!(" [{}]", f))
                            .unwrap_or_default(),
                        error.error
                    );
                }

                if let Some(path) = output {
                    if !dry_run {
                        service.store().to_data().write_to(&path)?;
                        println!("Wrote {}", path.display());
                    }
                }
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let exporter = Exporter::new(&service);
                let mut writer = open_output(output.as_deref())?;
                let count = match export_type.as_str() {
                    "transactions" => exporter.export_transactions_csv(&mut writer)?,
                    "snapshot" => exporter.export_snapshot_json(&mut writer)?,
                    other => anyhow::bail!(
                        "Unknown export type '{}'. Valid: transactions, snapshot",
                        other
                    ),
                };
                writer.flush()?;
                if output.is_some() {
                    println!("Exported {} record(s)", count);
                }
            }
        }

        Ok(())
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn build_query(range: &RangeArgs) -> Result<AnalyticsQuery> {
    let today = Utc::now().date_naive();

    let to_date = match &range.to {
        Some(s) => parse_day(s)?,
        None => today,
    };
    let from_date = match &range.from {
        Some(s) => parse_day(s)?,
        None => MonthRef::of(today).first_day().unwrap_or(today),
    };
    let type_filter = TypeFilter::from_str(&range.type_filter).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid type '{}'. Valid: expense, revenue, both",
            range.type_filter
        )
    })?;

    let query = AnalyticsQuery::between(from_date, to_date).with_type(type_filter);
    query.window()?;
    Ok(query)
}

fn resolve_balance(service: &AnalyticsService, args: &BalanceArgs) -> Result<(NaiveDate, Cents)> {
    let as_of = match &args.as_of {
        Some(s) => parse_day(s)?,
        None => Utc::now().date_naive(),
    };
    let balance = match &args.balance {
        Some(s) => parse_cents(s).context("Invalid balance format. Use '1500.00' or '-20'")?,
        None => service.current_balance(as_of),
    };
    Ok((as_of, balance))
}

fn parse_day(s: &str) -> Result<NaiveDate> {
    parse_date(s).with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", s))
}

fn print_stats(stats: &PeriodStats) {
    println!(
        "Total Revenue:  {:>15}  ({} transactions)",
        format_cents(stats.total_revenue),
        stats.revenue_count
    );
    println!(
        "Total Expense:  {:>15}  ({} transactions)",
        format_cents(stats.total_expense),
        stats.expense_count
    );
    println!("{}", "-".repeat(32));
    println!("Net Income:     {:>15}", format_cents(stats.net_income));
    println!("Avg Revenue:    {:>15}", format_cents(stats.average_revenue));
    println!("Avg Expense:    {:>15}", format_cents(stats.average_expense));
    println!("Transactions:   {:>15}", stats.transaction_count);
}

fn print_trend(trend: &BalanceTrend) {
    println!("Balance Trend");
    if !trend.has_data() {
        println!("  No data");
        return;
    }
    for point in &trend.points {
        println!("  {:<10} {:>15}", point.period.label(), format_cents(point.balance));
    }
}

fn print_projection(projection: &Projection) {
    println!(
        "Projection (avg monthly net {})",
        format_cents(projection.avg_monthly_net)
    );
    for point in &projection.points {
        println!(
            "  {:<10} {:>15}  {}",
            point.month.label(),
            format_cents(point.estimated_balance),
            point.status
        );
    }
    match projection.estimated_months_left {
        Some(months) => println!("Estimated months left: {}", months),
        None => println!("Estimated months left: n/a (balance not declining)"),
    }
}

fn print_recommendations(recommendations: &[Recommendation]) {
    println!("Recommendations:");
    for recommendation in recommendations {
        println!("  [{}] {}", recommendation.severity, recommendation.message);
    }
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("note: {}", notice);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
