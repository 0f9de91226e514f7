use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::AnalyticsConfig;
use crate::domain::{
    BalanceTrend, Budget, BudgetId, BudgetPeriod, Category, CategoryBreakdown, CategoryId,
    CategoryType, Cents, MonthRef, MonthlyOverviewItem, Notice, PeriodStats, Projection,
    RecurringSummary, Transaction, TransactionId, average_monthly_net, compute_balance_trend,
    compute_category_breakdown, compute_monthly_overview, compute_stats,
    generate_recommendations, is_valid_amount, project_balances, summarize_recurring,
};
use crate::storage::{Snapshot, Store};

use super::{
    AnalyticsQuery, AppError, BreakdownReport, BudgetStatus, Dashboard, OverviewReport,
    RecommendationReport, StatsReport,
};

/// Application service: validates edits before they reach the store and
/// runs analytics against store snapshots. This is the interface for any
/// client (CLI, API, UI).
pub struct AnalyticsService {
    store: Store,
    config: AnalyticsConfig,
}

impl AnalyticsService {
    pub fn new(store: Store, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    /// Build a service over a JSON fixture.
    pub fn from_fixture(path: &Path, config: AnalyticsConfig) -> Result<Self, AppError> {
        let store = Store::load_fixture(path)?;
        Ok(Self::new(store, config))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    // ========================
    // Category operations
    // ========================

    pub fn add_category(
        &mut self,
        name: String,
        category_type: CategoryType,
        color: Option<String>,
        icon: Option<String>,
    ) -> Result<Category, AppError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::InvalidQuery("category name is empty".to_string()));
        }
        if self.store.find_category_by_name(&name).is_some() {
            return Err(AppError::CategoryAlreadyExists(name));
        }

        let mut category = Category::new(name, category_type);
        if let Some(color) = color {
            category = category.with_color(color);
        }
        if let Some(icon) = icon {
            category = category.with_icon(icon);
        }

        debug!(id = %category.id, name = %category.name, "adding category");
        self.store.insert_category(category.clone());
        Ok(category)
    }

    /// Find a category by id or, failing that, by name.
    pub fn resolve_category(&self, key: &str) -> Result<Category, AppError> {
        let by_id = key
            .parse::<CategoryId>()
            .ok()
            .and_then(|id| self.store.get_category(id));
        by_id
            .or_else(|| self.store.find_category_by_name(key))
            .cloned()
            .ok_or_else(|| AppError::CategoryNotFound(key.to_string()))
    }

    /// Remove a category. Its transactions stay and show up under "Other".
    pub fn remove_category(&mut self, id: CategoryId) -> Result<Category, AppError> {
        let removed = self
            .store
            .remove_category(id)
            .ok_or_else(|| AppError::CategoryNotFound(id.to_string()))?;
        let orphaned = self
            .store
            .transactions()
            .iter()
            .filter(|t| t.category_id == id)
            .count();
        if orphaned > 0 {
            info!(
                category = %removed.name,
                orphaned,
                "removed category still referenced by transactions"
            );
        }
        Ok(removed)
    }

    pub fn pin_category(&mut self, id: CategoryId, pinned: bool) -> Result<Category, AppError> {
        self.store
            .set_category_pinned(id, pinned)
            .cloned()
            .ok_or_else(|| AppError::CategoryNotFound(id.to_string()))
    }

    pub fn list_categories(&self) -> Vec<Category> {
        self.store.list_categories().into_iter().cloned().collect()
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a new transaction. The category must exist and accept the
    /// transaction's type.
    pub fn record_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Transaction, AppError> {
        self.validate_transaction(&transaction)?;
        debug!(
            id = %transaction.id,
            kind = %transaction.transaction_type,
            amount = transaction.amount,
            "recording transaction"
        );
        self.store.insert_transaction(transaction.clone());
        Ok(transaction)
    }

    /// Replace an existing transaction (matched by id).
    pub fn update_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Transaction, AppError> {
        if self.store.get_transaction(transaction.id).is_none() {
            return Err(AppError::TransactionNotFound(transaction.id.to_string()));
        }
        self.validate_transaction(&transaction)?;
        self.store.replace_transaction(transaction.clone());
        Ok(transaction)
    }

    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<Transaction, AppError> {
        self.store
            .remove_transaction(id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
    }

    /// Check a transaction without storing it.
    pub fn validate_transaction(&self, transaction: &Transaction) -> Result<(), AppError> {
        if !is_valid_amount(transaction.amount) {
            return Err(AppError::InvalidAmount(transaction.amount));
        }
        let category = self
            .store
            .get_category(transaction.category_id)
            .ok_or_else(|| AppError::CategoryNotFound(transaction.category_id.to_string()))?;
        if !category.category_type.accepts(transaction.transaction_type) {
            return Err(AppError::CategoryTypeMismatch {
                category: category.name.clone(),
                transaction_type: transaction.transaction_type.to_string(),
            });
        }
        Ok(())
    }

    // ========================
    // Budget operations
    // ========================

    pub fn add_budget(
        &mut self,
        category_id: CategoryId,
        limit: Cents,
        period: BudgetPeriod,
        alert_threshold: f64,
    ) -> Result<Budget, AppError> {
        if !is_valid_amount(limit) {
            return Err(AppError::InvalidAmount(limit));
        }
        if !(0.0..=100.0).contains(&alert_threshold) {
            return Err(AppError::InvalidPercentage(alert_threshold));
        }
        if self.store.get_category(category_id).is_none() {
            return Err(AppError::CategoryNotFound(category_id.to_string()));
        }

        let budget = Budget::new(category_id, limit, period, alert_threshold);
        self.store.insert_budget(budget.clone());
        Ok(budget)
    }

    pub fn remove_budget(&mut self, id: BudgetId) -> Result<Budget, AppError> {
        self.store
            .remove_budget(id)
            .ok_or_else(|| AppError::BudgetNotFound(id.to_string()))
    }

    /// Override a budget's spent figure until the next refresh.
    pub fn set_budget_spent(&mut self, id: BudgetId, spent: Cents) -> Result<Budget, AppError> {
        if spent < 0 {
            return Err(AppError::InvalidAmount(spent));
        }
        self.store
            .set_budget_spent(id, spent)
            .cloned()
            .ok_or_else(|| AppError::BudgetNotFound(id.to_string()))
    }

    /// Recompute spending for every budget as of `today`.
    pub fn refresh_budgets(&mut self, today: NaiveDate) -> usize {
        self.store.refresh_budget_spending(today)
    }

    /// Usage figures for every budget, using the stored `spent` values.
    pub fn budget_statuses(&self, today: NaiveDate) -> Vec<BudgetStatus> {
        self.store
            .budgets()
            .iter()
            .map(|budget| {
                let category_name = self
                    .store
                    .get_category(budget.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| crate::domain::OTHER_CATEGORY_NAME.to_string());
                BudgetStatus {
                    budget: budget.clone(),
                    category_name,
                    period: budget.current_period(today),
                    usage_percentage: budget.usage_percentage(),
                    remaining: budget.remaining(),
                    alert: budget.is_alert_triggered(),
                    exceeded: budget.is_exceeded(),
                }
            })
            .collect()
    }

    // ========================
    // Analytics
    // ========================

    /// Balance implied by every transaction dated on or before `as_of`.
    pub fn current_balance(&self, as_of: NaiveDate) -> Cents {
        self.store
            .transactions()
            .iter()
            .filter(|t| t.date <= as_of)
            .fold(0, |balance: Cents, t| balance.saturating_add(t.signed_amount()))
    }

    pub fn stats(&self, query: &AnalyticsQuery) -> Result<StatsReport, AppError> {
        let window = query.window()?;
        let snapshot = self.snapshot();
        let stats = compute_stats(&snapshot.transactions, &window, query.type_filter);

        let mut notices = Vec::new();
        note_empty(&stats, &mut notices);
        debug!(
            start = %window.start(),
            end = %window.end(),
            filter = %query.type_filter,
            count = stats.transaction_count,
            "computed period stats"
        );

        Ok(StatsReport {
            window,
            type_filter: query.type_filter,
            stats,
            notices,
        })
    }

    pub fn category_breakdown(&self, query: &AnalyticsQuery) -> Result<BreakdownReport, AppError> {
        let window = query.window()?;
        let snapshot = self.snapshot();
        let breakdown = compute_category_breakdown(
            &snapshot.transactions,
            &snapshot.categories,
            &window,
            query.type_filter,
        );

        let mut notices = Vec::new();
        note_unresolved(&breakdown, &mut notices);
        if breakdown.is_empty() {
            notices.push(Notice::EmptyInput);
        }

        Ok(BreakdownReport {
            window,
            type_filter: query.type_filter,
            breakdown,
            notices,
        })
    }

    pub fn monthly_overview(&self, year: i32) -> OverviewReport {
        let snapshot = self.snapshot();
        let months = compute_monthly_overview(&snapshot.transactions, year);
        let total_expense = months
            .iter()
            .fold(0, |total: Cents, m| total.saturating_add(m.expense_total));
        let total_revenue = months
            .iter()
            .fold(0, |total: Cents, m| total.saturating_add(m.revenue_total));

        OverviewReport {
            year,
            months,
            total_expense,
            total_revenue,
            net_income: total_revenue.saturating_sub(total_expense),
        }
    }

    /// Past balances reconstructed from `current_balance`, ending with the
    /// month containing `as_of`.
    pub fn balance_trend(&self, as_of: NaiveDate, current_balance: Cents) -> BalanceTrend {
        let snapshot = self.snapshot();
        self.trend_from(&snapshot, as_of, current_balance)
    }

    /// Project the balance `months_ahead` months past `as_of` (configured
    /// default when `None`), using the average monthly net of recent history.
    pub fn projection(
        &self,
        as_of: NaiveDate,
        current_balance: Cents,
        months_ahead: Option<u32>,
    ) -> Projection {
        let snapshot = self.snapshot();
        self.projection_from(&snapshot, as_of, current_balance, months_ahead)
    }

    pub fn recommendations(
        &self,
        query: &AnalyticsQuery,
        as_of: NaiveDate,
        current_balance: Cents,
    ) -> Result<RecommendationReport, AppError> {
        let window = query.window()?;
        let snapshot = self.snapshot();
        let stats = compute_stats(&snapshot.transactions, &window, query.type_filter);
        let projection = self.projection_from(&snapshot, as_of, current_balance, None);
        let recommendations =
            generate_recommendations(&stats, &projection, &self.config.recommendations);

        Ok(RecommendationReport {
            stats,
            projection,
            recommendations,
        })
    }

    /// All analytics for one query, computed from a single snapshot.
    pub fn dashboard(
        &self,
        query: &AnalyticsQuery,
        as_of: NaiveDate,
        current_balance: Cents,
    ) -> Result<Dashboard, AppError> {
        let window = query.window()?;
        let snapshot = self.snapshot();

        let stats = compute_stats(&snapshot.transactions, &window, query.type_filter);
        let breakdown = compute_category_breakdown(
            &snapshot.transactions,
            &snapshot.categories,
            &window,
            query.type_filter,
        );
        let overview = compute_monthly_overview(&snapshot.transactions, MonthRef::of(as_of).year);
        let trend = self.trend_from(&snapshot, as_of, current_balance);
        let projection = self.projection_from(&snapshot, as_of, current_balance, None);
        let recommendations =
            generate_recommendations(&stats, &projection, &self.config.recommendations);

        let mut notices = Vec::new();
        note_empty(&stats, &mut notices);
        note_unresolved(&breakdown, &mut notices);

        Ok(Dashboard {
            window,
            type_filter: query.type_filter,
            stats,
            breakdown,
            overview,
            trend,
            projection,
            recommendations,
            notices,
        })
    }

    pub fn recurring_summary(&self) -> RecurringSummary {
        summarize_recurring(self.store.transactions())
    }

    fn trend_from(
        &self,
        snapshot: &Snapshot,
        as_of: NaiveDate,
        current_balance: Cents,
    ) -> BalanceTrend {
        let months = self.config.trend_points.saturating_sub(1);
        let history = history_overview(&snapshot.transactions, as_of, months);
        let trend = compute_balance_trend(&history, current_balance, self.config.trend_points);
        if !trend.has_data() {
            debug!(%as_of, "balance trend is all zero");
        }
        trend
    }

    fn projection_from(
        &self,
        snapshot: &Snapshot,
        as_of: NaiveDate,
        current_balance: Cents,
        months_ahead: Option<u32>,
    ) -> Projection {
        let current_month = MonthRef::of(as_of);
        let history = history_overview(
            &snapshot.transactions,
            as_of,
            self.config.history_months as usize,
        );
        let avg_monthly_net = average_monthly_net(&history);
        let months_ahead = months_ahead.unwrap_or(self.config.projection_months);

        debug!(
            current_balance,
            avg_monthly_net,
            months_ahead,
            "projecting balances"
        );
        project_balances(
            current_balance,
            avg_monthly_net,
            months_ahead,
            &self.config.projection,
            current_month,
        )
    }
}

/// Overview items for the `months` months ending with the month of `as_of`,
/// oldest first. Transactions dated after `as_of` are left out so the
/// history agrees with `current_balance`.
fn history_overview(
    transactions: &[Transaction],
    as_of: NaiveDate,
    months: usize,
) -> Vec<MonthlyOverviewItem> {
    let settled: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.date <= as_of)
        .cloned()
        .collect();
    let mut by_year: HashMap<i32, Vec<MonthlyOverviewItem>> = HashMap::new();
    let mut history = Vec::with_capacity(months);
    let mut month = MonthRef::of(as_of);

    for _ in 0..months {
        let year = by_year
            .entry(month.year)
            .or_insert_with(|| compute_monthly_overview(&settled, month.year));
        history.push(year[month.month as usize - 1]);
        month = month.prev();
    }

    history.reverse();
    history
}

fn note_empty(stats: &PeriodStats, notices: &mut Vec<Notice>) {
    if stats.is_empty() {
        info!("no transactions in the requested window");
        notices.push(Notice::EmptyInput);
    }
}

fn note_unresolved(breakdown: &CategoryBreakdown, notices: &mut Vec<Notice>) {
    for (category_id, transactions) in &breakdown.unresolved {
        warn!(%category_id, transactions, "transactions reference a missing category");
        notices.push(Notice::UnresolvedCategory {
            category_id: *category_id,
            transactions: *transactions,
        });
    }
}
