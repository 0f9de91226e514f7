use serde::{Deserialize, Serialize};

use crate::domain::{
    BalanceTrend, Budget, CategoryBreakdown, Cents, DateWindow, MonthlyOverviewItem, Notice,
    PeriodStats, Projection, Recommendation, TypeFilter,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    pub window: DateWindow,
    pub type_filter: TypeFilter,
    pub stats: PeriodStats,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownReport {
    pub window: DateWindow,
    pub type_filter: TypeFilter,
    pub breakdown: CategoryBreakdown,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewReport {
    pub year: i32,
    pub months: Vec<MonthlyOverviewItem>,
    pub total_expense: Cents,
    pub total_revenue: Cents,
    pub net_income: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub stats: PeriodStats,
    pub projection: Projection,
    pub recommendations: Vec<Recommendation>,
}

/// Everything the analytics screen shows, computed from one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub window: DateWindow,
    pub type_filter: TypeFilter,
    pub stats: PeriodStats,
    pub breakdown: CategoryBreakdown,
    pub overview: Vec<MonthlyOverviewItem>,
    pub trend: BalanceTrend,
    pub projection: Projection,
    pub recommendations: Vec<Recommendation>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub category_name: String,
    pub period: Option<DateWindow>,
    pub usage_percentage: f64,
    pub remaining: Cents,
    pub alert: bool,
    pub exceeded: bool,
}
