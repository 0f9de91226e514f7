use serde::{Deserialize, Serialize};

use super::{PeriodStats, Projection, ProjectionStatus, format_cents};

/// Display tone of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Positive,
    Informational,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Positive => "positive",
            Severity::Informational => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub message: String,
    pub severity: Severity,
}

/// A severity rule: any keyword found in the lowercased message selects
/// the severity.
pub struct SeverityRule {
    pub keywords: &'static [&'static str],
    pub severity: Severity,
}

/// Evaluated top to bottom, first match wins. Unmatched messages are
/// informational.
pub const SEVERITY_RULES: &[SeverityRule] = &[
    SeverityRule {
        keywords: &["critical", "warning", "exceed", "run out", "negative", "overspend"],
        severity: Severity::Warning,
    },
    SeverityRule {
        keywords: &["great", "well done", "growing", "healthy"],
        severity: Severity::Positive,
    },
];

pub fn classify(message: &str) -> Severity {
    let lowered = message.to_lowercase();
    SEVERITY_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
        .map(|rule| rule.severity)
        .unwrap_or(Severity::Informational)
}

/// Tunables for recommendation generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationPolicy {
    /// Savings rate (percent of revenue) considered good
    pub target_savings_rate: f64,
    /// Runway (months) at or below which depletion is flagged as critical
    pub runway_alert_months: u32,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            target_savings_rate: 20.0,
            runway_alert_months: 3,
        }
    }
}

/// Build recommendations from period stats and a projection. The same
/// input always yields the same messages in the same order.
pub fn generate_recommendations(
    stats: &PeriodStats,
    projection: &Projection,
    policy: &RecommendationPolicy,
) -> Vec<Recommendation> {
    let mut messages = Vec::new();

    if stats.is_empty() {
        messages.push(
            "No transactions recorded in this period. Add transactions to get personalised insights."
                .to_string(),
        );
    } else if stats.net_income < 0 {
        messages.push(format!(
            "Your expenses exceed your revenue by {} this period. Review discretionary spending.",
            format_cents(-stats.net_income)
        ));
    } else if stats.total_revenue > 0 {
        let rate = stats.savings_rate();
        if rate >= policy.target_savings_rate {
            messages.push(format!(
                "Great job! You are saving {:.1}% of your revenue.",
                rate
            ));
        } else {
            messages.push(format!(
                "You are saving {:.1}% of your revenue. Aim for {:.0}% to build a cushion.",
                rate, policy.target_savings_rate
            ));
        }
    }

    match projection.estimated_months_left {
        Some(months) if months <= policy.runway_alert_months => messages.push(format!(
            "Critical: at the current pace your balance will run out in {} month(s).",
            months
        )),
        Some(months) => messages.push(format!(
            "Your balance is shrinking by {} per month; about {} months of runway remain.",
            format_cents(-projection.avg_monthly_net),
            months
        )),
        None if projection.avg_monthly_net > 0 => messages.push(format!(
            "Your balance is growing by {} per month.",
            format_cents(projection.avg_monthly_net)
        )),
        None => {}
    }

    if let Some(point) = projection.first_with_status(ProjectionStatus::Critical) {
        messages.push(format!(
            "Projected balance turns negative in {}.",
            point.month.label()
        ));
    } else if let Some(point) = projection.first_with_status(ProjectionStatus::Warning) {
        messages.push(format!(
            "Warning: projected balance drops to {} by {}.",
            format_cents(point.estimated_balance),
            point.month.label()
        ));
    }

    if stats.expense_count > 0 && stats.average_expense > 0 && stats.revenue_count == 0 {
        messages.push(format!(
            "No revenue was recorded this period; average expense was {}.",
            format_cents(stats.average_expense)
        ));
    }

    messages
        .into_iter()
        .map(|message| Recommendation {
            severity: classify(&message),
            message,
        })
        .collect()
}
