use serde::{Deserialize, Serialize};

use super::{Cents, MonthRef, MonthlyOverviewItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionStatus {
    Healthy,
    Warning,
    Critical,
}

impl ProjectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectionStatus::Healthy => "healthy",
            ProjectionStatus::Warning => "warning",
            ProjectionStatus::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ProjectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Thresholds used to classify projected balances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionPolicy {
    /// While the balance is declining, anything below this is a warning
    pub warning_threshold: Cents,
}

impl Default for ProjectionPolicy {
    fn default() -> Self {
        Self {
            warning_threshold: 100_000,
        }
    }
}

impl ProjectionPolicy {
    pub fn classify(&self, balance: Cents, avg_monthly_net: Cents) -> ProjectionStatus {
        if balance < 0 {
            ProjectionStatus::Critical
        } else if avg_monthly_net >= 0 {
            ProjectionStatus::Healthy
        } else if balance < self.warning_threshold {
            ProjectionStatus::Warning
        } else {
            ProjectionStatus::Healthy
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedBalance {
    pub month: MonthRef,
    pub estimated_balance: Cents,
    pub status: ProjectionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub current_balance: Cents,
    pub avg_monthly_net: Cents,
    pub points: Vec<ProjectedBalance>,
    /// `None` when the balance is not shrinking
    pub estimated_months_left: Option<u32>,
}

impl Projection {
    pub fn first_with_status(&self, status: ProjectionStatus) -> Option<&ProjectedBalance> {
        self.points.iter().find(|p| p.status == status)
    }

    pub fn final_balance(&self) -> Cents {
        self.points
            .last()
            .map(|p| p.estimated_balance)
            .unwrap_or(self.current_balance)
    }
}

/// Straight-line projection of the balance for the `months_ahead` months
/// following `from`.
pub fn project_balances(
    current_balance: Cents,
    avg_monthly_net: Cents,
    months_ahead: u32,
    policy: &ProjectionPolicy,
    from: MonthRef,
) -> Projection {
    let points = (1..=months_ahead)
        .map(|i| {
            let estimated_balance =
                current_balance.saturating_add(avg_monthly_net.saturating_mul(i as i64));
            ProjectedBalance {
                month: from.plus(i),
                estimated_balance,
                status: policy.classify(estimated_balance, avg_monthly_net),
            }
        })
        .collect();

    Projection {
        current_balance,
        avg_monthly_net,
        points,
        estimated_months_left: estimate_months_left(current_balance, avg_monthly_net),
    }
}

/// Months until the balance runs out at the given monthly drain.
pub fn estimate_months_left(current_balance: Cents, avg_monthly_net: Cents) -> Option<u32> {
    if avg_monthly_net >= 0 {
        return None;
    }
    if current_balance <= 0 {
        return Some(0);
    }
    let drain = avg_monthly_net.unsigned_abs();
    let months = (current_balance as u64).div_ceil(drain);
    Some(u32::try_from(months).unwrap_or(u32::MAX))
}

/// Mean net income over the months that saw any activity.
pub fn average_monthly_net(overview: &[MonthlyOverviewItem]) -> Cents {
    let active: Vec<&MonthlyOverviewItem> = overview.iter().filter(|i| i.has_activity()).collect();
    if active.is_empty() {
        return 0;
    }
    let total = active
        .iter()
        .fold(0, |total: Cents, i| total.saturating_add(i.net_income));
    total / active.len() as i64
}
