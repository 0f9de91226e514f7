use serde::{Deserialize, Serialize};

use super::{Cents, MonthRef, MonthlyOverviewItem};

/// Default number of points in a trend: six historical plus the current one.
pub const DEFAULT_TREND_POINTS: usize = 7;

/// What a trend point's balance refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrendPeriod {
    /// Balance just before the month began
    StartOf { year: i32, month: u32 },
    /// The known current balance
    Current,
}

impl TrendPeriod {
    pub fn label(&self) -> String {
        match self {
            TrendPeriod::StartOf { year, month } => MonthRef::new(*year, *month).label(),
            TrendPeriod::Current => "Now".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: TrendPeriod,
    pub balance: Cents,
}

/// Balances oldest first, ending with the current balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTrend {
    pub points: Vec<TrendPoint>,
}

impl BalanceTrend {
    pub fn balances(&self) -> Vec<Cents> {
        self.points.iter().map(|p| p.balance).collect()
    }

    /// False when every point is exactly zero. A genuinely flat zero
    /// balance is indistinguishable from no data here.
    pub fn has_data(&self) -> bool {
        self.points.iter().any(|p| p.balance != 0)
    }

    pub fn oldest(&self) -> Option<Cents> {
        self.points.first().map(|p| p.balance)
    }

    pub fn current(&self) -> Option<Cents> {
        self.points.last().map(|p| p.balance)
    }
}

/// Rebuild past balances from the only balance known for certain, the
/// current one, by undoing each month's net flow newest to oldest.
///
/// `overview` must be in chronological order and end with the current
/// month. Only the most recent `max_points - 1` months are used, so the
/// result holds at most `max_points` points.
pub fn compute_balance_trend(
    overview: &[MonthlyOverviewItem],
    current_balance: Cents,
    max_points: usize,
) -> BalanceTrend {
    let months = max_points.saturating_sub(1).min(overview.len());
    let recent = &overview[overview.len() - months..];

    let mut points = Vec::with_capacity(months + 1);
    points.push(TrendPoint {
        period: TrendPeriod::Current,
        balance: current_balance,
    });

    let mut running_balance = current_balance;
    for item in recent.iter().rev() {
        running_balance = running_balance.saturating_sub(item.net_income);
        points.push(TrendPoint {
            period: TrendPeriod::StartOf {
                year: item.year,
                month: item.month,
            },
            balance: running_balance,
        });
    }

    points.reverse();
    BalanceTrend { points }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32, net: Cents) -> MonthlyOverviewItem {
        MonthlyOverviewItem {
            month,
            year,
            expense_total: if net < 0 { -net } else { 0 },
            revenue_total: if net > 0 { net } else { 0 },
            net_income: net,
        }
    }

    #[test]
    fn test_reverse_reconstruction() {
        let overview = vec![month(2024, 1, 200), month(2024, 2, -50)];
        let trend = compute_balance_trend(&overview, 1000, DEFAULT_TREND_POINTS);

        assert_eq!(trend.balances(), vec![850, 1050, 1000]);
        assert_eq!(
            trend.points[0].period,
            TrendPeriod::StartOf {
                year: 2024,
                month: 1
            }
        );
        assert_eq!(trend.points[2].period, TrendPeriod::Current);
    }

    #[test]
    fn test_caps_at_max_points() {
        let overview: Vec<_> = (1..=12).map(|m| month(2024, m, 100)).collect();
        let trend = compute_balance_trend(&overview, 5000, DEFAULT_TREND_POINTS);

        assert_eq!(trend.points.len(), 7);
        assert_eq!(trend.balances(), vec![4400, 4500, 4600, 4700, 4800, 4900, 5000]);
        assert_eq!(
            trend.points[0].period,
            TrendPeriod::StartOf {
                year: 2024,
                month: 7
            }
        );
    }

    #[test]
    fn test_replay_reproduces_current_balance() {
        let nets = [12000, -3400, 0, 780, -99999, 45];
        let overview: Vec<_> = nets
            .iter()
            .enumerate()
            .map(|(i, net)| month(2024, i as u32 + 1, *net))
            .collect();
        let trend = compute_balance_trend(&overview, -2500, DEFAULT_TREND_POINTS);

        let replayed = overview
            .iter()
            .fold(trend.oldest().unwrap(), |balance, item| balance + item.net_income);
        assert_eq!(replayed, -2500);
        assert_eq!(trend.current(), Some(-2500));
    }

    #[test]
    fn test_all_zero_reads_as_no_data() {
        let overview: Vec<_> = (1..=3).map(|m| month(2024, m, 0)).collect();
        let trend = compute_balance_trend(&overview, 0, DEFAULT_TREND_POINTS);
        assert_eq!(trend.points.len(), 4);
        assert!(!trend.has_data());

        let trend = compute_balance_trend(&overview, 1, DEFAULT_TREND_POINTS);
        assert!(trend.has_data());
    }

    #[test]
    fn test_empty_overview_yields_current_only() {
        let trend = compute_balance_trend(&[], 700, DEFAULT_TREND_POINTS);
        assert_eq!(trend.balances(), vec![700]);
    }
}
