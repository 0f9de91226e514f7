use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DateWindow, TypeFilter};

use super::AppError;

/// Analytics request as it arrives from a client:
/// `{ "startDate": "...", "endDate": "...", "type": "expense" }`.
/// `type` defaults to both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub type_filter: TypeFilter,
}

impl AnalyticsQuery {
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            start_date,
            end_date,
            type_filter: TypeFilter::Both,
        }
    }

    /// Whole-day query between two calendar dates.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(
            start.and_time(chrono::NaiveTime::MIN).and_utc(),
            end.and_time(chrono::NaiveTime::MIN).and_utc(),
        )
    }

    pub fn with_type(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    /// Parse and validate a JSON request body.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let query: AnalyticsQuery =
            serde_json::from_str(json).map_err(|e| AppError::InvalidQuery(e.to_string()))?;
        query.window()?;
        Ok(query)
    }

    /// Calendar window covered by the query. Time of day is dropped; both
    /// ends are inclusive.
    pub fn window(&self) -> Result<DateWindow, AppError> {
        Ok(DateWindow::new(
            self.start_date.date_naive(),
            self.end_date.date_naive(),
        )?)
    }
}
