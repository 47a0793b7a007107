//! Request DTOs for analytics API endpoints.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregate::BucketSize;
use crate::pricing::PricingError;

/// Look-back applied when no start date is given
pub const DEFAULT_LOOKBACK_DAYS: u64 = 30;

/// Query shared by the analytics endpoints
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub hotel_id: Uuid,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub group_by: BucketSize,
    #[serde(default)]
    pub room_type_id: Option<Uuid>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AnalyticsQuery {
    /// Inclusive date range, defaulting to the 30 days before `today`
    pub fn date_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), PricingError> {
        resolve_date_range(self.start_date, self.end_date, today)
    }
}

/// What the export was requested for. Echoed back so BI tooling can label
/// the rows; every export carries the same columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportDataType {
    #[default]
    Revenue,
    Occupancy,
    ContributionMargin,
    Pricing,
}

/// Query for the flat analytics export
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub hotel_id: Uuid,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub data_type: ExportDataType,
    #[serde(default)]
    pub room_type_id: Option<Uuid>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ExportQuery {
    pub fn date_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), PricingError> {
        resolve_date_range(self.start_date, self.end_date, today)
    }
}

fn resolve_date_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), PricingError> {
    let end_date = end_date.unwrap_or(today);
    let start_date = match start_date {
        Some(start) => start,
        None => end_date
            .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
            .ok_or_else(|| {
                PricingError::InvalidInput(format!("end_date {} is out of range", end_date))
            })?,
    };

    if end_date < start_date {
        return Err(PricingError::InvalidInput(format!(
            "end_date {} is before start_date {}",
            end_date, start_date
        )));
    }
    Ok((start_date, end_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn query(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AnalyticsQuery {
        AnalyticsQuery {
            hotel_id: Uuid::nil(),
            start_date: start,
            end_date: end,
            group_by: BucketSize::Day,
            room_type_id: None,
            seed: None,
        }
    }

    #[test]
    fn test_default_range_looks_back_thirty_days() {
        let (start, end) = query(None, None).date_range(date(3, 31)).unwrap();
        assert_eq!(start, date(3, 1));
        assert_eq!(end, date(3, 31));
    }

    #[test]
    fn test_start_defaults_relative_to_end() {
        let (start, end) = query(None, Some(date(2, 10))).date_range(date(6, 1)).unwrap();
        assert_eq!(start, date(1, 11));
        assert_eq!(end, date(2, 10));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let result = query(Some(date(5, 2)), Some(date(5, 1))).date_range(date(6, 1));
        assert!(matches!(result, Err(PricingError::InvalidInput(_))));
    }

    #[test]
    fn test_export_query_defaults() {
        let parsed: ExportQuery = serde_json::from_value(serde_json::json!({
            "hotel_id": "00000000-0000-0000-0000-000000000001",
            "end_date": "2025-04-30"
        }))
        .unwrap();
        assert_eq!(parsed.data_type, ExportDataType::Revenue);
        let (start, end) = parsed.date_range(date(6, 1)).unwrap();
        assert_eq!(start, date(3, 31));
        assert_eq!(end, date(4, 30));

        let parsed: ExportQuery = serde_json::from_value(serde_json::json!({
            "hotel_id": "00000000-0000-0000-0000-000000000001",
            "data_type": "contribution-margin"
        }))
        .unwrap();
        assert_eq!(parsed.data_type, ExportDataType::ContributionMargin);
    }

    #[test]
    fn test_group_by_defaults_to_day() {
        let parsed: AnalyticsQuery = serde_json::from_value(serde_json::json!({
            "hotel_id": "00000000-0000-0000-0000-000000000001",
            "group_by": "week"
        }))
        .unwrap();
        assert_eq!(parsed.group_by, BucketSize::Week);
    }
}
