//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::models::ManualOverride;

/// Query for a hotel's pricing schedule
#[derive(Debug, Deserialize)]
pub struct PricingQuery {
    pub hotel_id: Uuid,
    /// Restrict the schedule to one room type of the hotel
    #[serde(default)]
    pub room_type_id: Option<Uuid>,
    /// Defaults to today
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default = "default_days")]
    pub days: i64,
    /// Drawn at random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_days() -> i64 {
    30
}

/// Request to price a single room-date
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub room_type_id: Uuid,
    pub date: NaiveDate,
    pub demand_probability: Decimal,
    #[serde(default, rename = "override")]
    pub manual_override: Option<ManualOverride>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Request for a room type's demand forecast
#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub hotel_id: Uuid,
    pub room_type_id: Uuid,
    pub start_date: NaiveDate,
    #[serde(default = "default_forecast_days")]
    pub days: i64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_forecast_days() -> i64 {
    90
}
