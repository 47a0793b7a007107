//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::forecast::DemandPoint;

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Service liveness report
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Demand forecast for one room type
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub hotel_id: Uuid,
    pub room_type_id: Uuid,
    pub room_type_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: usize,
    pub demand_source: &'static str,
    pub generated_at: DateTime<Utc>,
    pub forecast: Vec<DemandPoint>,
}
