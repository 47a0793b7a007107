//! Response DTOs for analytics API endpoints.
//!
//! Each metric endpoint returns a projection of [`AnalyticsBucket`] holding
//! only the figures that metric reports.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::aggregate::{AnalyticsBucket, BucketSize, RoomTypeBreakdown};
use super::export::ExportRow;
use super::performance::PricingPerformance;
use super::requests::ExportDataType;

/// Envelope shared by the bucketed analytics endpoints
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse<T> {
    pub hotel_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub group_by: BucketSize,
    pub analytics: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct PerformanceResponse {
    pub hotel_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub analytics: Vec<PricingPerformance>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub hotel_id: Uuid,
    pub hotel_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub data_type: ExportDataType,
    pub export_data: Vec<ExportRow>,
}

// ==================== revenue ====================

#[derive(Debug, Serialize)]
pub struct RevenueRoomType {
    pub room_type_id: Uuid,
    pub room_type_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub revenue: Decimal,
    pub rooms: i64,
    pub occupied: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub occupancy_rate: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_revenue: Decimal,
    pub total_rooms: i64,
    pub total_occupied: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub occupancy_rate: Decimal,
    pub room_types: Vec<RevenueRoomType>,
}

impl From<&RoomTypeBreakdown> for RevenueRoomType {
    fn from(rt: &RoomTypeBreakdown) -> Self {
        Self {
            room_type_id: rt.room_type_id,
            room_type_name: rt.room_type_name.clone(),
            revenue: rt.revenue,
            rooms: rt.rooms,
            occupied: rt.occupied,
            occupancy_rate: rt.occupancy_rate,
        }
    }
}

impl From<&AnalyticsBucket> for RevenuePoint {
    fn from(bucket: &AnalyticsBucket) -> Self {
        Self {
            date: bucket.period_start,
            total_revenue: bucket.total_revenue,
            total_rooms: bucket.total_rooms,
            total_occupied: bucket.total_occupied,
            occupancy_rate: bucket.occupancy_rate,
            room_types: bucket.room_types.iter().map(Into::into).collect(),
        }
    }
}

// ==================== occupancy ====================

#[derive(Debug, Serialize)]
pub struct OccupancyRoomType {
    pub room_type_id: Uuid,
    pub room_type_name: String,
    pub rooms: i64,
    pub occupied: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub occupancy_rate: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OccupancyPoint {
    pub date: NaiveDate,
    pub total_rooms: i64,
    pub total_occupied: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub occupancy_rate: Decimal,
    pub room_types: Vec<OccupancyRoomType>,
}

impl From<&RoomTypeBreakdown> for OccupancyRoomType {
    fn from(rt: &RoomTypeBreakdown) -> Self {
        Self {
            room_type_id: rt.room_type_id,
            room_type_name: rt.room_type_name.clone(),
            rooms: rt.rooms,
            occupied: rt.occupied,
            occupancy_rate: rt.occupancy_rate,
        }
    }
}

impl From<&AnalyticsBucket> for OccupancyPoint {
    fn from(bucket: &AnalyticsBucket) -> Self {
        Self {
            date: bucket.period_start,
            total_rooms: bucket.total_rooms,
            total_occupied: bucket.total_occupied,
            occupancy_rate: bucket.occupancy_rate,
            room_types: bucket.room_types.iter().map(Into::into).collect(),
        }
    }
}

// ==================== contribution margin ====================

#[derive(Debug, Serialize)]
pub struct ContributionRoomType {
    pub room_type_id: Uuid,
    pub room_type_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub variable_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub contribution: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub contribution_margin: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ContributionPoint {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_variable_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_contribution: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub contribution_margin: Decimal,
    pub room_types: Vec<ContributionRoomType>,
}

impl From<&RoomTypeBreakdown> for ContributionRoomType {
    fn from(rt: &RoomTypeBreakdown) -> Self {
        Self {
            room_type_id: rt.room_type_id,
            room_type_name: rt.room_type_name.clone(),
            revenue: rt.revenue,
            variable_cost: rt.variable_cost,
            contribution: rt.contribution,
            contribution_margin: rt.contribution_margin,
        }
    }
}

impl From<&AnalyticsBucket> for ContributionPoint {
    fn from(bucket: &AnalyticsBucket) -> Self {
        Self {
            date: bucket.period_start,
            total_revenue: bucket.total_revenue,
            total_variable_cost: bucket.total_variable_cost,
            total_contribution: bucket.total_contribution,
            contribution_margin: bucket.contribution_margin,
            room_types: bucket.room_types.iter().map(Into::into).collect(),
        }
    }
}
