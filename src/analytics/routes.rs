//! Analytics route handlers

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use uuid::Uuid;

use super::aggregate::{aggregate, AnalyticsBucket};
use super::export::export_rows;
use super::performance::pricing_performance;
use super::requests::{AnalyticsQuery, ExportQuery};
use super::responses::{
    AnalyticsResponse, ContributionPoint, ExportResponse, OccupancyPoint, PerformanceResponse,
    RevenuePoint,
};
use crate::error::Result;
use crate::pricing::routes::{hotel_room_types, hotel_schedules, resolve_seed, today};
use crate::pricing::{PricedDay, RoomType};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics/revenue", get(revenue))
        .route("/analytics/occupancy", get(occupancy))
        .route("/analytics/contribution-margin", get(contribution_margin))
        .route("/analytics/pricing-performance", get(performance))
        .route("/analytics/export", get(export))
}

struct PricedRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
    room_types: Vec<RoomType>,
    priced: BTreeMap<Uuid, Vec<PricedDay>>,
}

/// Generate the priced days for an inclusive date range
async fn priced_range(
    state: &AppState,
    hotel_id: Uuid,
    room_type_id: Option<Uuid>,
    (start_date, end_date): (NaiveDate, NaiveDate),
    seed: Option<u64>,
) -> Result<PricedRange> {
    let days = (end_date - start_date).num_days() + 1;
    let seed = resolve_seed(seed);

    let room_types = hotel_room_types(state, hotel_id, room_type_id)?;
    let priced = hotel_schedules(state, hotel_id, &room_types, start_date, days, seed).await?;

    Ok(PricedRange {
        start_date,
        end_date,
        room_types,
        priced,
    })
}

/// Bucket the query's range and project each bucket for one metric
async fn bucketed<T>(state: &AppState, query: &AnalyticsQuery) -> Result<Json<AnalyticsResponse<T>>>
where
    T: for<'b> From<&'b AnalyticsBucket>,
{
    let range = priced_range(
        state,
        query.hotel_id,
        query.room_type_id,
        query.date_range(today())?,
        query.seed,
    )
    .await?;
    let buckets = aggregate(&range.priced, &range.room_types, query.group_by)?;

    tracing::debug!(
        hotel_id = %query.hotel_id,
        group_by = query.group_by.as_str(),
        buckets = buckets.len(),
        "Aggregated analytics"
    );

    Ok(Json(AnalyticsResponse {
        hotel_id: query.hotel_id,
        start_date: range.start_date,
        end_date: range.end_date,
        group_by: query.group_by,
        analytics: buckets.iter().map(|bucket| T::from(bucket)).collect(),
    }))
}

/// Revenue and occupancy per period
pub async fn revenue(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse<RevenuePoint>>> {
    bucketed::<RevenuePoint>(&state, &query).await
}

pub async fn occupancy(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse<OccupancyPoint>>> {
    bucketed::<OccupancyPoint>(&state, &query).await
}

pub async fn contribution_margin(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse<ContributionPoint>>> {
    bucketed::<ContributionPoint>(&state, &query).await
}

/// Suggested versus final revenue per room type
pub async fn performance(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<PerformanceResponse>> {
    let range = priced_range(
        &state,
        query.hotel_id,
        query.room_type_id,
        query.date_range(today())?,
        query.seed,
    )
    .await?;
    let analytics = pricing_performance(&range.priced, &range.room_types)?;

    Ok(Json(PerformanceResponse {
        hotel_id: query.hotel_id,
        start_date: range.start_date,
        end_date: range.end_date,
        analytics,
    }))
}

/// One flat row per room type and date
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<ExportResponse>> {
    let hotel = state.catalog.get_hotel(query.hotel_id)?;
    let range = priced_range(
        &state,
        query.hotel_id,
        query.room_type_id,
        query.date_range(today())?,
        query.seed,
    )
    .await?;
    let export_data = export_rows(&range.priced, &range.room_types)?;

    tracing::debug!(
        hotel_id = %query.hotel_id,
        rows = export_data.len(),
        "Exported analytics rows"
    );

    Ok(Json(ExportResponse {
        hotel_id: hotel.id,
        hotel_name: hotel.name,
        start_date: range.start_date,
        end_date: range.end_date,
        data_type: query.data_type,
        export_data,
    }))
}
