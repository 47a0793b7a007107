//! Pricing route handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use super::forecast::forecast_range;
use super::models::{PricedDay, RoomType};
use super::requests::{ForecastRequest, PricingQuery, QuoteRequest};
use super::responses::ForecastResponse;
use super::services::PricingError;
use crate::cache::AppCache;
use crate::error::Result;
use crate::AppState;

/// Response header carrying the seed a schedule was generated with
pub const SEED_HEADER: &str = "x-pricing-seed";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pricing", get(schedule))
        .route("/pricing/quote", post(quote))
        .route("/forecasting/demand", post(demand_forecast))
}

/// Seed a request is served with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RequestSeed {
    pub value: u64,
    /// Whether the caller chose the seed. Drawn seeds are never repeated,
    /// so their schedules are not worth caching.
    pub supplied: bool,
}

/// Use the caller's seed, or draw one so the response can still be replayed
pub(crate) fn resolve_seed(seed: Option<u64>) -> RequestSeed {
    match seed {
        Some(value) => RequestSeed {
            value,
            supplied: true,
        },
        None => {
            let drawn = rand::random::<u64>();
            tracing::debug!(seed = drawn, "No seed supplied, drew one");
            RequestSeed {
                value: drawn,
                supplied: false,
            }
        }
    }
}

/// Per-room-type seed so room types of one hotel do not share demand draws
fn room_seed(seed: u64, room_type_id: Uuid) -> u64 {
    let id = room_type_id.as_u128();
    seed ^ (id as u64) ^ ((id >> 64) as u64)
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Active room types of a hotel, optionally narrowed to one of them
pub(crate) fn hotel_room_types(
    state: &AppState,
    hotel_id: Uuid,
    room_type_id: Option<Uuid>,
) -> Result<Vec<RoomType>> {
    let room_types = state.catalog.room_types_for_hotel(hotel_id)?;
    match room_type_id {
        Some(id) => {
            let selected: Vec<RoomType> =
                room_types.into_iter().filter(|rt| rt.id == id).collect();
            if selected.is_empty() {
                return Err(PricingError::RoomTypeNotFound(id).into());
            }
            Ok(selected)
        }
        None => Ok(room_types),
    }
}

/// Priced days for every given room type, served from the schedule cache
/// when the same schedule was generated recently under a caller-chosen seed
pub(crate) async fn hotel_schedules(
    state: &AppState,
    hotel_id: Uuid,
    room_types: &[RoomType],
    start_date: NaiveDate,
    days: i64,
    seed: RequestSeed,
) -> Result<BTreeMap<Uuid, Vec<PricedDay>>> {
    let hotel = state.catalog.get_hotel(hotel_id)?;
    let engine = state.engine.with_rule(hotel.pricing_rule)?;

    let mut priced = BTreeMap::new();
    for room_type in room_types {
        let derived_seed = room_seed(seed.value, room_type.id);
        let generate = || -> Result<Vec<PricedDay>> {
            Ok(engine
                .generate_schedule(room_type, start_date, days, state.demand.as_ref(), derived_seed)?
                .collect_days()?)
        };

        if !seed.supplied {
            priced.insert(room_type.id, generate()?);
            continue;
        }

        let key = AppCache::schedule_key(room_type.id, start_date, days, derived_seed);
        let schedule = if let Some(cached) = state.cache.schedules.get(&key).await {
            tracing::debug!("Cache HIT for schedule: {}", key);
            cached
        } else {
            tracing::debug!("Cache MISS for schedule: {}", key);
            let generated = Arc::new(generate()?);
            state.cache.schedules.insert(key, generated.clone()).await;
            generated
        };

        priced.insert(room_type.id, (*schedule).clone());
    }

    Ok(priced)
}

/// Pricing schedule for a hotel's room types
pub async fn schedule(
    State(state): State<AppState>,
    Query(query): Query<PricingQuery>,
) -> Result<Response> {
    let start_date = query.start_date.unwrap_or_else(today);
    let seed = resolve_seed(query.seed);

    let room_types = hotel_room_types(&state, query.hotel_id, query.room_type_id)?;
    let priced = hotel_schedules(&state, query.hotel_id, &room_types, start_date, query.days, seed).await?;

    // Room types in catalog order, each one's days in date order
    let days: Vec<PricedDay> = room_types
        .iter()
        .filter_map(|rt| priced.get(&rt.id))
        .flatten()
        .cloned()
        .collect();

    let mut response = Json(days).into_response();
    response
        .headers_mut()
        .insert(SEED_HEADER, HeaderValue::from(seed.value));
    Ok(response)
}

/// Price one room-date, optionally with a manual override
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<PricedDay>> {
    let room_type = state.catalog.get_room_type(request.room_type_id)?;
    let hotel = state.catalog.get_hotel(room_type.hotel_id)?;
    let engine = state.engine.with_rule(hotel.pricing_rule)?;

    let seed = resolve_seed(request.seed);
    let mut rng = StdRng::seed_from_u64(seed.value);

    let day = match &request.manual_override {
        Some(manual) => engine.price_day_with_override(
            &room_type,
            request.date,
            request.demand_probability,
            manual,
            &mut rng,
        )?,
        None => engine.price_day(&room_type, request.date, request.demand_probability, &mut rng)?,
    };

    Ok(Json(day))
}

/// Per-date demand forecast for one room type of a hotel
pub async fn demand_forecast(
    State(state): State<AppState>,
    Json(request): Json<ForecastRequest>,
) -> Result<Response> {
    let room_types = hotel_room_types(&state, request.hotel_id, Some(request.room_type_id))?;
    let Some(room_type) = room_types.first() else {
        return Err(PricingError::RoomTypeNotFound(request.room_type_id).into());
    };

    let seed = resolve_seed(request.seed);
    let forecast = forecast_range(
        state.demand.as_ref(),
        room_type,
        request.start_date,
        request.days,
        seed.value,
    )?;
    let end_date = forecast.last().map_or(request.start_date, |point| point.date);

    tracing::debug!(
        room_type_id = %room_type.id,
        days = forecast.len(),
        demand_source = state.demand.name(),
        "Forecast demand"
    );

    let mut response = Json(ForecastResponse {
        hotel_id: request.hotel_id,
        room_type_id: room_type.id,
        room_type_name: room_type.name.clone(),
        start_date: request.start_date,
        end_date,
        days: forecast.len(),
        demand_source: state.demand.name(),
        generated_at: Utc::now(),
        forecast,
    })
    .into_response();
    response
        .headers_mut()
        .insert(SEED_HEADER, HeaderValue::from(seed.value));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_seed_keeps_caller_seed() {
        assert_eq!(
            resolve_seed(Some(42)),
            RequestSeed {
                value: 42,
                supplied: true
            }
        );
        assert!(!resolve_seed(None).supplied);
    }

    #[test]
    fn test_room_seed_differs_per_room_type() {
        let a = room_seed(7, Uuid::from_u128(0x101));
        let b = room_seed(7, Uuid::from_u128(0x102));
        assert_ne!(a, b);
        assert_eq!(a, room_seed(7, Uuid::from_u128(0x101)));
    }
}
