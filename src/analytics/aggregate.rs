//! Period bucketing of priced days.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::calculators::{occupied_rooms, ratio, round_money};
use crate::pricing::{PricedDay, PricingError, RoomType};

/// Granularity of analytics buckets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketSize {
    #[default]
    Day,
    Week,
    Month,
}

impl BucketSize {
    /// First date of the bucket containing `date`.
    ///
    /// Weeks start on Monday, months on the 1st.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            BucketSize::Day => date,
            BucketSize::Week => date
                .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
                .unwrap_or(date),
            BucketSize::Month => date.with_day(1).unwrap_or(date),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BucketSize::Day => "day",
            BucketSize::Week => "week",
            BucketSize::Month => "month",
        }
    }
}

/// Totals for one room type inside a bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomTypeBreakdown {
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
    pub rooms: i64,
    pub occupied: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub occupancy_rate: Decimal,
}

/// Aggregated metrics for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsBucket {
    pub period_start: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_variable_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_contribution: Decimal,
    pub total_rooms: i64,
    pub total_occupied: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub occupancy_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub contribution_margin: Decimal,
    pub room_types: Vec<RoomTypeBreakdown>,
}

#[derive(Debug, Default)]
struct Totals {
    revenue: Decimal,
    variable_cost: Decimal,
    contribution: Decimal,
    rooms: i64,
    occupied: i64,
}

impl Totals {
    fn add(&mut self, day: &PricedDay, room_type: &RoomType) {
        self.revenue += day.expected_revenue;
        self.variable_cost += day.expected_bookings * room_type.variable_cost;
        self.contribution += day.expected_contribution;
        self.rooms += i64::from(room_type.inventory_count);
        self.occupied += occupied_rooms(day.expected_bookings);
    }

    fn occupancy_rate(&self) -> Decimal {
        if self.rooms == 0 {
            return Decimal::ZERO;
        }
        ratio(Decimal::from(self.occupied), Decimal::from(self.rooms))
            .map(|r| round_money(r, 4))
            .unwrap_or(Decimal::ZERO)
    }

    fn contribution_margin(&self, period_start: NaiveDate) -> Decimal {
        match ratio(self.contribution, self.revenue) {
            Ok(margin) => round_money(margin, 4),
            Err(PricingError::DivisionUndefined) => {
                tracing::debug!(%period_start, "Zero revenue in bucket, reporting zero margin");
                Decimal::ZERO
            }
            Err(_) => Decimal::ZERO,
        }
    }
}

/// Look up every room type referenced by `priced_days`, failing on the
/// first one missing from `room_types`
pub(crate) fn resolve_room_types<'a>(
    priced_days: &BTreeMap<Uuid, Vec<PricedDay>>,
    room_types: &'a [RoomType],
) -> Result<HashMap<Uuid, &'a RoomType>, PricingError> {
    if priced_days.is_empty() {
        return Err(PricingError::EmptyInput);
    }

    let by_id: HashMap<Uuid, &RoomType> = room_types.iter().map(|rt| (rt.id, rt)).collect();

    for (room_type_id, days) in priced_days {
        if !by_id.contains_key(room_type_id) {
            return Err(PricingError::RoomTypeNotFound(*room_type_id));
        }
        if let Some(day) = days.iter().find(|d| d.room_type_id != *room_type_id) {
            return Err(PricingError::RoomTypeNotFound(day.room_type_id));
        }
    }

    Ok(by_id)
}

/// Group priced days into period buckets.
///
/// Buckets come back in ascending `period_start` order with room-type
/// breakdowns ordered by room type name.
pub fn aggregate(
    priced_days: &BTreeMap<Uuid, Vec<PricedDay>>,
    room_types: &[RoomType],
    bucket_size: BucketSize,
) -> Result<Vec<AnalyticsBucket>, PricingError> {
    let by_id = resolve_room_types(priced_days, room_types)?;

    let mut buckets: BTreeMap<NaiveDate, (Totals, BTreeMap<Uuid, Totals>)> = BTreeMap::new();

    for (room_type_id, days) in priced_days {
        let room_type = by_id[room_type_id];
        for day in days {
            let (totals, per_room) = buckets
                .entry(bucket_size.bucket_start(day.date))
                .or_default();
            totals.add(day, room_type);
            per_room.entry(*room_type_id).or_default().add(day, room_type);
        }
    }

    let result = buckets
        .into_iter()
        .map(|(period_start, (totals, per_room))| {
            let mut breakdown: Vec<RoomTypeBreakdown> = per_room
                .into_iter()
                .map(|(room_type_id, rt_totals)| RoomTypeBreakdown {
                    room_type_id,
                    room_type_name: by_id[&room_type_id].name.clone(),
                    revenue: round_money(rt_totals.revenue, 2),
                    variable_cost: round_money(rt_totals.variable_cost, 2),
                    contribution: round_money(rt_totals.contribution, 2),
                    contribution_margin: rt_totals.contribution_margin(period_start),
                    rooms: rt_totals.rooms,
                    occupied: rt_totals.occupied,
                    occupancy_rate: rt_totals.occupancy_rate(),
                })
                .collect();
            breakdown.sort_by(|a, b| a.room_type_name.cmp(&b.room_type_name));

            AnalyticsBucket {
                period_start,
                total_revenue: round_money(totals.revenue, 2),
                total_variable_cost: round_money(totals.variable_cost, 2),
                total_contribution: round_money(totals.contribution, 2),
                total_rooms: totals.rooms,
                total_occupied: totals.occupied,
                occupancy_rate: totals.occupancy_rate(),
                contribution_margin: totals.contribution_margin(period_start),
                room_types: breakdown,
            }
        })
        .collect();

    Ok(result)
}
