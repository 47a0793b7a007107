//! Suggested versus final price comparison.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use uuid::Uuid;

use super::aggregate::resolve_room_types;
use crate::pricing::calculators::{occupied_rooms, ratio, round_money};
use crate::pricing::{PricedDay, PricingError, RoomType};

/// One day of a room type's performance record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPerformance {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub suggested_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price: Decimal,
    pub is_override: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub occupancy: Decimal,
    pub occupied_rooms: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub suggested_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub revenue_difference: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub revenue_difference_percentage: Decimal,
}

/// How overrides moved a room type's revenue over a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingPerformance {
    pub room_type_id: Uuid,
    pub room_type_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_suggested_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_final_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub revenue_difference: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub revenue_difference_percentage: Decimal,
    pub total_days: usize,
    pub override_count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub override_percentage: Decimal,
    pub daily_data: Vec<DailyPerformance>,
}

/// Difference as a percentage of `base`, 0 when `base` is not positive
fn percentage_of(difference: Decimal, base: Decimal) -> Decimal {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    ratio(difference, base)
        .map(|r| round_money(r * dec!(100), 2))
        .unwrap_or(Decimal::ZERO)
}

/// Summarise suggested against final revenue per room type.
///
/// Revenue counts whole occupied rooms, so fractional bookings are rounded
/// before being priced.
pub fn pricing_performance(
    priced_days: &BTreeMap<Uuid, Vec<PricedDay>>,
    room_types: &[RoomType],
) -> Result<Vec<PricingPerformance>, PricingError> {
    let by_id = resolve_room_types(priced_days, room_types)?;

    let mut summaries: Vec<PricingPerformance> = priced_days
        .iter()
        .map(|(room_type_id, days)| {
            let mut daily_data: Vec<DailyPerformance> = days
                .iter()
                .map(|day| {
                    let occupied = occupied_rooms(day.expected_bookings);
                    let suggested_revenue = Decimal::from(occupied) * day.suggested_price;
                    let final_revenue = Decimal::from(occupied) * day.final_price;
                    let difference = final_revenue - suggested_revenue;
                    DailyPerformance {
                        date: day.date,
                        suggested_price: day.suggested_price,
                        final_price: day.final_price,
                        is_override: day.is_override,
                        occupancy: day.expected_occupancy,
                        occupied_rooms: occupied,
                        suggested_revenue: round_money(suggested_revenue, 2),
                        final_revenue: round_money(final_revenue, 2),
                        revenue_difference: round_money(difference, 2),
                        revenue_difference_percentage: percentage_of(difference, suggested_revenue),
                    }
                })
                .collect();
            daily_data.sort_by_key(|d| d.date);

            let total_suggested: Decimal = daily_data.iter().map(|d| d.suggested_revenue).sum();
            let total_final: Decimal = daily_data.iter().map(|d| d.final_revenue).sum();
            let difference = total_final - total_suggested;
            let override_count = daily_data.iter().filter(|d| d.is_override).count();
            let total_days = daily_data.len();

            PricingPerformance {
                room_type_id: *room_type_id,
                room_type_name: by_id[room_type_id].name.clone(),
                total_suggested_revenue: total_suggested,
                total_final_revenue: total_final,
                revenue_difference: difference,
                revenue_difference_percentage: percentage_of(difference, total_suggested),
                total_days,
                override_count,
                override_percentage: percentage_of(
                    Decimal::from(override_count),
                    Decimal::from(total_days),
                ),
                daily_data,
            }
        })
        .collect();

    summaries.sort_by(|a, b| a.room_type_name.cmp(&b.room_type_name));
    Ok(summaries)
}
