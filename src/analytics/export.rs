//! Flat per room-type-day rows for CSV export and BI tools.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::aggregate::resolve_room_types;
use crate::pricing::calculators::{occupied_rooms, ratio, round_money};
use crate::pricing::{PricedDay, PricingError, RoomType};

/// One room type on one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub room_type_id: Uuid,
    pub room_type_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub variable_cost: Decimal,
    pub inventory: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub suggested_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price: Decimal,
    pub is_override: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub forecasted_demand: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub forecasted_occupancy: Decimal,
    pub occupied_rooms: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_variable_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub contribution: Decimal,
    /// Contribution over revenue, 0 when nothing was sold
    #[serde(with = "rust_decimal::serde::str")]
    pub contribution_margin: Decimal,
}

impl ExportRow {
    fn new(day: &PricedDay, room_type: &RoomType) -> Self {
        let occupied = occupied_rooms(day.expected_bookings);
        let revenue = round_money(Decimal::from(occupied) * day.final_price, 2);
        let total_variable_cost = round_money(Decimal::from(occupied) * room_type.variable_cost, 2);
        let contribution = revenue - total_variable_cost;
        let contribution_margin = ratio(contribution, revenue)
            .map(|margin| round_money(margin, 4))
            .unwrap_or(Decimal::ZERO);

        Self {
            date: day.date,
            room_type_id: room_type.id,
            room_type_name: room_type.name.clone(),
            base_price: room_type.base_price,
            variable_cost: room_type.variable_cost,
            inventory: room_type.inventory_count,
            suggested_price: day.suggested_price,
            final_price: day.final_price,
            is_override: day.is_override,
            forecasted_demand: day.demand_probability,
            forecasted_occupancy: day.expected_occupancy,
            occupied_rooms: occupied,
            revenue,
            total_variable_cost,
            contribution,
            contribution_margin,
        }
    }
}

/// Flatten priced days into export rows ordered by date, then room type id
pub fn export_rows(
    priced_days: &BTreeMap<Uuid, Vec<PricedDay>>,
    room_types: &[RoomType],
) -> Result<Vec<ExportRow>, PricingError> {
    let by_id = resolve_room_types(priced_days, room_types)?;

    let mut rows: Vec<ExportRow> = priced_days
        .iter()
        .flat_map(|(room_type_id, days)| {
            let room_type = by_id[room_type_id];
            days.iter().map(move |day| ExportRow::new(day, room_type))
        })
        .collect();
    rows.sort_by(|a, b| (a.date, a.room_type_id).cmp(&(b.date, b.room_type_id)));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn room_type(id: u128, name: &str, inventory_count: i32) -> RoomType {
        RoomType {
            id: Uuid::from_u128(id),
            hotel_id: Uuid::from_u128(1),
            name: name.to_string(),
            base_price: dec!(200),
            variable_cost: dec!(50),
            inventory_count,
            max_occupancy: 2,
            is_active: true,
        }
    }

    fn day(room_type_id: Uuid, d: u32, final_price: Decimal, bookings: Decimal) -> PricedDay {
        PricedDay {
            room_type_id,
            date: NaiveDate::from_ymd_opt(2025, 5, d).unwrap(),
            demand_probability: dec!(0.5),
            price_multiplier: dec!(1.0),
            suggested_price: dec!(200.00),
            final_price,
            is_override: final_price != dec!(200.00),
            override_notes: None,
            contribution_margin: final_price - dec!(50),
            contribution_margin_percentage: Decimal::ZERO,
            expected_occupancy: dec!(0.5),
            expected_bookings: bookings,
            expected_revenue: round_money(bookings * final_price, 2),
            expected_contribution: round_money(bookings * (final_price - dec!(50)), 2),
        }
    }

    #[test]
    fn test_export_row_figures() {
        let standard = room_type(0x101, "Standard", 10);
        let priced = BTreeMap::from([(
            standard.id,
            vec![day(standard.id, 1, dec!(200.00), dec!(4.5))],
        )]);

        let rows = export_rows(&priced, &[standard]).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        // 4.5 bookings round half-even to 4 rooms
        assert_eq!(row.occupied_rooms, 4);
        assert_eq!(row.revenue, dec!(800.00));
        assert_eq!(row.total_variable_cost, dec!(200.00));
        assert_eq!(row.contribution, dec!(600.00));
        assert_eq!(row.contribution_margin, dec!(0.75));
        assert_eq!(row.inventory, 10);
        assert_eq!(row.base_price, dec!(200));
        assert!(!row.is_override);
    }

    #[test]
    fn test_export_zero_revenue_reports_zero_margin() {
        let standard = room_type(0x101, "Standard", 10);
        let priced = BTreeMap::from([(
            standard.id,
            vec![day(standard.id, 1, dec!(200.00), dec!(0.4))],
        )]);
        let rows = export_rows(&priced, &[standard]).unwrap();
        assert_eq!(rows[0].occupied_rooms, 0);
        assert_eq!(rows[0].revenue, Decimal::ZERO);
        assert_eq!(rows[0].contribution_margin, Decimal::ZERO);
    }

    #[test]
    fn test_export_orders_by_date_then_room_type() {
        let suite = room_type(0x102, "Suite", 5);
        let standard = room_type(0x101, "Standard", 10);
        let priced = BTreeMap::from([
            (
                suite.id,
                vec![
                    day(suite.id, 1, dec!(220.00), dec!(2.0)),
                    day(suite.id, 2, dec!(200.00), dec!(3.0)),
                ],
            ),
            (
                standard.id,
                vec![
                    day(standard.id, 1, dec!(200.00), dec!(5.0)),
                    day(standard.id, 2, dec!(200.00), dec!(6.0)),
                ],
            ),
        ]);

        let rows = export_rows(&priced, &[suite.clone(), standard.clone()]).unwrap();
        let order: Vec<(u32, Uuid)> = rows
            .iter()
            .map(|r| (chrono::Datelike::day(&r.date), r.room_type_id))
            .collect();
        assert_eq!(
            order,
            vec![(1, standard.id), (1, suite.id), (2, standard.id), (2, suite.id)]
        );
        assert!(rows[1].is_override);
    }

    #[test]
    fn test_export_rejects_empty_and_unknown_input() {
        let standard = room_type(0x101, "Standard", 10);
        assert!(matches!(
            export_rows(&BTreeMap::new(), &[standard.clone()]),
            Err(PricingError::EmptyInput)
        ));

        let stranger = Uuid::from_u128(0x999);
        let priced = BTreeMap::from([(stranger, vec![day(stranger, 1, dec!(200.00), dec!(1.0))])]);
        assert!(matches!(
            export_rows(&priced, &[standard]),
            Err(PricingError::RoomTypeNotFound(id)) if id == stranger
        ));
    }
}
