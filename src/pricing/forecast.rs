//! Demand forecasting collaborators.
//!
//! The engine treats demand as an opaque probability per room-date. Real
//! forecasts come from an external model; the sources here are stand-ins
//! that keep the service usable without one.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use uuid::Uuid;

use super::calculators::{round_money, validate_probability};
use super::models::RoomType;
use super::services::PricingError;

/// Per-date booking probability for a room type
pub trait DemandSource: Send + Sync {
    fn forecast(
        &self,
        room_type: &RoomType,
        date: NaiveDate,
        rng: &mut dyn RngCore,
    ) -> Result<Decimal, PricingError>;

    /// Short identifier used in logs and configuration
    fn name(&self) -> &'static str;
}

/// Longest demand forecast served in one request
pub const MAX_FORECAST_DAYS: i64 = 365;

/// Forecast demand for one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandPoint {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub demand_probability: Decimal,
}

/// Forecast `days` consecutive dates from `start_date` with a generator
/// seeded from `seed`. Same inputs and seed give the same forecast.
pub fn forecast_range(
    source: &dyn DemandSource,
    room_type: &RoomType,
    start_date: NaiveDate,
    days: i64,
    seed: u64,
) -> Result<Vec<DemandPoint>, PricingError> {
    if !(1..=MAX_FORECAST_DAYS).contains(&days) {
        return Err(PricingError::InvalidInput(format!(
            "forecast length must be within 1..={}, got {}",
            MAX_FORECAST_DAYS, days
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    (0..days as u64)
        .map(|offset| -> Result<DemandPoint, PricingError> {
            let date = start_date
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| {
                    PricingError::InvalidInput(format!(
                        "date {} days after {} is out of range",
                        offset, start_date
                    ))
                })?;
            let demand_probability = source.forecast(room_type, date, &mut rng)?;
            Ok(DemandPoint {
                date,
                demand_probability,
            })
        })
        .collect()
}

/// Uniform random demand. Placeholder for a real forecaster.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformDemand;

impl DemandSource for UniformDemand {
    fn forecast(
        &self,
        _room_type: &RoomType,
        _date: NaiveDate,
        rng: &mut dyn RngCore,
    ) -> Result<Decimal, PricingError> {
        Ok(Decimal::new(rng.gen_range(0..=10_000), 4))
    }

    fn name(&self) -> &'static str {
        "uniform"
    }
}

/// Seasonal demand curve: busier summers and weekends, quieter winters,
/// with a little normal noise.
#[derive(Debug, Clone)]
pub struct SeasonalDemand {
    pub base: Decimal,
    pub summer_lift: Decimal,
    pub winter_drop: Decimal,
    pub shoulder_lift: Decimal,
    pub weekend_lift: Decimal,
    pub noise_std_dev: f64,
}

impl SeasonalDemand {
    pub fn new(noise_std_dev: f64) -> Result<Self, PricingError> {
        let seasonal = Self {
            noise_std_dev,
            ..Self::default()
        };
        seasonal.noise()?;
        Ok(seasonal)
    }

    fn noise(&self) -> Result<Normal<f64>, PricingError> {
        Normal::new(0.0, self.noise_std_dev)
            .map_err(|e| PricingError::InvalidInput(format!("invalid demand noise: {}", e)))
    }

    /// Noise-free demand for a date
    pub fn expected(&self, date: NaiveDate) -> Decimal {
        let seasonal = match date.month() {
            6..=8 => self.summer_lift,
            12 | 1 | 2 => self.winter_drop,
            _ => self.shoulder_lift,
        };
        let weekend = match date.weekday() {
            Weekday::Sat | Weekday::Sun => self.weekend_lift,
            _ => Decimal::ZERO,
        };
        self.base + seasonal + weekend
    }
}

impl Default for SeasonalDemand {
    fn default() -> Self {
        Self {
            base: dec!(0.6),
            summer_lift: dec!(0.2),
            winter_drop: dec!(-0.15),
            shoulder_lift: dec!(0.05),
            weekend_lift: dec!(0.15),
            noise_std_dev: 0.05,
        }
    }
}

impl DemandSource for SeasonalDemand {
    fn forecast(
        &self,
        _room_type: &RoomType,
        date: NaiveDate,
        rng: &mut dyn RngCore,
    ) -> Result<Decimal, PricingError> {
        let noise = Decimal::from_f64(self.noise()?.sample(rng)).unwrap_or(Decimal::ZERO);
        let demand = (self.expected(date) + noise).max(Decimal::ZERO).min(Decimal::ONE);
        Ok(round_money(demand, 4))
    }

    fn name(&self) -> &'static str {
        "seasonal"
    }
}

/// Explicit forecasts keyed by room type and date, as delivered by an
/// external forecasting service
#[derive(Debug, Clone, Default)]
pub struct ForecastTable {
    entries: HashMap<(Uuid, NaiveDate), Decimal>,
}

impl ForecastTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, room_type_id: Uuid, date: NaiveDate, probability: Decimal) {
        self.entries.insert((room_type_id, date), probability);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DemandSource for ForecastTable {
    fn forecast(
        &self,
        room_type: &RoomType,
        date: NaiveDate,
        _rng: &mut dyn RngCore,
    ) -> Result<Decimal, PricingError> {
        let probability = self
            .entries
            .get(&(room_type.id, date))
            .copied()
            .ok_or_else(|| {
                PricingError::InvalidInput(format!(
                    "no demand forecast for room type {} on {}",
                    room_type.id, date
                ))
            })?;
        validate_probability(probability)?;
        Ok(probability)
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn room() -> RoomType {
        RoomType {
            id: Uuid::new_v4(),
            hotel_id: Uuid::new_v4(),
            name: "Executive Suite".to_string(),
            base_price: dec!(499),
            variable_cost: dec!(95),
            inventory_count: 15,
            max_occupancy: 3,
            is_active: true,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_uniform_demand_stays_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(10);
        let room = room();
        for _ in 0..500 {
            let demand = UniformDemand.forecast(&room, date(2025, 1, 1), &mut rng).unwrap();
            assert!(demand >= Decimal::ZERO && demand <= Decimal::ONE);
        }
    }

    #[test]
    fn test_seasonal_expected_curve() {
        let seasonal = SeasonalDemand::default();
        // Saturday in July
        assert_eq!(seasonal.expected(date(2025, 7, 12)), dec!(0.95));
        // Wednesday in January
        assert_eq!(seasonal.expected(date(2025, 1, 15)), dec!(0.45));
        // Tuesday in April
        assert_eq!(seasonal.expected(date(2025, 4, 15)), dec!(0.65));
    }

    #[test]
    fn test_seasonal_forecast_is_clamped() {
        let seasonal = SeasonalDemand::new(0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let room = room();
        for day in 1..=28 {
            let demand = seasonal.forecast(&room, date(2025, 7, day), &mut rng).unwrap();
            assert!(demand >= Decimal::ZERO && demand <= Decimal::ONE);
        }
    }

    #[test]
    fn test_seasonal_rejects_bad_noise() {
        assert!(SeasonalDemand::new(-1.0).is_err());
    }

    #[test]
    fn test_forecast_range_is_seeded() {
        let room = room();
        let seasonal = SeasonalDemand::default();
        let first = forecast_range(&seasonal, &room, date(2025, 6, 28), 5, 17).unwrap();
        let again = forecast_range(&seasonal, &room, date(2025, 6, 28), 5, 17).unwrap();
        assert_eq!(first, again);

        assert_eq!(first.len(), 5);
        assert_eq!(first[0].date, date(2025, 6, 28));
        assert_eq!(first[4].date, date(2025, 7, 2));
        assert!(first
            .iter()
            .all(|p| p.demand_probability >= Decimal::ZERO && p.demand_probability <= Decimal::ONE));

        let other = forecast_range(&UniformDemand, &room, date(2025, 6, 28), 5, 18).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_forecast_range_rejects_bad_length() {
        let room = room();
        for days in [0, -1, MAX_FORECAST_DAYS + 1] {
            let result = forecast_range(&UniformDemand, &room, date(2025, 1, 1), days, 1);
            assert!(matches!(result, Err(PricingError::InvalidInput(_))));
        }
        assert!(forecast_range(&UniformDemand, &room, NaiveDate::MAX, 2, 1).is_err());
    }

    #[test]
    fn test_forecast_range_surfaces_missing_table_entries() {
        let room = room();
        let mut table = ForecastTable::new();
        table.insert(room.id, date(2025, 3, 3), dec!(0.42));
        let points = forecast_range(&table, &room, date(2025, 3, 3), 1, 0).unwrap();
        assert_eq!(points[0].demand_probability, dec!(0.42));
        assert!(forecast_range(&table, &room, date(2025, 3, 3), 2, 0).is_err());
    }

    #[test]
    fn test_forecast_table_lookup() {
        let room = room();
        let mut table = ForecastTable::new();
        table.insert(room.id, date(2025, 3, 3), dec!(0.42));
        table.insert(room.id, date(2025, 3, 4), dec!(1.7));
        assert_eq!(table.len(), 2);

        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            table.forecast(&room, date(2025, 3, 3), &mut rng).unwrap(),
            dec!(0.42)
        );
        assert!(table.forecast(&room, date(2025, 3, 4), &mut rng).is_err());
        assert!(table.forecast(&room, date(2025, 3, 5), &mut rng).is_err());
    }
}
