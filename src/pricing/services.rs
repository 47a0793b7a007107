//! Pricing engine: turns a room's cost structure and a demand signal into
//! priced days.
//!
//! Every random draw (override roll, occupancy efficiency, mock demand) comes
//! from a caller-supplied RNG or seed, so identical inputs always reproduce
//! identical prices and concurrent requests never share state.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::calculators::{
    checked_difference, checked_product, clamp_occupancy, contribution_margin_percentage,
    price_multiplier, round_money, suggested_price, validate_probability,
};
use super::forecast::DemandSource;
use super::models::{
    ManualOverride, OccupancyModel, OverridePolicy, PricedDay, PricingRule, RoomType,
};

/// Longest schedule generated when no limit is configured
pub const DEFAULT_MAX_SCHEDULE_DAYS: u32 = 366;

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No priced days supplied")]
    EmptyInput,

    #[error("Room type {0} not found")]
    RoomTypeNotFound(Uuid),

    #[error("Hotel {0} not found")]
    HotelNotFound(Uuid),

    #[error("Division undefined: zero denominator")]
    DivisionUndefined,
}

/// Tunables shared by every pricing call
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub rule: PricingRule,
    pub override_policy: OverridePolicy,
    pub occupancy: OccupancyModel,
    pub max_schedule_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rule: PricingRule::default(),
            override_policy: OverridePolicy::default(),
            occupancy: OccupancyModel::default(),
            max_schedule_days: DEFAULT_MAX_SCHEDULE_DAYS,
        }
    }
}

/// Stateless dynamic pricing engine
#[derive(Debug, Clone)]
pub struct PricingEngine {
    settings: EngineSettings,
}

impl PricingEngine {
    pub fn new(settings: EngineSettings) -> Result<Self, PricingError> {
        settings.rule.validate()?;
        settings.override_policy.validate()?;
        settings.occupancy.validate()?;
        if settings.max_schedule_days == 0 {
            return Err(PricingError::InvalidInput(
                "max_schedule_days must be positive".to_string(),
            ));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Engine that prices with a hotel-specific rule instead of the default one
    pub fn with_rule(&self, rule: PricingRule) -> Result<Self, PricingError> {
        rule.validate()?;
        Ok(Self {
            settings: EngineSettings {
                rule,
                ..self.settings.clone()
            },
        })
    }

    /// Price one room type on one date.
    ///
    /// Fails with `InvalidInput` for a probability outside [0, 1] or an
    /// invalid room type; otherwise always returns a fully populated day.
    pub fn price_day<R: Rng + ?Sized>(
        &self,
        room_type: &RoomType,
        date: NaiveDate,
        demand_probability: Decimal,
        rng: &mut R,
    ) -> Result<PricedDay, PricingError> {
        self.price(room_type, date, demand_probability, None, rng)
    }

    /// Price one room-date with a hand-set price replacing the override roll
    pub fn price_day_with_override<R: Rng + ?Sized>(
        &self,
        room_type: &RoomType,
        date: NaiveDate,
        demand_probability: Decimal,
        manual_override: &ManualOverride,
        rng: &mut R,
    ) -> Result<PricedDay, PricingError> {
        self.price(room_type, date, demand_probability, Some(manual_override), rng)
    }

    /// Build a lazy schedule of `num_days` consecutive priced days.
    ///
    /// Nothing is priced until the schedule is iterated; each iteration
    /// reseeds from `seed` and therefore replays the same days.
    pub fn generate_schedule<'a>(
        &'a self,
        room_type: &'a RoomType,
        start_date: NaiveDate,
        num_days: i64,
        demand_source: &'a dyn DemandSource,
        seed: u64,
    ) -> Result<Schedule<'a>, PricingError> {
        room_type.validate()?;

        if num_days <= 0 {
            return Err(PricingError::InvalidInput(format!(
                "schedule length must be positive, got {}",
                num_days
            )));
        }
        if num_days > i64::from(self.settings.max_schedule_days) {
            return Err(PricingError::InvalidInput(format!(
                "schedule length {} exceeds the limit of {} days",
                num_days, self.settings.max_schedule_days
            )));
        }
        let num_days = num_days as u32;

        // last priced date is start_date + (num_days - 1)
        start_date
            .checked_add_days(Days::new(u64::from(num_days - 1)))
            .ok_or_else(|| {
                PricingError::InvalidInput(format!(
                    "schedule of {} days from {} runs past the supported calendar",
                    num_days, start_date
                ))
            })?;

        tracing::debug!(
            room_type_id = %room_type.id,
            %start_date,
            num_days,
            demand_source = demand_source.name(),
            "Generating pricing schedule"
        );

        Ok(Schedule {
            engine: self,
            room_type,
            start_date,
            num_days,
            demand_source,
            seed,
        })
    }

    fn price<R: Rng + ?Sized>(
        &self,
        room_type: &RoomType,
        date: NaiveDate,
        demand_probability: Decimal,
        manual_override: Option<&ManualOverride>,
        rng: &mut R,
    ) -> Result<PricedDay, PricingError> {
        validate_probability(demand_probability)?;
        room_type.validate()?;
        if let Some(manual) = manual_override {
            manual.validate()?;
        }

        let rule = &self.settings.rule;
        let multiplier = price_multiplier(demand_probability, rule)?;
        let suggested = suggested_price(
            room_type.base_price,
            room_type.variable_cost,
            multiplier,
            rule,
        )?;

        // The roll is drawn even when a manual price wins so that the
        // occupancy draw stays aligned with the seed.
        let rolled = self.roll_override(suggested, rng)?;
        let (final_price, is_override, override_notes) = match (manual_override, rolled) {
            (Some(manual), _) => (
                round_money(manual.price, 2),
                true,
                Some(
                    manual
                        .notes
                        .clone()
                        .unwrap_or_else(|| "Manual override".to_string()),
                ),
            ),
            (None, Some(adjusted)) => (
                adjusted,
                true,
                Some(self.settings.override_policy.note.clone()),
            ),
            (None, None) => (suggested, false, None),
        };

        let contribution_margin = checked_difference(final_price, room_type.variable_cost)?;

        let occupancy = &self.settings.occupancy;
        let efficiency = draw_between(rng, occupancy.min_efficiency, occupancy.max_efficiency);
        let expected_occupancy = round_money(clamp_occupancy(demand_probability * efficiency), 4);
        let expected_bookings = round_money(
            expected_occupancy * Decimal::from(room_type.inventory_count),
            1,
        );

        Ok(PricedDay {
            room_type_id: room_type.id,
            date,
            demand_probability: round_money(demand_probability, 2),
            price_multiplier: round_money(multiplier, 4),
            suggested_price: suggested,
            final_price,
            is_override,
            override_notes,
            contribution_margin,
            contribution_margin_percentage: contribution_margin_percentage(
                contribution_margin,
                final_price,
            ),
            expected_occupancy,
            expected_bookings,
            expected_revenue: round_money(checked_product(expected_bookings, final_price)?, 2),
            expected_contribution: round_money(
                checked_product(expected_bookings, contribution_margin)?,
                2,
            ),
        })
    }

    /// Adjusted price when the override roll hits, `None` otherwise
    fn roll_override<R: Rng + ?Sized>(
        &self,
        suggested: Decimal,
        rng: &mut R,
    ) -> Result<Option<Decimal>, PricingError> {
        let policy = &self.settings.override_policy;
        let roll = Decimal::new(rng.gen_range(0..10_000), 4);
        if roll >= policy.probability {
            return Ok(None);
        }
        let adjustment = draw_between(rng, policy.min_adjustment, policy.max_adjustment);
        let adjusted = checked_product(suggested, Decimal::ONE + adjustment)?;
        Ok(Some(round_money(adjusted, 2)))
    }
}

/// Uniform draw from [low, high] at four decimal places
pub(crate) fn draw_between<R: Rng + ?Sized>(rng: &mut R, low: Decimal, high: Decimal) -> Decimal {
    let unit = Decimal::new(rng.gen_range(0..=10_000), 4);
    low + (high - low) * unit
}

/// Lazy, restartable run of consecutive priced days for one room type
#[derive(Clone, Copy)]
pub struct Schedule<'a> {
    engine: &'a PricingEngine,
    room_type: &'a RoomType,
    start_date: NaiveDate,
    num_days: u32,
    demand_source: &'a dyn DemandSource,
    seed: u64,
}

impl<'a> Schedule<'a> {
    pub fn len(&self) -> usize {
        self.num_days as usize
    }

    pub fn is_empty(&self) -> bool {
        self.num_days == 0
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Start a fresh pass over the schedule
    pub fn iter(&self) -> ScheduleIter<'a> {
        ScheduleIter {
            schedule: *self,
            rng: StdRng::seed_from_u64(self.seed),
            offset: 0,
        }
    }

    /// Price every day, stopping at the first failure
    pub fn collect_days(&self) -> Result<Vec<PricedDay>, PricingError> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &Schedule<'a> {
    type Item = Result<PricedDay, PricingError>;
    type IntoIter = ScheduleIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct ScheduleIter<'a> {
    schedule: Schedule<'a>,
    rng: StdRng,
    offset: u32,
}

impl Iterator for ScheduleIter<'_> {
    type Item = Result<PricedDay, PricingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.schedule.num_days {
            return None;
        }
        let schedule = self.schedule;
        let offset = self.offset;
        self.offset += 1;

        let Some(date) = schedule
            .start_date
            .checked_add_days(Days::new(u64::from(offset)))
        else {
            return Some(Err(PricingError::InvalidInput(format!(
                "date {} days after {} is out of range",
                offset, schedule.start_date
            ))));
        };

        let priced = schedule
            .demand_source
            .forecast(schedule.room_type, date, &mut self.rng)
            .and_then(|demand| {
                schedule
                    .engine
                    .price_day(schedule.room_type, date, demand, &mut self.rng)
            });
        Some(priced)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.schedule.num_days.saturating_sub(self.offset) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScheduleIter<'_> {}
