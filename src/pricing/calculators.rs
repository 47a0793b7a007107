//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no randomness, no catalog access.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::models::PricingRule;
use super::services::PricingError;

/// Lowest occupancy ever reported for a priced day
pub const MIN_OCCUPANCY: Decimal = dec!(0.10);
/// Highest occupancy ever reported for a priced day
pub const MAX_OCCUPANCY: Decimal = dec!(0.95);
/// Largest price, cost or margin the engine accepts as input
pub const MAX_MONEY: Decimal = dec!(1000000000);

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use hotel_pricing_engine::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Check that a demand probability lies in [0, 1]
pub fn validate_probability(demand_probability: Decimal) -> Result<(), PricingError> {
    if demand_probability < Decimal::ZERO || demand_probability > Decimal::ONE {
        return Err(PricingError::InvalidInput(format!(
            "demand probability {} is outside [0, 1]",
            demand_probability
        )));
    }
    Ok(())
}

/// Reject a money amount outside [0, MAX_MONEY]
pub fn validate_money(field: &str, amount: Decimal) -> Result<(), PricingError> {
    if amount < Decimal::ZERO {
        return Err(PricingError::InvalidInput(format!(
            "{} must not be negative, got {}",
            field, amount
        )));
    }
    if amount > MAX_MONEY {
        return Err(PricingError::InvalidInput(format!(
            "{} {} exceeds the limit of {}",
            field, amount, MAX_MONEY
        )));
    }
    Ok(())
}

/// Multiply, reporting overflow as `InvalidInput`
pub fn checked_product(a: Decimal, b: Decimal) -> Result<Decimal, PricingError> {
    a.checked_mul(b).ok_or_else(|| {
        PricingError::InvalidInput(format!("{} * {} overflows the money range", a, b))
    })
}

/// Subtract, reporting overflow as `InvalidInput`
pub fn checked_difference(a: Decimal, b: Decimal) -> Result<Decimal, PricingError> {
    a.checked_sub(b).ok_or_else(|| {
        PricingError::InvalidInput(format!("{} - {} overflows the money range", a, b))
    })
}

/// Divide, reporting a zero denominator as `DivisionUndefined`
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Result<Decimal, PricingError> {
    numerator
        .checked_div(denominator)
        .ok_or(PricingError::DivisionUndefined)
}

/// Piecewise-linear price multiplier for a demand probability.
///
/// The three tiers meet at 1.0 on both thresholds, so the price never jumps
/// as demand crosses from one tier into the next.
pub fn price_multiplier(
    demand_probability: Decimal,
    rule: &PricingRule,
) -> Result<Decimal, PricingError> {
    validate_probability(demand_probability)?;

    let degenerate = |_| {
        PricingError::InvalidInput("pricing rule thresholds leave an empty tier".to_string())
    };

    if demand_probability <= rule.low_demand_threshold {
        // Discount zone: min multiplier at zero demand up to 1.0 at the threshold
        let demand_ratio = ratio(demand_probability, rule.low_demand_threshold).map_err(degenerate)?;
        Ok(rule.min_price_multiplier + (Decimal::ONE - rule.min_price_multiplier) * demand_ratio)
    } else if demand_probability >= rule.high_demand_threshold {
        // Premium zone: 1.0 at the threshold up to max multiplier at full demand
        let demand_ratio = ratio(
            demand_probability - rule.high_demand_threshold,
            Decimal::ONE - rule.high_demand_threshold,
        )
        .map_err(degenerate)?;
        Ok(Decimal::ONE + (rule.max_price_multiplier - Decimal::ONE) * demand_ratio)
    } else {
        Ok(Decimal::ONE)
    }
}

/// Suggested price for a base price and multiplier, raised to the rule's
/// margin floor when one is configured
pub fn suggested_price(
    base_price: Decimal,
    variable_cost: Decimal,
    multiplier: Decimal,
    rule: &PricingRule,
) -> Result<Decimal, PricingError> {
    let price = round_money(checked_product(base_price, multiplier)?, 2);
    match rule.margin_floor {
        Some(floor) => {
            let floor_price = variable_cost.checked_add(floor).ok_or_else(|| {
                PricingError::InvalidInput("margin floor overflows the money range".to_string())
            })?;
            Ok(price.max(round_money(floor_price, 2)))
        }
        None => Ok(price),
    }
}

/// Contribution margin as a percentage of the final price.
///
/// A zero price has no meaningful percentage and reports 0.
pub fn contribution_margin_percentage(contribution_margin: Decimal, final_price: Decimal) -> Decimal {
    ratio(contribution_margin, final_price)
        .ok()
        .and_then(|r| r.checked_mul(dec!(100)))
        .map(|pct| round_money(pct, 2))
        .unwrap_or(Decimal::ZERO)
}

/// Clamp a raw occupancy estimate into [0.10, 0.95]
pub fn clamp_occupancy(raw_occupancy: Decimal) -> Decimal {
    raw_occupancy.max(MIN_OCCUPANCY).min(MAX_OCCUPANCY)
}

/// Whole rooms occupied for a fractional booking estimate
pub fn occupied_rooms(expected_bookings: Decimal) -> i64 {
    round_money(expected_bookings, 0).to_i64().unwrap_or(0)
}
