//! Domain models for room pricing.
//!
//! Property configuration (hotels, room types, pricing rules) is owned by an
//! external configuration store; the engine only ever reads it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculators::validate_money;
use super::services::PricingError;

/// Highest price multiplier a pricing rule may configure
pub const MAX_PRICE_MULTIPLIER: Decimal = dec!(100);

/// A property whose room types are priced together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub monthly_fixed_costs: Decimal,
    #[serde(default)]
    pub pricing_rule: PricingRule,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}

/// A sellable unit type within a hotel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomType {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    /// Standard/rack rate
    pub base_price: Decimal,
    /// Cost incurred per occupied room-night
    pub variable_cost: Decimal,
    /// Number of sellable rooms of this type
    pub inventory_count: i32,
    #[serde(default = "default_max_occupancy")]
    pub max_occupancy: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_max_occupancy() -> i32 {
    2
}

impl RoomType {
    /// Reject cost structures the engine cannot price
    pub fn validate(&self) -> Result<(), PricingError> {
        validate_money(&format!("room type {} base_price", self.id), self.base_price)?;
        validate_money(&format!("room type {} variable_cost", self.id), self.variable_cost)?;
        if self.inventory_count < 0 {
            return Err(PricingError::InvalidInput(format!(
                "room type {} has negative inventory count {}",
                self.id, self.inventory_count
            )));
        }
        Ok(())
    }
}

/// Demand tiering applied to a hotel's base prices.
///
/// Below `low_demand_threshold` the multiplier rises linearly from
/// `min_price_multiplier` to 1.0; above `high_demand_threshold` it rises
/// linearly from 1.0 to `max_price_multiplier` at full demand. In between
/// the base price is used unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    pub min_price_multiplier: Decimal,
    pub max_price_multiplier: Decimal,
    pub low_demand_threshold: Decimal,
    pub high_demand_threshold: Decimal,
    /// Minimum margin over variable cost for suggested prices. Off by default:
    /// loss-making suggestions are allowed unless a floor is configured.
    #[serde(default)]
    pub margin_floor: Option<Decimal>,
}

impl Default for PricingRule {
    fn default() -> Self {
        Self {
            min_price_multiplier: dec!(0.6),
            max_price_multiplier: dec!(2.0),
            low_demand_threshold: dec!(0.30),
            high_demand_threshold: dec!(0.70),
            margin_floor: None,
        }
    }
}

impl PricingRule {
    pub fn validate(&self) -> Result<(), PricingError> {
        let mut errors = Vec::new();

        if self.min_price_multiplier < Decimal::ZERO || self.min_price_multiplier > Decimal::ONE {
            errors.push("min_price_multiplier must be within [0, 1]");
        }
        if self.max_price_multiplier < Decimal::ONE {
            errors.push("max_price_multiplier must be at least 1");
        }
        if self.max_price_multiplier > MAX_PRICE_MULTIPLIER {
            errors.push("max_price_multiplier must not exceed 100");
        }
        if self.low_demand_threshold <= Decimal::ZERO {
            errors.push("low_demand_threshold must be positive");
        }
        if self.high_demand_threshold >= Decimal::ONE {
            errors.push("high_demand_threshold must be below 1");
        }
        if self.low_demand_threshold >= self.high_demand_threshold {
            errors.push("low_demand_threshold must be below high_demand_threshold");
        }
        if let Some(floor) = self.margin_floor {
            if validate_money("margin_floor", floor).is_err() {
                errors.push("margin_floor must be within the money range");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PricingError::InvalidInput(format!(
                "invalid pricing rule: {}",
                errors.join("; ")
            )))
        }
    }
}

/// Probabilistic revenue-manager adjustment applied on top of suggested prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverridePolicy {
    /// Chance in [0, 1] that a day gets adjusted
    pub probability: Decimal,
    /// Lower bound of the relative adjustment (e.g. -0.10 for 10% off)
    pub min_adjustment: Decimal,
    /// Upper bound of the relative adjustment
    pub max_adjustment: Decimal,
    pub note: String,
}

impl Default for OverridePolicy {
    fn default() -> Self {
        Self {
            probability: dec!(0.10),
            min_adjustment: dec!(-0.10),
            max_adjustment: dec!(0.15),
            note: "Adjusted for local events".to_string(),
        }
    }
}

impl OverridePolicy {
    /// Policy that never adjusts suggested prices
    pub fn disabled() -> Self {
        Self {
            probability: Decimal::ZERO,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if self.probability < Decimal::ZERO || self.probability > Decimal::ONE {
            return Err(PricingError::InvalidInput(format!(
                "override probability {} is outside [0, 1]",
                self.probability
            )));
        }
        if self.min_adjustment > self.max_adjustment {
            return Err(PricingError::InvalidInput(format!(
                "override adjustment range [{}, {}] is empty",
                self.min_adjustment, self.max_adjustment
            )));
        }
        if self.min_adjustment <= Decimal::NEGATIVE_ONE {
            return Err(PricingError::InvalidInput(
                "override adjustment must keep prices above zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Range of the booking-efficiency factor applied to demand probability
/// before the occupancy clamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyModel {
    pub min_efficiency: Decimal,
    pub max_efficiency: Decimal,
}

impl Default for OccupancyModel {
    fn default() -> Self {
        Self {
            min_efficiency: dec!(0.85),
            max_efficiency: dec!(1.05),
        }
    }
}

impl OccupancyModel {
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.min_efficiency < Decimal::ZERO || self.min_efficiency > self.max_efficiency {
            return Err(PricingError::InvalidInput(format!(
                "occupancy efficiency range [{}, {}] is invalid",
                self.min_efficiency, self.max_efficiency
            )));
        }
        Ok(())
    }
}

/// Price set by hand for one room-date, replacing the override roll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualOverride {
    pub price: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ManualOverride {
    pub fn validate(&self) -> Result<(), PricingError> {
        validate_money("override price", self.price)
    }
}

/// Priced result for one (room type, date) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedDay {
    pub room_type_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub demand_probability: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_multiplier: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub suggested_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price: Decimal,
    pub is_override: bool,
    pub override_notes: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub contribution_margin: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub contribution_margin_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub expected_occupancy: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub expected_bookings: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub expected_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub expected_contribution: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> RoomType {
        RoomType {
            id: Uuid::new_v4(),
            hotel_id: Uuid::new_v4(),
            name: "Standard Room".to_string(),
            base_price: dec!(199.00),
            variable_cost: dec!(45.00),
            inventory_count: 40,
            max_occupancy: 2,
            is_active: true,
        }
    }

    #[test]
    fn test_room_type_validation() {
        assert!(room().validate().is_ok());

        let mut negative_cost = room();
        negative_cost.variable_cost = dec!(-1);
        assert!(matches!(
            negative_cost.validate(),
            Err(PricingError::InvalidInput(_))
        ));

        let mut negative_inventory = room();
        negative_inventory.inventory_count = -3;
        assert!(negative_inventory.validate().is_err());

        let mut free_room = room();
        free_room.base_price = Decimal::ZERO;
        assert!(free_room.validate().is_ok());

        let mut huge_price = room();
        huge_price.base_price = dec!(70000000000000000000000000000);
        assert!(matches!(
            huge_price.validate(),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_manual_override_validation() {
        let manual = |price| ManualOverride { price, notes: None };
        assert!(manual(dec!(250.00)).validate().is_ok());
        assert!(manual(dec!(-1)).validate().is_err());
        assert!(manual(dec!(70000000000000000000000000000)).validate().is_err());
    }

    #[test]
    fn test_pricing_rule_rejects_unbounded_multiplier() {
        let rule = PricingRule {
            max_price_multiplier: dec!(1000),
            ..PricingRule::default()
        };
        let err = rule.validate().unwrap_err();
        assert!(err.to_string().contains("max_price_multiplier"));
    }

    #[test]
    fn test_default_pricing_rule_is_valid() {
        assert!(PricingRule::default().validate().is_ok());
    }

    #[test]
    fn test_pricing_rule_rejects_inverted_thresholds() {
        let rule = PricingRule {
            low_demand_threshold: dec!(0.8),
            high_demand_threshold: dec!(0.7),
            ..PricingRule::default()
        };
        let err = rule.validate().unwrap_err();
        assert!(err.to_string().contains("low_demand_threshold"));
    }

    #[test]
    fn test_pricing_rule_rejects_degenerate_thresholds() {
        let rule = PricingRule {
            low_demand_threshold: Decimal::ZERO,
            ..PricingRule::default()
        };
        assert!(rule.validate().is_err());

        let rule = PricingRule {
            high_demand_threshold: Decimal::ONE,
            ..PricingRule::default()
        };
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_override_policy_validation() {
        assert!(OverridePolicy::default().validate().is_ok());
        assert!(OverridePolicy::disabled().validate().is_ok());

        let policy = OverridePolicy {
            probability: dec!(1.5),
            ..OverridePolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = OverridePolicy {
            min_adjustment: dec!(0.2),
            max_adjustment: dec!(0.1),
            ..OverridePolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_room_type_deserializes_numbers_and_defaults() {
        let json = serde_json::json!({
            "id": "6a1f8c1e-3f7e-4a47-9a51-0c9b7b5b2f10",
            "hotel_id": "0b7e8d3c-2a55-4b4e-8f0c-31d1f5e0a9b2",
            "name": "Deluxe Room",
            "base_price": 299.0,
            "variable_cost": "65.00",
            "inventory_count": 30
        });
        let room: RoomType = serde_json::from_value(json).unwrap();
        assert_eq!(room.base_price, dec!(299));
        assert_eq!(room.variable_cost, dec!(65.00));
        assert_eq!(room.max_occupancy, 2);
        assert!(room.is_active);
    }
}
