//! Property configuration store.
//!
//! Hotels and room types are owned by an external configuration service.
//! The pricing service only reads them through [`RoomCatalog`]; the
//! in-memory implementation is loaded from a JSON file or seeded with the
//! demo properties.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::pricing::{Hotel, PricingError, PricingRule, RoomType};

/// Read interface over property configuration
pub trait RoomCatalog: Send + Sync {
    fn get_hotel(&self, hotel_id: Uuid) -> Result<Hotel, PricingError>;

    fn get_room_type(&self, room_type_id: Uuid) -> Result<RoomType, PricingError>;

    /// Active room types of a hotel, ordered by name
    fn room_types_for_hotel(&self, hotel_id: Uuid) -> Result<Vec<RoomType>, PricingError>;
}

/// Errors raised while loading a catalog file
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
struct CatalogFile {
    hotels: Vec<Hotel>,
    room_types: Vec<RoomType>,
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    hotels: HashMap<Uuid, Hotel>,
    room_types: HashMap<Uuid, RoomType>,
}

impl InMemoryCatalog {
    /// Build a catalog, rejecting invalid pricing rules, invalid room types
    /// and room types whose hotel is unknown
    pub fn new(hotels: Vec<Hotel>, room_types: Vec<RoomType>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for hotel in hotels {
            hotel
                .pricing_rule
                .validate()
                .map_err(|e| CatalogError::Invalid(format!("hotel {}: {}", hotel.id, e)))?;
            if catalog.hotels.insert(hotel.id, hotel.clone()).is_some() {
                return Err(CatalogError::Invalid(format!("duplicate hotel {}", hotel.id)));
            }
        }

        for room_type in room_types {
            room_type
                .validate()
                .map_err(|e| CatalogError::Invalid(e.to_string()))?;
            if !catalog.hotels.contains_key(&room_type.hotel_id) {
                return Err(CatalogError::Invalid(format!(
                    "room type {} references unknown hotel {}",
                    room_type.id, room_type.hotel_id
                )));
            }
            if catalog.room_types.insert(room_type.id, room_type.clone()).is_some() {
                return Err(CatalogError::Invalid(format!(
                    "duplicate room type {}",
                    room_type.id
                )));
            }
        }

        Ok(catalog)
    }

    /// Load a catalog from a JSON file with `hotels` and `room_types` arrays
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        let catalog = Self::new(file.hotels, file.room_types)?;
        info!(
            "Loaded catalog with {} hotels and {} room types",
            catalog.hotels.len(),
            catalog.room_types.len()
        );
        Ok(catalog)
    }

    /// Load from `path` when given, falling back to the demo properties
    pub fn load_or_demo(path: Option<&str>) -> Result<Self, CatalogError> {
        match path {
            Some(path) if Path::new(path).exists() => Self::from_file(path),
            Some(path) => {
                warn!("Catalog file {} not found, using demo catalog", path);
                Self::demo()
            }
            None => Self::demo(),
        }
    }

    /// Demo properties with their room types and pricing rules
    pub fn demo() -> Result<Self, CatalogError> {
        let grand = Hotel {
            id: GRAND_HOTEL_ID,
            name: "Grand Hotel".to_string(),
            currency: "USD".to_string(),
            monthly_fixed_costs: dec!(85000.00),
            pricing_rule: PricingRule::default(),
            is_active: true,
        };
        let city_center = Hotel {
            id: CITY_CENTER_HOTEL_ID,
            name: "City Center Hotel".to_string(),
            currency: "USD".to_string(),
            monthly_fixed_costs: dec!(65000.00),
            pricing_rule: PricingRule {
                min_price_multiplier: dec!(0.5),
                max_price_multiplier: dec!(2.0),
                low_demand_threshold: dec!(0.3),
                high_demand_threshold: dec!(0.7),
                margin_floor: None,
            },
            is_active: true,
        };
        let business = Hotel {
            id: BUSINESS_HOTEL_ID,
            name: "Business Hotel".to_string(),
            currency: "USD".to_string(),
            monthly_fixed_costs: dec!(75000.00),
            pricing_rule: PricingRule {
                min_price_multiplier: dec!(0.7),
                max_price_multiplier: dec!(1.5),
                low_demand_threshold: dec!(0.5),
                high_demand_threshold: dec!(0.8),
                margin_floor: None,
            },
            is_active: true,
        };

        let room = |id: u128, hotel_id: Uuid, name: &str, base, cost, inventory, max_occupancy| {
            RoomType {
                id: Uuid::from_u128(id),
                hotel_id,
                name: name.to_string(),
                base_price: base,
                variable_cost: cost,
                inventory_count: inventory,
                max_occupancy,
                is_active: true,
            }
        };

        let room_types = vec![
            room(0x101, GRAND_HOTEL_ID, "Standard Room", dec!(199.00), dec!(45.00), 40, 2),
            room(0x102, GRAND_HOTEL_ID, "Deluxe Room", dec!(299.00), dec!(65.00), 30, 2),
            room(0x103, GRAND_HOTEL_ID, "Executive Suite", dec!(499.00), dec!(95.00), 15, 3),
            room(0x201, CITY_CENTER_HOTEL_ID, "Standard Room", dec!(149.00), dec!(35.00), 50, 2),
            room(0x202, CITY_CENTER_HOTEL_ID, "Deluxe Room", dec!(229.00), dec!(55.00), 35, 2),
            room(0x301, BUSINESS_HOTEL_ID, "Standard Room", dec!(169.00), dec!(40.00), 45, 2),
            room(0x302, BUSINESS_HOTEL_ID, "Executive Room", dec!(249.00), dec!(60.00), 30, 2),
        ];

        Self::new(vec![grand, city_center, business], room_types)
    }

    pub fn hotel_count(&self) -> usize {
        self.hotels.len()
    }

    pub fn room_type_count(&self) -> usize {
        self.room_types.len()
    }
}

/// Demo hotel identifiers
pub const GRAND_HOTEL_ID: Uuid = Uuid::from_u128(0x1);
pub const CITY_CENTER_HOTEL_ID: Uuid = Uuid::from_u128(0x2);
pub const BUSINESS_HOTEL_ID: Uuid = Uuid::from_u128(0x3);

impl RoomCatalog for InMemoryCatalog {
    fn get_hotel(&self, hotel_id: Uuid) -> Result<Hotel, PricingError> {
        self.hotels
            .get(&hotel_id)
            .filter(|hotel| hotel.is_active)
            .cloned()
            .ok_or(PricingError::HotelNotFound(hotel_id))
    }

    fn get_room_type(&self, room_type_id: Uuid) -> Result<RoomType, PricingError> {
        self.room_types
            .get(&room_type_id)
            .cloned()
            .ok_or(PricingError::RoomTypeNotFound(room_type_id))
    }

    fn room_types_for_hotel(&self, hotel_id: Uuid) -> Result<Vec<RoomType>, PricingError> {
        self.get_hotel(hotel_id)?;

        let mut room_types: Vec<RoomType> = self
            .room_types
            .values()
            .filter(|room_type| room_type.hotel_id == hotel_id && room_type.is_active)
            .cloned()
            .collect();
        room_types.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(room_types)
    }
}
