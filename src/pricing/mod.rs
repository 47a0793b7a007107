//! Dynamic room pricing.
//!
//! Prices a room type for a date from its cost structure and a demand
//! probability, and generates multi-day schedules from a demand source.

pub mod calculators;
pub mod forecast;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::round_money;
pub use forecast::{
    forecast_range, DemandPoint, DemandSource, ForecastTable, SeasonalDemand, UniformDemand,
    MAX_FORECAST_DAYS,
};
pub use models::{
    Hotel, ManualOverride, OccupancyModel, OverridePolicy, PricedDay, PricingRule, RoomType,
};
pub use routes::router;
pub use services::{
    EngineSettings, PricingEngine, PricingError, Schedule, ScheduleIter, DEFAULT_MAX_SCHEDULE_DAYS,
};
