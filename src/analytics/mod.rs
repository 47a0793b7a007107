//! Revenue, occupancy and contribution-margin analytics over priced days.

pub mod aggregate;
pub mod export;
pub mod performance;
pub mod requests;
pub mod responses;
pub mod routes;

pub use aggregate::{aggregate, AnalyticsBucket, BucketSize, RoomTypeBreakdown};
pub use export::{export_rows, ExportRow};
pub use performance::{pricing_performance, DailyPerformance, PricingPerformance};
pub use routes::router;
