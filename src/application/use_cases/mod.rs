pub mod action_service;
pub mod datasets;
pub mod house_prices;
pub mod housing_stats;
pub mod missing_middle;
