// src/analytics/mod.rs
pub mod expected;
pub mod path_stats;

pub use expected::{expected_path, expected_price};
pub use path_stats::PathStatistics;
