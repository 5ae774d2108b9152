//! # price-sim: Reproducible Daily Price Trajectories
//!
//! Synthesizes the daily price path of a single asset whose simple return each
//! day is normally distributed around a drift, with an optional one-time market
//! event that shocks the price on a chosen day.
//!
//! ## Key Features
//!
//! - **Validated configuration**: invalid parameters are rejected before any simulation runs
//! - **Pluggable randomness**: simulators own a [`rng::NormalSource`]; seed it for
//!   bit-identical paths
//! - **Explicit event semantics**: compound, additive, or replacing shocks ([`models::EventMode`])
//! - **Parallel ensembles**: thousands of independent paths with Rayon, stored in `ndarray`
//! - **Analytics**: closed-form expectations and per-path statistics
//!
//! ## Quick Start
//!
//! ```rust
//! use price_sim::models::{PriceSimulator, SimulationConfig};
//!
//! // One year of a volatile, slowly declining market with a crash on day 100
//! let config = SimulationConfig::new(100.0, 365, 0.03, -0.001, Some(100), Some(-0.2))
//!     .expect("Valid configuration");
//!
//! let mut sim = PriceSimulator::with_seed(config, 42);
//! let prices = sim.generate();
//!
//! assert_eq!(prices.len(), 366);
//! assert_eq!(prices[0], 100.0);
//! ```
//!
//! ## Model
//!
//! ```text
//! P_i = P_{i-1} (1 + μ + σ Z_i),   Z_i ~ N(0,1)
//! ```
//! and on the step after the event day `e`, `P_{e+1}` is further multiplied by
//! `(1 + impact)` (default compounding mode). Presentation (plots, CSV files,
//! logging) is left to callers; [`output`] offers CSV helpers for them.

// Module declarations
pub mod error;
pub mod rng;
pub mod math_utils;
pub mod models;
pub mod mc;
pub mod analytics;
pub mod output;

// Re-export commonly used types for convenience
pub use error::{SimError, SimResult};
pub use models::{EventMode, MarketEvent, PricePath, PriceSimulator, SimulationConfig};
pub use rng::NormalSource;
