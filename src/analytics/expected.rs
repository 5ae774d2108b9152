// src/analytics/expected.rs
//! Closed-form expected prices
//!
//! Daily draws are independent with `E[1 + μ + σZ] = 1 + μ`, so the expected
//! price compounds at the drift:
//! ```text
//! E[P_d] = P_0 (1 + μ)^d
//! ```
//! Once the event day `e` has passed (`d > e`), the shocked step contributes
//! its own factor in place of `1 + μ`:
//!
//! | mode | factor for step `e → e+1` |
//! |---|---|
//! | compound | `(1 + μ)(1 + impact)` |
//! | additive | `1 + μ + impact` |
//! | replace | `1 + impact` |
//!
//! Used to check Monte Carlo ensembles against theory.

use crate::math_utils::compound;
use crate::models::{EventMode, SimulationConfig};

/// `E[P_day]` for the given configuration; `day` beyond the horizon is extrapolated
pub fn expected_price(config: &SimulationConfig, day: usize) -> f64 {
    let growth = 1.0 + config.drift();
    let start = config.start_price();

    match config.event() {
        Some(ev) if day > ev.day => {
            let rest = compound(start, config.drift(), day - 1);
            match ev.mode {
                EventMode::Compound => rest * growth * (1.0 + ev.impact),
                EventMode::Additive => rest * (growth + ev.impact),
                EventMode::Replace => rest * (1.0 + ev.impact),
            }
        }
        _ => compound(start, config.drift(), day),
    }
}

/// Expected price for every day `0..=days`
pub fn expected_path(config: &SimulationConfig) -> Vec<f64> {
    (0..=config.days())
        .map(|day| expected_price(config, day))
        .collect()
}
