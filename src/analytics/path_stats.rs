// src/analytics/path_stats.rs
//! Descriptive statistics of a single trajectory

use crate::models::PricePath;
use statrs::statistics::Statistics;

#[derive(Clone, Debug, PartialEq)]
pub struct PathStatistics {
    pub min: f64,
    pub max: f64,
    /// `P_T / P_0 - 1`
    pub total_return: f64,
    /// Mean daily simple return
    pub mean_return: f64,
    /// Sample std-dev of daily simple returns (0 with fewer than two returns)
    pub return_std_dev: f64,
    /// Sample std-dev of daily log returns, `None` once a price is ≤ 0
    pub realized_volatility: Option<f64>,
    /// Largest peak-to-trough decline as a fraction of the peak
    pub max_drawdown: f64,
}

fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        values.iter().std_dev()
    }
}

/// Largest fractional fall from a running maximum
pub fn max_drawdown(prices: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &p in prices {
        peak = peak.max(p);
        if peak > 0.0 {
            worst = worst.max((peak - p) / peak);
        }
    }
    worst
}

impl PathStatistics {
    pub fn from_path(path: &PricePath) -> Self {
        let prices = path.prices();
        let returns = path.simple_returns();

        PathStatistics {
            min: prices.iter().copied().fold(f64::INFINITY, f64::min),
            max: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            total_return: path.final_price() / path.start_price() - 1.0,
            mean_return: returns.iter().mean(),
            return_std_dev: sample_std_dev(&returns),
            realized_volatility: path.log_returns().map(|lr| sample_std_dev(&lr)),
            max_drawdown: max_drawdown(prices),
        }
    }
}
