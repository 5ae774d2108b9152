// src/models/simulator.rs
//! Daily price trajectory generation
//!
//! # Mathematical Framework
//!
//! Each day the price moves by a simple return drawn from a normal law:
//! ```text
//! r_i = μ + σ Z_i,        Z_i ~ N(0,1)
//! P_i = P_{i-1} (1 + r_i)
//! ```
//!
//! Where:
//! - μ: daily drift (expected return)
//! - σ: daily volatility
//!
//! When a [`MarketEvent`](super::config::MarketEvent) is configured on day `d`,
//! the step into `P_{d+1}` is additionally shocked according to its
//! [`EventMode`](super::config::EventMode); with the default compounding mode
//! `P_{d+1} = P_d (1 + r_{d+1}) (1 + impact)`.
//!
//! Prices are not clamped. A large negative draw or an impact ≤ -1 can push
//! the path to zero or below; [`PricePath::is_degenerate`] reports it.

use super::config::SimulationConfig;
use crate::rng::{NormalSource, RandNormal};
use rand::rngs::StdRng;
use std::ops::{Deref, Index};

/// Ordered daily prices, index = day number, index 0 = start price.
#[derive(Clone, Debug, PartialEq)]
pub struct PricePath {
    prices: Vec<f64>,
    event_day: Option<usize>,
}

impl PricePath {
    /// A path covers at least one day; `None` for fewer than two prices.
    pub fn new(prices: Vec<f64>, event_day: Option<usize>) -> Option<Self> {
        if prices.len() < 2 {
            return None;
        }
        Some(PricePath { prices, event_day })
    }

    /// Callers guarantee at least two prices
    pub(crate) fn from_simulated(prices: Vec<f64>, event_day: Option<usize>) -> Self {
        debug_assert!(prices.len() >= 2);
        PricePath { prices, event_day }
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Number of simulated days (one less than the number of prices)
    pub fn days(&self) -> usize {
        self.prices.len().saturating_sub(1)
    }

    pub fn day(&self, day: usize) -> Option<f64> {
        self.prices.get(day).copied()
    }

    pub fn start_price(&self) -> f64 {
        self.prices[0]
    }

    pub fn final_price(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }

    /// The configured event day, for callers that mark it on a chart
    pub fn event_day(&self) -> Option<usize> {
        self.event_day
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.prices.iter()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.prices
    }

    /// `P_i / P_{i-1} - 1` for each day
    pub fn simple_returns(&self) -> Vec<f64> {
        self.prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
    }

    /// `ln(P_i / P_{i-1})` for each day, `None` if any price is not positive
    pub fn log_returns(&self) -> Option<Vec<f64>> {
        if self.prices.iter().any(|&p| p <= 0.0) {
            return None;
        }
        Some(self.prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
    }

    /// True if any price collapsed to zero or below, or left the finite range
    pub fn is_degenerate(&self) -> bool {
        self.prices.iter().any(|&p| p <= 0.0 || !p.is_finite())
    }
}

impl Deref for PricePath {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.prices
    }
}

impl Index<usize> for PricePath {
    type Output = f64;

    fn index(&self, day: usize) -> &f64 {
        &self.prices[day]
    }
}

impl<'a> IntoIterator for &'a PricePath {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.prices.iter()
    }
}

impl From<PricePath> for Vec<f64> {
    fn from(path: PricePath) -> Self {
        path.prices
    }
}

/// Generates price trajectories from a fixed configuration.
///
/// The simulator owns its normal source; every call to [`generate`](Self::generate)
/// consumes exactly `days` draws from it. A single instance is not meant to be
/// shared across threads; create one simulator per thread (see
/// [`RngFactory`](crate::rng::RngFactory)) for parallel runs.
pub struct PriceSimulator<S = RandNormal<StdRng>> {
    config: SimulationConfig,
    source: S,
}

impl PriceSimulator<RandNormal<StdRng>> {
    /// Entropy-seeded simulator. Paths are valid but not reproducible.
    ///
    /// # Panics
    ///
    /// If the operating system's entropy source fails; use
    /// [`try_new`](Self::try_new) to receive that error instead.
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_source(config, RandNormal::from_entropy())
    }

    /// Entropy-seeded simulator, passing OS entropy failures through unchanged
    pub fn try_new(config: SimulationConfig) -> Result<Self, rand::Error> {
        Ok(Self::with_source(config, RandNormal::try_from_entropy()?))
    }

    /// Reproducible simulator: identical seeds give bit-identical paths
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self::with_source(config, RandNormal::seeded(seed))
    }
}

impl<S: NormalSource> PriceSimulator<S> {
    pub fn with_source(config: SimulationConfig, source: S) -> Self {
        PriceSimulator { config, source }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Generate one trajectory of `days + 1` prices.
    ///
    /// # Algorithm
    ///
    /// 1. `P_0 = start_price`
    /// 2. For day `i` in `1..=days`: draw `Z`, `r = drift + volatility * Z`,
    ///    `P_i = P_{i-1} (1 + r)`
    /// 3. On `i - 1 == event_day` the step is shocked once per the event mode
    pub fn generate(&mut self) -> PricePath {
        let cfg = &self.config;
        let days = cfg.days();
        let event = cfg.event();

        let mut prices = Vec::with_capacity(days + 1);
        let mut price = cfg.start_price();
        prices.push(price);

        for i in 1..=days {
            let z = self.source.next_normal();
            let r = cfg.drift() + cfg.volatility() * z;

            price = match event {
                Some(ev) if ev.day == i - 1 => ev.mode.apply(price, r, ev.impact),
                _ => price * (1.0 + r),
            };
            prices.push(price);
        }

        PricePath::from_simulated(prices, cfg.event_day())
    }

    /// Generate `count` consecutive trajectories from the same source
    pub fn generate_many(&mut self, count: usize) -> Vec<PricePath> {
        (0..count).map(|_| self.generate()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::EventMode;
    use crate::rng::ReplaySource;

    fn deterministic_config(event: Option<(usize, f64)>) -> SimulationConfig {
        SimulationConfig::new(
            100.0,
            5,
            0.0,
            0.01,
            event.map(|e| e.0),
            event.map(|e| e.1),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_volatility_compound_growth() {
        let mut sim = PriceSimulator::with_seed(deterministic_config(None), 7);
        let path = sim.generate();
        let expected = [100.0, 101.0, 102.01, 103.0301, 104.060401, 105.10100501];

        assert_eq!(path.len(), 6);
        for (got, want) in path.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_event_shock_lands_once() {
        let mut sim = PriceSimulator::with_seed(deterministic_config(Some((2, -0.5))), 7);
        let path = sim.generate();

        assert!((path[2] - 102.01).abs() < 1e-9);
        assert!((path[3] - 51.51505).abs() < 1e-9);
        assert!((path[4] - 51.51505 * 1.01).abs() < 1e-9);
        assert!((path[5] - 51.51505 * 1.01 * 1.01).abs() < 1e-9);
        assert_eq!(path.event_day(), Some(2));
    }

    #[test]
    fn test_generate_consumes_days_draws() {
        let cfg = SimulationConfig::new(100.0, 17, 0.02, 0.0, Some(3), Some(0.1)).unwrap();
        let mut sim = PriceSimulator::with_source(cfg, ReplaySource::new(vec![0.3, -0.7]));
        sim.generate();
        assert_eq!(sim.source_mut().consumed(), 17);
        sim.generate();
        assert_eq!(sim.source_mut().consumed(), 34);
    }

    #[test]
    fn test_replace_mode_ignores_draw() {
        let cfg = SimulationConfig::with_event_mode(
            100.0,
            3,
            0.5,
            0.0,
            Some(0),
            Some(0.2),
            EventMode::Replace,
        )
        .unwrap();
        let mut sim = PriceSimulator::with_source(cfg, ReplaySource::new(vec![1.0]));
        let path = sim.generate();

        assert!((path[1] - 120.0).abs() < 1e-12);
        assert!((path[2] - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_additive_mode() {
        let cfg = SimulationConfig::with_event_mode(
            100.0,
            2,
            0.0,
            0.01,
            Some(1),
            Some(-0.11),
            EventMode::Additive,
        )
        .unwrap();
        let path = PriceSimulator::with_seed(cfg, 1).generate();
        assert!((path[2] - 101.0 * 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_path_accessors() {
        let path = PricePath::new(vec![100.0, 110.0, 99.0], Some(0)).unwrap();
        assert_eq!(path.days(), 2);
        assert_eq!(path.start_price(), 100.0);
        assert_eq!(path.final_price(), 99.0);
        assert_eq!(path.day(1), Some(110.0));
        assert_eq!(path.day(3), None);

        let returns = path.simple_returns();
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 0.1).abs() < 1e-12);
        assert!(path.log_returns().is_some());
        assert!(!path.is_degenerate());
    }

    #[test]
    fn test_path_needs_at_least_one_day() {
        assert!(PricePath::new(Vec::new(), None).is_none());
        assert!(PricePath::new(vec![100.0], None).is_none());
        let path = PricePath::new(vec![100.0, 101.0], None).unwrap();
        assert_eq!(path.start_price(), 100.0);
        assert_eq!(path.final_price(), 101.0);
    }

    #[test]
    fn test_generate_many_matches_back_to_back_runs() {
        let cfg = SimulationConfig::new(100.0, 12, 0.02, 0.0, Some(4), Some(-0.1)).unwrap();
        let batch = PriceSimulator::with_seed(cfg.clone(), 21).generate_many(3);

        let mut sim = PriceSimulator::with_seed(cfg, 21);
        let one_by_one: Vec<PricePath> = (0..3).map(|_| sim.generate()).collect();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch, one_by_one);
        assert_ne!(batch[0], batch[1]);
        assert!(PriceSimulator::with_seed(sim.config().clone(), 21)
            .generate_many(0)
            .is_empty());
    }

    #[test]
    fn test_try_new_simulates_from_os_entropy() {
        let cfg = SimulationConfig::new(100.0, 10, 0.02, 0.001, None, None).unwrap();
        let mut sim = PriceSimulator::try_new(cfg).expect("OS entropy available");
        let path = sim.generate();
        assert_eq!(path.len(), 11);
        assert_eq!(path[0], 100.0);
    }

    #[test]
    fn test_degenerate_path_detected() {
        let cfg = SimulationConfig::new(100.0, 3, 0.0, 0.0, Some(0), Some(-1.5)).unwrap();
        let path = PriceSimulator::with_seed(cfg, 3).generate();

        assert!((path[1] + 50.0).abs() < 1e-12);
        assert!(path.is_degenerate());
        assert!(path.log_returns().is_none());
    }
}
