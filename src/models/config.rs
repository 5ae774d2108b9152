// src/models/config.rs
//! Simulation parameters
//!
//! A [`SimulationConfig`] is validated once, at construction, and is immutable
//! afterwards. All fields are daily quantities:
//!
//! | field | constraint |
//! |---|---|
//! | `start_price` | finite, > 0 |
//! | `days` | ≥ 1 |
//! | `volatility` | finite, ≥ 0 (std-dev of the daily return) |
//! | `drift` | finite (daily expected return, may be negative) |
//! | `event_day` | `0 ≤ event_day ≤ days - 1`, only together with `event_impact` |
//! | `event_impact` | finite fractional shock, only together with `event_day` |

use crate::error::{validation::*, SimResult};

/// How an event's impact combines with the stochastic return of its day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EventMode {
    /// `p[i] = p[i-1] * (1 + r) * (1 + impact)`
    #[default]
    Compound,
    /// `p[i] = p[i-1] * (1 + r + impact)`
    Additive,
    /// `p[i] = p[i-1] * (1 + impact)`; the day's draw is still consumed
    Replace,
}

impl EventMode {
    /// Price after a shocked day, from the previous price and the day's stochastic return `r`
    #[inline]
    pub fn apply(self, previous: f64, r: f64, impact: f64) -> f64 {
        match self {
            EventMode::Compound => previous * (1.0 + r) * (1.0 + impact),
            EventMode::Additive => previous * (1.0 + r + impact),
            EventMode::Replace => previous * (1.0 + impact),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventMode::Compound => "compound",
            EventMode::Additive => "additive",
            EventMode::Replace => "replace",
        }
    }
}

impl std::str::FromStr for EventMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compound" | "multiplicative" => Ok(EventMode::Compound),
            "additive" => Ok(EventMode::Additive),
            "replace" => Ok(EventMode::Replace),
            other => Err(format!(
                "unknown event mode '{}' (expected compound, additive or replace)",
                other
            )),
        }
    }
}

/// A one-time fractional shock on a given day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarketEvent {
    /// The shock lands on the transition from `day` to `day + 1`
    pub day: usize,
    pub impact: f64,
    pub mode: EventMode,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    start_price: f64,
    days: usize,
    volatility: f64,
    drift: f64,
    event: Option<MarketEvent>,
}

impl SimulationConfig {
    /// Validate and build a configuration using [`EventMode::Compound`].
    ///
    /// # Errors
    ///
    /// `SimError::InvalidConfiguration` when `days < 1`, `start_price <= 0`,
    /// `volatility < 0`, any real parameter is non-finite, only one of
    /// `event_day`/`event_impact` is given, or `event_day` is outside
    /// `[0, days - 1]`.
    pub fn new(
        start_price: f64,
        days: usize,
        volatility: f64,
        drift: f64,
        event_day: Option<usize>,
        event_impact: Option<f64>,
    ) -> SimResult<Self> {
        Self::with_event_mode(
            start_price,
            days,
            volatility,
            drift,
            event_day,
            event_impact,
            EventMode::default(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_event_mode(
        start_price: f64,
        days: usize,
        volatility: f64,
        drift: f64,
        event_day: Option<usize>,
        event_impact: Option<f64>,
        mode: EventMode,
    ) -> SimResult<Self> {
        validate_days(days)?;
        validate_positive("start_price", start_price)?;
        validate_non_negative("volatility", volatility)?;
        validate_finite("drift", drift)?;
        validate_event_pair(event_day, event_impact)?;

        let event = match (event_day, event_impact) {
            (Some(day), Some(impact)) => {
                validate_event_day(day, days)?;
                validate_finite("event_impact", impact)?;
                Some(MarketEvent { day, impact, mode })
            }
            _ => None,
        };

        Ok(SimulationConfig {
            start_price,
            days,
            volatility,
            drift,
            event,
        })
    }

    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    pub fn start_price(&self) -> f64 {
        self.start_price
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn drift(&self) -> f64 {
        self.drift
    }

    pub fn event(&self) -> Option<MarketEvent> {
        self.event
    }

    pub fn event_day(&self) -> Option<usize> {
        self.event.map(|e| e.day)
    }

    pub fn event_impact(&self) -> Option<f64> {
        self.event.map(|e| e.impact)
    }
}

/// Named-field construction of a [`SimulationConfig`].
///
/// Defaults describe a volatile, slowly declining market over one year:
/// start 100, 365 days, volatility 0.03, drift -0.001, no event.
#[derive(Clone, Debug)]
pub struct SimulationConfigBuilder {
    start_price: f64,
    days: usize,
    volatility: f64,
    drift: f64,
    event_day: Option<usize>,
    event_impact: Option<f64>,
    event_mode: EventMode,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        SimulationConfigBuilder {
            start_price: 100.0,
            days: 365,
            volatility: 0.03,
            drift: -0.001,
            event_day: None,
            event_impact: None,
            event_mode: EventMode::Compound,
        }
    }
}

impl SimulationConfigBuilder {
    pub fn start_price(mut self, start_price: f64) -> Self {
        self.start_price = start_price;
        self
    }

    pub fn days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    pub fn drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    pub fn event(mut self, day: usize, impact: f64) -> Self {
        self.event_day = Some(day);
        self.event_impact = Some(impact);
        self
    }

    pub fn event_day(mut self, day: Option<usize>) -> Self {
        self.event_day = day;
        self
    }

    pub fn event_impact(mut self, impact: Option<f64>) -> Self {
        self.event_impact = impact;
        self
    }

    pub fn event_mode(mut self, mode: EventMode) -> Self {
        self.event_mode = mode;
        self
    }

    pub fn build(self) -> SimResult<SimulationConfig> {
        SimulationConfig::with_event_mode(
            self.start_price,
            self.days,
            self.volatility,
            self.drift,
            self.event_day,
            self.event_impact,
            self.event_mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn field_of(err: SimError) -> String {
        match err {
            SimError::InvalidConfiguration { field, .. } => field,
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_config() {
        let cfg = SimulationConfig::new(100.0, 365, 0.03, -0.001, Some(100), Some(-0.2))
            .expect("valid configuration");
        assert_eq!(cfg.start_price(), 100.0);
        assert_eq!(cfg.days(), 365);
        assert_eq!(cfg.event_day(), Some(100));
        assert_eq!(cfg.event_impact(), Some(-0.2));
        assert_eq!(cfg.event().map(|e| e.mode), Some(EventMode::Compound));
    }

    #[test]
    fn test_rejected_fields() {
        let cases = [
            (SimulationConfig::new(100.0, 0, 0.01, 0.0, None, None), "days"),
            (SimulationConfig::new(0.0, 5, 0.01, 0.0, None, None), "start_price"),
            (SimulationConfig::new(-5.0, 5, 0.01, 0.0, None, None), "start_price"),
            (SimulationConfig::new(100.0, 5, -0.1, 0.0, None, None), "volatility"),
            (SimulationConfig::new(100.0, 5, 0.01, f64::NAN, None, None), "drift"),
            (SimulationConfig::new(100.0, 5, 0.01, 0.0, Some(2), None), "event_impact"),
            (SimulationConfig::new(100.0, 5, 0.01, 0.0, None, Some(0.1)), "event_day"),
            (SimulationConfig::new(100.0, 5, 0.01, 0.0, Some(5), Some(0.1)), "event_day"),
            (
                SimulationConfig::new(100.0, 5, 0.01, 0.0, Some(1), Some(f64::INFINITY)),
                "event_impact",
            ),
        ];

        for (result, field) in cases {
            let err = result.expect_err("configuration should be rejected");
            assert_eq!(field_of(err), field);
        }
    }

    #[test]
    fn test_event_day_bounds() {
        assert!(SimulationConfig::new(100.0, 5, 0.0, 0.0, Some(0), Some(0.1)).is_ok());
        assert!(SimulationConfig::new(100.0, 5, 0.0, 0.0, Some(4), Some(0.1)).is_ok());
        assert!(SimulationConfig::new(100.0, 1, 0.0, 0.0, Some(0), Some(0.1)).is_ok());
    }

    #[test]
    fn test_builder_defaults_and_overrides() {
        let cfg = SimulationConfig::builder().build().unwrap();
        assert_eq!(cfg.days(), 365);
        assert_eq!(cfg.volatility(), 0.03);
        assert_eq!(cfg.drift(), -0.001);
        assert!(cfg.event().is_none());

        let cfg = SimulationConfig::builder()
            .start_price(50.0)
            .days(10)
            .event(3, 0.25)
            .event_mode(EventMode::Additive)
            .build()
            .unwrap();
        assert_eq!(
            cfg.event(),
            Some(MarketEvent {
                day: 3,
                impact: 0.25,
                mode: EventMode::Additive
            })
        );
    }

    #[test]
    fn test_builder_partial_event_rejected() {
        let err = SimulationConfig::builder()
            .event_day(Some(3))
            .build()
            .unwrap_err();
        assert_eq!(field_of(err), "event_impact");
    }

    #[test]
    fn test_event_mode_apply() {
        let r = 0.01;
        assert!((EventMode::Compound.apply(100.0, r, -0.5) - 50.5).abs() < 1e-12);
        assert!((EventMode::Additive.apply(100.0, r, -0.5) - 51.0).abs() < 1e-12);
        assert_eq!(EventMode::Replace.apply(100.0, r, -0.5), 50.0);
    }

    #[test]
    fn test_event_mode_parse() {
        assert_eq!("compound".parse::<EventMode>(), Ok(EventMode::Compound));
        assert_eq!("Multiplicative".parse::<EventMode>(), Ok(EventMode::Compound));
        assert_eq!("additive".parse::<EventMode>(), Ok(EventMode::Additive));
        assert_eq!("REPLACE".parse::<EventMode>(), Ok(EventMode::Replace));
        assert!("sideways".parse::<EventMode>().is_err());
    }
}
