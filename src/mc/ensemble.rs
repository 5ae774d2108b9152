// src/mc/ensemble.rs
//! Parallel ensembles of independent price trajectories
//!
//! Trajectories are embarrassingly parallel: path `i` always draws from its own
//! stream `seed + i` (see [`RngFactory`]), so an ensemble is bit-identical no
//! matter how many threads rayon schedules it on.
//!
//! Paths are stored row-wise in an `ndarray::Array2<f64>` of shape
//! `paths × (days + 1)`; column `d` holds every path's price on day `d`.

use crate::error::{validation::validate_finite, SimError, SimResult};
use crate::models::{PricePath, PriceSimulator, SimulationConfig};
use crate::rng::RngFactory;
use bitflags::bitflags;
use ndarray::{Array2, ArrayView1, Axis};
use rayon::prelude::*;
use statrs::statistics::{Data, OrderStatistics, Statistics};

/// Upper bound on paths per ensemble
pub const MAX_PATHS: usize = 10_000_000;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SummaryFields: u32 {
        const NONE      = 0;
        const MEAN      = 1 << 0;
        const STD_DEV   = 1 << 1;
        const QUANTILES = 1 << 2;
        const TERMINAL  = 1 << 3;
    }
}

/// Which normal source each path uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamKind {
    /// `StdRng` seeded with `seed + path`
    #[default]
    Std,
    /// splitmix64 counter stream `path`
    Counter,
}

#[derive(Clone, Debug)]
pub struct EnsembleConfig {
    pub paths: usize,
    pub seed: u64,
    pub streams: StreamKind,
    pub quantiles: Vec<f64>,
    pub summary: SummaryFields,
}

impl EnsembleConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.paths == 0 {
            return Err(SimError::InvalidEnsemble {
                field: "paths".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.paths > MAX_PATHS {
            return Err(SimError::InvalidEnsemble {
                field: "paths".to_string(),
                reason: format!("exceeds maximum allowed ({})", MAX_PATHS),
            });
        }
        for &q in &self.quantiles {
            if validate_finite("quantiles", q).is_err() || !(0.0..=1.0).contains(&q) {
                return Err(SimError::InvalidEnsemble {
                    field: "quantiles".to_string(),
                    reason: format!("each quantile must be in [0, 1], got {}", q),
                });
            }
        }
        Ok(())
    }
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        EnsembleConfig {
            paths: 1_000,
            seed: 12345,
            streams: StreamKind::Std,
            quantiles: vec![0.05, 0.5, 0.95],
            summary: SummaryFields::all(),
        }
    }
}

/// Prices of one quantile across all days
#[derive(Clone, Debug, PartialEq)]
pub struct QuantileBand {
    pub quantile: f64,
    pub values: Vec<f64>,
}

/// Distribution of the final price across paths
#[derive(Clone, Debug, PartialEq)]
pub struct TerminalStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Fraction of paths ending below the start price
    pub prob_loss: f64,
    /// Fraction of degenerate paths: zero or below, or non-finite, at any point
    /// (the same test as [`PricePath::is_degenerate`])
    pub prob_ruin: f64,
}

/// Per-day summary; fields not requested through [`SummaryFields`] are `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnsembleSummary {
    pub mean: Option<Vec<f64>>,
    pub std_dev: Option<Vec<f64>>,
    pub quantile_bands: Option<Vec<QuantileBand>>,
    pub terminal: Option<TerminalStats>,
}

pub struct Ensemble {
    prices: Array2<f64>,
    start_price: f64,
    event_day: Option<usize>,
    quantiles: Vec<f64>,
    summary: SummaryFields,
}

/// Simulate `ens.paths` independent trajectories of `config` in parallel.
///
/// # Errors
///
/// `SimError::InvalidEnsemble` for zero/too many paths or quantiles outside `[0, 1]`.
pub fn run_ensemble(config: &SimulationConfig, ens: &EnsembleConfig) -> SimResult<Ensemble> {
    ens.validate()?;
    let factory = RngFactory::new(ens.seed);
    let width = config.days() + 1;

    // Each path is written straight into its row
    let mut prices = Array2::<f64>::zeros((ens.paths, width));
    prices
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let path = match ens.streams {
                StreamKind::Std => PriceSimulator::with_source(
                    config.clone(),
                    factory.create_std_source(i as u64),
                )
                .generate(),
                StreamKind::Counter => PriceSimulator::with_source(
                    config.clone(),
                    factory.create_counter_rng(i as u64),
                )
                .generate(),
            };
            row.assign(&ArrayView1::from(path.prices()));
        });

    Ok(Ensemble {
        prices,
        start_price: config.start_price(),
        event_day: config.event_day(),
        quantiles: ens.quantiles.clone(),
        summary: ens.summary,
    })
}

fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        values.iter().std_dev()
    }
}

impl Ensemble {
    pub fn prices(&self) -> &Array2<f64> {
        &self.prices
    }

    pub fn num_paths(&self) -> usize {
        self.prices.nrows()
    }

    pub fn days(&self) -> usize {
        self.prices.ncols() - 1
    }

    pub fn event_day(&self) -> Option<usize> {
        self.event_day
    }

    pub fn path(&self, index: usize) -> Option<PricePath> {
        if index >= self.num_paths() {
            return None;
        }
        Some(PricePath::from_simulated(
            self.prices.row(index).to_vec(),
            self.event_day,
        ))
    }

    pub fn day_prices(&self, day: usize) -> Option<ArrayView1<'_, f64>> {
        if day > self.days() {
            return None;
        }
        Some(self.prices.column(day))
    }

    pub fn terminal_prices(&self) -> Vec<f64> {
        self.prices.column(self.days()).to_vec()
    }

    pub fn summarize(&self) -> EnsembleSummary {
        let fields = self.summary;
        let per_day = fields
            .intersects(SummaryFields::MEAN | SummaryFields::STD_DEV | SummaryFields::QUANTILES);

        let columns: Vec<(f64, f64, Vec<f64>)> = if per_day {
            self.prices
                .axis_iter(Axis(1))
                .into_par_iter()
                .map(|col| {
                    let values = col.to_vec();
                    let mean = values.iter().mean();
                    let std_dev = sample_std_dev(&values);
                    let qs = if fields.contains(SummaryFields::QUANTILES) {
                        let mut data = Data::new(values);
                        self.quantiles.iter().map(|&q| data.quantile(q)).collect()
                    } else {
                        Vec::new()
                    };
                    (mean, std_dev, qs)
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut summary = EnsembleSummary::default();
        if fields.contains(SummaryFields::MEAN) {
            summary.mean = Some(columns.iter().map(|c| c.0).collect());
        }
        if fields.contains(SummaryFields::STD_DEV) {
            summary.std_dev = Some(columns.iter().map(|c| c.1).collect());
        }
        if fields.contains(SummaryFields::QUANTILES) {
            summary.quantile_bands = Some(
                self.quantiles
                    .iter()
                    .enumerate()
                    .map(|(k, &quantile)| QuantileBand {
                        quantile,
                        values: columns.iter().map(|c| c.2[k]).collect(),
                    })
                    .collect(),
            );
        }
        if fields.contains(SummaryFields::TERMINAL) {
            summary.terminal = Some(self.terminal_stats());
        }
        summary
    }

    fn terminal_stats(&self) -> TerminalStats {
        let terminal = self.terminal_prices();
        let n = terminal.len() as f64;
        let min = terminal.iter().copied().fold(f64::INFINITY, f64::min);
        let max = terminal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let losses = terminal.iter().filter(|&&p| p < self.start_price).count();
        let ruined = self
            .prices
            .axis_iter(Axis(0))
            .filter(|row| row.iter().any(|&p| p <= 0.0 || !p.is_finite()))
            .count();

        TerminalStats {
            mean: terminal.iter().mean(),
            std_dev: sample_std_dev(&terminal),
            min,
            max,
            prob_loss: losses as f64 / n,
            prob_ruin: ruined as f64 / n,
        }
    }
}
