// src/mc/mod.rs
pub mod ensemble;

pub use ensemble::{
    run_ensemble, Ensemble, EnsembleConfig, EnsembleSummary, StreamKind, SummaryFields,
};
