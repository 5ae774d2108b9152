// src/models/mod.rs
pub mod config;
pub mod simulator;

pub use config::{EventMode, MarketEvent, SimulationConfig, SimulationConfigBuilder};
pub use simulator::{PricePath, PriceSimulator};
