// src/rng.rs
//! Normal-sample sources for price simulation
//!
//! # Design Philosophy
//!
//! A simulator never reaches for a global generator. It owns a [`NormalSource`]
//! handed to it at construction, which gives:
//! 1. **Reproducibility**: same seed → bit-identical trajectories
//! 2. **Parallel safety**: each trajectory owns an independent stream
//! 3. **Testability**: exact draws can be replayed with [`ReplaySource`]
//!
//! # Counter-Based RNG
//!
//! [`CounterRng`] maps `(seed, stream, counter)` to a value with a splitmix64
//! mix, so any number of streams can be created without coordination and the
//! results do not depend on how work is scheduled across threads.
//!
//! # Box-Muller Transform
//!
//! Converts uniform random variables to normal distributions:
//! ```text
//! Z₁ = √(-2ln(U₁)) * cos(2πU₂)
//! Z₂ = √(-2ln(U₁)) * sin(2πU₂)
//! ```
//! where U₁, U₂ ~ Uniform(0,1) and Z₁, Z₂ ~ N(0,1).

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// A source of independent standard normal draws (mean 0, variance 1).
pub trait NormalSource {
    fn next_normal(&mut self) -> f64;
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    fn next_normal(&mut self) -> f64 {
        (**self).next_normal()
    }
}

impl<S: NormalSource + ?Sized> NormalSource for Box<S> {
    fn next_normal(&mut self) -> f64 {
        (**self).next_normal()
    }
}

/// Adapts any `rand` generator into a [`NormalSource`].
#[derive(Debug, Clone)]
pub struct RandNormal<R> {
    rng: R,
}

impl<R: Rng> RandNormal<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RandNormal<StdRng> {
    /// Reproducible source seeded from `seed`
    pub fn seeded(seed: u64) -> Self {
        Self::new(seed_rng_from_u64(seed))
    }

    /// Non-reproducible source seeded from OS entropy
    ///
    /// # Panics
    ///
    /// If the OS entropy source fails; see [`try_from_entropy`](Self::try_from_entropy).
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeds from [`OsRng`], returning its error if the OS cannot supply entropy
    pub fn try_from_entropy() -> Result<Self, rand::Error> {
        Ok(Self::new(StdRng::from_rng(OsRng)?))
    }
}

impl<R: Rng> NormalSource for RandNormal<R> {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        get_normal_draw(&mut self.rng)
    }
}

/// Counter-based RNG for reproducible parallel simulations
///
/// # Algorithm
///
/// ```text
/// z = base_seed + counter
/// z = (z ⊕ (z >> 30)) * 0xbf58476d1ce4e5b9
/// z = (z ⊕ (z >> 27)) * 0x94d049bb133111eb
/// output = z ⊕ (z >> 31)
/// ```
///
/// The second Box-Muller output is cached on the instance, so two generators
/// never share state.
#[derive(Debug, Clone)]
pub struct CounterRng {
    base_seed: u64,
    counter: u64,
    spare: Option<f64>,
}

impl CounterRng {
    pub fn new(base_seed: u64, stream: u64) -> Self {
        // Streams start far apart so their counters never overlap in practice
        Self {
            base_seed,
            counter: stream.wrapping_mul(1 << 40),
            spare: None,
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(1);
        let mut z = self.base_seed.wrapping_add(self.counter);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
        z ^ (z >> 31)
    }

    /// Uniform draw in `(0, 1]`, never zero so `ln` stays finite
    pub fn uniform(&mut self) -> f64 {
        ((self.next_u64() >> 11) + 1) as f64 * (1.0 / 9007199254740992.0) // 2^53
    }

    pub fn normal(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }

        let u1 = self.uniform();
        let u2 = self.uniform();

        let mag = (-2.0 * u1.ln()).sqrt();
        let angle = 2.0 * std::f64::consts::PI * u2;
        self.spare = Some(mag * angle.sin());
        mag * angle.cos()
    }
}

impl NormalSource for CounterRng {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        self.normal()
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    draws: Vec<f64>,
    position: usize,
}

impl ReplaySource {
    /// An empty slice replays zeros.
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            position: 0,
        }
    }

    /// Number of draws consumed so far
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl NormalSource for ReplaySource {
    fn next_normal(&mut self) -> f64 {
        let z = if self.draws.is_empty() {
            0.0
        } else {
            self.draws[self.position % self.draws.len()]
        };
        self.position += 1;
        z
    }
}

/// Records every draw produced by an inner source.
#[derive(Debug, Clone)]
pub struct RecordingSource<S> {
    inner: S,
    draws: Vec<f64>,
}

impl<S: NormalSource> RecordingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            draws: Vec::new(),
        }
    }

    pub fn draws(&self) -> &[f64] {
        &self.draws
    }

    pub fn into_parts(self) -> (S, Vec<f64>) {
        (self.inner, self.draws)
    }
}

impl<S: NormalSource> NormalSource for RecordingSource<S> {
    fn next_normal(&mut self) -> f64 {
        let z = self.inner.next_normal();
        self.draws.push(z);
        z
    }
}

/// Source factory for reproducible parallel simulations
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Counter RNG for a specific path/stream
    pub fn create_counter_rng(&self, stream: u64) -> CounterRng {
        CounterRng::new(self.base_seed, stream)
    }

    /// StdRng-backed source for a specific path/stream
    pub fn create_std_source(&self, stream: u64) -> RandNormal<StdRng> {
        RandNormal::seeded(self.base_seed.wrapping_add(stream))
    }
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}
