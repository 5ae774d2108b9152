// src/math_utils.rs
pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// `(1 + rate)^periods` growth of `start`, the zero-volatility trajectory value
pub fn compound(start: f64, rate: f64, periods: usize) -> f64 {
    let growth = 1.0 + rate;
    match i32::try_from(periods) {
        Ok(n) => start * growth.powi(n),
        Err(_) => start * growth.powf(periods as f64),
    }
}
