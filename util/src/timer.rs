use std::time::{Duration, Instant};

/// Measures how long one step of a setup or dispatch takes.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn now() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Start measuring again from now.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// e.g. "Parsing input files took 1.2ms"
    pub fn print_elapsed(&self, step: &str) {
        eprintln!("{step} took {:?}", self.elapsed());
    }
}
