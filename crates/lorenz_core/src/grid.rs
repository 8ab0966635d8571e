use crate::error::{LorenzError, Result};
use serde::{Deserialize, Serialize};

/// Strictly increasing sample times at which a trajectory is reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// `samples` evenly spaced times over `[start, end]`, both ends included.
    pub fn linspace(start: f64, end: f64, samples: usize) -> Result<Self> {
        if samples < 2 {
            return Err(LorenzError::TooFewSamples(samples));
        }
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(LorenzError::InvalidSpan { start, end });
        }
        let step = (end - start) / (samples - 1) as f64;
        let mut times: Vec<f64> = (0..samples).map(|i| start + step * i as f64).collect();
        // Pin the last sample so the span end is hit exactly.
        times[samples - 1] = end;
        Ok(Self { times })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.times[0]
    }

    pub fn end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }
}
