use crate::error::{LorenzError, Result};
use crate::grid::TimeGrid;
use crate::trajectory::State;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    /// Classic RK4, fixed step per grid interval.
    Rk4,
    /// Tsitouras 5(4), fixed step per grid interval.
    Tsit5,
    /// Tsitouras 5(4) with error control, sampled at the grid times.
    Tsit5Adaptive,
}

impl IntegratorKind {
    pub fn name(self) -> &'static str {
        match self {
            IntegratorKind::Rk4 => "rk4",
            IntegratorKind::Tsit5 => "tsit5",
            IntegratorKind::Tsit5Adaptive => "tsit5_adaptive",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "rk4" => Ok(IntegratorKind::Rk4),
            "tsit5" => Ok(IntegratorKind::Tsit5),
            "tsit5_adaptive" | "adaptive" => Ok(IntegratorKind::Tsit5Adaptive),
            other => Err(LorenzError::InvalidConfig(format!("unknown integrator '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveSettings {
    pub rtol: f64,
    pub atol: f64,
    /// Initial step; estimated from the field when absent.
    pub first_step: Option<f64>,
    pub min_step: Option<f64>,
    pub max_step: Option<f64>,
    /// Upper bound on attempted steps, accepted or rejected.
    pub max_steps: usize,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self {
            rtol: 1e-3,
            atol: 1e-6,
            first_step: None,
            min_step: None,
            max_step: None,
            max_steps: 1_000_000,
        }
    }
}

impl AdaptiveSettings {
    pub fn with_rtol(mut self, rtol: f64) -> Self {
        self.rtol = rtol;
        self
    }

    pub fn with_atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }

    pub fn with_first_step(mut self, dt: f64) -> Self {
        self.first_step = Some(dt);
        self
    }

    pub fn with_min_step(mut self, dt: f64) -> Self {
        self.min_step = Some(dt);
        self
    }

    pub fn with_max_step(mut self, dt: f64) -> Self {
        self.max_step = Some(dt);
        self
    }

    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.rtol >= 0.0 && self.atol >= 0.0) || (self.rtol == 0.0 && self.atol == 0.0) {
            return Err(LorenzError::InvalidConfig(
                "tolerances must be non-negative and not both zero".into(),
            ));
        }
        for (name, value) in [
            ("first_step", self.first_step),
            ("min_step", self.min_step),
            ("max_step", self.max_step),
        ] {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(LorenzError::InvalidConfig(format!("{name} must be positive")));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_step, self.max_step) {
            if min > max {
                return Err(LorenzError::InvalidConfig(
                    "min_step must not exceed max_step".into(),
                ));
            }
        }
        if self.max_steps == 0 {
            return Err(LorenzError::InvalidConfig("max_steps must be at least 1".into()));
        }
        Ok(())
    }
}

/// Everything besides the parameters that determines a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_state: State,
    pub t_start: f64,
    pub t_end: f64,
    pub samples: usize,
    pub integrator: IntegratorKind,
    /// Fixed-step integrators take this many equal steps per grid interval.
    pub substeps: usize,
    pub adaptive: AdaptiveSettings,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_state: [1.0, 1.0, 1.0],
            t_start: 0.0,
            t_end: 50.0,
            samples: 10_000,
            integrator: IntegratorKind::Tsit5Adaptive,
            substeps: 1,
            adaptive: AdaptiveSettings::default(),
        }
    }
}

impl SimulationConfig {
    pub fn with_initial_state(mut self, state: State) -> Self {
        self.initial_state = state;
        self
    }

    pub fn with_span(mut self, t_start: f64, t_end: f64) -> Self {
        self.t_start = t_start;
        self.t_end = t_end;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps;
        self
    }

    pub fn with_adaptive(mut self, adaptive: AdaptiveSettings) -> Self {
        self.adaptive = adaptive;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_state.iter().any(|v| !v.is_finite()) {
            return Err(LorenzError::InvalidConfig("initial state must be finite".into()));
        }
        if self.substeps == 0 {
            return Err(LorenzError::InvalidConfig("substeps must be at least 1".into()));
        }
        self.adaptive.validate()?;
        // Span and sample count are checked by the grid itself.
        self.time_grid().map(|_| ())
    }

    pub fn time_grid(&self) -> Result<TimeGrid> {
        TimeGrid::linspace(self.t_start, self.t_end, self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_setup() {
        let config = SimulationConfig::default();
        assert_eq!(config.initial_state, [1.0, 1.0, 1.0]);
        assert_eq!((config.t_start, config.t_end), (0.0, 50.0));
        assert_eq!(config.samples, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let base = SimulationConfig::default();
        assert!(base.clone().with_samples(1).validate().is_err());
        assert!(base.clone().with_span(5.0, 5.0).validate().is_err());
        assert!(base.clone().with_substeps(0).validate().is_err());
        assert!(base
            .clone()
            .with_initial_state([f64::NAN, 1.0, 1.0])
            .validate()
            .is_err());
        assert!(base
            .clone()
            .with_adaptive(AdaptiveSettings::default().with_rtol(0.0).with_atol(0.0))
            .validate()
            .is_err());
        assert!(base
            .with_adaptive(AdaptiveSettings::default().with_min_step(1.0).with_max_step(0.1))
            .validate()
            .is_err());
    }

    #[test]
    fn integrator_names_round_trip() {
        for kind in [
            IntegratorKind::Rk4,
            IntegratorKind::Tsit5,
            IntegratorKind::Tsit5Adaptive,
        ] {
            assert_eq!(IntegratorKind::from_name(kind.name()), Ok(kind));
        }
        assert!(IntegratorKind::from_name("euler").is_err());
    }
}
