use thiserror::Error;

pub type Result<T> = std::result::Result<T, LorenzError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LorenzError {
    #[error("Time grid needs at least 2 samples, got {0}.")]
    TooFewSamples(usize),

    #[error("Time span [{start}, {end}] must be finite and strictly increasing.")]
    InvalidSpan { start: f64, end: f64 },

    #[error("Evaluation times must lie inside the span [{start}, {end}].")]
    EvaluationOutsideSpan { start: f64, end: f64 },

    #[error("Initial state must have dimension {expected}, got {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Step size underflow at t = {t} (dt = {dt}); the integrator failed to converge.")]
    StepSizeUnderflow { t: f64, dt: f64 },

    #[error("Exceeded the maximum of {max_steps} steps before reaching t = {t_end}.")]
    MaxStepsExceeded { max_steps: usize, t_end: f64 },

    #[error("State became non-finite at t = {t}.")]
    NonFiniteState { t: f64 },
}
