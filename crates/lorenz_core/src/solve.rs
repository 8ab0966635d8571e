//! Parameter-to-trajectory pipeline.
//!
//! Two integration strategies share the same output contract: one state per grid
//! time, the first state equal to the initial state, times mirroring the grid.
//!
//! - [`integrate_on_grid`] walks the grid with a fixed-step stepper.
//! - [`solve_ivp`] runs adaptive Tsit5 over the whole span and samples the grid by
//!   dense interpolation. Its step sequence does not depend on the grid, so
//!   refining the grid never moves the endpoint.

use crate::config::{AdaptiveSettings, IntegratorKind, SimulationConfig};
use crate::error::{LorenzError, Result};
use crate::grid::TimeGrid;
use crate::lorenz::{LorenzParams, LorenzSystem, DIM};
use crate::solvers::{StepController, Tsit5, RK4};
use crate::trajectory::{State, Trajectory};
use crate::traits::{DynamicalSystem, Steppable};
use tracing::{debug, debug_span, warn};

/// Counters from an adaptive solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub accepted: usize,
    pub rejected: usize,
}

fn check_dimension(system: &impl DynamicalSystem<f64>) -> Result<()> {
    let dim = system.dimension();
    if dim != DIM {
        return Err(LorenzError::DimensionMismatch {
            expected: DIM,
            actual: dim,
        });
    }
    Ok(())
}

/// Integrates from `initial` at `grid.start()` taking `substeps` equal steps of
/// `stepper` per grid interval.
pub fn integrate_on_grid<S, St>(
    system: &S,
    stepper: &mut St,
    initial: State,
    grid: &TimeGrid,
    substeps: usize,
) -> Result<Trajectory>
where
    S: DynamicalSystem<f64>,
    St: Steppable<f64>,
{
    check_dimension(system)?;
    if substeps == 0 {
        return Err(LorenzError::InvalidConfig("substeps must be at least 1".into()));
    }

    let times = grid.times();
    let mut states = Vec::with_capacity(times.len());
    let mut state = initial;
    states.push(state);

    for pair in times.windows(2) {
        let dt = (pair[1] - pair[0]) / substeps as f64;
        let mut t = pair[0];
        for _ in 0..substeps {
            stepper.step(system, &mut t, &mut state, dt);
        }
        if state.iter().any(|v| !v.is_finite()) {
            return Err(LorenzError::NonFiniteState { t: pair[1] });
        }
        states.push(state);
    }

    Ok(Trajectory::new(times.to_vec(), states))
}

/// Adaptive Tsit5 over `[t_start, t_end]`, reporting the state at every time in `t_eval`.
pub fn solve_ivp<S>(
    system: &S,
    initial: State,
    t_span: (f64, f64),
    t_eval: &TimeGrid,
    settings: &AdaptiveSettings,
) -> Result<(Trajectory, SolveStats)>
where
    S: DynamicalSystem<f64>,
{
    check_dimension(system)?;
    settings.validate()?;
    let (t_start, t_end) = t_span;
    if !t_start.is_finite() || !t_end.is_finite() || t_end <= t_start {
        return Err(LorenzError::InvalidSpan {
            start: t_start,
            end: t_end,
        });
    }
    if t_eval.start() < t_start || t_eval.end() > t_end {
        return Err(LorenzError::EvaluationOutsideSpan {
            start: t_start,
            end: t_end,
        });
    }

    let times = t_eval.times();
    let mut states = Vec::with_capacity(times.len());
    let mut next = 0;
    let mut t = t_start;
    let mut state = initial;

    while next < times.len() && times[next] == t_start {
        states.push(state);
        next += 1;
    }

    let mut stepper = Tsit5::new(DIM);
    let controller = StepController::default();
    let max_step = settings.max_step.unwrap_or(f64::INFINITY);
    let mut dt = match settings.first_step {
        Some(dt) => dt,
        None => {
            let f0 = stepper.initial_derivative(system, t, &state);
            initial_step(&state, f0, settings.rtol, settings.atol)
        }
    }
    .min(max_step)
    .min(t_end - t_start);

    let mut stats = SolveStats::default();
    let mut dense = [0.0; DIM];

    while t < t_end {
        if stats.accepted + stats.rejected >= settings.max_steps {
            return Err(LorenzError::MaxStepsExceeded {
                max_steps: settings.max_steps,
                t_end,
            });
        }

        let last = t + dt >= t_end;
        if last {
            dt = t_end - t;
        }

        let error = stepper.attempt(system, t, &state, dt, settings.rtol, settings.atol);
        if error <= 1.0 {
            let t_next = if last { t_end } else { t + dt };
            while next < times.len() && times[next] <= t_next {
                let theta = (times[next] - t) / dt;
                stepper.interpolate(&state, dt, theta, &mut dense);
                states.push(dense);
                next += 1;
            }
            stepper.accept(&mut state);
            t = t_next;
            stats.accepted += 1;
            dt = controller.next_dt(dt, error).min(max_step);
        } else {
            stats.rejected += 1;
            let shrunk = controller.next_dt(dt, error);
            let floor = settings
                .min_step
                .unwrap_or(0.0)
                .max(16.0 * f64::EPSILON * t.abs().max(1.0));
            if shrunk < floor {
                return Err(if error.is_finite() {
                    LorenzError::StepSizeUnderflow { t, dt: shrunk }
                } else {
                    LorenzError::NonFiniteState { t }
                });
            }
            dt = shrunk;
        }
    }

    Ok((Trajectory::new(times.to_vec(), states), stats))
}

/// Starting step from the scaled size of the state and its derivative.
fn initial_step(y0: &[f64], f0: &[f64], rtol: f64, atol: f64) -> f64 {
    let rms = |v: &dyn Fn(usize) -> f64| {
        let sum: f64 = (0..y0.len()).map(|i| v(i).powi(2)).sum();
        (sum / y0.len() as f64).sqrt()
    };
    let scale = |i: usize| atol + rtol * y0[i].abs();
    let d0 = rms(&|i| y0[i] / scale(i));
    let d1 = rms(&|i| f0[i] / scale(i));
    if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
}

/// Full pipeline: parameters plus configuration in, trajectory out.
pub fn solve_lorenz(params: &LorenzParams, config: &SimulationConfig) -> Result<Trajectory> {
    config.validate()?;
    let grid = config.time_grid()?;
    let system = LorenzSystem::new(*params);

    let span = debug_span!(
        "solve_lorenz",
        integrator = config.integrator.name(),
        samples = config.samples,
        sigma = params.sigma,
        beta = params.beta,
        rho = params.rho,
    );
    let _enter = span.enter();

    let result = match config.integrator {
        IntegratorKind::Rk4 => integrate_on_grid(
            &system,
            &mut RK4::new(DIM),
            config.initial_state,
            &grid,
            config.substeps,
        ),
        IntegratorKind::Tsit5 => integrate_on_grid(
            &system,
            &mut Tsit5::new(DIM),
            config.initial_state,
            &grid,
            config.substeps,
        ),
        IntegratorKind::Tsit5Adaptive => solve_ivp(
            &system,
            config.initial_state,
            (config.t_start, config.t_end),
            &grid,
            &config.adaptive,
        )
        .map(|(trajectory, stats)| {
            debug!(accepted = stats.accepted, rejected = stats.rejected, "adaptive steps");
            trajectory
        }),
    };

    match &result {
        Ok(trajectory) => debug!(points = trajectory.len(), "trajectory ready"),
        Err(err) => warn!(%err, "integration failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// dx/dt = -x, dy/dt = -2y, dz/dt = 1, with a known closed form.
    struct Linear;

    impl DynamicalSystem<f64> for Linear {
        fn dimension(&self) -> usize {
            3
        }
        fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
            out[0] = -x[0];
            out[1] = -2.0 * x[1];
            out[2] = 1.0;
        }
    }

    struct Blowup;

    impl DynamicalSystem<f64> for Blowup {
        fn dimension(&self) -> usize {
            3
        }
        fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
            // dx/dt = x^2 escapes to infinity at t = 1 from x = 1.
            out[0] = x[0] * x[0];
            out[1] = 0.0;
            out[2] = 0.0;
        }
    }

    struct Plane;

    impl DynamicalSystem<f64> for Plane {
        fn dimension(&self) -> usize {
            2
        }
        fn apply(&self, _t: f64, _x: &[f64], out: &mut [f64]) {
            out[0] = 0.0;
            out[1] = 0.0;
        }
    }

    #[test]
    fn first_sample_is_exactly_the_initial_state() {
        let params = LorenzParams::classic();
        for integrator in [
            IntegratorKind::Rk4,
            IntegratorKind::Tsit5,
            IntegratorKind::Tsit5Adaptive,
        ] {
            let config = SimulationConfig::default().with_integrator(integrator);
            let trajectory = solve_lorenz(&params, &config).expect("solve");
            assert_eq!(trajectory.first(), Some(&[1.0, 1.0, 1.0]));
        }
    }

    #[test]
    fn trajectory_length_matches_grid() {
        let params = LorenzParams::classic();
        for samples in [2, 17, 10_000] {
            let config = SimulationConfig::default().with_samples(samples);
            let trajectory = solve_lorenz(&params, &config).expect("solve");
            assert_eq!(trajectory.len(), samples);
            assert_eq!(trajectory.times(), config.time_grid().expect("grid").times());
        }
    }

    #[test]
    fn adaptive_endpoints_do_not_depend_on_resolution() {
        let params = LorenzParams::classic();
        let coarse = solve_lorenz(&params, &SimulationConfig::default()).expect("coarse");
        let fine = solve_lorenz(&params, &SimulationConfig::default().with_samples(20_000))
            .expect("fine");
        assert_eq!(coarse.first(), fine.first());
        let (a, b) = (coarse.last().expect("last"), fine.last().expect("last"));
        for i in 0..DIM {
            assert_relative_eq!(a[i], b[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn fixed_step_endpoints_converge_under_refinement() {
        let params = LorenzParams::classic();
        let config = SimulationConfig::default()
            .with_integrator(IntegratorKind::Rk4)
            .with_span(0.0, 1.0);
        let coarse = solve_lorenz(&params, &config.clone().with_samples(200)).expect("coarse");
        let fine = solve_lorenz(&params, &config.with_samples(400)).expect("fine");
        let (a, b) = (coarse.last().expect("last"), fine.last().expect("last"));
        for i in 0..DIM {
            assert_relative_eq!(a[i], b[i], epsilon = 1e-3);
        }
    }

    #[test]
    fn adaptive_matches_closed_form() {
        let grid = TimeGrid::linspace(0.0, 2.0, 41).expect("grid");
        let settings = AdaptiveSettings::default().with_rtol(1e-8).with_atol(1e-10);
        let (trajectory, stats) =
            solve_ivp(&Linear, [1.0, 1.0, 0.0], (0.0, 2.0), &grid, &settings).expect("solve");
        assert!(stats.accepted > 0);
        for (t, s) in trajectory.times().iter().zip(trajectory.states()) {
            assert_relative_eq!(s[0], (-t).exp(), epsilon = 1e-6);
            assert_relative_eq!(s[1], (-2.0 * t).exp(), epsilon = 1e-6);
            assert_relative_eq!(s[2], *t, epsilon = 1e-9);
        }
    }

    #[test]
    fn fixed_grid_matches_closed_form() {
        let grid = TimeGrid::linspace(0.0, 1.0, 11).expect("grid");
        let trajectory =
            integrate_on_grid(&Linear, &mut Tsit5::new(3), [1.0, 1.0, 0.0], &grid, 4)
                .expect("solve");
        let last = trajectory.last().expect("last");
        assert_relative_eq!(last[0], (-1.0f64).exp(), epsilon = 1e-9);
        assert_relative_eq!(last[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn adaptive_surfaces_divergence() {
        let grid = TimeGrid::linspace(0.0, 2.0, 5).expect("grid");
        let err = solve_ivp(
            &Blowup,
            [1.0, 0.0, 0.0],
            (0.0, 2.0),
            &grid,
            &AdaptiveSettings::default(),
        )
        .expect_err("finite-time blow-up");
        assert!(matches!(
            err,
            LorenzError::StepSizeUnderflow { .. }
                | LorenzError::NonFiniteState { .. }
                | LorenzError::MaxStepsExceeded { .. }
        ));
    }

    #[test]
    fn adaptive_respects_step_budget() {
        let grid = TimeGrid::linspace(0.0, 50.0, 100).expect("grid");
        let settings = AdaptiveSettings::default().with_max_steps(5);
        let err = solve_ivp(
            &LorenzSystem::new(LorenzParams::classic()),
            [1.0, 1.0, 1.0],
            (0.0, 50.0),
            &grid,
            &settings,
        )
        .expect_err("too few steps");
        assert_eq!(
            err,
            LorenzError::MaxStepsExceeded {
                max_steps: 5,
                t_end: 50.0
            }
        );
    }

    #[test]
    fn fixed_grid_surfaces_overflow() {
        // Unit RK4 steps on dx/dt = x^2 overflow within four steps.
        let grid = TimeGrid::linspace(0.0, 6.0, 7).expect("grid");
        let err = integrate_on_grid(&Blowup, &mut RK4::new(3), [1.0, 0.0, 0.0], &grid, 1)
            .expect_err("overflow");
        assert!(matches!(err, LorenzError::NonFiniteState { .. }));
    }

    #[test]
    fn evaluation_times_must_lie_in_span() {
        let grid = TimeGrid::linspace(0.0, 60.0, 10).expect("grid");
        let err = solve_ivp(
            &Linear,
            [1.0, 1.0, 0.0],
            (0.0, 50.0),
            &grid,
            &AdaptiveSettings::default(),
        )
        .expect_err("grid overshoots span");
        assert!(matches!(err, LorenzError::EvaluationOutsideSpan { .. }));
    }

    #[test]
    fn wrong_dimension_is_rejected() {
        let grid = TimeGrid::linspace(0.0, 1.0, 3).expect("grid");
        let err = integrate_on_grid(&Plane, &mut RK4::new(2), [0.0; 3], &grid, 1)
            .expect_err("2D system");
        assert_eq!(
            err,
            LorenzError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn degenerate_parameters_still_integrate() {
        let params = LorenzParams::new(10.0, -0.5, 28.0);
        let config = SimulationConfig::default().with_span(0.0, 1.0).with_samples(50);
        let trajectory = solve_lorenz(&params, &config).expect("negative beta is allowed");
        assert_eq!(trajectory.len(), 50);
    }
}
