use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Classic Runge-Kutta 4th Order Solver
pub struct RK4<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Scalar> RK4<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: vec![T::zero(); dim],
            k2: vec![T::zero(); dim],
            k3: vec![T::zero(); dim],
            k4: vec![T::zero(); dim],
            tmp: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let half = T::from(0.5);
        let sixth = T::from(1.0 / 6.0);
        let two = T::from(2.0);

        let t0 = *t;

        // k1 = f(t, y)
        system.apply(t0, state, &mut self.k1);

        // k2 = f(t + dt/2, y + dt*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k1[i] * half;
        }
        system.apply(t0 + dt * half, &self.tmp, &mut self.k2);

        // k3 = f(t + dt/2, y + dt*k2/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k2[i] * half;
        }
        system.apply(t0 + dt * half, &self.tmp, &mut self.k3);

        // k4 = f(t + dt, y + dt*k3)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k3[i];
        }
        system.apply(t0 + dt, &self.tmp, &mut self.k4);

        // y_next = y + dt/6 * (k1 + 2k2 + 2k3 + k4)
        for i in 0..state.len() {
            state[i] += dt * sixth * (self.k1[i] + two * self.k2[i] + two * self.k3[i] + self.k4[i]);
        }

        *t = t0 + dt;
    }
}

// Tsitouras 5(4) tableau.
const C2: f64 = 0.161;
const C3: f64 = 0.327;
const C4: f64 = 0.9;
const C5: f64 = 0.9800255409045097;

const A21: f64 = 0.161;
const A31: f64 = -0.008480655492356989;
const A32: f64 = 0.335480655492357;
const A41: f64 = 2.897153057105493;
const A42: f64 = -6.359448489975075;
const A43: f64 = 4.3622954328695815;
const A51: f64 = 5.325864828439257;
const A52: f64 = -11.748883564062828;
const A53: f64 = 7.4955393428898365;
const A54: f64 = -0.09249506636175525;
const A61: f64 = 5.86145544294642;
const A62: f64 = -12.92096931784711;
const A63: f64 = 8.159367898576159;
const A64: f64 = -0.071584973281401;
const A65: f64 = -0.028269050394068383;

// 5th order weights; also the last row of A, which makes k7 = f(t + dt, y_next).
const B1: f64 = 0.09646076681806523;
const B2: f64 = 0.01;
const B3: f64 = 0.4798896504144996;
const B4: f64 = 1.379008574103742;
const B5: f64 = -3.290069515436099;
const B6: f64 = 2.324710524099774;

// Difference between the 5th and embedded 4th order weights.
const E1: f64 = -0.00178001105222577714;
const E2: f64 = -0.0008164344596567469;
const E3: f64 = 0.007880878010261995;
const E4: f64 = -0.1447110071732629;
const E5: f64 = 0.5823571654525552;
const E6: f64 = -0.45808210592918697;
const E7: f64 = 1.0 / 66.0;

/// Tsitouras 5/4 Solver
///
/// Used as a plain fixed-step method through [`Steppable`], and as an adaptive
/// method through [`Tsit5::attempt`] / [`Tsit5::accept`], which reuse the last
/// stage of an accepted step as the first stage of the next one.
pub struct Tsit5<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    k5: Vec<T>,
    k6: Vec<T>,
    k7: Vec<T>,
    tmp: Vec<T>,
    y_next: Vec<T>,
    k1_valid: bool,
}

impl<T: Scalar> Tsit5<T> {
    pub fn new(dim: usize) -> Self {
        let z = T::zero();
        Self {
            k1: vec![z; dim],
            k2: vec![z; dim],
            k3: vec![z; dim],
            k4: vec![z; dim],
            k5: vec![z; dim],
            k6: vec![z; dim],
            k7: vec![z; dim],
            tmp: vec![z; dim],
            y_next: vec![z; dim],
            k1_valid: false,
        }
    }

    /// Forgets the cached first stage; call when the state is changed externally.
    pub fn reset(&mut self) {
        self.k1_valid = false;
    }

    /// Runs stages k1..k6 and writes the 5th order solution into `y_next`.
    fn stages(&mut self, system: &impl DynamicalSystem<T>, t0: T, state: &[T], dt: T) {
        let c = |v: f64| T::from(v);

        if !self.k1_valid {
            system.apply(t0, state, &mut self.k1);
            self.k1_valid = true;
        }

        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * (c(A21) * self.k1[i]);
        }
        system.apply(t0 + c(C2) * dt, &self.tmp, &mut self.k2);

        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * (c(A31) * self.k1[i] + c(A32) * self.k2[i]);
        }
        system.apply(t0 + c(C3) * dt, &self.tmp, &mut self.k3);

        for i in 0..state.len() {
            self.tmp[i] = state[i]
                + dt * (c(A41) * self.k1[i] + c(A42) * self.k2[i] + c(A43) * self.k3[i]);
        }
        system.apply(t0 + c(C4) * dt, &self.tmp, &mut self.k4);

        for i in 0..state.len() {
            self.tmp[i] = state[i]
                + dt * (c(A51) * self.k1[i]
                    + c(A52) * self.k2[i]
                    + c(A53) * self.k3[i]
                    + c(A54) * self.k4[i]);
        }
        system.apply(t0 + c(C5) * dt, &self.tmp, &mut self.k5);

        for i in 0..state.len() {
            self.tmp[i] = state[i]
                + dt * (c(A61) * self.k1[i]
                    + c(A62) * self.k2[i]
                    + c(A63) * self.k3[i]
                    + c(A64) * self.k4[i]
                    + c(A65) * self.k5[i]);
        }
        system.apply(t0 + dt, &self.tmp, &mut self.k6);

        for i in 0..state.len() {
            self.y_next[i] = state[i]
                + dt * (c(B1) * self.k1[i]
                    + c(B2) * self.k2[i]
                    + c(B3) * self.k3[i]
                    + c(B4) * self.k4[i]
                    + c(B5) * self.k5[i]
                    + c(B6) * self.k6[i]);
        }
    }
}

impl<T: Scalar> Steppable<T> for Tsit5<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        self.k1_valid = false;
        self.stages(system, *t, state, dt);
        state.copy_from_slice(&self.y_next[..state.len()]);
        self.k1_valid = false;
        *t = *t + dt;
    }
}

impl Tsit5<f64> {
    /// Tries a step of size `dt` from `(t0, state)` without committing it.
    ///
    /// Returns the RMS of the local error scaled by `atol + rtol * max(|y|, |y_next|)`;
    /// a value <= 1 means the step is acceptable. A non-finite candidate yields `f64::INFINITY`.
    pub fn attempt(
        &mut self,
        system: &impl DynamicalSystem<f64>,
        t0: f64,
        state: &[f64],
        dt: f64,
        rtol: f64,
        atol: f64,
    ) -> f64 {
        self.stages(system, t0, state, dt);
        if self.y_next.iter().any(|v| !v.is_finite()) {
            return f64::INFINITY;
        }
        system.apply(t0 + dt, &self.y_next, &mut self.k7);

        let mut sum = 0.0;
        for i in 0..state.len() {
            let err = dt
                * (E1 * self.k1[i]
                    + E2 * self.k2[i]
                    + E3 * self.k3[i]
                    + E4 * self.k4[i]
                    + E5 * self.k5[i]
                    + E6 * self.k6[i]
                    + E7 * self.k7[i]);
            let scale = atol + rtol * state[i].abs().max(self.y_next[i].abs());
            sum += (err / scale).powi(2);
        }
        let norm = (sum / state.len() as f64).sqrt();
        if norm.is_finite() {
            norm
        } else {
            f64::INFINITY
        }
    }

    /// Cubic Hermite interpolant of the last attempted step at fraction `theta` in [0, 1].
    /// Only meaningful after a successful [`Tsit5::attempt`] and before [`Tsit5::accept`].
    pub fn interpolate(&self, state: &[f64], dt: f64, theta: f64, out: &mut [f64]) {
        let t2 = theta * theta;
        let t3 = t2 * theta;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + theta;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        for i in 0..state.len() {
            out[i] = h00 * state[i]
                + h10 * dt * self.k1[i]
                + h01 * self.y_next[i]
                + h11 * dt * self.k7[i];
        }
    }

    /// Commits the last attempted step into `state`.
    pub fn accept(&mut self, state: &mut [f64]) {
        state.copy_from_slice(&self.y_next[..state.len()]);
        // First same as last.
        std::mem::swap(&mut self.k1, &mut self.k7);
        self.k1_valid = true;
    }

    /// Derivative at the current step start, evaluating it if not cached.
    pub fn initial_derivative(
        &mut self,
        system: &impl DynamicalSystem<f64>,
        t0: f64,
        state: &[f64],
    ) -> &[f64] {
        if !self.k1_valid {
            system.apply(t0, state, &mut self.k1);
            self.k1_valid = true;
        }
        &self.k1
    }
}

/// Step-size controller for the embedded Tsit5 error estimate.
#[derive(Debug, Clone, Copy)]
pub struct StepController {
    pub safety: f64,
    pub min_factor: f64,
    pub max_factor: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.9,
            min_factor: 0.2,
            max_factor: 10.0,
        }
    }
}

impl StepController {
    /// Error estimator order + 1.
    const EXPONENT: f64 = 1.0 / 5.0;

    /// Next step size given the current one and its scaled error norm.
    pub fn next_dt(&self, dt: f64, error: f64) -> f64 {
        let factor = if error == 0.0 {
            self.max_factor
        } else if !error.is_finite() {
            self.min_factor
        } else {
            (self.safety * error.powf(-Self::EXPONENT)).clamp(self.min_factor, self.max_factor)
        };
        dt * factor
    }
}
