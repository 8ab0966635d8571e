//! The Lorenz vector field.

use crate::traits::{DynamicalSystem, Scalar};
use serde::{Deserialize, Serialize};

/// Dimension of the Lorenz state space.
pub const DIM: usize = 3;

/// The three control parameters of the Lorenz system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorenzParams {
    pub sigma: f64,
    pub beta: f64,
    pub rho: f64,
}

impl LorenzParams {
    pub fn new(sigma: f64, beta: f64, rho: f64) -> Self {
        Self { sigma, beta, rho }
    }

    /// The classic chaotic regime from Lorenz (1963): sigma = 10, beta = 8/3, rho = 28.
    pub fn classic() -> Self {
        Self::new(10.0, 8.0 / 3.0, 28.0)
    }

    pub fn is_finite(&self) -> bool {
        self.sigma.is_finite() && self.beta.is_finite() && self.rho.is_finite()
    }
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self::classic()
    }
}

/// Evaluates the Lorenz field at `state`.
///
/// ```text
/// dx/dt = sigma (y - x)
/// dy/dt = x (rho - z) - y
/// dz/dt = x y - beta z
/// ```
///
/// No validation or clamping: any finite input gives a finite output.
pub fn lorenz_field<T: Scalar>(state: [T; DIM], params: &LorenzParams) -> [T; DIM] {
    let [x, y, z] = state;
    let sigma = T::from(params.sigma);
    let beta = T::from(params.beta);
    let rho = T::from(params.rho);
    [sigma * (y - x), x * (rho - z) - y, x * y - beta * z]
}

/// `DynamicalSystem` adapter around [`lorenz_field`]; time is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LorenzSystem {
    pub params: LorenzParams,
}

impl LorenzSystem {
    pub fn new(params: LorenzParams) -> Self {
        Self { params }
    }
}

impl<T: Scalar> DynamicalSystem<T> for LorenzSystem {
    fn dimension(&self) -> usize {
        DIM
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let dx = lorenz_field([x[0], x[1], x[2]], &self.params);
        out[..DIM].copy_from_slice(&dx);
    }
}
