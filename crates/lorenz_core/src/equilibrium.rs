use crate::autodiff::Dual;
use crate::lorenz::{lorenz_field, LorenzParams, DIM};
use crate::trajectory::State;
use nalgebra::Matrix3;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexNumber {
    pub re: f64,
    pub im: f64,
}

impl From<Complex64> for ComplexNumber {
    fn from(value: Complex64) -> Self {
        Self {
            re: value.re,
            im: value.im,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    Stable,
    Unstable,
    /// Some eigenvalue sits on the imaginary axis.
    Marginal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    pub state: State,
    /// Row-major 3x3.
    pub jacobian: Vec<f64>,
    pub eigenvalues: Vec<ComplexNumber>,
    pub stability: Stability,
}

/// Fixed points of the field: the origin, plus the symmetric pair
/// `(±sqrt(beta (rho - 1)), ±sqrt(beta (rho - 1)), rho - 1)` when `beta (rho - 1) > 0`.
pub fn fixed_points(params: &LorenzParams) -> Vec<State> {
    let mut points = vec![[0.0, 0.0, 0.0]];
    let r = params.beta * (params.rho - 1.0);
    if r > 0.0 {
        let c = r.sqrt();
        let z = params.rho - 1.0;
        points.push([c, c, z]);
        points.push([-c, -c, z]);
    }
    points
}

/// Jacobian of the field at `state`, row-major, one forward-mode pass per column.
pub fn jacobian(state: State, params: &LorenzParams) -> [f64; DIM * DIM] {
    let mut out = [0.0; DIM * DIM];
    for j in 0..DIM {
        let seeded: [Dual; DIM] =
            std::array::from_fn(|i| Dual::new(state[i], if i == j { 1.0 } else { 0.0 }));
        let column = lorenz_field(seeded, params);
        for i in 0..DIM {
            out[i * DIM + j] = column[i].eps;
        }
    }
    out
}

/// Trace of the Jacobian. Constant for the Lorenz field: `-(sigma + 1 + beta)`.
pub fn divergence(state: State, params: &LorenzParams) -> f64 {
    let j = jacobian(state, params);
    (0..DIM).map(|i| j[i * DIM + i]).sum()
}

pub fn analyze_equilibria(params: &LorenzParams) -> Vec<Equilibrium> {
    fixed_points(params)
        .into_iter()
        .map(|state| {
            let jacobian = jacobian(state, params);
            let eigenvalues: Vec<Complex64> = Matrix3::from_row_slice(&jacobian)
                .complex_eigenvalues()
                .iter()
                .copied()
                .collect();
            Equilibrium {
                state,
                jacobian: jacobian.to_vec(),
                stability: classify(&eigenvalues),
                eigenvalues: eigenvalues.into_iter().map(ComplexNumber::from).collect(),
            }
        })
        .collect()
}

fn classify(eigenvalues: &[Complex64]) -> Stability {
    const TOL: f64 = 1e-12;
    if eigenvalues.iter().any(|l| l.re > TOL) {
        Stability::Unstable
    } else if eigenvalues.iter().all(|l| l.re < -TOL) {
        Stability::Stable
    } else {
        Stability::Marginal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn origin_is_the_only_fixed_point_below_rho_one() {
        let points = fixed_points(&LorenzParams::new(10.0, 8.0 / 3.0, 0.5));
        assert_eq!(points, vec![[0.0, 0.0, 0.0]]);
    }

    #[test]
    fn symmetric_pair_zeroes_the_field() {
        let params = LorenzParams::classic();
        let points = fixed_points(&params);
        assert_eq!(points.len(), 3);
        for p in points {
            for d in lorenz_field(p, &params) {
                assert_relative_eq!(d, 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn jacobian_matches_analytic_form() {
        let params = LorenzParams::new(10.0, 2.0, 28.0);
        let j = jacobian([1.0, 2.0, 3.0], &params);
        #[rustfmt::skip]
        let expected = [
            -10.0, 10.0, 0.0,
            25.0, -1.0, -1.0,
            2.0, 1.0, -2.0,
        ];
        assert_eq!(j, expected);
    }

    #[test]
    fn divergence_is_constant() {
        let params = LorenzParams::classic();
        let expected = -(params.sigma + 1.0 + params.beta);
        for state in [[0.0, 0.0, 0.0], [1.0, -4.0, 20.0], [-7.5, 3.0, 0.1]] {
            assert_relative_eq!(divergence(state, &params), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn classic_parameters_make_every_equilibrium_unstable() {
        let analysis = analyze_equilibria(&LorenzParams::classic());
        assert_eq!(analysis.len(), 3);
        assert!(analysis.iter().all(|e| e.stability == Stability::Unstable));
        assert!(analysis.iter().all(|e| e.eigenvalues.len() == 3));
    }

    #[test]
    fn origin_is_stable_below_rho_one() {
        let analysis = analyze_equilibria(&LorenzParams::new(10.0, 8.0 / 3.0, 0.5));
        assert_eq!(analysis[0].stability, Stability::Stable);
    }

    #[test]
    fn symmetric_pair_is_stable_for_moderate_rho() {
        // Subcritical Hopf for the classic sigma/beta sits near rho = 24.74.
        let analysis = analyze_equilibria(&LorenzParams::new(10.0, 8.0 / 3.0, 15.0));
        assert_eq!(analysis[0].stability, Stability::Unstable);
        assert_eq!(analysis[1].stability, Stability::Stable);
        assert_eq!(analysis[2].stability, Stability::Stable);
    }
}
