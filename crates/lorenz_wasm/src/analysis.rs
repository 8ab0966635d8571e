//! Equilibrium analysis and raw trajectory export for the single-page app.

use crate::app::WasmLorenzApp;
use js_sys::Float64Array;
use lorenz_core::equilibrium::{analyze_equilibria, divergence, jacobian};
use lorenz_core::{solve_lorenz, State};
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

pub(crate) fn parse_state(state: &[f64]) -> anyhow::Result<State> {
    let state: State = state
        .try_into()
        .map_err(|_| anyhow::anyhow!("State must have 3 components, got {}.", state.len()))?;
    anyhow::ensure!(
        state.iter().all(|v| v.is_finite()),
        "State components must be finite."
    );
    Ok(state)
}

#[wasm_bindgen]
impl WasmLorenzApp {
    /// Fixed points for the current parameters with eigenvalues and stability.
    pub fn equilibria(&self) -> Result<JsValue, JsValue> {
        to_value(&analyze_equilibria(self.params()))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Row-major 3x3 Jacobian of the field at `state`.
    pub fn jacobian_at(&self, state: Vec<f64>) -> Result<Float64Array, JsValue> {
        let state = parse_state(&state).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Float64Array::from(&jacobian(state, self.params())[..]))
    }

    pub fn divergence(&self) -> f64 {
        divergence([0.0; 3], self.params())
    }

    /// Integrates with the current config and returns `[t0, t1, ...]`.
    pub fn trajectory_times(&self) -> Result<Float64Array, JsValue> {
        let trajectory = solve_lorenz(self.params(), &self.config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Float64Array::from(trajectory.times()))
    }

    /// Integrates with the current config and returns `[x0, y0, z0, x1, ...]`.
    pub fn trajectory_states(&self) -> Result<Float64Array, JsValue> {
        let trajectory = solve_lorenz(self.params(), &self.config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Float64Array::from(trajectory.flat_states().as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn state_must_have_three_finite_components() {
        assert_eq!(parse_state(&[1.0, 2.0, 3.0]).expect("state"), [1.0, 2.0, 3.0]);
        assert!(parse_state(&[1.0, 2.0]).is_err());
        assert!(parse_state(&[1.0, f64::INFINITY, 3.0]).is_err());
    }

    #[test]
    fn divergence_tracks_the_sliders() {
        let mut app = WasmLorenzApp::new();
        assert_relative_eq!(app.divergence(), -13.7, epsilon = 1e-12);
        assert_eq!(app.set_parameter("sigma", 20.0).ok(), Some(20.0));
        assert_relative_eq!(app.divergence(), -23.7, epsilon = 1e-12);
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test::wasm_bindgen_test]
    fn jacobian_export_is_row_major() {
        let app = WasmLorenzApp::new();
        let j = app.jacobian_at(vec![0.0, 0.0, 0.0]).expect("jacobian").to_vec();
        assert_eq!(j.len(), 9);
        assert_eq!(j[0], -10.0);
        assert_eq!(j[1], 10.0);
        assert_eq!(j[3], 28.0);
    }
}
