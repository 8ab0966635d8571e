//! Reactive dashboard: one parameter-change event fanned out to independent handlers.
//!
//! Every handler is a pure function of the event and the simulation config. A
//! subscription names the controls it listens to; on a change only the handlers
//! subscribed to that control run, and each returns the fragment for its output.

use crate::controls::{ControlId, ControlPanel};
use crate::figure::Figure;
use crate::page::{PARAMETERS_HEADING, TITLE};
use anyhow::Result;
use lorenz_core::{solve_lorenz, IntegratorKind, LorenzParams, SimulationConfig};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use tracing::debug;
use wasm_bindgen::prelude::*;

pub const PLOT_ID: &str = "lorenz-plot";

/// Current values of all three controls, emitted on every change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterChange {
    pub params: LorenzParams,
    /// `None` for the initial render.
    pub changed: Option<ControlId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiFragment {
    Label { target: String, text: String },
    Figure { target: String, figure: Figure },
}

impl UiFragment {
    pub fn target(&self) -> &str {
        match self {
            UiFragment::Label { target, .. } | UiFragment::Figure { target, .. } => target,
        }
    }
}

pub type Handler = fn(&ParameterChange, &SimulationConfig) -> Result<UiFragment>;

pub struct Subscription {
    pub output: &'static str,
    pub inputs: &'static [ControlId],
    pub handler: Handler,
}

fn sigma_label(event: &ParameterChange, _: &SimulationConfig) -> Result<UiFragment> {
    label(ControlId::Sigma, &event.params)
}

fn beta_label(event: &ParameterChange, _: &SimulationConfig) -> Result<UiFragment> {
    label(ControlId::Beta, &event.params)
}

fn rho_label(event: &ParameterChange, _: &SimulationConfig) -> Result<UiFragment> {
    label(ControlId::Rho, &event.params)
}

fn label(id: ControlId, params: &LorenzParams) -> Result<UiFragment> {
    Ok(UiFragment::Label {
        target: id.label_id(),
        text: id.label_text(id.get(params)),
    })
}

fn plot(event: &ParameterChange, config: &SimulationConfig) -> Result<UiFragment> {
    let trajectory = solve_lorenz(&event.params, config)?;
    Ok(UiFragment::Figure {
        target: PLOT_ID.to_string(),
        figure: Figure::dashboard(&trajectory),
    })
}

pub const SUBSCRIPTIONS: [Subscription; 4] = [
    Subscription {
        output: "sigma-value",
        inputs: &[ControlId::Sigma],
        handler: sigma_label,
    },
    Subscription {
        output: "beta-value",
        inputs: &[ControlId::Beta],
        handler: beta_label,
    },
    Subscription {
        output: "rho-value",
        inputs: &[ControlId::Rho],
        handler: rho_label,
    },
    Subscription {
        output: PLOT_ID,
        inputs: &ControlId::ALL,
        handler: plot,
    },
];

/// Runs every subscribed handler for `event`, in subscription order.
pub fn dispatch(event: &ParameterChange, config: &SimulationConfig) -> Result<Vec<UiFragment>> {
    SUBSCRIPTIONS
        .iter()
        .filter(|sub| match event.changed {
            Some(id) => sub.inputs.contains(&id),
            None => true,
        })
        .map(|sub| {
            debug!(output = sub.output, "dashboard handler");
            (sub.handler)(event, config)
        })
        .collect()
}

/// Config the dashboard solves with: adaptive steps sampled at the evaluation grid.
pub fn default_config() -> SimulationConfig {
    SimulationConfig::default().with_integrator(IntegratorKind::Tsit5Adaptive)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardLayout {
    pub title: &'static str,
    pub heading: &'static str,
    pub controls: ControlPanel,
    pub label_ids: Vec<String>,
    pub plot_id: &'static str,
}

pub fn layout() -> DashboardLayout {
    DashboardLayout {
        title: TITLE,
        heading: PARAMETERS_HEADING,
        controls: ControlPanel::dashboard(),
        label_ids: ControlId::ALL.iter().map(|id| id.label_id()).collect(),
        plot_id: PLOT_ID,
    }
}

#[wasm_bindgen]
pub struct WasmDashboard {
    params: LorenzParams,
    controls: ControlPanel,
    pub(crate) config: SimulationConfig,
}

impl WasmDashboard {
    pub(crate) fn change(&mut self, id: ControlId, value: f64) -> Result<Vec<UiFragment>> {
        let snapped = self.controls.snap(id, value);
        id.set(&mut self.params, snapped);
        dispatch(
            &ParameterChange {
                params: self.params,
                changed: Some(id),
            },
            &self.config,
        )
    }

    pub(crate) fn initial(&self) -> Result<Vec<UiFragment>> {
        dispatch(
            &ParameterChange {
                params: self.params,
                changed: None,
            },
            &self.config,
        )
    }
}

fn fragments_to_js(fragments: Result<Vec<UiFragment>>) -> Result<JsValue, JsValue> {
    let fragments = fragments.map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
    to_value(&fragments).map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

#[wasm_bindgen]
impl WasmDashboard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmDashboard {
        console_error_panic_hook::set_once();

        let controls = ControlPanel::dashboard();
        WasmDashboard {
            params: controls.defaults(),
            controls,
            config: default_config(),
        }
    }

    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: SimulationConfig = from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.config = config;
        Ok(())
    }

    pub fn layout(&self) -> Result<JsValue, JsValue> {
        to_value(&layout()).map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Fragments for every output, for the first paint.
    pub fn initial_fragments(&self) -> Result<JsValue, JsValue> {
        fragments_to_js(self.initial())
    }

    /// Applies a slider change and returns the fragments subscribed to it.
    pub fn on_change(&mut self, control: &str, value: f64) -> Result<JsValue, JsValue> {
        let id = ControlId::from_name(control).map_err(|e| JsValue::from_str(&e.to_string()))?;
        fragments_to_js(self.change(id, value))
    }

    pub fn get_parameters(&self) -> Vec<f64> {
        vec![self.params.sigma, self.params.beta, self.params.rho]
    }
}

impl Default for WasmDashboard {
    fn default() -> Self {
        Self::new()
    }
}
