//! Single-page app: sidebar sliders, an interactive toggle, one render per submit.

use crate::controls::{ControlId, ControlPanel};
use crate::figure::Figure;
use crate::page::{FooterConfig, PageContent};
use crate::static_plot::{self, StaticPlotOptions};
use anyhow::Context;
use lorenz_core::{solve_lorenz, IntegratorKind, LorenzParams, SimulationConfig};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedPlot {
    Static { svg: String },
    Interactive { figure: Figure },
}

/// Config the single-page app solves with: adaptive Tsit5 sampled at the grid, so the
/// sample count only changes resolution, never the path.
pub fn default_config() -> SimulationConfig {
    SimulationConfig::default().with_integrator(IntegratorKind::Tsit5Adaptive)
}

pub(crate) fn render_plot(
    params: &LorenzParams,
    interactive: bool,
    config: &SimulationConfig,
    plot_options: &StaticPlotOptions,
) -> anyhow::Result<RenderedPlot> {
    let trajectory = solve_lorenz(params, config).context("Failed to integrate the Lorenz system.")?;
    if interactive {
        Ok(RenderedPlot::Interactive {
            figure: Figure::single_page(&trajectory),
        })
    } else {
        Ok(RenderedPlot::Static {
            svg: static_plot::render_svg(&trajectory, plot_options)?,
        })
    }
}

fn to_js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

#[wasm_bindgen]
pub struct WasmLorenzApp {
    params: LorenzParams,
    interactive: bool,
    controls: ControlPanel,
    pub(crate) config: SimulationConfig,
    plot_options: StaticPlotOptions,
    footer: FooterConfig,
}

impl WasmLorenzApp {
    pub(crate) fn params(&self) -> &LorenzParams {
        &self.params
    }

    fn set_control(&mut self, id: ControlId, value: f64) -> f64 {
        let snapped = self.controls.snap(id, value);
        id.set(&mut self.params, snapped);
        snapped
    }

    pub(crate) fn render_inner(&self) -> anyhow::Result<RenderedPlot> {
        render_plot(&self.params, self.interactive, &self.config, &self.plot_options)
    }
}

#[wasm_bindgen]
impl WasmLorenzApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmLorenzApp {
        console_error_panic_hook::set_once();

        let controls = ControlPanel::single_page();
        WasmLorenzApp {
            params: controls.defaults(),
            interactive: false,
            controls,
            config: default_config(),
            plot_options: StaticPlotOptions::default(),
            footer: FooterConfig::default(),
        }
    }

    /// Replaces the simulation config with a JS object; missing fields keep their defaults.
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: SimulationConfig = from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.config = config;
        Ok(())
    }

    /// Switches integrator by name: `rk4`, `tsit5` or `tsit5_adaptive`.
    pub fn set_integrator(&mut self, name: &str) -> Result<(), JsValue> {
        self.config.integrator =
            IntegratorKind::from_name(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(())
    }

    pub fn set_plot_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        self.plot_options = from_value(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid plot options: {e}")))?;
        Ok(())
    }

    pub fn set_footer(&mut self, footer: JsValue) -> Result<(), JsValue> {
        self.footer = from_value(footer)
            .map_err(|e| JsValue::from_str(&format!("Invalid footer: {e}")))?;
        Ok(())
    }

    /// Sets a slider by name and returns the value the slider would actually hold.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<f64, JsValue> {
        let id = ControlId::from_name(name).map_err(to_js_error)?;
        Ok(self.set_control(id, value))
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn get_parameters(&self) -> Vec<f64> {
        vec![self.params.sigma, self.params.beta, self.params.rho]
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn controls(&self) -> Result<JsValue, JsValue> {
        to_value(&self.controls)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    pub fn page(&self) -> Result<JsValue, JsValue> {
        to_value(&PageContent::new(&self.footer))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Solves for the current parameters and returns `{ kind: "static", svg }` or
    /// `{ kind: "interactive", figure }`.
    pub fn render(&self) -> Result<JsValue, JsValue> {
        let plot = self.render_inner().map_err(to_js_error)?;
        to_value(&plot).map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Static SVG regardless of the toggle.
    pub fn render_svg(&self) -> Result<String, JsValue> {
        let trajectory = solve_lorenz(&self.params, &self.config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        static_plot::render_svg(&trajectory, &self.plot_options).map_err(to_js_error)
    }

    /// Interactive figure as a JSON string regardless of the toggle.
    pub fn render_figure_json(&self) -> Result<String, JsValue> {
        let trajectory = solve_lorenz(&self.params, &self.config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Figure::single_page(&trajectory)
            .to_json()
            .map_err(to_js_error)
    }
}

impl Default for WasmLorenzApp {
    fn default() -> Self {
        Self::new()
    }
}
