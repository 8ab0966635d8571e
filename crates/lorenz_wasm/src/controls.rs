//! Slider definitions for the two front-ends.

use lorenz_core::LorenzParams;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlId {
    Sigma,
    Beta,
    Rho,
}

impl ControlId {
    pub const ALL: [ControlId; 3] = [ControlId::Sigma, ControlId::Beta, ControlId::Rho];

    /// Accepts the bare name or the dashboard element id (`sigma-slider`).
    pub fn from_name(name: &str) -> anyhow::Result<Self> {
        match name.trim_end_matches("-slider") {
            "sigma" => Ok(ControlId::Sigma),
            "beta" => Ok(ControlId::Beta),
            "rho" => Ok(ControlId::Rho),
            other => anyhow::bail!("Unknown control '{other}'."),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlId::Sigma => "sigma",
            ControlId::Beta => "beta",
            ControlId::Rho => "rho",
        }
    }

    pub fn slider_id(self) -> String {
        format!("{}-slider", self.name())
    }

    pub fn label_id(self) -> String {
        format!("{}-value", self.name())
    }

    pub fn get(self, params: &LorenzParams) -> f64 {
        match self {
            ControlId::Sigma => params.sigma,
            ControlId::Beta => params.beta,
            ControlId::Rho => params.rho,
        }
    }

    pub fn set(self, params: &mut LorenzParams, value: f64) {
        match self {
            ControlId::Sigma => params.sigma = value,
            ControlId::Beta => params.beta = value,
            ControlId::Rho => params.rho = value,
        }
    }

    /// Text of the value label under a dashboard slider.
    pub fn label_text(self, value: f64) -> String {
        match self {
            ControlId::Sigma => format!("Sigma: {value}"),
            ControlId::Beta => format!("Beta: {value:.1}"),
            ControlId::Rho => format!("Rho: {value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderSpec {
    pub id: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
    pub marks: Vec<Mark>,
}

impl SliderSpec {
    /// Clamps to the range and rounds to the nearest step, the way the widget would.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.value;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        // Trim representation noise such as 2.7000000000000002.
        let tidy = (snapped * 1e9).round() / 1e9;
        tidy.clamp(self.min, self.max)
    }
}

/// The three sliders of one front-end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPanel {
    pub sigma: SliderSpec,
    pub beta: SliderSpec,
    pub rho: SliderSpec,
}

impl ControlPanel {
    /// Sidebar sliders of the single-page app: integer sigma and rho.
    pub fn single_page() -> Self {
        Self {
            sigma: slider(ControlId::Sigma, "Sigma (σ)", (0.0, 30.0), 1.0, 10.0, Vec::new()),
            beta: slider(ControlId::Beta, "Beta (β)", (0.0, 5.0), 0.1, 2.7, Vec::new()),
            rho: slider(ControlId::Rho, "Rho (ρ)", (0.0, 100.0), 1.0, 28.0, Vec::new()),
        }
    }

    /// Dashboard sliders: 0.1 resolution everywhere, with tick marks.
    pub fn dashboard() -> Self {
        Self {
            sigma: slider(
                ControlId::Sigma,
                "Sigma:",
                (0.0, 30.0),
                0.1,
                10.0,
                marks((0..=30).step_by(5), |i| format!("{i}")),
            ),
            beta: slider(
                ControlId::Beta,
                "Beta:",
                (0.0, 5.0),
                0.1,
                8.0 / 3.0,
                marks(0..=5, |i| format!("{:.1}", i as f64)),
            ),
            rho: slider(
                ControlId::Rho,
                "Rho:",
                (0.0, 100.0),
                0.1,
                28.0,
                marks((0..=100).step_by(10), |i| format!("{i}")),
            ),
        }
    }

    pub fn slider(&self, id: ControlId) -> &SliderSpec {
        match id {
            ControlId::Sigma => &self.sigma,
            ControlId::Beta => &self.beta,
            ControlId::Rho => &self.rho,
        }
    }

    pub fn defaults(&self) -> LorenzParams {
        LorenzParams::new(self.sigma.value, self.beta.value, self.rho.value)
    }

    pub fn snap(&self, id: ControlId, value: f64) -> f64 {
        self.slider(id).snap(value)
    }
}

fn slider(
    id: ControlId,
    label: &str,
    (min, max): (f64, f64),
    step: f64,
    value: f64,
    marks: Vec<Mark>,
) -> SliderSpec {
    SliderSpec {
        id: id.slider_id(),
        label: label.to_string(),
        min,
        max,
        step,
        value,
        marks,
    }
}

fn marks(ticks: impl Iterator<Item = i32>, label: impl Fn(i32) -> String) -> Vec<Mark> {
    ticks
        .map(|i| Mark {
            value: i as f64,
            label: label(i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_defaults() {
        let panel = ControlPanel::single_page();
        assert_eq!(panel.defaults(), LorenzParams::new(10.0, 2.7, 28.0));
        assert_eq!(panel.sigma.step, 1.0);
        assert_eq!(panel.rho.max, 100.0);
        assert!(panel.beta.marks.is_empty());
    }

    #[test]
    fn dashboard_marks() {
        let panel = ControlPanel::dashboard();
        assert_eq!(panel.sigma.marks.len(), 7);
        assert_eq!(panel.rho.marks.len(), 11);
        let beta_labels: Vec<&str> = panel.beta.marks.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(beta_labels, ["0.0", "1.0", "2.0", "3.0", "4.0", "5.0"]);
        assert!((panel.beta.value - 8.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn snap_clamps_and_rounds() {
        let panel = ControlPanel::single_page();
        assert_eq!(panel.snap(ControlId::Sigma, 12.4), 12.0);
        assert_eq!(panel.snap(ControlId::Sigma, 99.0), 30.0);
        assert_eq!(panel.snap(ControlId::Rho, -5.0), 0.0);
        assert_eq!(panel.snap(ControlId::Beta, 2.66), 2.7);
        assert_eq!(panel.snap(ControlId::Beta, f64::NAN), 2.7);
    }

    #[test]
    fn labels_follow_value_formatting() {
        assert_eq!(ControlId::Sigma.label_text(10.0), "Sigma: 10");
        assert_eq!(ControlId::Sigma.label_text(10.5), "Sigma: 10.5");
        assert_eq!(ControlId::Beta.label_text(8.0 / 3.0), "Beta: 2.7");
        assert_eq!(ControlId::Rho.label_text(28.0), "Rho: 28");
    }

    #[test]
    fn control_names_resolve() {
        assert_eq!(ControlId::from_name("rho").expect("rho"), ControlId::Rho);
        assert_eq!(
            ControlId::from_name("beta-slider").expect("beta"),
            ControlId::Beta
        );
        assert!(ControlId::from_name("gamma").is_err());
        assert_eq!(ControlId::Sigma.label_id(), "sigma-value");
    }
}
