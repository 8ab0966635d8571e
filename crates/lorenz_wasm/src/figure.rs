//! Interactive figure description, shaped like a Plotly figure so the front-end can
//! hand it to `Plotly.react` unchanged.

use lorenz_core::Trajectory;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter3d {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
}

impl Scatter3d {
    pub fn lines(trajectory: &Trajectory) -> Self {
        Self {
            kind: "scatter3d",
            mode: "lines",
            x: trajectory.xs(),
            y: trajectory.ys(),
            z: trajectory.zs(),
            line: None,
        }
    }

    pub fn with_line(mut self, color: &str, width: f64) -> Self {
        self.line = Some(LineStyle {
            color: color.to_string(),
            width,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub xaxis: AxisTitle,
    pub yaxis: AxisTitle,
    pub zaxis: AxisTitle,
}

impl Scene {
    pub fn titled(x: &str, y: &str, z: &str) -> Self {
        let axis = |title: &str| AxisTitle {
            title: title.to_string(),
        };
        Self {
            xaxis: axis(x),
            yaxis: axis(y),
            zaxis: axis(z),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub b: u32,
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub scene: Scene,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Scatter3d>,
    pub layout: Layout,
}

impl Figure {
    /// Single-page interactive plot: default colours, fixed 850x850 canvas.
    pub fn single_page(trajectory: &Trajectory) -> Self {
        Self {
            data: vec![Scatter3d::lines(trajectory)],
            layout: Layout {
                scene: Scene::titled("x", "y", "z"),
                width: Some(850),
                height: Some(850),
                margin: None,
            },
        }
    }

    /// Dashboard plot: thin blue line filling its container.
    pub fn dashboard(trajectory: &Trajectory) -> Self {
        Self {
            data: vec![Scatter3d::lines(trajectory).with_line("blue", 2.0)],
            layout: Layout {
                scene: Scene::titled("X Axis", "Y Axis", "Z Axis"),
                width: None,
                height: None,
                margin: Some(Margin {
                    l: 0,
                    r: 0,
                    b: 0,
                    t: 0,
                }),
            },
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
