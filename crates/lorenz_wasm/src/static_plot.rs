//! Static 3D line plot rendered to SVG with plotters.

use anyhow::{anyhow, Result};
use lorenz_core::Trajectory;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticPlotOptions {
    pub width: u32,
    pub height: u32,
    pub yaw: f64,
    pub pitch: f64,
    pub scale: f64,
    pub line_width: u32,
}

impl Default for StaticPlotOptions {
    fn default() -> Self {
        // 10x7 inches at 100 dpi.
        Self {
            width: 1000,
            height: 700,
            yaw: 0.7,
            pitch: 0.3,
            scale: 0.85,
            line_width: 1,
        }
    }
}

fn padded(min: f64, max: f64) -> Range<f64> {
    let pad = ((max - min) * 0.05).max(1e-6);
    (min - pad)..(max + pad)
}

pub fn render_svg(trajectory: &Trajectory, options: &StaticPlotOptions) -> Result<String> {
    let bounds = trajectory
        .bounds()
        .ok_or_else(|| anyhow!("Cannot plot an empty trajectory."))?;
    if bounds.min.iter().chain(&bounds.max).any(|v| !v.is_finite()) {
        return Err(anyhow!("Cannot plot a trajectory with non-finite samples."));
    }
    let x_range = padded(bounds.min[0], bounds.max[0]);
    let y_range = padded(bounds.min[1], bounds.max[1]);
    let z_range = padded(bounds.min[2], bounds.max[2]);
    let label_at = [
        ("x", (x_range.end, y_range.start, z_range.start)),
        ("y", (x_range.start, y_range.end, z_range.start)),
        ("z", (x_range.start, y_range.start, z_range.end)),
    ];

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .build_cartesian_3d(x_range, y_range, z_range)?;
        chart.with_projection(|mut pb| {
            pb.yaw = options.yaw;
            pb.pitch = options.pitch;
            pb.scale = options.scale;
            pb.into_matrix()
        });

        chart
            .configure_axes()
            .light_grid_style(BLACK.mix(0.15))
            .max_light_lines(3)
            .draw()?;

        chart.draw_series(LineSeries::new(
            trajectory.states().iter().map(|s| (s[0], s[1], s[2])),
            BLUE.stroke_width(options.line_width),
        ))?;

        chart.draw_series(
            label_at
                .into_iter()
                .map(|(label, pos)| Text::new(label, pos, ("sans-serif", 14))),
        )?;

        root.present()?;
    }
    Ok(svg)
}
