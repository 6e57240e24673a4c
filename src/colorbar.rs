// src/colorbar.rs
//
// Colorbar linking: one legend strip whose scale is taken from a single
// representative panel.
//
// Linked panels are expected to share bounds and colormap. That is not
// enforced: a mismatch is logged and the representative's mapping wins, so a
// wrong legend is visible in the log rather than silently "corrected".

use plotters::coord::Shift;
use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::colormap::ColorMapping;
use crate::error::{RenderError, Result};
use crate::figure::Fonts;
use crate::panel::Panel;

/// Number of colour steps in the drawn strip.
const STRIP_STEPS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Tick placement for a colorbar axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticks {
    /// Fixed spacing; `None` lets the axis pick ~5 ticks.
    pub step: Option<f64>,
    pub precision: usize,
}

impl Default for Ticks {
    fn default() -> Self {
        Self {
            step: None,
            precision: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Colorbar {
    pub mapping: ColorMapping,
    /// Panel whose mapping this colorbar shows.
    pub source: usize,
    /// Every panel the colorbar stands for (includes `source`).
    pub linked: Vec<usize>,
    pub orientation: Orientation,
    pub ticks: Ticks,
}

/// Attach a colorbar to `representative`, standing for it and `also`.
pub fn link_colorbar(
    panels: &[Panel],
    representative: usize,
    also: &[usize],
    orientation: Orientation,
    ticks: Ticks,
) -> Result<Colorbar> {
    let source = panels
        .get(representative)
        .ok_or(RenderError::NoSuchPanel(representative))?;

    let mut linked = vec![representative];
    for &i in also {
        if i >= panels.len() {
            return Err(RenderError::NoSuchPanel(i));
        }
        if !linked.contains(&i) {
            linked.push(i);
        }
    }

    let cb = Colorbar {
        mapping: source.mapping,
        source: representative,
        linked,
        orientation,
        ticks,
    };
    if !cb.agrees_with(panels) {
        tracing::warn!(
            source = representative,
            linked = ?cb.linked,
            "linked panels use different colour mappings; legend follows the source panel"
        );
    }
    Ok(cb)
}

impl Colorbar {
    /// True when every linked panel uses exactly this colorbar's mapping.
    pub fn agrees_with(&self, panels: &[Panel]) -> bool {
        self.linked
            .iter()
            .filter_map(|&i| panels.get(i))
            .all(|p| p.mapping == self.mapping)
    }

    /// Value range low to high, whatever order the bounds were given in.
    pub fn value_range(&self) -> (f64, f64) {
        let (a, b) = (self.mapping.vmin, self.mapping.vmax);
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Tick values for a fixed step (multiples of the step inside the range).
    pub fn tick_values(&self) -> Vec<f64> {
        let (lo, hi) = self.value_range();
        match self.ticks.step {
            Some(step) if step > 0.0 && hi > lo => {
                let first = (lo / step).ceil() as i64;
                let last = (hi / step).floor() as i64;
                (first..=last).take(64).map(|k| k as f64 * step).collect()
            }
            _ => {
                let n = 5;
                (0..n)
                    .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
                    .collect()
            }
        }
    }

    /// Value axis of the strip with ticks pinned to `tick_values`.
    pub fn key_axis(&self) -> WithKeyPoints<RangedCoordf64> {
        let (mut lo, mut hi) = self.value_range();
        if hi == lo {
            lo -= 0.5;
            hi += 0.5;
        }
        (lo..hi).with_key_points(self.tick_values())
    }

    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        fonts: &Fonts<'_>,
    ) -> Result<()> {
        let axis = self.key_axis();
        let (lo, hi) = (axis.range().start, axis.range().end);
        let n_labels = self.tick_values().len().max(2);
        let precision = self.ticks.precision;
        let fmt = |v: &f64| format!("{:.*}", precision, v);
        let delta = (hi - lo) / STRIP_STEPS as f64;
        let strip = (0..STRIP_STEPS).map(|i| {
            let v0 = lo + delta * i as f64;
            (v0, v0 + delta, self.mapping.color(v0 + 0.5 * delta))
        });

        let mut builder = ChartBuilder::on(area);
        builder.margin(fonts.margin);

        match self.orientation {
            Orientation::Vertical => {
                builder.right_y_label_area_size(fonts.label_area);
                let mut chart = builder
                    .build_cartesian_2d(0.0f64..1.0, axis)
                    .map_err(RenderError::draw)?;
                chart
                    .draw_series(strip.filter_map(|(v0, v1, c)| {
                        c.map(|c| Rectangle::new([(0.0, v0), (1.0, v1)], c.filled()))
                    }))
                    .map_err(RenderError::draw)?;
                chart
                    .configure_mesh()
                    .disable_mesh()
                    .disable_x_axis()
                    .y_labels(n_labels)
                    .y_label_formatter(&fmt)
                    .label_style(fonts.tick())
                    .draw()
                    .map_err(RenderError::draw)?;
            }
            Orientation::Horizontal => {
                builder.x_label_area_size(fonts.label_area);
                let mut chart = builder
                    .build_cartesian_2d(axis, 0.0f64..1.0)
                    .map_err(RenderError::draw)?;
                chart
                    .draw_series(strip.filter_map(|(v0, v1, c)| {
                        c.map(|c| Rectangle::new([(v0, 0.0), (v1, 1.0)], c.filled()))
                    }))
                    .map_err(RenderError::draw)?;
                chart
                    .configure_mesh()
                    .disable_mesh()
                    .disable_y_axis()
                    .x_labels(n_labels)
                    .x_label_formatter(&fmt)
                    .label_style(fonts.tick())
                    .draw()
                    .map_err(RenderError::draw)?;
            }
        }
        Ok(())
    }
}
