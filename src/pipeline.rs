// src/pipeline.rs
//
// One snapshot + variable spec(s) -> one composed Figure.
//
// Steps per call:
//   1) resolve domain and level bounds, convert to the display unit
//   2) per panel: slice -> scale -> panel
//   3) link colorbars and compose the grid (layout.rs)
//
// Saving is the caller's job. Everything the call allocates is owned by the
// returned Figure, so dropping it releases the frame in full.

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::figure::Figure;
use crate::layout::{DimensionMode, compose_slice_row, compose_stacked};
use crate::panel::{Annotation, Extent, Origin, Panel, PanelSlot, render_panel};
use crate::slice::{SliceSpec, extract};
use crate::snapshot::DataProvider;
use crate::units::{Coords, LengthUnit};
use crate::variable::VariableSpec;

const DIM_NAMES: [&str; 3] = ["x", "y", "z"];

/// Bounds of one snapshot in display units.
#[derive(Debug, Clone)]
pub struct Frame {
    pub domain_min: Coords,
    pub domain_max: Coords,
    pub level_min: Coords,
    pub level_max: Coords,
    pub title: String,
}

impl Frame {
    pub fn resolve(snap: &dyn DataProvider, config: &RenderConfig) -> Self {
        let unit = config.length_unit;
        let t = snap.sim_time().to(config.time_unit);
        Self {
            domain_min: snap.xmin().to(unit),
            domain_max: snap.xmax().to(unit),
            level_min: snap.level_min().to(unit),
            level_max: snap.level_max().to(unit),
            title: format!("Time = {:.5} {}", t.value, t.unit.symbol()),
        }
    }

    /// Image extent for a plane showing dimension `h` across and `v` up.
    pub fn extent(&self, h: usize, v: usize) -> Extent {
        Extent::from_bounds(&self.level_min, &self.level_max, h, v)
    }

    /// Axes limits for the same plane.
    pub fn view(&self, h: usize, v: usize) -> Extent {
        Extent::from_bounds(&self.domain_min, &self.domain_max, h, v)
    }
}

/// Physical dimensions `(horizontal, vertical)` left after fixing array axis
/// `fixed` of a rank-`ndim` field. Array axis k is physical dimension ndim-1-k.
pub fn plane_dims(ndim: usize, fixed: usize) -> (usize, usize) {
    let mut remaining = (0..ndim).filter(|&a| a != fixed);
    let row = remaining.next().unwrap_or(0);
    let col = remaining.next().unwrap_or(0);
    (ndim - 1 - col, ndim - 1 - row)
}

pub fn axis_label(dim: usize, unit: LengthUnit) -> String {
    let name = DIM_NAMES.get(dim).copied().unwrap_or("?");
    format!("{}-axis ({})", name, unit.symbol())
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub config: RenderConfig,
}

impl Pipeline {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Dispatch on a textual mode ("2d" / "3d"). Anything else is an error.
    pub fn render_mode(
        &self,
        snap: &dyn DataProvider,
        mode: &str,
        vars: &[VariableSpec],
    ) -> Result<Figure> {
        let mode: DimensionMode = mode.parse()?;
        self.render(snap, mode, vars)
    }

    /// 2D: `vars` = [top, bottom]. 3D: `vars` = [variable].
    pub fn render(
        &self,
        snap: &dyn DataProvider,
        mode: DimensionMode,
        vars: &[VariableSpec],
    ) -> Result<Figure> {
        tracing::debug!(
            %mode,
            source = snap.source_id(),
            variables = ?vars.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            "render start"
        );
        match (mode, vars) {
            (DimensionMode::TwoD, [top, bottom]) => self.render_stacked(snap, top, bottom),
            (DimensionMode::ThreeD, [var]) => self.render_slices(snap, var),
            (DimensionMode::TwoD, _) => Err(RenderError::MissingVariable {
                mode: "2d",
                expected: 2,
                found: vars.len(),
            }),
            (DimensionMode::ThreeD, _) => Err(RenderError::MissingVariable {
                mode: "3d",
                expected: 1,
                found: vars.len(),
            }),
        }
    }

    /// Render, hand the figure to `consume` (typically a save), then release it
    /// whether or not `consume` succeeded.
    pub fn render_scoped<R, F>(
        &self,
        snap: &dyn DataProvider,
        mode: DimensionMode,
        vars: &[VariableSpec],
        consume: F,
    ) -> Result<R>
    where
        F: FnOnce(&Figure) -> Result<R>,
    {
        let figure = self.render(snap, mode, vars)?;
        let out = consume(&figure);
        drop(figure);
        out
    }

    /// Two 2D fields stacked vertically, each with its own colorbar.
    pub fn render_stacked(
        &self,
        snap: &dyn DataProvider,
        top: &VariableSpec,
        bottom: &VariableSpec,
    ) -> Result<Figure> {
        let cfg = &self.config;
        let frame = Frame::resolve(snap, cfg);
        let unit = cfg.length_unit;
        let (h, v) = plane_dims(2, usize::MAX);

        let upper = {
            let field = snap.reshaped_parameter(&top.name)?;
            let values = top.scale_mode.apply(extract(&field, None)?);
            let slot = PanelSlot {
                title: None,
                x_label: None,
                y_label: axis_label(v, unit),
                annotation: Some(Annotation {
                    text: top.annotation(),
                    at: (0.8, 0.92),
                    light: false,
                }),
                ..PanelSlot::default()
            };
            render_panel(values, frame.extent(h, v), frame.view(h, v), top, cfg.alpha, slot)
        };

        let lower = {
            let field = snap.reshaped_parameter(&bottom.name)?;
            let values = bottom.scale_mode.apply(extract(&field, None)?);
            let (extent, view, origin) = if cfg.mirror_lower_panel {
                (
                    frame.extent(h, v).mirrored_vertical(),
                    frame.view(h, v).mirrored_vertical(),
                    Origin::Upper,
                )
            } else {
                (frame.extent(h, v), frame.view(h, v), Origin::Lower)
            };
            let slot = PanelSlot {
                title: None,
                x_label: Some(axis_label(h, unit)),
                y_label: axis_label(v, unit),
                origin,
                annotation: Some(Annotation {
                    text: bottom.annotation(),
                    at: (0.8, 0.05),
                    light: true,
                }),
                ..PanelSlot::default()
            };
            render_panel(values, extent, view, bottom, cfg.alpha, slot)
        };

        compose_stacked(vec![upper, lower], Some(frame.title), cfg)
    }

    /// Orthogonal slices of one 3D field sharing a horizontal colorbar:
    /// fixed second array axis (left), fixed first array axis (middle), and
    /// optionally fixed last array axis at `reference_index` (right).
    pub fn render_slices(&self, snap: &dyn DataProvider, var: &VariableSpec) -> Result<Figure> {
        let cfg = &self.config;
        let frame = Frame::resolve(snap, cfg);

        let field = snap.reshaped_parameter(&var.name)?;
        if field.ndim() != 3 {
            return Err(RenderError::UnsupportedRank { rank: field.ndim() });
        }

        let mut planes = vec![
            SliceSpec::new(1, var.slice_index),
            SliceSpec::new(0, var.slice_index),
        ];
        if let Some(k) = var.reference_index {
            planes.push(SliceSpec::new(2, k));
        }

        let panels = planes
            .into_iter()
            .map(|spec| self.slice_panel(&field, spec, &frame, var))
            .collect::<Result<Vec<Panel>>>()?;
        drop(field);

        compose_slice_row(panels, Some(frame.title), cfg)
    }

    fn slice_panel(
        &self,
        field: &ndarray::ArrayD<f64>,
        spec: SliceSpec,
        frame: &Frame,
        var: &VariableSpec,
    ) -> Result<Panel> {
        let unit = self.config.length_unit;
        let (h, v) = plane_dims(3, spec.axis);
        let values = var.scale_mode.apply(extract(field, Some(spec))?);
        let slot = PanelSlot {
            x_label: Some(axis_label(h, unit)),
            y_label: axis_label(v, unit),
            ..PanelSlot::default()
        };
        Ok(render_panel(
            values,
            frame.extent(h, v),
            frame.view(h, v),
            var,
            self.config.alpha,
            slot,
        ))
    }
}
