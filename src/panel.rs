// src/panel.rs
//
// One image panel: a 2D value array mapped onto a physical extent.
//
// Conventions:
// - values[[row, col]]: row is the vertical direction, col the horizontal one
// - Origin::Lower puts row 0 at the bottom of the extent (default);
//   Origin::Upper puts it at the top (used by the mirrored stacked panel)
// - colours always come from the fixed VariableSpec bounds, never from the
//   data range, so frames of a series stay comparable

use ndarray::Array2;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::colormap::ColorMapping;
use crate::error::{RenderError, Result};
use crate::figure::Fonts;
use crate::scale::count_non_finite;
use crate::units::Coords;
use crate::variable::VariableSpec;

/// Physical bounding box `(xmin, xmax, ymin, ymax)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extent {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Box spanned by physical dimensions `h` (horizontal) and `v` (vertical).
    pub fn from_bounds(min: &Coords, max: &Coords, h: usize, v: usize) -> Self {
        Self::new(min.get(h), max.get(h), min.get(v), max.get(v))
    }

    /// Reflect about y = 0.
    pub fn mirrored_vertical(self) -> Self {
        Self::new(self.xmin, self.xmax, -self.ymax, -self.ymin)
    }

    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.xmin, self.xmax, self.ymin, self.ymax)
    }

    /// Point at axes-fraction `(fx, fy)`.
    pub fn at_fraction(&self, fx: f64, fy: f64) -> (f64, f64) {
        (
            self.xmin + fx * (self.xmax - self.xmin),
            self.ymin + fy * (self.ymax - self.ymin),
        )
    }

    fn intersect(&self, other: &Extent) -> Option<Extent> {
        let x0 = self.xmin.max(other.xmin);
        let x1 = self.xmax.min(other.xmax);
        let y0 = self.ymin.max(other.ymin);
        let y1 = self.ymax.min(other.ymax);
        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Extent::new(x0, x1, y0, y1))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Lower,
    Upper,
}

/// Which side of the panel carries the vertical-axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelSide {
    #[default]
    Left,
    Right,
}

/// Text drawn inside the panel at an axes-fraction position.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub at: (f64, f64),
    /// Draw in white (for dark backgrounds).
    pub light: bool,
}

/// Where and how a panel sits in the figure: everything that is not data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelSlot {
    pub title: Option<String>,
    /// `None` hides the horizontal axis.
    pub x_label: Option<String>,
    pub y_label: String,
    pub label_side: LabelSide,
    pub origin: Origin,
    pub annotation: Option<Annotation>,
    /// Drop the outer margin on this edge so a neighbouring panel touches it.
    pub flush_top: bool,
    pub flush_bottom: bool,
}

#[derive(Debug, Clone)]
pub struct Panel {
    /// Post-transform values, exactly as handed to the renderer.
    pub values: Array2<f64>,
    /// Where the image lands, in display units.
    pub extent: Extent,
    /// Axes limits, in display units.
    pub view: Extent,
    pub mapping: ColorMapping,
    pub alpha: f64,
    pub slot: PanelSlot,
}

/// Build a panel. `values` is moved in; callers keep their own copy if needed.
pub fn render_panel(
    values: Array2<f64>,
    extent: Extent,
    view: Extent,
    var: &VariableSpec,
    alpha: f64,
    slot: PanelSlot,
) -> Panel {
    tracing::debug!(
        variable = %var.name,
        rows = values.nrows(),
        cols = values.ncols(),
        extent = ?extent.as_tuple(),
        "rendering panel"
    );
    Panel {
        values,
        extent,
        view,
        mapping: var.mapping(),
        alpha: alpha.clamp(0.0, 1.0),
        slot,
    }
}

impl Panel {
    pub fn non_finite_count(&self) -> usize {
        count_non_finite(&self.values)
    }

    /// Physical rectangle of cell `(row, col)` as `[(x0, y0), (x1, y1)]`.
    pub fn cell_rect(&self, row: usize, col: usize) -> [(f64, f64); 2] {
        let (nrows, ncols) = self.values.dim();
        let e = &self.extent;
        let dx = (e.xmax - e.xmin) / ncols as f64;
        let dy = (e.ymax - e.ymin) / nrows as f64;
        let x0 = e.xmin + col as f64 * dx;
        let y0 = match self.slot.origin {
            Origin::Lower => e.ymin + row as f64 * dy,
            Origin::Upper => e.ymax - (row + 1) as f64 * dy,
        };
        [(x0, y0), (x0 + dx, y0 + dy)]
    }

    /// Final pixel colours (alpha blended over white); `None` = unmapped.
    pub fn pixel_colors(&self) -> Array2<Option<RGBColor>> {
        let a = self.alpha;
        let blend = |c: u8| (a * c as f64 + (1.0 - a) * 255.0).round() as u8;
        self.values.mapv(|v| {
            self.mapping
                .color(v)
                .map(|RGBColor(r, g, b)| RGBColor(blend(r), blend(g), blend(b)))
        })
    }

    /// Draw onto `area` (one grid cell of the figure).
    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        fonts: &Fonts<'_>,
    ) -> Result<()> {
        let view = widen(self.view);

        let mut builder = ChartBuilder::on(area);
        builder.margin(fonts.margin);
        if self.slot.flush_top {
            builder.margin_top(0);
        }
        if self.slot.flush_bottom {
            builder.margin_bottom(0);
        }
        if let Some(title) = &self.slot.title {
            builder.caption(title, fonts.title());
        }
        let x_area = if self.slot.x_label.is_some() { fonts.label_area } else { 0 };
        builder.x_label_area_size(x_area);
        match self.slot.label_side {
            LabelSide::Left => builder.y_label_area_size(fonts.label_area),
            LabelSide::Right => builder.right_y_label_area_size(fonts.label_area),
        };
        let mut chart = builder
            .build_cartesian_2d(view.xmin..view.xmax, view.ymin..view.ymax)
            .map_err(RenderError::draw)?;

        let colors = self.pixel_colors();
        chart
            .draw_series(colors.indexed_iter().filter_map(|((row, col), c)| {
                let color = (*c)?;
                let [(x0, y0), (x1, y1)] = self.cell_rect(row, col);
                let cell = Extent::new(x0, x1, y0, y1).intersect(&view)?;
                Some(Rectangle::new(
                    [(cell.xmin, cell.ymin), (cell.xmax, cell.ymax)],
                    color.filled(),
                ))
            }))
            .map_err(RenderError::draw)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .x_labels(5)
            .y_labels(5)
            .label_style(fonts.tick())
            .axis_desc_style(fonts.label())
            .y_desc(self.slot.y_label.clone());
        match &self.slot.x_label {
            Some(xl) => {
                mesh.x_desc(xl.clone());
            }
            None => {
                mesh.disable_x_axis();
            }
        }
        mesh.draw().map_err(RenderError::draw)?;

        if let Some(note) = &self.slot.annotation {
            let pos = view.at_fraction(note.at.0, note.at.1);
            let color = if note.light { WHITE } else { BLACK };
            chart
                .draw_series(std::iter::once(Text::new(
                    note.text.clone(),
                    pos,
                    fonts.note().color(&color),
                )))
                .map_err(RenderError::draw)?;
        }
        Ok(())
    }
}

/// Give zero-width ranges some room so the chart can be built.
fn widen(e: Extent) -> Extent {
    let pad = |lo: f64, hi: f64| {
        if hi == lo {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        }
    };
    let (x0, x1) = pad(e.xmin, e.xmax);
    let (y0, y1) = pad(e.ymin, e.ymax);
    Extent::new(x0, x1, y0, y1)
}
