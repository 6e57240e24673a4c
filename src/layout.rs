// src/layout.rs
//
// Grid composition for the two figure variants:
//
//   Stacked (2D fields)           SliceRow (3D slices)
//   +-------------------+--+      +---------+---------+---------+
//   | panel 0 (title)   |cb|      | panel 0 | panel 1 | panel 2 |
//   +-------------------+--+      +---------+---------+---------+
//   | panel 1           |cb|      |     shared horizontal cb    |
//   +-------------------+--+      +-----------------------------+
//
// Label convention: the first panel of a row keeps its vertical labels on the
// left, later panels on the same row move them to the right.

use std::fmt;
use std::str::FromStr;

use crate::colorbar::{Orientation, Ticks, link_colorbar};
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::figure::Figure;
use crate::panel::{LabelSide, Panel};

/// Relative height of the colorbar row under a slice row.
pub const COLORBAR_ROW_HEIGHT: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionMode {
    TwoD,
    ThreeD,
}

impl FromStr for DimensionMode {
    type Err = RenderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "2d" | "2D" => Ok(DimensionMode::TwoD),
            "3d" | "3D" => Ok(DimensionMode::ThreeD),
            _ => Err(RenderError::InvalidDimensionMode(s.to_string())),
        }
    }
}

impl fmt::Display for DimensionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionMode::TwoD => f.write_str("2d"),
            DimensionMode::ThreeD => f.write_str("3d"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Stacked,
    SliceRow,
}

/// Part of a grid cell an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inset {
    Full,
    /// Cell minus a strip on the right.
    Main,
    /// The strip on the right.
    SideStrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot {
    pub row: usize,
    pub col: usize,
    pub col_span: usize,
    pub inset: Inset,
}

impl GridSlot {
    pub fn cell(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            col_span: 1,
            inset: Inset::Full,
        }
    }
}

/// Label side for the panel in column `col` of a row.
pub fn label_side_for(col: usize) -> LabelSide {
    if col == 0 {
        LabelSide::Left
    } else {
        LabelSide::Right
    }
}

/// Keep the title on the first panel only.
fn place_title(panels: &mut [Panel], title: Option<String>) {
    for (i, p) in panels.iter_mut().enumerate() {
        p.slot.title = if i == 0 { title.clone() } else { None };
    }
}

/// Panels top to bottom, zero spacing, one colorbar per panel on its right.
pub fn compose_stacked(
    mut panels: Vec<Panel>,
    title: Option<String>,
    config: &RenderConfig,
) -> Result<Figure> {
    place_title(&mut panels, title);
    let ticks = Ticks {
        step: config.colorbar_tick_step,
        precision: config.tick_precision,
    };

    let mut panel_slots = Vec::with_capacity(panels.len());
    let mut colorbars = Vec::with_capacity(panels.len());
    let mut colorbar_slots = Vec::with_capacity(panels.len());
    let last = panels.len().saturating_sub(1);
    for row in 0..panels.len() {
        panels[row].slot.label_side = label_side_for(0);
        panels[row].slot.flush_top = row > 0;
        panels[row].slot.flush_bottom = row < last;
        panel_slots.push(GridSlot {
            inset: Inset::Main,
            ..GridSlot::cell(row, 0)
        });
        colorbars.push(link_colorbar(&panels, row, &[], Orientation::Vertical, ticks)?);
        colorbar_slots.push(GridSlot {
            inset: Inset::SideStrip,
            ..GridSlot::cell(row, 0)
        });
    }

    Ok(Figure {
        kind: LayoutKind::Stacked,
        row_heights: vec![1.0; panels.len()],
        cols: 1,
        panels,
        panel_slots,
        colorbars,
        colorbar_slots,
        config: config.clone(),
    })
}

/// Panels side by side on the top row, one shared horizontal colorbar
/// spanning the bottom row, taking its scale from the first panel.
pub fn compose_slice_row(
    mut panels: Vec<Panel>,
    title: Option<String>,
    config: &RenderConfig,
) -> Result<Figure> {
    if panels.is_empty() {
        return Err(RenderError::NoSuchPanel(0));
    }
    place_title(&mut panels, title);
    let cols = panels.len();

    let mut panel_slots = Vec::with_capacity(cols);
    for (col, p) in panels.iter_mut().enumerate() {
        p.slot.label_side = label_side_for(col);
        panel_slots.push(GridSlot::cell(0, col));
    }

    let others: Vec<usize> = (1..cols).collect();
    let ticks = Ticks {
        step: None,
        precision: config.tick_precision,
    };
    let shared = link_colorbar(&panels, 0, &others, Orientation::Horizontal, ticks)?;
    let cb_slot = GridSlot {
        col_span: cols,
        ..GridSlot::cell(1, 0)
    };

    Ok(Figure {
        kind: LayoutKind::SliceRow,
        row_heights: vec![1.0, COLORBAR_ROW_HEIGHT],
        cols,
        panels,
        panel_slots,
        colorbars: vec![shared],
        colorbar_slots: vec![cb_slot],
        config: config.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Extent, PanelSlot, render_panel};
    use crate::variable::VariableSpec;
    use ndarray::Array2;

    fn panels(n: usize) -> Vec<Panel> {
        let e = Extent::new(0.0, 1.0, 0.0, 1.0);
        let var = VariableSpec::density();
        (0..n)
            .map(|i| {
                render_panel(
                    Array2::zeros((2, 2)),
                    e,
                    e,
                    &var,
                    1.0,
                    PanelSlot {
                        title: Some(format!("stale {i}")),
                        ..PanelSlot::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn dimension_mode_parsing() {
        assert_eq!("2d".parse::<DimensionMode>().unwrap(), DimensionMode::TwoD);
        assert_eq!("3D".parse::<DimensionMode>().unwrap(), DimensionMode::ThreeD);
        for bad in ["1d", "3", "", "2d "] {
            assert!(matches!(
                bad.parse::<DimensionMode>(),
                Err(RenderError::InvalidDimensionMode(_))
            ));
        }
    }

    #[test]
    fn stacked_has_one_colorbar_per_panel() {
        let fig = compose_stacked(panels(2), Some("t".into()), &RenderConfig::default()).unwrap();
        assert_eq!(fig.kind, LayoutKind::Stacked);
        assert_eq!(fig.rows(), 2);
        assert_eq!(fig.colorbars.len(), 2);
        for (i, cb) in fig.colorbars.iter().enumerate() {
            assert_eq!(cb.source, i);
            assert_eq!(cb.linked, vec![i]);
            assert_eq!(cb.orientation, Orientation::Vertical);
            assert_eq!(fig.colorbar_slots[i].inset, Inset::SideStrip);
            assert_eq!(fig.panel_slots[i].row, i);
        }
        assert_eq!(fig.panels[0].slot.title.as_deref(), Some("t"));
        assert_eq!(fig.panels[1].slot.title, None);

        // zero spacing where the panels meet, outer edges keep their margin
        let edges: Vec<_> = fig
            .panels
            .iter()
            .map(|p| (p.slot.flush_top, p.slot.flush_bottom))
            .collect();
        assert_eq!(edges, vec![(false, true), (true, false)]);
    }

    #[test]
    fn slice_row_shares_one_spanning_colorbar() {
        let fig = compose_slice_row(panels(3), None, &RenderConfig::default()).unwrap();
        assert_eq!(fig.rows(), 2);
        assert_eq!(fig.cols, 3);
        assert_eq!(fig.colorbars.len(), 1);
        let cb = &fig.colorbars[0];
        assert_eq!(cb.source, 0);
        assert_eq!(cb.linked, vec![0, 1, 2]);
        assert_eq!(cb.orientation, Orientation::Horizontal);
        assert!(cb.agrees_with(&fig.panels));
        let spanning = GridSlot {
            row: 1,
            col: 0,
            col_span: 3,
            inset: Inset::Full,
        };
        assert_eq!(fig.colorbar_slots[0], spanning);

        let sides: Vec<_> = fig.panels.iter().map(|p| p.slot.label_side).collect();
        assert_eq!(sides, vec![LabelSide::Left, LabelSide::Right, LabelSide::Right]);
        assert!(fig.panels.iter().all(|p| p.slot.title.is_none()));
        assert!(fig.panels.iter().all(|p| !p.slot.flush_top && !p.slot.flush_bottom));
    }

    #[test]
    fn slot_rects_tile_the_canvas() {
        let fig = compose_slice_row(panels(2), None, &RenderConfig::default()).unwrap();
        let size = (1000, 575);
        let top_left = fig.slot_rect(&fig.panel_slots[0], size);
        let top_right = fig.slot_rect(&fig.panel_slots[1], size);
        let bottom = fig.slot_rect(&fig.colorbar_slots[0], size);
        assert_eq!(top_left, (0, 0, 500, 500));
        assert_eq!(top_right, (500, 0, 500, 500));
        assert_eq!(bottom, (0, 500, 1000, 75));

        let stacked = compose_stacked(panels(2), None, &RenderConfig::default()).unwrap();
        let main = stacked.slot_rect(&stacked.panel_slots[1], (1000, 800));
        let strip = stacked.slot_rect(&stacked.colorbar_slots[1], (1000, 800));
        assert_eq!(main, (0, 400, 880, 400));
        assert_eq!(strip, (880, 400, 120, 400));
    }

    #[test]
    fn empty_slice_row_rejected() {
        assert!(compose_slice_row(Vec::new(), None, &RenderConfig::default()).is_err());
    }
}
