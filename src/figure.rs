// src/figure.rs
//
// Composed output of one render call: panels and colorbars on a grid.
//
// A Figure owns every array it draws. Dropping it (or letting
// `Pipeline::render_scoped` drop it) releases all of them; there is no global
// plotting state to clear between frames.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::colorbar::Colorbar;
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::layout::{GridSlot, Inset, LayoutKind};
use crate::panel::Panel;

/// Fraction of a cell width given to a side colorbar (incl. padding).
pub const SIDE_STRIP_FRAC: f64 = 0.12;

/// Font set derived from a RenderConfig at a given dpi.
#[derive(Debug, Clone, Copy)]
pub struct Fonts<'a> {
    pub family: &'a str,
    pub bold: bool,
    pub base_px: f64,
    pub margin: u32,
    pub label_area: u32,
}

impl<'a> Fonts<'a> {
    pub fn from_config(cfg: &'a RenderConfig, dpi: u32) -> Self {
        let base_px = cfg.font_px(dpi, 1.0);
        Self {
            family: cfg.font_family.as_str(),
            bold: cfg.bold,
            base_px,
            margin: (0.5 * base_px).round() as u32,
            label_area: (3.5 * base_px).round() as u32,
        }
    }

    fn font(&self, rel: f64) -> FontDesc<'a> {
        let f = (self.family, self.base_px * rel).into_font();
        if self.bold {
            f.style(FontStyle::Bold)
        } else {
            f
        }
    }

    pub fn title(&self) -> FontDesc<'a> {
        self.font(1.0)
    }

    pub fn label(&self) -> FontDesc<'a> {
        self.font(1.0)
    }

    pub fn tick(&self) -> FontDesc<'a> {
        self.font(0.85)
    }

    pub fn note(&self) -> FontDesc<'a> {
        self.font(1.0)
    }
}

/// Pixel rectangle `(x, y, w, h)` with y growing downwards.
pub type PixelRect = (i32, i32, i32, i32);

#[derive(Debug)]
pub struct Figure {
    pub kind: LayoutKind,
    /// Relative row heights, top to bottom.
    pub row_heights: Vec<f64>,
    pub cols: usize,
    pub panels: Vec<Panel>,
    pub panel_slots: Vec<GridSlot>,
    pub colorbars: Vec<Colorbar>,
    pub colorbar_slots: Vec<GridSlot>,
    pub config: RenderConfig,
}

impl Figure {
    pub fn rows(&self) -> usize {
        self.row_heights.len()
    }

    /// Pixel rectangle of `slot` on a canvas of `size`.
    pub fn slot_rect(&self, slot: &GridSlot, size: (u32, u32)) -> PixelRect {
        let (w, h) = (size.0 as f64, size.1 as f64);
        let total: f64 = self.row_heights.iter().sum();
        let total = if total > 0.0 { total } else { 1.0 };
        let above: f64 = self.row_heights[..slot.row].iter().sum();
        let y0 = h * above / total;
        let y1 = h * (above + self.row_heights[slot.row]) / total;

        let cols = self.cols.max(1) as f64;
        let x0 = w * slot.col as f64 / cols;
        let x1 = w * (slot.col + slot.col_span) as f64 / cols;

        let strip = (x1 - x0) * SIDE_STRIP_FRAC;
        let (x0, x1) = match slot.inset {
            Inset::Full => (x0, x1),
            Inset::Main => (x0, x1 - strip),
            Inset::SideStrip => (x1 - strip, x1),
        };
        (
            x0.round() as i32,
            y0.round() as i32,
            (x1 - x0).round() as i32,
            (y1 - y0).round() as i32,
        )
    }

    /// Draw everything onto `root` (cleared to white first).
    pub fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, dpi: u32) -> Result<()> {
        root.fill(&WHITE).map_err(RenderError::draw)?;
        let size = root.dim_in_pixel();
        let fonts = Fonts::from_config(&self.config, dpi);

        for (panel, slot) in self.panels.iter().zip(&self.panel_slots) {
            panel.draw(&sub_area(root, self.slot_rect(slot, size)), &fonts)?;
        }
        for (cb, slot) in self.colorbars.iter().zip(&self.colorbar_slots) {
            cb.draw(&sub_area(root, self.slot_rect(slot, size)), &fonts)?;
        }
        Ok(())
    }

    /// Render into an in-memory RGB buffer (row-major, 3 bytes per pixel).
    pub fn to_rgb_buffer(&self, dpi: u32) -> Result<(u32, u32, Vec<u8>)> {
        let (w, h) = self.config.pixel_size(dpi);
        let mut buf = vec![0u8; (w as usize) * (h as usize) * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
            self.draw(&root, dpi)?;
            root.present().map_err(RenderError::draw)?;
        }
        Ok((w, h, buf))
    }

    /// Save as an image; the format follows the file extension (png by default).
    pub fn save_png(&self, path: &Path, dpi: u32) -> Result<()> {
        let size = self.config.pixel_size(dpi);
        let root = BitMapBackend::new(path, size).into_drawing_area();
        self.draw(&root, dpi)?;
        root.present().map_err(RenderError::draw)?;
        tracing::info!(
            path = %path.display(),
            dpi,
            width = size.0,
            height = size.1,
            "saved figure"
        );
        Ok(())
    }
}

fn sub_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    (x, y, w, h): PixelRect,
) -> DrawingArea<DB, Shift> {
    root.clone().shrink((x, y), (w.max(1), h.max(1)))
}
