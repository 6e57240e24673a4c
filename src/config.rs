// src/config.rs
//
// Styling for one render call. Passed explicitly into the pipeline; nothing
// here is process-wide, so independent pipelines can run side by side.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::units::{LengthUnit, TimeUnit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub font_family: String,
    /// Base font size in points (scaled by dpi / 72 when drawing).
    pub font_size_pt: f64,
    pub bold: bool,
    /// Canvas size in inches (width, height).
    pub figure_size_in: (f64, f64),
    pub dpi: u32,

    /// Unit for every coordinate extent in a figure.
    pub length_unit: LengthUnit,
    /// Unit for the title timestamp.
    pub time_unit: TimeUnit,

    /// Image opacity over a white background.
    pub alpha: f64,

    /// Tick spacing for per-panel colorbars in the stacked layout.
    pub colorbar_tick_step: Option<f64>,
    /// Decimals on colorbar tick labels.
    pub tick_precision: usize,

    /// Reflect the lower panel of the stacked layout about y = 0.
    pub mirror_lower_panel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size_pt: 12.0,
            bold: true,
            figure_size_in: (6.4, 4.8),
            dpi: 300,
            length_unit: LengthUnit::Pc,
            time_unit: TimeUnit::Myr,
            alpha: 1.0,
            colorbar_tick_step: Some(1.0),
            tick_precision: 2,
            mirror_lower_panel: true,
        }
    }
}

impl RenderConfig {
    /// Canvas size in pixels at `dpi`.
    pub fn pixel_size(&self, dpi: u32) -> (u32, u32) {
        let (w, h) = self.figure_size_in;
        (
            (w * dpi as f64).round().max(1.0) as u32,
            (h * dpi as f64).round().max(1.0) as u32,
        )
    }

    /// Font size in pixels at `dpi`, scaled by `rel` (1.0 = base size).
    pub fn font_px(&self, dpi: u32, rel: f64) -> f64 {
        self.font_size_pt * rel * dpi as f64 / 72.0
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn write_to_dir(&self, out_dir: &Path) -> Result<()> {
        let path = out_dir.join("render_config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_canvas_at_300_dpi() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.pixel_size(300), (1920, 1440));
        assert!((cfg.font_px(72, 1.0) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: RenderConfig =
            serde_json::from_str(r#"{"length_unit":"au","alpha":0.5}"#).unwrap();
        assert_eq!(cfg.length_unit, LengthUnit::Au);
        assert_eq!(cfg.alpha, 0.5);
        assert_eq!(cfg.dpi, 300);
        assert!(cfg.mirror_lower_panel);
    }

    #[test]
    fn written_config_reads_back() {
        let dir = std::env::temp_dir().join(format!("fieldplot_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let cfg = RenderConfig {
            dpi: 150,
            ..RenderConfig::default()
        };
        cfg.write_to_dir(&dir).unwrap();
        let back = RenderConfig::from_json_file(&dir.join("render_config.json")).unwrap();
        assert_eq!(back.dpi, 150);
        assert_eq!(back.length_unit, cfg.length_unit);
        assert_eq!(back.colorbar_tick_step, Some(1.0));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
