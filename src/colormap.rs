// src/colormap.rs
//
// Named colormaps and fixed-bound value normalisation.
//
// Maps are piecewise-linear over evenly spaced anchor colours. The perceptual
// maps (viridis, inferno, plasma, magma) use 9 anchors sampled from the
// matplotlib tables, which is plenty for cell-per-rectangle heatmaps.

use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

const INFERNO: [(u8, u8, u8); 9] = [
    (0, 0, 4),
    (31, 12, 72),
    (85, 15, 109),
    (136, 34, 106),
    (186, 54, 85),
    (227, 89, 51),
    (249, 140, 10),
    (249, 201, 50),
    (252, 255, 164),
];

const PLASMA: [(u8, u8, u8); 9] = [
    (13, 8, 135),
    (65, 4, 157),
    (106, 0, 168),
    (143, 13, 164),
    (177, 42, 144),
    (204, 71, 120),
    (225, 100, 98),
    (246, 148, 65),
    (240, 249, 33),
];

const MAGMA: [(u8, u8, u8); 9] = [
    (0, 0, 4),
    (28, 16, 68),
    (79, 18, 123),
    (129, 37, 129),
    (181, 54, 122),
    (229, 80, 100),
    (251, 135, 97),
    (254, 194, 135),
    (252, 253, 191),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Viridis,
    Inferno,
    Plasma,
    Magma,
    Gray,
    Jet,
    /// Blue (low) - white (mid) - red (high).
    Coolwarm,
}

impl Colormap {
    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Viridis => "viridis",
            Colormap::Inferno => "inferno",
            Colormap::Plasma => "plasma",
            Colormap::Magma => "magma",
            Colormap::Gray => "gray",
            Colormap::Jet => "jet",
            Colormap::Coolwarm => "coolwarm",
        }
    }

    /// Colour at `t` in [0, 1] (clamped).
    pub fn at(&self, t: f64) -> RGBColor {
        let t = t.clamp(0.0, 1.0);
        match self {
            Colormap::Viridis => lerp_table(&VIRIDIS, t),
            Colormap::Inferno => lerp_table(&INFERNO, t),
            Colormap::Plasma => lerp_table(&PLASMA, t),
            Colormap::Magma => lerp_table(&MAGMA, t),
            Colormap::Gray => {
                let g = (255.0 * t).round() as u8;
                RGBColor(g, g, g)
            }
            Colormap::Jet => {
                let four_t = 4.0 * t;
                let r = (four_t - 1.5).clamp(0.0, 1.0);
                let g = (1.5 - (four_t - 2.0).abs()).clamp(0.0, 1.0);
                let b = (1.5 - (four_t - 3.5)).clamp(0.0, 1.0);
                RGBColor((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
            }
            Colormap::Coolwarm => {
                // x=0 -> blue, x=0.5 -> white, x=1 -> red
                let r = (255.0 * (2.0 * t).min(1.0)) as u8;
                let b = (255.0 * (2.0 * (1.0 - t)).min(1.0)) as u8;
                let g = (255.0 * (1.0 - 2.0 * (t - 0.5).abs())).clamp(0.0, 255.0) as u8;
                RGBColor(r, g, b)
            }
        }
    }
}

fn lerp_table(table: &[(u8, u8, u8)], t: f64) -> RGBColor {
    let n = table.len() - 1;
    let x = t * n as f64;
    let i = (x.floor() as usize).min(n - 1);
    let f = x - i as f64;
    let (a, b) = (table[i], table[i + 1]);
    let mix = |p: u8, q: u8| (p as f64 + (q as f64 - p as f64) * f).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

impl FromStr for Colormap {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "viridis" => Ok(Colormap::Viridis),
            "inferno" => Ok(Colormap::Inferno),
            "plasma" => Ok(Colormap::Plasma),
            "magma" => Ok(Colormap::Magma),
            "gray" | "grey" | "greys_r" => Ok(Colormap::Gray),
            "jet" => Ok(Colormap::Jet),
            "coolwarm" | "bwr" => Ok(Colormap::Coolwarm),
            _ => Err(RenderError::UnknownColormap(s.to_string())),
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Colormap plus the fixed value range it spans.
///
/// `vmin > vmax` gives an inverted mapping and `vmin == vmax` maps every finite
/// value to the low end; neither is an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMapping {
    pub colormap: Colormap,
    pub vmin: f64,
    pub vmax: f64,
}

impl ColorMapping {
    pub fn new(colormap: Colormap, vmin: f64, vmax: f64) -> Self {
        Self {
            colormap,
            vmin,
            vmax,
        }
    }

    /// Position of `v` in [0, 1], or `None` for NaN / infinite values.
    pub fn normalize(&self, v: f64) -> Option<f64> {
        if !v.is_finite() {
            return None;
        }
        let span = self.vmax - self.vmin;
        if span == 0.0 || !span.is_finite() {
            return Some(0.0);
        }
        Some(((v - self.vmin) / span).clamp(0.0, 1.0))
    }

    pub fn color(&self, v: f64) -> Option<RGBColor> {
        self.normalize(v).map(|t| self.colormap.at(t))
    }
}
