// src/variable.rs

use serde::{Deserialize, Serialize};

use crate::colormap::{ColorMapping, Colormap};
use crate::scale::ScaleMode;

/// How to render one variable.
///
/// Colour bounds are in *displayed* units: for `ScaleMode::Log` they are
/// exponents (e.g. -27..-22 for a density in g/cm^3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub color_max: f64,
    pub color_min: f64,
    #[serde(default)]
    pub colormap: Colormap,
    #[serde(default)]
    pub scale_mode: ScaleMode,
    /// Index of the fixed plane for the two main 3D slices.
    #[serde(default)]
    pub slice_index: i64,
    /// If set, a third 3D slice fixing the last array axis at this index.
    #[serde(default)]
    pub reference_index: Option<i64>,
    /// Corner annotation; defaults to `log(name)` / `name`.
    #[serde(default)]
    pub label: Option<String>,
}

impl VariableSpec {
    pub fn new<S: Into<String>>(
        name: S,
        color_max: f64,
        color_min: f64,
        colormap: Colormap,
        scale_mode: ScaleMode,
    ) -> Self {
        Self {
            name: name.into(),
            color_max,
            color_min,
            colormap,
            scale_mode,
            slice_index: 0,
            reference_index: None,
            label: None,
        }
    }

    /// Log density in g/cm^3, viridis.
    pub fn density() -> Self {
        Self::new("Density", -22.0, -27.0, Colormap::Viridis, ScaleMode::Log)
    }

    /// Log temperature in K, inferno.
    pub fn temperature() -> Self {
        Self::new("Temperature", 8.0, 3.0, Colormap::Inferno, ScaleMode::Log)
    }

    pub fn with_slice_index(mut self, index: i64) -> Self {
        self.slice_index = index;
        self
    }

    pub fn with_reference_index(mut self, index: i64) -> Self {
        self.reference_index = Some(index);
        self
    }

    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn mapping(&self) -> ColorMapping {
        ColorMapping::new(self.colormap, self.color_min, self.color_max)
    }

    pub fn annotation(&self) -> String {
        match (&self.label, self.scale_mode) {
            (Some(l), _) => l.clone(),
            (None, ScaleMode::Log) => format!("log({})", self.name),
            (None, ScaleMode::Linear) => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"name":"Density","color_max":-22.0,"color_min":-27.0,"scale_mode":"log"}"#;
        let v: VariableSpec = serde_json::from_str(json).unwrap();
        assert_eq!(v.colormap, Colormap::Viridis);
        assert_eq!(v.scale_mode, ScaleMode::Log);
        assert_eq!(v.slice_index, 0);
        assert_eq!(v.reference_index, None);
        assert_eq!(v.annotation(), "log(Density)");
    }

    #[test]
    fn mapping_uses_min_then_max() {
        let m = VariableSpec::temperature().mapping();
        assert_eq!((m.vmin, m.vmax), (3.0, 8.0));
        assert_eq!(m.colormap, Colormap::Inferno);
    }

    #[test]
    fn custom_label_replaces_the_default_annotation() {
        let v = VariableSpec::density().with_label("n_H");
        assert_eq!(v.annotation(), "n_H");
        let lin = VariableSpec::new("Pressure", 1.0, 0.0, Colormap::Plasma, ScaleMode::Linear);
        assert_eq!(lin.annotation(), "Pressure");
    }
}
