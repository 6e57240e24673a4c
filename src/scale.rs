// src/scale.rs
//
// Linear / log10 value transform applied after slicing.
//
// Non-positive inputs under `Log` become NaN or -inf and are drawn as unmapped
// pixels. No masking or clipping happens here.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    #[default]
    Linear,
    Log,
}

impl ScaleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleMode::Linear => "linear",
            ScaleMode::Log => "log",
        }
    }

    /// Transform in place and return the array.
    pub fn apply(self, mut data: Array2<f64>) -> Array2<f64> {
        if self == ScaleMode::Log {
            data.mapv_inplace(f64::log10);
        }
        data
    }
}

impl FromStr for ScaleMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" | "lin" => Ok(ScaleMode::Linear),
            "log" | "log10" => Ok(ScaleMode::Log),
            _ => Err(RenderError::UnknownScaleMode(s.to_string())),
        }
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of NaN / infinite entries.
pub fn count_non_finite(data: &Array2<f64>) -> usize {
    data.iter().filter(|v| !v.is_finite()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn linear_is_bit_identical() {
        let a = array![[1.5e-23, -0.0], [f64::MIN_POSITIVE, 7.25]];
        let out = ScaleMode::Linear.apply(a.clone());
        for (x, y) in a.iter().zip(out.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn log_of_non_positive_is_non_finite() {
        let a = array![[100.0, 0.0], [-3.0, 1.0]];
        let out = ScaleMode::Log.apply(a);
        assert!((out[[0, 0]] - 2.0).abs() < 1e-12);
        assert_eq!(out[[0, 1]], f64::NEG_INFINITY);
        assert!(out[[1, 0]].is_nan());
        assert_eq!(out[[1, 1]], 0.0);
        assert_eq!(count_non_finite(&out), 2);
    }

    #[test]
    fn parse_modes() {
        assert_eq!("log".parse::<ScaleMode>().unwrap(), ScaleMode::Log);
        assert_eq!("Linear".parse::<ScaleMode>().unwrap(), ScaleMode::Linear);
        assert!(matches!(
            "y".parse::<ScaleMode>(),
            Err(RenderError::UnknownScaleMode(_))
        ));
    }
}
