// src/units.rs
//
// Length and time units for snapshot metadata.
//
// Snapshots report bounds in their own length unit (cgs codes use cm). All
// extents inside one figure are converted to a single display unit before any
// panel is composed.

use serde::{Deserialize, Serialize};

pub const CM_PER_M: f64 = 1.0e2;
pub const CM_PER_KM: f64 = 1.0e5;
pub const CM_PER_AU: f64 = 1.495_978_707e13;
pub const CM_PER_PC: f64 = 3.085_677_581_491_367_3e18;
pub const CM_PER_KPC: f64 = 1.0e3 * CM_PER_PC;

/// Julian year in seconds.
pub const S_PER_YR: f64 = 3.155_76e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Cm,
    M,
    Km,
    Au,
    Pc,
    Kpc,
}

impl LengthUnit {
    fn cm_per_unit(self) -> f64 {
        match self {
            LengthUnit::Cm => 1.0,
            LengthUnit::M => CM_PER_M,
            LengthUnit::Km => CM_PER_KM,
            LengthUnit::Au => CM_PER_AU,
            LengthUnit::Pc => CM_PER_PC,
            LengthUnit::Kpc => CM_PER_KPC,
        }
    }

    /// Multiplicative factor taking a value in `self` to `to`.
    pub fn factor_to(self, to: LengthUnit) -> f64 {
        if self == to {
            1.0
        } else {
            self.cm_per_unit() / to.cm_per_unit()
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
            LengthUnit::Km => "km",
            LengthUnit::Au => "au",
            LengthUnit::Pc => "pc",
            LengthUnit::Kpc => "kpc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    S,
    Yr,
    Kyr,
    Myr,
}

impl TimeUnit {
    fn s_per_unit(self) -> f64 {
        match self {
            TimeUnit::S => 1.0,
            TimeUnit::Yr => S_PER_YR,
            TimeUnit::Kyr => 1.0e3 * S_PER_YR,
            TimeUnit::Myr => 1.0e6 * S_PER_YR,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::S => "s",
            TimeUnit::Yr => "yr",
            TimeUnit::Kyr => "kyr",
            TimeUnit::Myr => "Myr",
        }
    }
}

/// Per-axis coordinates (one value per spatial dimension) tagged with a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub values: Vec<f64>,
    pub unit: LengthUnit,
}

impl Coords {
    pub fn new(values: Vec<f64>, unit: LengthUnit) -> Self {
        Self { values, unit }
    }

    pub fn to(&self, unit: LengthUnit) -> Coords {
        let f = self.unit.factor_to(unit);
        Coords {
            values: self.values.iter().map(|v| v * f).collect(),
            unit,
        }
    }

    pub fn ndim(&self) -> usize {
        self.values.len()
    }

    /// Value along physical dimension `dim` (0 = x). Missing dimensions read as 0.
    #[inline]
    pub fn get(&self, dim: usize) -> f64 {
        self.values.get(dim).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    pub value: f64,
    pub unit: TimeUnit,
}

impl SimTime {
    pub fn new(value: f64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    pub fn to(self, unit: TimeUnit) -> SimTime {
        SimTime {
            value: self.value * self.unit.s_per_unit() / unit.s_per_unit(),
            unit,
        }
    }
}
