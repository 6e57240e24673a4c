// src/snapshot.rs
//
// Read-only access to one simulation time step.
//
// Conventions:
// - Arrays are returned in row-major grid order: array axis k corresponds to
//   physical dimension (ndim - 1 - k). A 3D field is indexed [z][y][x], a 2D
//   field [y][x].
// - Bounds are per physical dimension (index 0 = x) in `Coords::unit`.
//
// Parsing on-disk formats lives outside this crate; anything that can answer
// these questions can be rendered.

use std::collections::BTreeMap;

use ndarray::ArrayD;

use crate::error::{RenderError, Result};
use crate::units::{Coords, LengthUnit, SimTime, TimeUnit};

pub trait DataProvider {
    /// Lower corner of the simulation domain.
    fn xmin(&self) -> Coords;
    /// Upper corner of the simulation domain.
    fn xmax(&self) -> Coords;
    /// Lower corner of the refinement level being drawn (image extent).
    fn level_min(&self) -> Coords;
    /// Upper corner of the refinement level being drawn (image extent).
    fn level_max(&self) -> Coords;
    fn sim_time(&self) -> SimTime;
    /// Named variable reshaped to the grid, in physical units.
    fn reshaped_parameter(&self, name: &str) -> Result<ArrayD<f64>>;

    /// Identifier of the snapshot source, e.g. its file name.
    fn source_id(&self) -> &str {
        ""
    }
}

/// Snapshot held entirely in memory.
///
/// Used by the demo driver and tests; real readers implement `DataProvider`
/// directly over their own storage.
#[derive(Debug, Clone)]
pub struct InMemorySnapshot {
    pub source_id: String,
    pub xmin: Coords,
    pub xmax: Coords,
    pub level_min: Coords,
    pub level_max: Coords,
    pub time: SimTime,
    pub fields: BTreeMap<String, ArrayD<f64>>,
}

impl InMemorySnapshot {
    /// Single-level snapshot: level bounds equal the domain bounds.
    pub fn new(xmin: Coords, xmax: Coords, time: SimTime) -> Self {
        Self {
            source_id: String::new(),
            level_min: xmin.clone(),
            level_max: xmax.clone(),
            xmin,
            xmax,
            time,
            fields: BTreeMap::new(),
        }
    }

    /// Unit cube (or square) of side `side` in `unit`, starting at the origin, at t = 0 s.
    pub fn unit_box(ndim: usize, side: f64, unit: LengthUnit) -> Self {
        Self::new(
            Coords::new(vec![0.0; ndim], unit),
            Coords::new(vec![side; ndim], unit),
            SimTime::new(0.0, TimeUnit::S),
        )
    }

    pub fn with_levels(mut self, level_min: Coords, level_max: Coords) -> Self {
        self.level_min = level_min;
        self.level_max = level_max;
        self
    }

    pub fn with_source_id<S: Into<String>>(mut self, id: S) -> Self {
        self.source_id = id.into();
        self
    }

    pub fn with_time(mut self, time: SimTime) -> Self {
        self.time = time;
        self
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, data: ArrayD<f64>) {
        self.fields.insert(name.into(), data);
    }

    pub fn with_field<S: Into<String>>(mut self, name: S, data: ArrayD<f64>) -> Self {
        self.insert(name, data);
        self
    }
}

impl DataProvider for InMemorySnapshot {
    fn xmin(&self) -> Coords {
        self.xmin.clone()
    }

    fn xmax(&self) -> Coords {
        self.xmax.clone()
    }

    fn level_min(&self) -> Coords {
        self.level_min.clone()
    }

    fn level_max(&self) -> Coords {
        self.level_max.clone()
    }

    fn sim_time(&self) -> SimTime {
        self.time
    }

    fn reshaped_parameter(&self, name: &str) -> Result<ArrayD<f64>> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::UnknownVariable(name.to_string()))
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }
}
