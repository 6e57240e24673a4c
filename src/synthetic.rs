// src/synthetic.rs
//
// Generated snapshots for demos and tests.
//
// Conventions match snapshot.rs: arrays are row-major ([z][y][x] / [y][x]),
// bounds in cm, time in s.
//
// The bubble model is a hot, rarefied cavity inside a dense swept-up shell
// expanding into a uniform medium. In 2D the grid is axisymmetric: the
// horizontal axis is the symmetry axis and the vertical axis is the radius
// (starting at 0), which is what the mirrored stacked layout expects.

use ndarray::{Array3, ArrayD, IxDyn};

use crate::snapshot::InMemorySnapshot;
use crate::units::{CM_PER_PC, Coords, LengthUnit, S_PER_YR, SimTime, TimeUnit};

pub const RHO_AMBIENT: f64 = 1.0e-24; // g/cm^3
pub const RHO_CAVITY: f64 = 1.0e-26;
pub const RHO_SHELL: f64 = 4.0e-24;
pub const T_AMBIENT: f64 = 1.0e3; // K
pub const T_CAVITY: f64 = 1.0e7;
pub const T_SHELL: f64 = 1.0e4;

/// Relative shell thickness (outer radius / inner radius).
const SHELL_RATIO: f64 = 1.15;

/// Uniform cube with one voxel set to `hot_value`.
pub fn uniform_with_hot_voxel(
    shape: [usize; 3],
    background: f64,
    hot: [usize; 3],
    hot_value: f64,
) -> ArrayD<f64> {
    let mut a = Array3::from_elem((shape[0], shape[1], shape[2]), background);
    if let Some(v) = a.get_mut((hot[0], hot[1], hot[2])) {
        *v = hot_value;
    }
    a.into_dyn()
}

/// Density and temperature of a bubble of `radius` centred at `center`.
///
/// `shape` is the array shape, `side` the physical length per dimension
/// (index 0 = x), both in the same unit as `center` and `radius`.
pub fn bubble_fields(
    shape: &[usize],
    side: &[f64],
    center: &[f64],
    radius: f64,
) -> (ArrayD<f64>, ArrayD<f64>) {
    let ndim = shape.len();
    let r_shell = radius * SHELL_RATIO;

    let dist = |idx: &IxDyn| -> f64 {
        let mut d2 = 0.0;
        for k in 0..ndim {
            let dim = ndim - 1 - k;
            let dx = side[dim] / shape[k] as f64;
            let x = (idx[k] as f64 + 0.5) * dx;
            d2 += (x - center[dim]).powi(2);
        }
        d2.sqrt()
    };

    let rho = ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        let r = dist(&idx);
        if r < radius {
            RHO_CAVITY
        } else if r < r_shell {
            RHO_SHELL
        } else {
            RHO_AMBIENT
        }
    });
    let temp = ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        let r = dist(&idx);
        if r < radius {
            T_CAVITY
        } else if r < r_shell {
            T_SHELL
        } else {
            T_AMBIENT
        }
    });
    (rho, temp)
}

/// A time series of expanding-bubble snapshots.
#[derive(Debug, Clone, Copy)]
pub struct BubbleSeries {
    pub ndim: usize,
    /// Cells along the longest axis.
    pub n: usize,
    pub frames: usize,
    pub side_pc: f64,
    /// Time between frames in years.
    pub frame_dt_yr: f64,
}

impl Default for BubbleSeries {
    fn default() -> Self {
        Self {
            ndim: 3,
            n: 64,
            frames: 8,
            side_pc: 4.0,
            frame_dt_yr: 2.0e4,
        }
    }
}

impl BubbleSeries {
    /// Row-major array shape. 2D grids are half as tall as they are wide.
    pub fn shape(&self) -> Vec<usize> {
        match self.ndim {
            2 => vec![(self.n / 2).max(1), self.n],
            _ => vec![self.n; 3],
        }
    }

    /// Physical side per dimension (x first), in cm.
    pub fn side_cm(&self) -> Vec<f64> {
        let l = self.side_pc * CM_PER_PC;
        match self.ndim {
            2 => vec![l, 0.5 * l],
            _ => vec![l; 3],
        }
    }

    pub fn source_id(&self, step: usize) -> String {
        format!("bubble_d{}n{:04}.{:08}.silo", self.ndim, self.n, step)
    }

    pub fn snapshot(&self, step: usize) -> InMemorySnapshot {
        let side = self.side_cm();
        let l = side[0];
        let center: Vec<f64> = match self.ndim {
            2 => vec![0.5 * l, 0.0],
            _ => vec![0.5 * l; 3],
        };
        let frac = if self.frames > 1 {
            step as f64 / (self.frames - 1) as f64
        } else {
            0.0
        };
        let radius = l * (0.05 + 0.3 * frac);
        let (rho, temp) = bubble_fields(&self.shape(), &side, &center, radius);

        let t = SimTime::new(step as f64 * self.frame_dt_yr * S_PER_YR, TimeUnit::S);
        InMemorySnapshot::new(
            Coords::new(vec![0.0; side.len()], LengthUnit::Cm),
            Coords::new(side, LengthUnit::Cm),
            t,
        )
        .with_source_id(self.source_id(step))
        .with_field("Density", rho)
        .with_field("Temperature", temp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::DataProvider;

    #[test]
    fn hot_voxel_is_the_only_anomaly() {
        let a = uniform_with_hot_voxel([4, 5, 6], 1.0, [1, 2, 3], 9.0);
        assert_eq!(a.shape(), &[4, 5, 6]);
        assert_eq!(a[[1, 2, 3]], 9.0);
        assert_eq!(a.iter().filter(|&&v| v != 1.0).count(), 1);
    }

    #[test]
    fn bubble_centre_is_cavity_and_corner_is_ambient() {
        let series = BubbleSeries {
            n: 16,
            ..BubbleSeries::default()
        };
        let snap = series.snapshot(series.frames - 1);
        let rho = snap.reshaped_parameter("Density").unwrap();
        let temp = snap.reshaped_parameter("Temperature").unwrap();
        assert_eq!(rho[[8, 8, 8]], RHO_CAVITY);
        assert_eq!(temp[[8, 8, 8]], T_CAVITY);
        assert_eq!(rho[[0, 0, 0]], RHO_AMBIENT);
        assert!(rho.iter().any(|&v| v == RHO_SHELL));
    }

    #[test]
    fn two_d_series_is_axisymmetric_half_plane() {
        let series = BubbleSeries {
            ndim: 2,
            n: 32,
            ..BubbleSeries::default()
        };
        let snap = series.snapshot(3);
        let rho = snap.reshaped_parameter("Density").unwrap();
        assert_eq!(rho.shape(), &[16, 32]);
        // symmetry axis runs along row 0
        assert_eq!(rho[[0, 16]], RHO_CAVITY);
        assert_eq!(snap.source_id(), "bubble_d2n0032.00000003.silo");
        assert!(snap.sim_time().value > 0.0);
    }
}
