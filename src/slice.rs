// src/slice.rs
//
// 2D cuts through rank-3 fields. Rank-2 fields pass through unchanged.

use ndarray::{Array2, ArrayD, Axis, Ix2};

use crate::error::{RenderError, Result};

/// Fixed array axis + index.
///
/// The index is signed so that a caller-supplied -1 is representable and
/// rejected instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    pub axis: usize,
    pub index: i64,
}

impl SliceSpec {
    pub fn new(axis: usize, index: i64) -> Self {
        Self { axis, index }
    }

    /// Check the spec against an array shape, returning the usable index.
    pub fn checked_index(&self, shape: &[usize]) -> Result<usize> {
        let len = *shape.get(self.axis).ok_or(RenderError::UnsupportedRank {
            rank: shape.len(),
        })?;
        if self.index < 0 || self.index as u64 >= len as u64 {
            return Err(RenderError::OutOfRangeSlice {
                axis: self.axis,
                index: self.index,
                len,
            });
        }
        Ok(self.index as usize)
    }
}

/// Produce a rank-2 array from a rank-2 or rank-3 field.
///
/// - rank 2: copy of the input (`slice` is ignored)
/// - rank 3: the plane with `slice.axis` fixed at `slice.index`; the remaining
///   two axes keep their order
pub fn extract(field: &ArrayD<f64>, slice: Option<SliceSpec>) -> Result<Array2<f64>> {
    match field.ndim() {
        2 => to_2d(field.view()),
        3 => {
            // rank 3 always needs an explicit plane
            let spec = slice.ok_or(RenderError::UnsupportedRank { rank: 3 })?;
            let i = spec.checked_index(field.shape())?;
            to_2d(field.index_axis(Axis(spec.axis), i))
        }
        rank => Err(RenderError::UnsupportedRank { rank }),
    }
}

fn to_2d(view: ndarray::ArrayViewD<'_, f64>) -> Result<Array2<f64>> {
    let v = view
        .into_dimensionality::<Ix2>()
        .map_err(|_| RenderError::UnsupportedRank { rank: 0 })?;
    Ok(v.to_owned())
}
