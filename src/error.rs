// src/error.rs
//
// Crate-wide error type. Slice and dispatch failures abort the current render
// only; nothing here is retried.

use std::fmt::Display;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Slice index outside `[0, len)` along the chosen axis.
    #[error("slice index {index} out of range for axis {axis} (len {len})")]
    OutOfRangeSlice { axis: usize, index: i64, len: usize },

    #[error("invalid dimension mode '{0}' (expected 2d or 3d)")]
    InvalidDimensionMode(String),

    #[error("unsupported array rank {rank} (expected 2 or 3)")]
    UnsupportedRank { rank: usize },

    #[error("variable '{0}' not present in snapshot")]
    UnknownVariable(String),

    #[error("unknown colormap '{0}'")]
    UnknownColormap(String),

    #[error("unknown scale mode '{0}' (expected linear or log)")]
    UnknownScaleMode(String),

    #[error("{mode} layout needs {expected} variable spec(s), got {found}")]
    MissingVariable {
        mode: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("no panel with index {0}")]
    NoSuchPanel(usize),

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    /// Wrap a plotters backend error. Those are generic over the backend, so we
    /// keep only the message.
    pub fn draw<E: Display>(e: E) -> Self {
        RenderError::Draw(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
