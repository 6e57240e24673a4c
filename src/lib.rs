// src/lib.rs

pub mod colorbar;
pub mod colormap;
pub mod config;
pub mod error;
pub mod figure;
pub mod layout;
pub mod output;
pub mod panel;
pub mod pipeline;
pub mod scale;
pub mod series;
pub mod slice;
pub mod snapshot;
pub mod synthetic;
pub mod units;
pub mod variable;

pub use error::{RenderError, Result};
