// src/series.rs
//
// Time-series driver: run the pipeline over many snapshots.
//
// Each snapshot gets its own Figure, handed to `sink` and dropped before the
// worker moves on, so peak memory is one frame per worker. A failing frame is
// recorded and the loop continues.
//
// With `parallel = true` frames are rendered on the rayon pool. Every frame
// draws onto its own backend and RenderConfig is read-only, so frames do not
// share mutable state.

use rayon::prelude::*;

use crate::error::Result;
use crate::figure::Figure;
use crate::layout::DimensionMode;
use crate::pipeline::Pipeline;
use crate::snapshot::DataProvider;
use crate::variable::VariableSpec;

/// Outcome per snapshot, in input order.
pub fn render_series<P, F>(
    pipeline: &Pipeline,
    snapshots: &[P],
    mode: DimensionMode,
    vars: &[VariableSpec],
    sink: F,
    parallel: bool,
) -> Vec<Result<()>>
where
    P: DataProvider + Sync,
    F: Fn(usize, &P, &Figure) -> Result<()> + Sync,
{
    let one = |(i, snap): (usize, &P)| -> Result<()> {
        let out = pipeline.render_scoped(snap, mode, vars, |fig| sink(i, snap, fig));
        if let Err(e) = &out {
            tracing::warn!(frame = i, source = snap.source_id(), error = %e, "frame failed");
        }
        out
    };

    if parallel {
        snapshots.par_iter().enumerate().map(one).collect()
    } else {
        snapshots.iter().enumerate().map(one).collect()
    }
}

/// Whether parallel rendering was requested through `FIELDPLOT_PAR=1`.
pub fn parallel_from_env() -> bool {
    std::env::var("FIELDPLOT_PAR")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
