// src/main.rs
//
// Demo driver: renders a synthetic expanding-bubble time series through the
// pipeline and saves one image per frame.
//
// Outputs are written to `plots/` (or the directory given via `out=`):
//   plots/
//     ├── render_config.json
//     └── <img><Var><dimen>_<stamp>.png
//
// Examples:
//
//   cargo run --release -- dimen=3d var=density n=64 frames=8
//       -> two orthogonal density slices per frame with a shared colorbar
//
//   cargo run --release -- dimen=3d var=temperature slice=32 ref=40 par
//       -> three slices per frame, frames rendered in parallel
//
//   cargo run --release -- dimen=2d n=256 dpi=150 out=runs/bubble2d
//       -> density (top) and mirrored temperature (bottom) per frame
//
// Set RUST_LOG=debug to see per-panel events.

use std::env;
use std::error::Error;
use std::path::PathBuf;

use fieldplot::config::RenderConfig;
use fieldplot::figure::Figure;
use fieldplot::layout::DimensionMode;
use fieldplot::output::{image_path, prepare_dir};
use fieldplot::pipeline::Pipeline;
use fieldplot::series::{parallel_from_env, render_series};
use fieldplot::snapshot::InMemorySnapshot;
use fieldplot::synthetic::BubbleSeries;
use fieldplot::variable::VariableSpec;

fn print_usage() {
    eprintln!(
        r#"Usage:
  cargo run -- [dimen=2d|3d] [var=density|temperature]
             [n=N] [frames=N] [slice=K] [ref=K]
             [out=DIR] [img=PREFIX] [dpi=N] [config=FILE] [par]

Notes:
  - 2d renders density (top) and temperature (bottom, mirrored).
  - 3d renders one variable; slice defaults to n/2.
  - 'par' (or FIELDPLOT_PAR=1) renders frames on all cores.
"#
    );
}

fn variable_by_name(name: &str) -> Option<VariableSpec> {
    match name.to_ascii_lowercase().as_str() {
        "density" | "rho" => Some(VariableSpec::density()),
        "temperature" | "temp" => Some(VariableSpec::temperature()),
        _ => None,
    }
}

const VAR_IGNORED_2D: &str =
    "Warning: ignoring 'var=' with dimen=2d (draws density and temperature)";

/// Variables to draw per frame and the file-name base for them.
struct VariablePlan {
    vars: Vec<VariableSpec>,
    base: String,
    warning: Option<&'static str>,
}

fn plan_variables(
    mode: DimensionMode,
    var: Option<VariableSpec>,
    slice: i64,
    reference: Option<i64>,
) -> VariablePlan {
    match mode {
        DimensionMode::TwoD => VariablePlan {
            vars: vec![VariableSpec::density(), VariableSpec::temperature()],
            base: "DensityTemperature2d".to_string(),
            warning: var.is_some().then_some(VAR_IGNORED_2D),
        },
        DimensionMode::ThreeD => {
            let mut v = var.unwrap_or_else(VariableSpec::density).with_slice_index(slice);
            if let Some(k) = reference {
                v = v.with_reference_index(k);
            }
            VariablePlan {
                base: format!("{}3d", v.name),
                vars: vec![v],
                warning: None,
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let argv: Vec<String> = env::args().collect();

    let mut mode_arg = "3d".to_string();
    let mut var: Option<VariableSpec> = None;
    let mut series = BubbleSeries::default();
    let mut slice_override: Option<i64> = None;
    let mut reference: Option<i64> = None;
    let mut out_dir = PathBuf::from("plots");
    let mut img_prefix = String::new();
    let mut dpi_override: Option<u32> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut parallel = parallel_from_env();

    for arg in argv.iter().skip(1) {
        if arg == "-h" || arg == "--help" || arg == "help" {
            print_usage();
            return Ok(());
        }
        if arg == "par" {
            parallel = true;
            continue;
        }
        if let Some(v) = arg.strip_prefix("dimen=") {
            mode_arg = v.to_string();
            continue;
        }
        if let Some(v) = arg.strip_prefix("var=") {
            match variable_by_name(v) {
                Some(spec) => var = Some(spec),
                None => {
                    eprintln!("Warning: unknown variable '{v}', using density");
                    var = Some(VariableSpec::density());
                }
            }
            continue;
        }
        if let Some(v) = arg.strip_prefix("n=") {
            if let Ok(n) = v.parse::<usize>() {
                series.n = n.max(2);
            }
            continue;
        }
        if let Some(v) = arg.strip_prefix("frames=") {
            if let Ok(f) = v.parse::<usize>() {
                series.frames = f.max(1);
            }
            continue;
        }
        if let Some(v) = arg.strip_prefix("slice=") {
            slice_override = v.parse::<i64>().ok();
            continue;
        }
        if let Some(v) = arg.strip_prefix("ref=") {
            reference = v.parse::<i64>().ok();
            continue;
        }
        if let Some(v) = arg.strip_prefix("out=") {
            out_dir = PathBuf::from(v);
            continue;
        }
        if let Some(v) = arg.strip_prefix("img=") {
            img_prefix = v.to_string();
            continue;
        }
        if let Some(v) = arg.strip_prefix("dpi=") {
            dpi_override = v.parse::<u32>().ok();
            continue;
        }
        if let Some(v) = arg.strip_prefix("config=") {
            config_path = Some(PathBuf::from(v));
            continue;
        }

        eprintln!("Warning: ignoring unknown argument '{arg}'");
    }

    // Anything other than 2d/3d stops here with InvalidDimensionMode.
    let mode: DimensionMode = mode_arg.parse()?;

    let mut config = match &config_path {
        Some(p) => RenderConfig::from_json_file(p)?,
        None => RenderConfig::default(),
    };
    if let Some(dpi) = dpi_override {
        config.dpi = dpi.max(1);
    }
    let dpi = config.dpi;

    series.ndim = match mode {
        DimensionMode::TwoD => 2,
        DimensionMode::ThreeD => 3,
    };

    let slice = slice_override.unwrap_or((series.n / 2) as i64);
    let plan = plan_variables(mode, var, slice, reference);
    if let Some(w) = plan.warning {
        eprintln!("{w}");
    }
    let (vars, base) = (plan.vars, plan.base);

    prepare_dir(&out_dir)?;
    config.write_to_dir(&out_dir)?;

    tracing::info!(
        %mode,
        n = series.n,
        frames = series.frames,
        parallel,
        out = %out_dir.display(),
        "rendering series"
    );

    let snapshots: Vec<InMemorySnapshot> =
        (0..series.frames).map(|s| series.snapshot(s)).collect();
    let pipeline = Pipeline::new(config);

    let save = |_: usize, snap: &InMemorySnapshot, fig: &Figure| {
        let path = image_path(&out_dir, &img_prefix, &base, &snap.source_id);
        fig.save_png(&path, dpi)
    };
    let results = render_series(&pipeline, &snapshots, mode, &vars, save, parallel);

    let failed = results.iter().filter(|r| r.is_err()).count();
    println!(
        "Rendered {}/{} frames into {}",
        results.len() - failed,
        results.len(),
        out_dir.display()
    );
    if let Some(Err(e)) = results.into_iter().find(|r| r.is_err()) {
        return Err(Box::new(e));
    }
    Ok(())
}
