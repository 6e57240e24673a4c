// src/output.rs
//
// Output naming for saved frames.
//
// Images are written as `<prefix><base>_<stamp>.png`, where `<stamp>` is the
// step fragment of the snapshot's source id (the text between its last two
// dots, e.g. `run.00001234.silo` -> `00001234`).

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Keep file-name-safe characters, replace the rest with `_`.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Step fragment of a source id.
///
/// Only the file name is considered. Ids without two dots fall back to the
/// whole (sanitised) file name.
pub fn stamp(source_id: &str) -> String {
    let name = source_id
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source_id);

    let mut parts = name.rsplitn(3, '.');
    let _ext = parts.next();
    match (parts.next(), parts.next()) {
        (Some(step), Some(_)) if !step.is_empty() => sanitize(step),
        _ => sanitize(name),
    }
}

/// `<prefix><base>_<stamp>.png`, relative to `dir`.
pub fn image_path(dir: &Path, prefix: &str, base: &str, source_id: &str) -> PathBuf {
    dir.join(format!("{}{}_{}.png", prefix, base, stamp(source_id)))
}

/// Create `dir` (and parents) if missing.
pub fn prepare_dir(dir: &Path) -> Result<()> {
    create_dir_all(dir)?;
    Ok(())
}
