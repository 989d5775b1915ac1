//! Two-file graph export for tensor-network partition function solvers.
//!
//! - `<prefix>nodes.txt`: `<sites> <couplings>` followed by one `i j` line per
//!   non-zero coupling, in row-major order.
//! - `Jij<prefix>nodes.txt`: the dense interaction matrix, one row per line, cells
//!   printed with two decimals and separated by single spaces.
//!
//! There is no reader for this format.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;
use crate::model::IsingModel;

/// Body of the edge-list file.
pub fn pan_edges_string(model: &IsingModel) -> String {
    let mut out = String::new();
    writeln!(out, "{} {}", model.num_sites(), model.num_binary_funcs()).unwrap();
    for ((i, j), _) in model.couplings() {
        writeln!(out, "{} {}", i, j).unwrap();
    }
    out
}

/// Body of the weight-matrix file.
pub fn pan_matrix_string(model: &IsingModel) -> String {
    let mut out = String::new();
    for row in model.to_matrix() {
        let cells: Vec<String> = row.iter().map(|value| format!("{:.2}", value)).collect();
        writeln!(out, "{}", cells.join(" ")).unwrap();
    }
    out
}

/// Paths of the edge-list and weight-matrix files for `prefix` inside `dir`.
pub fn pan_paths<P: AsRef<Path>>(dir: P, prefix: &str) -> (PathBuf, PathBuf) {
    let dir = dir.as_ref();
    (
        dir.join(format!("{}nodes.txt", prefix)),
        dir.join(format!("Jij{}nodes.txt", prefix)),
    )
}

/// Writes both files of the Pan format into `dir`.
pub fn write_pan_format<P: AsRef<Path>>(model: &IsingModel, dir: P, prefix: &str) -> Result<()> {
    let (edges_path, matrix_path) = pan_paths(dir, prefix);
    fs::write(&edges_path, pan_edges_string(model))?;
    fs::write(&matrix_path, pan_matrix_string(model))?;
    debug!("Wrote {} and {}", edges_path.display(), matrix_path.display());
    Ok(())
}
