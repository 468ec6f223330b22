// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Fracture Match Team

//! Storage layout and array I/O
//!
//! On-disk layout for object `name` under root `R`:
//!
//! - fragment `k` (input):  `R/name/subdv/{name}_subdv.{k}.npy`
//! - matrix (output):       `R/name/matching/{name}_matching_matrix.npy`
//! - pair list (output):    `R/name/matching/{name}_pair_list.csv`
//! - scatter (optional):    `R/name/matching/{name}_scatter.ply`

use anyhow::{Context, Result};
use ndarray::Array2;
use ndarray_npy::ReadNpyExt;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a fragment read failed
///
/// Absence is expected control flow during loading (end of the fragment
/// sequence), so it is a value here rather than an io error in an anyhow
/// chain.
#[derive(Debug, Error)]
pub enum ReadError {
    /// No file at the fragment path
    #[error("fragment file not found: {0:?}")]
    Missing(PathBuf),
    /// File exists but is not a readable point array (bad npy, wrong
    /// dimensionality, or fewer than 3 columns)
    #[error("unreadable fragment file {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Directory holding one object's input point clouds
pub fn subdv_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name).join("subdv")
}

/// Directory holding one object's matching outputs
pub fn matching_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name).join("matching")
}

/// Path of fragment `index` of object `name`
pub fn fragment_path(root: &Path, name: &str, index: usize) -> PathBuf {
    subdv_dir(root, name).join(format!("{name}_subdv.{index}.npy"))
}

/// Path of the persisted adjacency matrix of object `name`
pub fn matrix_path(root: &Path, name: &str) -> PathBuf {
    matching_dir(root, name).join(format!("{name}_matching_matrix.npy"))
}

/// Path of the persisted pair list of object `name`
pub fn pair_list_path(root: &Path, name: &str) -> PathBuf {
    matching_dir(root, name).join(format!("{name}_pair_list.csv"))
}

/// Path of the optional scatter export of object `name`
pub fn scatter_path(root: &Path, name: &str) -> PathBuf {
    matching_dir(root, name).join(format!("{name}_scatter.ply"))
}

/// Read one fragment's point array
///
/// Accepts f64 or f32 arrays (f32 is widened). Arrays must be 2D with at
/// least three columns.
pub fn read_fragment(path: &Path) -> std::result::Result<Array2<f64>, ReadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ReadError::Missing(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ReadError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let array = read_npy_f64(file, path).map_err(|reason| ReadError::Malformed {
        path: path.to_path_buf(),
        reason,
    })?;

    if array.ncols() < 3 {
        return Err(ReadError::Malformed {
            path: path.to_path_buf(),
            reason: format!("expected at least 3 columns, found {}", array.ncols()),
        });
    }

    Ok(array)
}

fn read_npy_f64(file: File, path: &Path) -> std::result::Result<Array2<f64>, String> {
    match Array2::<f64>::read_npy(BufReader::new(file)) {
        Ok(array) => Ok(array),
        Err(f64_err) => {
            // Retry as f32 before reporting; point clouds are often stored
            // single-precision.
            let file = File::open(path).map_err(|e| e.to_string())?;
            match Array2::<f32>::read_npy(BufReader::new(file)) {
                Ok(array) => Ok(array.mapv(f64::from)),
                Err(_) => Err(f64_err.to_string()),
            }
        }
    }
}

/// Persist the adjacency matrix as a floating-point npy array
pub fn write_matrix(path: &Path, matrix: &Array2<f64>) -> Result<()> {
    ndarray_npy::write_npy(path, matrix)
        .with_context(|| format!("Failed to write matching matrix: {path:?}"))?;
    Ok(())
}

/// Persist the pair list as comma-separated integer rows, no header
pub fn write_pair_list(path: &Path, pairs: &[(usize, usize)]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create pair list: {path:?}"))?;
    for (i, j) in pairs {
        writeln!(file, "{i},{j}").with_context(|| format!("Failed to write pair list: {path:?}"))?;
    }
    Ok(())
}
