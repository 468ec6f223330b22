// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Fracture Match Team

//! Scatter export for human inspection
//!
//! Writes the loaded fragments as one ASCII PLY point cloud, color-coded by
//! fragment index. Pure export; never feeds back into matching.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::fragment::Fragment;

/// Distinct colors cycled over fragment indices
const PALETTE: [[u8; 3]; 10] = [
    [230, 25, 75],
    [60, 180, 75],
    [255, 225, 25],
    [0, 130, 200],
    [245, 130, 48],
    [145, 30, 180],
    [70, 240, 240],
    [240, 50, 230],
    [128, 128, 0],
    [0, 0, 128],
];

/// Color assigned to fragment `index`
pub fn fragment_color(index: usize) -> [u8; 3] {
    PALETTE[index % PALETTE.len()]
}

/// Write all fragments as a single colored ASCII PLY point cloud
pub fn export_scatter(fragments: &[Fragment], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create scatter: {path:?}"))?;
    let mut out = BufWriter::new(file);

    let total: usize = fragments.iter().map(Fragment::len).sum();
    writeln!(out, "ply")?;
    writeln!(out, "format ascii 1.0")?;
    writeln!(out, "element vertex {total}")?;
    writeln!(out, "property double x")?;
    writeln!(out, "property double y")?;
    writeln!(out, "property double z")?;
    writeln!(out, "property uchar red")?;
    writeln!(out, "property uchar green")?;
    writeln!(out, "property uchar blue")?;
    writeln!(out, "end_header")?;

    for (index, fragment) in fragments.iter().enumerate() {
        let [r, g, b] = fragment_color(index);
        for point in fragment.points() {
            writeln!(out, "{} {} {} {r} {g} {b}", point.x, point.y, point.z)?;
        }
    }

    out.flush()
        .with_context(|| format!("Failed to write scatter: {path:?}"))?;
    Ok(())
}
