// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Fracture Match Team

//! End-to-end matching pipeline tests over on-disk fixtures

use anyhow::Result;
use approx::assert_abs_diff_eq;
use ndarray::Array2;
use std::path::Path;
use tempfile::tempdir;

use fracture_match::pipeline::{discover_objects, process_batch, process_object};
use fracture_match::{storage, MatchConfig, ObjectOutcome};

fn write_fragment(root: &Path, name: &str, index: usize, points: &[[f64; 3]]) {
    let path = storage::fragment_path(root, name, index);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let array = Array2::from_shape_vec(
        (points.len(), 3),
        points.iter().flatten().copied().collect(),
    )
    .unwrap();
    ndarray_npy::write_npy(&path, &array).unwrap();
}

fn config_at(root: &Path) -> MatchConfig {
    MatchConfig {
        data_root: root.to_path_buf(),
        ..MatchConfig::default()
    }
}

/// Four fragments: 0 and 1 share 150 near-coincident points, every other
/// pair shares 10, threshold 100. Only (0, 1) must come out adjacent.
fn write_cube_4(root: &Path) {
    let shared: Vec<[f64; 3]> = (0..150).map(|k| [k as f64, 0.0, 0.0]).collect();

    let mut frag0 = shared.clone();
    frag0.extend((0..50).map(|k| [k as f64, 500.0, 0.0]));
    write_fragment(root, "cube_4", 0, &frag0);

    // Same surface points, jittered well inside the 1e-3 proximity threshold.
    let mut frag1: Vec<[f64; 3]> = shared.iter().map(|p| [p[0], p[1], p[2] + 5e-4]).collect();
    frag1.extend((0..40).map(|k| [k as f64, -500.0, 0.0]));
    write_fragment(root, "cube_4", 1, &frag1);

    // Fragments 2 and 3 touch the shared surface at only 10 points each.
    let mut frag2: Vec<[f64; 3]> = shared[..10].to_vec();
    frag2.extend((0..60).map(|k| [k as f64, 0.0, 700.0]));
    write_fragment(root, "cube_4", 2, &frag2);

    let mut frag3: Vec<[f64; 3]> = shared[..10].iter().map(|p| [p[0], p[1], p[2] - 4e-4]).collect();
    frag3.extend((0..60).map(|k| [k as f64, 0.0, -700.0]));
    write_fragment(root, "cube_4", 3, &frag3);
}

#[test]
fn test_cube_4_end_to_end() -> Result<()> {
    let dir = tempdir()?;
    write_cube_4(dir.path());

    let outcome = process_object(&config_at(dir.path()), "cube_4")?;
    assert_eq!(
        outcome,
        ObjectOutcome::Completed {
            num_parts: 4,
            adjacent_pairs: 1,
            limit_reached: false,
        }
    );

    let matrix: Array2<f64> =
        ndarray_npy::read_npy(storage::matrix_path(dir.path(), "cube_4"))?;
    assert_eq!(matrix.shape(), &[4, 4]);
    assert_eq!(matrix[[0, 1]], 1.0);
    assert_eq!(matrix[[1, 0]], 1.0);
    assert_abs_diff_eq!(matrix.sum(), 2.0);

    let csv = std::fs::read_to_string(storage::pair_list_path(dir.path(), "cube_4"))?;
    assert_eq!(csv, "0,1\n1,0\n");
    Ok(())
}

#[test]
fn test_missing_index_zero_skips_object() -> Result<()> {
    let dir = tempdir()?;
    std::fs::create_dir_all(dir.path().join("hollow").join("subdv"))?;

    let outcome = process_object(&config_at(dir.path()), "hollow")?;
    assert_eq!(outcome, ObjectOutcome::Skipped);
    assert!(!storage::matrix_path(dir.path(), "hollow").exists());
    assert!(!storage::pair_list_path(dir.path(), "hollow").exists());
    Ok(())
}

#[test]
fn test_gapless_sequence_truncates_at_cap() -> Result<()> {
    let dir = tempdir()?;
    for index in 0..8 {
        // Far apart, nothing matches.
        write_fragment(
            dir.path(),
            "dense",
            index,
            &[[index as f64 * 100.0, 0.0, 0.0]],
        );
    }
    let config = MatchConfig {
        max_fragments: 5,
        ..config_at(dir.path())
    };

    let outcome = process_object(&config, "dense")?;
    assert_eq!(
        outcome,
        ObjectOutcome::Completed {
            num_parts: 5,
            adjacent_pairs: 0,
            limit_reached: true,
        }
    );

    let matrix: Array2<f64> = ndarray_npy::read_npy(storage::matrix_path(dir.path(), "dense"))?;
    assert_eq!(matrix.shape(), &[5, 5]);
    assert_abs_diff_eq!(matrix.sum(), 0.0);
    Ok(())
}

#[test]
fn test_lone_fragment_object() -> Result<()> {
    let dir = tempdir()?;
    write_fragment(dir.path(), "lone", 0, &[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);

    let outcome = process_object(&config_at(dir.path()), "lone")?;
    assert_eq!(
        outcome,
        ObjectOutcome::Completed {
            num_parts: 1,
            adjacent_pairs: 0,
            limit_reached: false,
        }
    );

    let matrix: Array2<f64> = ndarray_npy::read_npy(storage::matrix_path(dir.path(), "lone"))?;
    assert_eq!(matrix.shape(), &[1, 1]);
    assert_eq!(matrix[[0, 0]], 0.0);
    let csv = std::fs::read_to_string(storage::pair_list_path(dir.path(), "lone"))?;
    assert!(csv.is_empty());
    Ok(())
}

#[test]
fn test_batch_over_discovered_objects() -> Result<()> {
    let dir = tempdir()?;
    write_cube_4(dir.path());
    write_fragment(dir.path(), "lone", 0, &[[0.0, 0.0, 0.0]]);
    std::fs::create_dir_all(dir.path().join("hollow"))?;

    let names = discover_objects(dir.path())?;
    assert_eq!(names, vec!["cube_4", "hollow", "lone"]);

    let config = MatchConfig {
        workers: 2,
        ..config_at(dir.path())
    };
    let report = process_batch(&config, &names)?;
    assert_eq!(report.completed(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 0);

    let report_path = dir.path().join("report.json");
    report.write_json(&report_path)?;
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report_path)?)?;
    assert_eq!(json["records"].as_array().unwrap().len(), 3);
    Ok(())
}

#[test]
fn test_visualize_writes_scatter() -> Result<()> {
    let dir = tempdir()?;
    write_cube_4(dir.path());
    let config = MatchConfig {
        visualize: true,
        ..config_at(dir.path())
    };

    process_object(&config, "cube_4")?;
    let scatter = std::fs::read_to_string(storage::scatter_path(dir.path(), "cube_4"))?;
    assert!(scatter.starts_with("ply\n"));
    // 200 + 190 + 70 + 70 points across the four fragments.
    assert!(scatter.contains("element vertex 530"));
    Ok(())
}
