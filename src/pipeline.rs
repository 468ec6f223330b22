// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Fracture Match Team

//! Per-object matching pipeline and parallel batch driver

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::MatchConfig;
use crate::loader::load_fragments;
use crate::matching::compute_matching;
use crate::{storage, viz};

/// Result of processing one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectOutcome {
    /// No fragments discovered; nothing computed, nothing written
    Skipped,
    /// Matrix and pair list persisted
    Completed {
        num_parts: usize,
        adjacent_pairs: usize,
        limit_reached: bool,
    },
}

/// Run the full pipeline for one object: load, match, persist
///
/// Objects with zero fragments are skipped without writing anything. Loading
/// stops quietly at the first missing fragment index; hitting the fragment cap
/// is reported through `limit_reached` and processing continues with what was
/// loaded. Write failures abort the object's job.
pub fn process_object(config: &MatchConfig, name: &str) -> Result<ObjectOutcome> {
    let loaded = load_fragments(config, name);
    if loaded.is_empty() {
        return Ok(ObjectOutcome::Skipped);
    }

    let matching_dir = storage::matching_dir(&config.data_root, name);
    std::fs::create_dir_all(&matching_dir)
        .with_context(|| format!("Failed to create output folder: {matching_dir:?}"))?;

    if config.visualize {
        let path = storage::scatter_path(&config.data_root, name);
        viz::export_scatter(&loaded.fragments, &path)?;
    }

    let matrix = compute_matching(&loaded.fragments, config.epsilon, config.min_matches);
    storage::write_matrix(&storage::matrix_path(&config.data_root, name), &matrix.to_array())?;
    storage::write_pair_list(
        &storage::pair_list_path(&config.data_root, name),
        &matrix.pair_list(),
    )?;

    Ok(ObjectOutcome::Completed {
        num_parts: loaded.num_parts(),
        adjacent_pairs: matrix.num_adjacent(),
        limit_reached: loaded.limit_reached,
    })
}

/// Candidate object names: the immediate subdirectories of the data root,
/// sorted by name
pub fn discover_objects(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list data folder: {root:?}"))?;
        if entry.file_type().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Terminal status of one object within a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectStatus {
    Completed,
    Skipped,
    Failed,
}

/// Per-object record in a batch report
#[derive(Debug, Clone, Serialize)]
pub struct ObjectRecord {
    pub name: String,
    pub status: ObjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_parts: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjacent_pairs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set for completed objects whose fragment scan hit the cap; failed
    /// jobs do not carry it
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub limit_reached: bool,
}

/// Summary of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub records: Vec<ObjectRecord>,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.count(ObjectStatus::Completed)
    }

    pub fn skipped(&self) -> usize {
        self.count(ObjectStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(ObjectStatus::Failed)
    }

    fn count(&self, status: ObjectStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write report: {path:?}"))?;
        Ok(())
    }
}

/// Process a batch of objects across a fixed-size worker pool
///
/// One whole object per task; tasks share no mutable state. Failures are
/// isolated: an object whose job errors is recorded as failed and the batch
/// continues with the rest. `on_done` is invoked from worker threads as each
/// object finishes (progress reporting).
pub fn process_batch_with(
    config: &MatchConfig,
    names: &[String],
    on_done: impl Fn(&ObjectRecord) + Sync,
) -> Result<BatchReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .context("Failed to build worker pool")?;

    let records = pool.install(|| {
        names
            .par_iter()
            .map(|name| {
                let record = match process_object(config, name) {
                    Ok(ObjectOutcome::Completed {
                        num_parts,
                        adjacent_pairs,
                        limit_reached,
                    }) => ObjectRecord {
                        name: name.clone(),
                        status: ObjectStatus::Completed,
                        num_parts: Some(num_parts),
                        adjacent_pairs: Some(adjacent_pairs),
                        error: None,
                        limit_reached,
                    },
                    Ok(ObjectOutcome::Skipped) => ObjectRecord {
                        name: name.clone(),
                        status: ObjectStatus::Skipped,
                        num_parts: None,
                        adjacent_pairs: None,
                        error: None,
                        limit_reached: false,
                    },
                    // A job that errors after loading loses its load
                    // metadata; limit_reached is only reported for completed
                    // objects.
                    Err(e) => ObjectRecord {
                        name: name.clone(),
                        status: ObjectStatus::Failed,
                        num_parts: None,
                        adjacent_pairs: None,
                        error: Some(format!("{e:#}")),
                        limit_reached: false,
                    },
                };
                on_done(&record);
                record
            })
            .collect()
    });

    Ok(BatchReport { records })
}

/// [`process_batch_with`] without progress reporting
pub fn process_batch(config: &MatchConfig, names: &[String]) -> Result<BatchReport> {
    process_batch_with(config, names, |_| {})
}
