// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Fracture Match Team

//! Fracture Match
//!
//! Identifies which fragments of a fractured 3D object are spatially adjacent
//! by comparing their sampled point-cloud surfaces for near-coincident points.
//! For each object it produces a symmetric binary adjacency matrix over
//! fragment indices and a redundant (i,j)/(j,i) pair list.

pub mod config;
pub mod fragment;
pub mod loader;
pub mod matching;
pub mod pipeline;
pub mod storage;
pub mod viz;

pub use config::MatchConfig;
pub use fragment::Fragment;
pub use loader::{load_fragments, LoadedFragments};
pub use matching::{compute_matching, match_count, AdjacencyMatrix};
pub use pipeline::{discover_objects, process_batch, process_object, BatchReport, ObjectOutcome};

use anyhow::Result;

/// Main entry point for matching one object with default settings
pub fn process(name: &str) -> Result<ObjectOutcome> {
    let config = MatchConfig::default();
    pipeline::process_object(&config, name)
}
