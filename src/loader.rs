// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Fracture Match Team

//! Fragment discovery and loading
//!
//! The number of fragments per object is discovered, not declared: indices
//! 0, 1, 2, … are probed until a read fails, and the first failure marks the
//! end of the sequence.

use crate::config::MatchConfig;
use crate::fragment::Fragment;
use crate::storage::{self, ReadError};

/// Result of loading one object's fragments
#[derive(Debug, Clone)]
pub struct LoadedFragments {
    /// Fragments in index order (index = position)
    pub fragments: Vec<Fragment>,
    /// The scan hit `max_fragments` without finding a missing index; the
    /// sequence was truncated, not exhausted
    pub limit_reached: bool,
}

impl LoadedFragments {
    pub fn num_parts(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Load the ordered fragment sequence of one object
///
/// Stops at the first index whose file is missing or unreadable; both end the
/// scan without error (absence signals "no more fragments"). Zero loaded
/// fragments is reported through the empty vec, and callers skip the object.
pub fn load_fragments(config: &MatchConfig, name: &str) -> LoadedFragments {
    let mut fragments = Vec::new();

    for index in 0..config.max_fragments {
        let path = storage::fragment_path(&config.data_root, name, index);
        match storage::read_fragment(&path) {
            Ok(array) => fragments.push(Fragment::from_array(&array)),
            Err(ReadError::Missing(_)) | Err(ReadError::Malformed { .. }) => {
                return LoadedFragments {
                    fragments,
                    limit_reached: false,
                };
            }
        }
    }

    LoadedFragments {
        fragments,
        limit_reached: true,
    }
}
