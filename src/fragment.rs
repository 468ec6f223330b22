// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Fracture Match Team

//! Fragment point-cloud type

use nalgebra::Point3;
use ndarray::Array2;

/// One piece of a fractured object, as a point cloud sampled from its surface
///
/// Immutable once constructed. Rows of the source array are points; only the
/// first three columns (x, y, z) are kept, trailing attribute columns are
/// dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    points: Vec<Point3<f64>>,
}

impl Fragment {
    /// Build a fragment from a 2D array with at least three columns
    ///
    /// Callers are expected to have validated the column count; rows of a
    /// narrower array would not describe 3D points.
    pub fn from_array(array: &Array2<f64>) -> Self {
        debug_assert!(array.ncols() >= 3);
        let points = array
            .rows()
            .into_iter()
            .map(|row| Point3::new(row[0], row[1], row[2]))
            .collect();
        Self { points }
    }

    pub fn from_points(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
