// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! Minimal geometric primitives for sample points.

use serde::{Deserialize, Serialize};

/// 3D sample position in micrometers
pub type Point = [f32; 3];

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point, b: &Point) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Mean position of a point set. `None` when the set is empty.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let mut sum = [0.0f32; 3];
    for point in points {
        sum[0] += point[0];
        sum[1] += point[1];
        sum[2] += point[2];
    }
    let n = points.len() as f32;
    Some([sum[0] / n, sum[1] / n, sum[2] / n])
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Smallest box enclosing every point. `None` when the set is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for point in iter {
            for axis in 0..3 {
                bbox.min[axis] = bbox.min[axis].min(point[axis]);
                bbox.max[axis] = bbox.max[axis].max(point[axis]);
            }
        }
        Some(bbox)
    }

    /// Extent along each axis
    pub fn dimensions(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn contains(&self, point: &Point) -> bool {
        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }
}
