// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

/*!
Flat raw morphology data, as produced by a reader.

The layout is point-level arrays (positions, diameters, optional perimeters)
plus one structure row per section. A structure row stores the index of the
section's first point, its type tag and the index of its parent row. Points of
section `i` run from `structure[i].offset` up to the next row's offset (or the
end of the point arrays for the last row).
*/

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{MorphoError, MorphoResult};
use crate::geometry::Point;
use crate::section_type::SectionType;

/// Parent index marking the root row
pub const ROOT_PARENT: i32 = -1;

/// One structure row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Index of the first point of the section
    pub offset: u32,
    pub section_type: SectionType,
    /// Parent row index, or [`ROOT_PARENT`]
    pub parent: i32,
}

impl SectionRecord {
    pub const fn new(offset: u32, section_type: SectionType, parent: i32) -> Self {
        Self {
            offset,
            section_type,
            parent,
        }
    }

    pub fn parent_index(&self) -> Option<usize> {
        usize::try_from(self.parent).ok()
    }
}

/// Raw point and section arrays of a single morphology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MorphologyProperties {
    pub points: Vec<Point>,
    pub diameters: Vec<f32>,
    #[serde(default)]
    pub perimeters: Vec<f32>,
    pub structure: Vec<SectionRecord>,
}

impl MorphologyProperties {
    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    pub fn number_of_sections(&self) -> usize {
        self.structure.len()
    }

    /// Type tag of every section, in row order
    pub fn section_types(&self) -> Vec<SectionType> {
        self.structure.iter().map(|row| row.section_type).collect()
    }

    /// Point index range covered by section `index`
    ///
    /// Only meaningful on validated properties.
    pub fn section_range(&self, index: usize) -> Range<usize> {
        let start = self.structure[index].offset as usize;
        let end = self
            .structure
            .get(index + 1)
            .map(|next| next.offset as usize)
            .unwrap_or(self.points.len());
        start..end
    }

    /// Check array lengths and tree topology
    ///
    /// # Errors
    ///
    /// Returns `MorphoError::Format` if:
    /// - diameters (or non-empty perimeters) do not match the point count
    /// - offsets decrease, exceed the point count, or the first offset is not 0
    /// - row 0 is not the root, or any other row is a root
    /// - a parent does not refer to an earlier row
    pub fn validate(&self) -> MorphoResult<()> {
        let n_points = self.points.len();

        if self.diameters.len() != n_points {
            return Err(MorphoError::Format(format!(
                "{} diameters for {} points",
                self.diameters.len(),
                n_points
            )));
        }
        if !self.perimeters.is_empty() && self.perimeters.len() != n_points {
            return Err(MorphoError::Format(format!(
                "{} perimeters for {} points",
                self.perimeters.len(),
                n_points
            )));
        }

        if self.structure.is_empty() {
            if n_points > 0 {
                return Err(MorphoError::Format(format!(
                    "{} points but no sections",
                    n_points
                )));
            }
            return Ok(());
        }

        if n_points > 0 && self.structure[0].offset != 0 {
            return Err(MorphoError::Format(format!(
                "first section starts at point {}, expected 0",
                self.structure[0].offset
            )));
        }

        let mut previous_offset = 0u32;
        for (index, row) in self.structure.iter().enumerate() {
            if row.offset < previous_offset {
                return Err(MorphoError::Format(format!(
                    "section {} offset {} is before previous offset {}",
                    index, row.offset, previous_offset
                )));
            }
            if row.offset as usize > n_points {
                return Err(MorphoError::Format(format!(
                    "section {} offset {} exceeds point count {}",
                    index, row.offset, n_points
                )));
            }
            previous_offset = row.offset;

            match (index, row.parent) {
                (0, ROOT_PARENT) => {}
                (0, parent) => {
                    return Err(MorphoError::Format(format!(
                        "root section has parent {}",
                        parent
                    )));
                }
                (_, ROOT_PARENT) => {
                    return Err(MorphoError::Format(format!(
                        "section {} is a second root",
                        index
                    )));
                }
                (_, parent) if parent < 0 || parent as usize >= index => {
                    return Err(MorphoError::Format(format!(
                        "section {} has parent {} which does not precede it",
                        index, parent
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
