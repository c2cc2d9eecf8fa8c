// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

/*!
MorphoTree - rooted tree of typed sections.

Built once from validated [`MorphologyProperties`] and read-only afterwards.
Sections are stored in row order, so a section id is its index in the
structure table and the root is always id 0.

# Design Notes

- Parent links come straight from the structure table
- Children lists are reconstructed at build time
- Each section owns a copy of its point samples, so the tree does not
  borrow from the reader that produced it
*/

use tracing::debug;

use crate::error::{MorphoError, MorphoResult};
use crate::geometry::{centroid, distance, BoundingBox, Point};
use crate::properties::MorphologyProperties;
use crate::section_type::SectionType;

/// Id of the root section
pub const ROOT_SECTION_ID: usize = 0;

/// A single branch of the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    id: usize,
    section_type: SectionType,
    parent: Option<usize>,
    children: Vec<usize>,
    points: Vec<Point>,
    diameters: Vec<f32>,
    perimeters: Vec<f32>,
}

impl Section {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn section_type(&self) -> SectionType {
        self.section_type
    }

    /// Parent section id (`None` for the root)
    pub fn parent_id(&self) -> Option<usize> {
        self.parent
    }

    pub fn children_ids(&self) -> &[usize] {
        &self.children
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn diameters(&self) -> &[f32] {
        &self.diameters
    }

    /// Empty when the source carried no perimeter data
    pub fn perimeters(&self) -> &[f32] {
        &self.perimeters
    }

    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Arc length of the polyline through the section's points
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| distance(&pair[0], &pair[1]))
            .sum()
    }
}

/// View over the soma section with soma-specific measurements
#[derive(Debug, Clone, Copy)]
pub struct Soma<'a> {
    section: &'a Section,
    tree: &'a MorphoTree,
}

impl<'a> Soma<'a> {
    pub fn section(&self) -> &'a Section {
        self.section
    }

    /// Soma contour samples
    pub fn profile_points(&self) -> &'a [Point] {
        self.section.points()
    }

    /// Mean of the profile points. `None` for a soma without samples.
    pub fn centroid(&self) -> Option<Point> {
        centroid(self.profile_points())
    }

    /// Mean distance from the centroid to the profile points
    pub fn mean_radius(&self) -> Option<f32> {
        let center = self.centroid()?;
        let points = self.profile_points();
        let total: f32 = points.iter().map(|p| distance(p, &center)).sum();
        Some(total / points.len() as f32)
    }

    /// Largest distance from the centroid to a profile point
    pub fn max_radius(&self) -> Option<f32> {
        let center = self.centroid()?;
        self.profile_points()
            .iter()
            .map(|p| distance(p, &center))
            .reduce(f32::max)
    }

    /// Sections attached directly to the soma
    pub fn children(&self) -> Vec<&'a Section> {
        self.section
            .children_ids()
            .iter()
            .map(|&id| &self.tree.sections[id])
            .collect()
    }
}

/// Reconstructed section tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MorphoTree {
    sections: Vec<Section>,
}

impl MorphoTree {
    /// Build the tree from raw properties
    ///
    /// # Errors
    ///
    /// Returns `MorphoError::Format` if the properties fail validation.
    pub fn from_properties(properties: &MorphologyProperties) -> MorphoResult<Self> {
        properties.validate()?;

        let mut sections: Vec<Section> = Vec::with_capacity(properties.number_of_sections());
        for (id, row) in properties.structure.iter().enumerate() {
            let range = properties.section_range(id);
            let perimeters = if properties.perimeters.is_empty() {
                Vec::new()
            } else {
                properties.perimeters[range.clone()].to_vec()
            };
            sections.push(Section {
                id,
                section_type: row.section_type,
                parent: row.parent_index(),
                children: Vec::new(),
                points: properties.points[range.clone()].to_vec(),
                diameters: properties.diameters[range].to_vec(),
                perimeters,
            });
        }

        // Parents always precede children after validation
        for id in 0..sections.len() {
            if let Some(parent) = sections[id].parent {
                sections[parent].children.push(id);
            }
        }

        debug!(
            target: "morphodb-structures",
            "Built morphology tree with {} sections and {} points",
            sections.len(),
            properties.number_of_points()
        );

        Ok(Self { sections })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn section(&self, id: usize) -> MorphoResult<&Section> {
        self.sections
            .get(id)
            .ok_or_else(|| MorphoError::NotFound(format!("section {}", id)))
    }
}

/// Tree queries.
///
/// Every operation is expressed through [`MorphoTreeOps::tree`], so a type
/// that can produce a tree (directly or lazily) gets the full query surface by
/// implementing that one method.
pub trait MorphoTreeOps {
    /// The tree all queries run against
    fn tree(&self) -> MorphoResult<&MorphoTree>;

    /// Section lookup by id
    ///
    /// # Errors
    ///
    /// Returns `MorphoError::NotFound` if no section has this id.
    fn get_node(&self, id: usize) -> MorphoResult<&Section> {
        self.tree()?.section(id)
    }

    /// Every section, in id order
    fn get_all_nodes(&self) -> MorphoResult<&[Section]> {
        Ok(self.tree()?.sections())
    }

    /// Sections tagged `section_type`, in id order
    fn find_nodes(&self, section_type: SectionType) -> MorphoResult<Vec<&Section>> {
        Ok(self
            .tree()?
            .sections
            .iter()
            .filter(|section| section.section_type == section_type)
            .collect())
    }

    /// The first soma-tagged section
    ///
    /// # Errors
    ///
    /// Returns `MorphoError::NotFound` if the tree has no soma section.
    fn get_soma(&self) -> MorphoResult<Soma<'_>> {
        let tree = self.tree()?;
        let section = tree
            .sections
            .iter()
            .find(|section| section.section_type == SectionType::Soma)
            .ok_or_else(|| MorphoError::NotFound("soma".to_string()))?;
        Ok(Soma { section, tree })
    }

    fn number_of_nodes(&self) -> MorphoResult<usize> {
        Ok(self.tree()?.len())
    }

    fn children(&self, id: usize) -> MorphoResult<Vec<&Section>> {
        let tree = self.tree()?;
        let section = tree.section(id)?;
        Ok(section
            .children
            .iter()
            .map(|&child| &tree.sections[child])
            .collect())
    }

    /// Parent of a section (`None` for the root)
    fn parent(&self, id: usize) -> MorphoResult<Option<&Section>> {
        let tree = self.tree()?;
        let section = tree.section(id)?;
        Ok(section.parent.map(|parent| &tree.sections[parent]))
    }

    /// The section followed by each of its ancestors, ending at the root
    fn path_to_soma(&self, id: usize) -> MorphoResult<Vec<&Section>> {
        let tree = self.tree()?;
        let mut path = vec![tree.section(id)?];
        while let Some(parent) = path[path.len() - 1].parent {
            path.push(&tree.sections[parent]);
        }
        Ok(path)
    }

    /// Bounds of every sample point. `None` for a tree without points.
    fn bounding_box(&self) -> MorphoResult<Option<BoundingBox>> {
        let tree = self.tree()?;
        Ok(BoundingBox::from_points(
            tree.sections.iter().flat_map(|section| section.points.iter()),
        ))
    }
}

impl MorphoTreeOps for MorphoTree {
    fn tree(&self) -> MorphoResult<&MorphoTree> {
        Ok(self)
    }
}
