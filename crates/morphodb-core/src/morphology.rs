// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

/*!
Morphology - an open raw reader plus a lazily built section tree.

Raw accessors (`points`, `diameters`, `section_types`, ...) read straight from
the reader. Anything that needs topology (typed views, section lookup, soma)
goes through [`Morphology::morpho_tree`], which builds the tree on first use
and caches it for the lifetime of the instance.

`Morphology` implements [`MorphoTreeOps`], so every tree query is available on
it directly and runs against the cached tree.
*/

use once_cell::sync::OnceCell;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use morphodb_structures::{
    MorphoError, MorphoResult, MorphoTree, MorphoTreeOps, MorphologyLoader, MorphologyProperties,
    Point, RawMorphologyReader, Section, SectionType, Soma, ROOT_SECTION_ID,
};

use crate::name_metadata::NameMetadata;

/// Named typed views, resolvable from a string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSubset {
    Axon,
    BasalDendrites,
    ApicalDendrites,
    Dendrites,
    Neurites,
    Sections,
}

impl SectionSubset {
    pub const ALL: [SectionSubset; 6] = [
        SectionSubset::Axon,
        SectionSubset::BasalDendrites,
        SectionSubset::ApicalDendrites,
        SectionSubset::Dendrites,
        SectionSubset::Neurites,
        SectionSubset::Sections,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SectionSubset::Axon => "axon",
            SectionSubset::BasalDendrites => "basal_dendrites",
            SectionSubset::ApicalDendrites => "apical_dendrites",
            SectionSubset::Dendrites => "dendrites",
            SectionSubset::Neurites => "neurites",
            SectionSubset::Sections => "sections",
        }
    }
}

impl FromStr for SectionSubset {
    type Err = MorphoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionSubset::ALL
            .into_iter()
            .find(|subset| subset.as_str() == s)
            .ok_or_else(|| MorphoError::AttributeNotFound(s.to_string()))
    }
}

/// A single neuron morphology
pub struct Morphology {
    name: String,
    layer: Option<u32>,
    mtype: Option<String>,
    name_attrs: NameMetadata,
    reader: Box<dyn RawMorphologyReader>,
    morpho_tree: OnceCell<MorphoTree>,
}

impl Morphology {
    /// Open `<morpho_dir>/<morpho_name>.<ext>` with the given loader
    ///
    /// # Errors
    ///
    /// - `MorphoError::MalformedName` if the name does not parse
    /// - `MorphoError::Io` / `MorphoError::Format` from the loader
    pub fn open(
        morpho_dir: &Path,
        morpho_name: &str,
        layer: Option<u32>,
        mtype: Option<String>,
        loader: &dyn MorphologyLoader,
    ) -> MorphoResult<Self> {
        let name_attrs = NameMetadata::extract(morpho_name)?;
        let path = loader.morphology_path(morpho_dir, morpho_name);
        let reader = loader.open(&path)?;
        Ok(Self::assemble(morpho_name, name_attrs, reader, layer, mtype))
    }

    /// Wrap an already opened reader
    pub fn from_reader(
        morpho_name: &str,
        reader: Box<dyn RawMorphologyReader>,
        layer: Option<u32>,
        mtype: Option<String>,
    ) -> MorphoResult<Self> {
        let name_attrs = NameMetadata::extract(morpho_name)?;
        Ok(Self::assemble(morpho_name, name_attrs, reader, layer, mtype))
    }

    fn assemble(
        morpho_name: &str,
        name_attrs: NameMetadata,
        reader: Box<dyn RawMorphologyReader>,
        layer: Option<u32>,
        mtype: Option<String>,
    ) -> Self {
        Self {
            name: morpho_name.to_string(),
            layer,
            mtype,
            name_attrs,
            reader,
            morpho_tree: OnceCell::new(),
        }
    }

    /// Name as requested (file stem)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical name from the name metadata
    pub fn label(&self) -> &str {
        self.name_attrs.name()
    }

    pub fn name_attrs(&self) -> &NameMetadata {
        &self.name_attrs
    }

    pub fn layer(&self) -> Option<u32> {
        self.layer
    }

    pub fn mtype(&self) -> Option<&str> {
        self.mtype.as_deref()
    }

    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    // Raw data: never builds the tree

    pub fn properties(&self) -> &MorphologyProperties {
        self.reader.properties()
    }

    pub fn points(&self) -> &[Point] {
        &self.reader.properties().points
    }

    pub fn diameters(&self) -> &[f32] {
        &self.reader.properties().diameters
    }

    pub fn perimeters(&self) -> &[f32] {
        &self.reader.properties().perimeters
    }

    pub fn section_types(&self) -> Vec<SectionType> {
        self.reader.properties().section_types()
    }

    pub fn number_of_points(&self) -> usize {
        self.reader.properties().number_of_points()
    }

    pub fn number_of_sections(&self) -> usize {
        self.reader.properties().number_of_sections()
    }

    // Topology: builds the tree on first use

    /// The section tree, built at most once
    pub fn morpho_tree(&self) -> MorphoResult<&MorphoTree> {
        self.morpho_tree.get_or_try_init(|| {
            debug!(target: "morphodb-core", "Building section tree for {}", self.name);
            self.reader.create_morpho_tree()
        })
    }

    pub fn is_tree_built(&self) -> bool {
        self.morpho_tree.get().is_some()
    }

    pub fn get_section(&self, section_id: usize) -> MorphoResult<&Section> {
        self.get_node(section_id)
    }

    pub fn soma(&self) -> MorphoResult<Soma<'_>> {
        self.get_soma()
    }

    pub fn axon(&self) -> MorphoResult<Vec<&Section>> {
        self.find_nodes(SectionType::Axon)
    }

    pub fn basal_dendrites(&self) -> MorphoResult<Vec<&Section>> {
        self.find_nodes(SectionType::BasalDendrite)
    }

    pub fn apical_dendrites(&self) -> MorphoResult<Vec<&Section>> {
        self.find_nodes(SectionType::ApicalDendrite)
    }

    /// Basal sections followed by apical sections
    pub fn dendrites(&self) -> MorphoResult<Vec<&Section>> {
        let mut dendrites = self.basal_dendrites()?;
        dendrites.extend(self.apical_dendrites()?);
        Ok(dendrites)
    }

    /// Axon sections followed by dendrite sections
    pub fn neurites(&self) -> MorphoResult<Vec<&Section>> {
        let mut neurites = self.axon()?;
        neurites.extend(self.dendrites()?);
        Ok(neurites)
    }

    pub fn sections(&self) -> MorphoResult<&[Section]> {
        self.get_all_nodes()
    }

    pub fn root(&self) -> MorphoResult<&Section> {
        self.get_node(ROOT_SECTION_ID)
    }

    /// Resolve a typed view by name
    ///
    /// # Errors
    ///
    /// Returns `MorphoError::AttributeNotFound` for a name that is not one of
    /// the [`SectionSubset`] views.
    pub fn subset(&self, name: &str) -> MorphoResult<Vec<&Section>> {
        match name.parse::<SectionSubset>()? {
            SectionSubset::Axon => self.axon(),
            SectionSubset::BasalDendrites => self.basal_dendrites(),
            SectionSubset::ApicalDendrites => self.apical_dendrites(),
            SectionSubset::Dendrites => self.dendrites(),
            SectionSubset::Neurites => self.neurites(),
            SectionSubset::Sections => Ok(self.sections()?.iter().collect()),
        }
    }
}

impl MorphoTreeOps for Morphology {
    fn tree(&self) -> MorphoResult<&MorphoTree> {
        self.morpho_tree()
    }
}

impl fmt::Display for Morphology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} Morphology>", self.label())
    }
}

impl fmt::Debug for Morphology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Morphology")
            .field("name", &self.name)
            .field("layer", &self.layer)
            .field("mtype", &self.mtype)
            .field("path", &self.reader.path())
            .field("tree_built", &self.is_tree_built())
            .finish()
    }
}
