// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

/*!
Raw morphology reader interfaces.

Two seams keep the on-disk format out of the rest of the system:

- [`RawMorphologyReader`]: an open morphology, exposing flat raw arrays and a
  tree-construction entry point
- [`MorphologyLoader`]: a strategy that knows a file extension and opens
  readers for paths with that extension

Callers pass a loader explicitly; there is no process-wide default.
*/

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{MorphoError, MorphoResult};
use crate::properties::MorphologyProperties;
use crate::tree::MorphoTree;

/// An open morphology resource
pub trait RawMorphologyReader: Send + Sync {
    /// Location the reader was opened from
    fn path(&self) -> &Path;

    /// Flat raw data. Never builds a tree.
    fn properties(&self) -> &MorphologyProperties;

    /// Reconstruct the section tree from the raw data
    fn create_morpho_tree(&self) -> MorphoResult<MorphoTree> {
        MorphoTree::from_properties(self.properties())
    }
}

/// Strategy that opens readers for one file format
pub trait MorphologyLoader: Send + Sync {
    /// File extension without the leading dot
    fn extension(&self) -> &str;

    /// Open the morphology stored at `path`
    fn open(&self, path: &Path) -> MorphoResult<Box<dyn RawMorphologyReader>>;

    /// `<dir>/<name>.<extension>`
    fn morphology_path(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.{}", name, self.extension()))
    }
}

/// Reader over properties already held in memory
#[derive(Debug, Clone)]
pub struct InMemoryReader {
    path: PathBuf,
    properties: MorphologyProperties,
}

impl InMemoryReader {
    /// Validates the properties up front so a bad layout fails at open time
    pub fn new(path: impl Into<PathBuf>, properties: MorphologyProperties) -> MorphoResult<Self> {
        properties.validate()?;
        Ok(Self {
            path: path.into(),
            properties,
        })
    }
}

impl RawMorphologyReader for InMemoryReader {
    fn path(&self) -> &Path {
        &self.path
    }

    fn properties(&self) -> &MorphologyProperties {
        &self.properties
    }
}

/// Default extension of JSON morphology files
pub const JSON_EXTENSION: &str = "json";

/// Loads morphologies serialized as JSON [`MorphologyProperties`]
#[derive(Debug, Clone)]
pub struct JsonMorphologyLoader {
    extension: String,
}

impl JsonMorphologyLoader {
    pub fn new() -> Self {
        Self {
            extension: JSON_EXTENSION.to_string(),
        }
    }

    /// Same format under a different file extension
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }
}

impl Default for JsonMorphologyLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl MorphologyLoader for JsonMorphologyLoader {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn open(&self, path: &Path) -> MorphoResult<Box<dyn RawMorphologyReader>> {
        let json_str = fs::read_to_string(path).map_err(|e| MorphoError::io(path, e))?;
        let properties: MorphologyProperties = serde_json::from_str(&json_str).map_err(|e| {
            MorphoError::Format(format!("{}: {}", path.display(), e))
        })?;

        debug!(
            target: "morphodb-structures",
            "Opened {} ({} sections, {} points)",
            path.display(),
            properties.number_of_sections(),
            properties.number_of_points()
        );

        Ok(Box::new(InMemoryReader::new(path, properties)?))
    }
}

/// Write properties in the format read by [`JsonMorphologyLoader`]
pub fn save_morphology_json(path: &Path, properties: &MorphologyProperties) -> MorphoResult<()> {
    let json_str = serde_json::to_string_pretty(properties)?;
    fs::write(path, json_str).map_err(|e| MorphoError::io(path, e))
}
