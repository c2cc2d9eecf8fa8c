// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

/*!
MorphologyRegistry - name -> cached [`Morphology`] for one database directory.

## Classification table

An optional whitespace-separated text file in the database directory, one
record per line:

```text
<name> <layer> <mtype>
```

The table is loaded once at construction. Blank lines are skipped; any other
line must have exactly three fields and an unsigned integer layer, otherwise
construction fails.

## Cache

The first lookup of a name opens the morphology, classified from the table
(or unclassified when the name has no entry), and caches it. Later lookups
return the same `Arc` without consulting the table again. Entries are never
evicted.
*/

use ahash::AHashMap;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

use morphodb_config::DatabaseConfig;
use morphodb_structures::{MorphoError, MorphoResult, MorphologyLoader};

use crate::morphology::Morphology;

/// Layer / morphological type of a morphology
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub layer: u32,
    pub mtype: String,
}

/// Parse one classification line
///
/// Returns `Ok(None)` for blank lines.
///
/// # Errors
///
/// Returns `MorphoError::Format` for a wrong field count or a layer that is
/// not an unsigned integer. `line_number` is 1-based and only used in the
/// message.
pub fn parse_classification_line(
    line: &str,
    line_number: usize,
) -> MorphoResult<Option<(String, Classification)>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [] => Ok(None),
        [name, layer, mtype] => {
            let layer = layer.parse::<u32>().map_err(|e| {
                MorphoError::Format(format!(
                    "line {}: invalid layer '{}': {}",
                    line_number, layer, e
                ))
            })?;
            Ok(Some((
                name.to_string(),
                Classification {
                    layer,
                    mtype: mtype.to_string(),
                },
            )))
        }
        _ => Err(MorphoError::Format(format!(
            "line {}: expected 3 fields (name layer mtype), found {}",
            line_number,
            parts.len()
        ))),
    }
}

/// Load a whole classification table. Later records override earlier ones.
pub fn load_classification_table(path: &Path) -> MorphoResult<AHashMap<String, Classification>> {
    let content = fs::read_to_string(path).map_err(|e| MorphoError::io(path, e))?;

    let mut table = AHashMap::new();
    for (index, line) in content.lines().enumerate() {
        let Some((name, classification)) = parse_classification_line(line, index + 1)
            .map_err(|e| MorphoError::Format(format!("{}: {}", path.display(), e)))?
        else {
            continue;
        };
        trace!(
            target: "morphodb-core",
            "Classified {} as layer {} / {}",
            name,
            classification.layer,
            classification.mtype
        );
        if table.insert(name.clone(), classification).is_some() {
            debug!(target: "morphodb-core", "Duplicate classification for {}, keeping the last one", name);
        }
    }

    Ok(table)
}

/// Per-directory morphology cache
pub struct MorphologyRegistry {
    db_path: PathBuf,
    loader: Arc<dyn MorphologyLoader>,
    classification_file: Option<PathBuf>,
    classifications: AHashMap<String, Classification>,
    cache: AHashMap<String, Arc<Morphology>>,
}

impl MorphologyRegistry {
    /// Create a registry over `db_path`
    ///
    /// # Arguments
    ///
    /// * `db_path` - Directory holding the morphology files
    /// * `db_file` - Optional classification table, relative to `db_path`
    /// * `loader` - Reader strategy used to open morphologies
    ///
    /// # Errors
    ///
    /// Returns `MorphoError::Io` if the classification file cannot be read and
    /// `MorphoError::Format` if any of its lines is malformed.
    pub fn new(
        db_path: impl Into<PathBuf>,
        db_file: Option<&str>,
        loader: Arc<dyn MorphologyLoader>,
    ) -> MorphoResult<Self> {
        let db_path = db_path.into();

        let (classification_file, classifications) = match db_file {
            Some(file) => {
                let path = db_path.join(file);
                let table = load_classification_table(&path)?;
                (Some(path), table)
            }
            None => (None, AHashMap::new()),
        };

        info!(
            target: "morphodb-core",
            "Morphology registry on {} ({} classified morphologies, .{} files)",
            db_path.display(),
            classifications.len(),
            loader.extension()
        );

        Ok(Self {
            db_path,
            loader,
            classification_file,
            classifications,
            cache: AHashMap::new(),
        })
    }

    /// Create a registry from the `[database]` configuration section
    pub fn from_config(
        config: &DatabaseConfig,
        loader: Arc<dyn MorphologyLoader>,
    ) -> MorphoResult<Self> {
        Self::new(&config.path, config.classification_file.as_deref(), loader)
    }

    /// Return the morphology called `morpho_name`, opening it on first use
    ///
    /// # Errors
    ///
    /// Propagates name and loader errors from [`Morphology::open`]. A failed
    /// open leaves nothing in the cache.
    pub fn lookup(&mut self, morpho_name: &str) -> MorphoResult<Arc<Morphology>> {
        if let Some(morphology) = self.cache.get(morpho_name) {
            trace!(target: "morphodb-core", "Cache hit for {}", morpho_name);
            return Ok(Arc::clone(morphology));
        }

        let morphology = Arc::new(self.open_classified(morpho_name)?);
        self.cache
            .insert(morpho_name.to_string(), Arc::clone(&morphology));
        Ok(morphology)
    }

    fn open_classified(&self, morpho_name: &str) -> MorphoResult<Morphology> {
        let (layer, mtype) = match self.classifications.get(morpho_name) {
            Some(c) => (Some(c.layer), Some(c.mtype.clone())),
            None => {
                if self.classification_file.is_some() {
                    warn!(target: "morphodb-core", "No layer/mtype entry for {}", morpho_name);
                }
                (None, None)
            }
        };

        debug!(target: "morphodb-core", "Cache miss for {}, opening", morpho_name);
        Morphology::open(&self.db_path, morpho_name, layer, mtype, self.loader.as_ref())
    }

    pub fn classification(&self, morpho_name: &str) -> Option<&Classification> {
        self.classifications.get(morpho_name)
    }

    /// Names present in the classification table
    pub fn classified_names(&self) -> Vec<&str> {
        self.classifications.keys().map(String::as_str).collect()
    }

    /// Whether `morpho_name` has already been opened
    pub fn contains(&self, morpho_name: &str) -> bool {
        self.cache.contains_key(morpho_name)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn classification_file(&self) -> Option<&Path> {
        self.classification_file.as_deref()
    }
}

/// Registry shareable across threads
///
/// Hits take the read lock only. A miss re-checks under the write lock, so
/// two threads missing on the same name still end up with one instance.
#[derive(Clone)]
pub struct SharedMorphologyRegistry {
    inner: Arc<RwLock<MorphologyRegistry>>,
}

impl SharedMorphologyRegistry {
    pub fn new(registry: MorphologyRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn lookup(&self, morpho_name: &str) -> MorphoResult<Arc<Morphology>> {
        if let Some(morphology) = self.inner.read().cache.get(morpho_name) {
            return Ok(Arc::clone(morphology));
        }
        self.inner.write().lookup(morpho_name)
    }

    pub fn cached_count(&self) -> usize {
        self.inner.read().cached_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let (name, classification) = parse_classification_line("M1 3 L5_TPC", 1)
            .unwrap()
            .unwrap();
        assert_eq!(name, "M1");
        assert_eq!(classification.layer, 3);
        assert_eq!(classification.mtype, "L5_TPC");
    }

    #[test]
    fn test_parse_line_tolerates_extra_whitespace() {
        let parsed = parse_classification_line("  M1\t3   L5_TPC \r", 1).unwrap();
        assert_eq!(parsed.map(|(name, _)| name), Some("M1".to_string()));
    }

    #[test]
    fn test_parse_blank_line() {
        assert!(parse_classification_line("", 1).unwrap().is_none());
        assert!(parse_classification_line("   \t", 1).unwrap().is_none());
    }

    #[test]
    fn test_parse_wrong_field_count() {
        assert!(matches!(
            parse_classification_line("M1 3", 7),
            Err(MorphoError::Format(msg)) if msg.contains("line 7")
        ));
        assert!(parse_classification_line("M1 3 L5_TPC extra", 1).is_err());
    }

    #[test]
    fn test_parse_non_integer_layer() {
        assert!(matches!(
            parse_classification_line("M1 three L5_TPC", 1),
            Err(MorphoError::Format(_))
        ));
        assert!(parse_classification_line("M1 -2 L5_TPC", 1).is_err());
    }
}
