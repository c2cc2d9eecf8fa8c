// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! # morphodb - neuronal morphology database
//!
//! Opens reconstructed neuron morphologies from a database directory, caches
//! one instance per name, and exposes typed views (soma, axon, dendrites)
//! over a section tree that is only built when first needed.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! morphodb = "0.1"
//! ```
//!
//! ```rust,no_run
//! use morphodb::prelude::*;
//!
//! let config = load_config(None, None)?;
//! let mut registry = morphodb::open_registry(&config)?;
//!
//! let morphology = registry.lookup("C060114A5_-_Scale_x1.000_y0.975_z1.000")?;
//! println!("{} is layer {:?}", morphology, morphology.layer());
//! for dendrite in morphology.basal_dendrites()? {
//!     println!("  basal section {} ({} points)", dendrite.id(), dendrite.number_of_points());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crates
//!
//! - [`structures`]: raw properties, section tree, reader and loader traits
//! - [`core`]: name metadata, [`Morphology`](core::Morphology), the registry
//! - [`config`]: `morphodb.toml` loading with environment and CLI overrides
//! - `observability` (feature, on by default): logging initialisation

use std::sync::Arc;

use tracing::debug;

pub use morphodb_config as config;
pub use morphodb_core as core;
pub use morphodb_structures as structures;

#[cfg(feature = "observability")]
pub use morphodb_observability as observability;

use morphodb_config::{validate_config, ConfigError, MorphoDbConfig};
use morphodb_core::MorphologyRegistry;
use morphodb_structures::{JsonMorphologyLoader, MorphoError};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Failures while turning a configuration into a registry
#[derive(Debug, thiserror::Error)]
pub enum MorphoDbError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Morphology(#[from] MorphoError),
}

/// Validate `config` and open its database with the JSON loader
///
/// `database.morphology_extension`, when set, replaces the loader's default
/// `json` extension.
///
/// # Errors
///
/// Returns [`MorphoDbError::Config`] for an invalid configuration and
/// [`MorphoDbError::Morphology`] if the classification table cannot be loaded.
pub fn open_registry(config: &MorphoDbConfig) -> Result<MorphologyRegistry, MorphoDbError> {
    validate_config(config)?;

    let loader = match &config.database.morphology_extension {
        Some(extension) => JsonMorphologyLoader::with_extension(extension),
        None => JsonMorphologyLoader::new(),
    };
    let registry = MorphologyRegistry::from_config(&config.database, Arc::new(loader))?;

    debug!(
        target: "morphodb",
        "Opened morphology database {} ({} classified names)",
        config.database.path.display(),
        registry.classified_names().len()
    );
    Ok(registry)
}

/// Install logging from the `[logging]` section plus debug flags
///
/// The returned guard must be kept alive for file logs to be flushed.
#[cfg(feature = "observability")]
pub fn init_logging_from_config(
    config: &MorphoDbConfig,
) -> anyhow::Result<morphodb_observability::LoggingGuard> {
    let flags = morphodb_observability::parse_debug_flags();
    morphodb_observability::init_logging(
        &flags,
        &config.logging.level,
        config.logging.log_dir.as_deref(),
    )
}

/// Common imports for morphodb users
pub mod prelude {
    pub use morphodb_config::{load_config, MorphoDbConfig};
    pub use morphodb_core::{
        Classification, Morphology, MorphologyRegistry, NameMetadata, NameShape, Scale,
        SectionSubset, SharedMorphologyRegistry,
    };
    pub use morphodb_structures::{
        JsonMorphologyLoader, MorphoError, MorphoResult, MorphoTree, MorphoTreeOps,
        MorphologyLoader, MorphologyProperties, Section, SectionType, Soma,
    };

    pub use crate::{open_registry, MorphoDbError};
}
