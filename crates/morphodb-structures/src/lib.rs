// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! # morphodb-structures
//!
//! The data layer of morphodb. Defines the raw per-point / per-section arrays
//! a reader produces, the section tree reconstructed from them, and the
//! reader seams the domain layer consumes.
//!
//! ## Modules
//! - `error` - shared error taxonomy
//! - `section_type` - closed set of section tags
//! - `geometry` - points and bounding boxes
//! - `properties` - flat raw data and its validation
//! - `tree` - `MorphoTree`, `Section`, `Soma` and the `MorphoTreeOps` queries
//! - `reader` - `RawMorphologyReader`, `MorphologyLoader`, JSON loader

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod error;
pub mod geometry;
pub mod properties;
pub mod reader;
pub mod section_type;
pub mod tree;

pub use error::{MorphoError, MorphoResult};
pub use geometry::{BoundingBox, Point};
pub use properties::{MorphologyProperties, SectionRecord, ROOT_PARENT};
pub use reader::{
    save_morphology_json, InMemoryReader, JsonMorphologyLoader, MorphologyLoader,
    RawMorphologyReader, JSON_EXTENSION,
};
pub use section_type::SectionType;
pub use tree::{MorphoTree, MorphoTreeOps, Section, Soma, ROOT_SECTION_ID};
