// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! # morphodb-observability
//!
//! Logging setup shared by the morphodb crates.
//!
//! Every morphodb crate logs with `target: "<crate-name>"`, so debug output
//! can be switched on per crate with `--debug-<crate-name>` or the
//! `MORPHODB_DEBUG` environment variable.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known morphodb crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "morphodb",
    "morphodb-structures",
    "morphodb-core",
    "morphodb-config",
];
