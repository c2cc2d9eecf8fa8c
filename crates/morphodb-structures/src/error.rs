// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

/*!
Error taxonomy shared by every morphology crate.

Copyright 2025 MorphoDB Contributors
Licensed under the Apache License, Version 2.0
*/

use std::path::PathBuf;
use thiserror::Error;

/// Result type for morphology operations
pub type MorphoResult<T> = Result<T, MorphoError>;

/// Error types for morphology loading and queries
#[derive(Error, Debug)]
pub enum MorphoError {
    /// A morphology name does not follow any of the naming grammars
    #[error("Malformed morphology name: {0}")]
    MalformedName(String),

    /// The underlying file could not be opened or read
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raw data or a classification table is structurally invalid
    #[error("Format error: {0}")]
    Format(String),

    /// A section/node id has no match in the tree
    #[error("Not found: {0}")]
    NotFound(String),

    /// A named view exists on neither the morphology nor its tree
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),
}

impl MorphoError {
    /// Wrap an I/O error together with the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MorphoError::Io {
            path: path.into(),
            source,
        }
    }
}

// Convert from serde_json::Error
impl From<serde_json::Error> for MorphoError {
    fn from(err: serde_json::Error) -> Self {
        MorphoError::Format(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = MorphoError::io(
            "/data/C060114A5.h5",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let message = err.to_string();
        assert!(message.contains("/data/C060114A5.h5"));
        assert!(message.contains("no such file"));
    }

    #[test]
    fn test_json_error_becomes_format_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(MorphoError::from(json_err), MorphoError::Format(_)));
    }
}
