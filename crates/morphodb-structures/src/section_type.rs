// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! Closed set of section type tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Biological role of a section.
///
/// Numeric codes follow the SWC convention used by most reconstruction
/// formats. Any code outside the known range is read as [`SectionType::Undefined`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum SectionType {
    Undefined,
    Soma,
    Axon,
    BasalDendrite,
    ApicalDendrite,
}

impl SectionType {
    /// All tags, in code order
    pub const ALL: [SectionType; 5] = [
        SectionType::Undefined,
        SectionType::Soma,
        SectionType::Axon,
        SectionType::BasalDendrite,
        SectionType::ApicalDendrite,
    ];

    pub const fn code(self) -> u8 {
        match self {
            SectionType::Undefined => 0,
            SectionType::Soma => 1,
            SectionType::Axon => 2,
            SectionType::BasalDendrite => 3,
            SectionType::ApicalDendrite => 4,
        }
    }

    /// True for basal and apical dendrites
    pub const fn is_dendrite(self) -> bool {
        matches!(self, SectionType::BasalDendrite | SectionType::ApicalDendrite)
    }

    /// True for axon and dendrites
    pub const fn is_neurite(self) -> bool {
        matches!(self, SectionType::Axon) || self.is_dendrite()
    }
}

impl From<u8> for SectionType {
    fn from(code: u8) -> Self {
        match code {
            1 => SectionType::Soma,
            2 => SectionType::Axon,
            3 => SectionType::BasalDendrite,
            4 => SectionType::ApicalDendrite,
            _ => SectionType::Undefined,
        }
    }
}

impl From<SectionType> for u8 {
    fn from(section_type: SectionType) -> Self {
        section_type.code()
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SectionType::Undefined => "undefined",
            SectionType::Soma => "soma",
            SectionType::Axon => "axon",
            SectionType::BasalDendrite => "basal_dendrite",
            SectionType::ApicalDendrite => "apical_dendrite",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for section_type in SectionType::ALL {
            assert_eq!(SectionType::from(section_type.code()), section_type);
        }
    }

    #[test]
    fn test_unknown_code_is_undefined() {
        assert_eq!(SectionType::from(7), SectionType::Undefined);
        assert_eq!(SectionType::from(255), SectionType::Undefined);
    }

    #[test]
    fn test_classification_helpers() {
        assert!(SectionType::ApicalDendrite.is_dendrite());
        assert!(SectionType::Axon.is_neurite());
        assert!(!SectionType::Axon.is_dendrite());
        assert!(!SectionType::Soma.is_neurite());
    }

    #[test]
    fn test_serde_uses_numeric_code() {
        let json = serde_json::to_string(&SectionType::BasalDendrite).unwrap();
        assert_eq!(json, "3");
        let parsed: SectionType = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, SectionType::Axon);
    }
}
