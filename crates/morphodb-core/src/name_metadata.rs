// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

/*!
Structured metadata encoded in morphology file stems.

Morphology names carry three independent markers:

- `_-_Clone_` - a cloned morphology; everything from the marker on is dropped
- `_-_Scale_` - a per-axis scaled morphology, `<name>_-_Scale_x<fx>_y<fy>_z<fz>`
- `dend-` - a mixed morphology, `dend-<dend>_axon-<axon>`

The `(mixed, scaled)` combination selects exactly one grammar. Names with
neither marker are taken verbatim; names with a marker must match the
selected grammar as a prefix or extraction fails.
*/

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

use morphodb_structures::{MorphoError, MorphoResult};

pub const CLONE_MARKER: &str = "_-_Clone_";
pub const SCALE_MARKER: &str = "_-_Scale_";
pub const MIXED_MARKER: &str = "dend-";

static SCALED_MIXED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^dend-(?P<dend>[\w\-+]+)_axon-(?P<axon>[\w\-+]+)_-_Scale_x(?P<scale_x>\d+\.\d+)_y(?P<scale_y>\d+\.\d+)_z(?P<scale_z>\d+\.\d+)",
    )
    .expect("scaled mixed name pattern is a valid regex")
});

static SCALED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<name>[\w\-+]+)_-_Scale_x(?P<scale_x>\d+\.\d+)_y(?P<scale_y>\d+\.\d+)_z(?P<scale_z>\d+\.\d+)",
    )
    .expect("scaled name pattern is a valid regex")
});

static MIXED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^dend-(?P<dend>[\w\-+]+)_axon-(?P<axon>[\w\-+]+)")
        .expect("mixed name pattern is a valid regex")
});

/// One scale factor, kept with the text it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleFactor {
    value: f64,
    text: String,
}

impl ScaleFactor {
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Digits as written in the name, e.g. `1.000`
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Per-axis scale factors
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub x: ScaleFactor,
    pub y: ScaleFactor,
    pub z: ScaleFactor,
}

impl Scale {
    /// `[x, y, z]` as numbers
    pub fn factors(&self) -> [f64; 3] {
        [self.x.value, self.y.value, self.z.value]
    }
}

impl fmt::Display for Scale {
    /// `_-_Scale_x<fx>_y<fy>_z<fz>` suffix, digits exactly as extracted
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}_y{}_z{}", SCALE_MARKER, self.x, self.y, self.z)
    }
}

/// Which grammar a name matched, with its captures
#[derive(Debug, Clone, PartialEq)]
pub enum NameShape {
    /// No mixed/scaled markers
    Plain,
    Scaled { scale: Scale },
    Mixed { dend: String, axon: String },
    MixedScaled { dend: String, axon: String, scale: Scale },
}

/// Metadata extracted from a morphology name
#[derive(Debug, Clone, PartialEq)]
pub struct NameMetadata {
    name: String,
    cloned: bool,
    shape: NameShape,
}

impl NameMetadata {
    /// Extract metadata from a morphology name
    ///
    /// # Errors
    ///
    /// Returns `MorphoError::MalformedName` if a marker is present but the name
    /// does not match the grammar it selects. Scale factors are unsigned
    /// decimals with digits on both sides of the point; text after the `z`
    /// factor is ignored.
    pub fn extract(morpho_name: &str) -> MorphoResult<Self> {
        let cloned = morpho_name.contains(CLONE_MARKER);
        let scaled = morpho_name.contains(SCALE_MARKER);
        let mixed = morpho_name.contains(MIXED_MARKER);

        let name = match morpho_name.find(CLONE_MARKER) {
            Some(pos) => &morpho_name[..pos],
            None => morpho_name,
        };

        let malformed = || MorphoError::MalformedName(morpho_name.to_string());

        let (canonical, shape) = match (mixed, scaled) {
            (true, true) => {
                let caps = SCALED_MIXED_PATTERN.captures(name).ok_or_else(malformed)?;
                let canonical = match name.find(SCALE_MARKER) {
                    Some(pos) => &name[..pos],
                    None => name,
                };
                let shape = NameShape::MixedScaled {
                    dend: caps["dend"].to_string(),
                    axon: caps["axon"].to_string(),
                    scale: parse_scale(&caps, morpho_name)?,
                };
                (canonical.to_string(), shape)
            }
            (false, true) => {
                let caps = SCALED_PATTERN.captures(name).ok_or_else(malformed)?;
                let shape = NameShape::Scaled {
                    scale: parse_scale(&caps, morpho_name)?,
                };
                (caps["name"].to_string(), shape)
            }
            (true, false) => {
                let caps = MIXED_PATTERN.captures(name).ok_or_else(malformed)?;
                let shape = NameShape::Mixed {
                    dend: caps["dend"].to_string(),
                    axon: caps["axon"].to_string(),
                };
                (name.to_string(), shape)
            }
            (false, false) => (name.to_string(), NameShape::Plain),
        };

        Ok(Self {
            name: canonical,
            cloned,
            shape,
        })
    }

    /// Canonical name with clone and scale suffixes stripped
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cloned(&self) -> bool {
        self.cloned
    }

    pub fn scaled(&self) -> bool {
        matches!(
            self.shape,
            NameShape::Scaled { .. } | NameShape::MixedScaled { .. }
        )
    }

    pub fn mixed(&self) -> bool {
        matches!(
            self.shape,
            NameShape::Mixed { .. } | NameShape::MixedScaled { .. }
        )
    }

    pub fn shape(&self) -> &NameShape {
        &self.shape
    }

    pub fn scale(&self) -> Option<&Scale> {
        match &self.shape {
            NameShape::Scaled { scale } | NameShape::MixedScaled { scale, .. } => Some(scale),
            _ => None,
        }
    }

    pub fn scale_x(&self) -> Option<f64> {
        self.scale().map(|s| s.x.value())
    }

    pub fn scale_y(&self) -> Option<f64> {
        self.scale().map(|s| s.y.value())
    }

    pub fn scale_z(&self) -> Option<f64> {
        self.scale().map(|s| s.z.value())
    }

    /// Donor of the dendrites of a mixed morphology
    pub fn dend(&self) -> Option<&str> {
        match &self.shape {
            NameShape::Mixed { dend, .. } | NameShape::MixedScaled { dend, .. } => Some(dend.as_str()),
            _ => None,
        }
    }

    /// Donor of the axon of a mixed morphology
    pub fn axon(&self) -> Option<&str> {
        match &self.shape {
            NameShape::Mixed { axon, .. } | NameShape::MixedScaled { axon, .. } => Some(axon.as_str()),
            _ => None,
        }
    }

    /// `<name>_-_Scale_x<fx>_y<fy>_z<fz>` for scaled names, with the original digits
    pub fn scaled_name(&self) -> Option<String> {
        self.scale().map(|scale| format!("{}{}", self.name, scale))
    }
}

fn parse_scale(caps: &Captures<'_>, morpho_name: &str) -> MorphoResult<Scale> {
    let component = |group: &str| -> MorphoResult<ScaleFactor> {
        let text = &caps[group];
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(ScaleFactor {
                value,
                text: text.to_string(),
            }),
            _ => Err(MorphoError::MalformedName(format!(
                "{} ({} = '{}' is not a decimal number)",
                morpho_name, group, text
            ))),
        }
    };
    Ok(Scale {
        x: component("scale_x")?,
        y: component("scale_y")?,
        z: component("scale_z")?,
    })
}
