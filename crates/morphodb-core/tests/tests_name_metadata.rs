// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for morphology name extraction.

use morphodb_core::{NameMetadata, NameShape};
use proptest::prelude::*;

/// Names without any of the three markers
fn plain_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9_+]{0,15}"
        .prop_filter("no markers", |s| !s.contains("dend-") && !s.contains("_-_"))
}

/// Decimal text as it appears in names, trailing zeros included
fn scale_text() -> impl Strategy<Value = String> {
    "[0-9]{1,3}\\.[0-9]{1,4}"
}

proptest! {
    /// Unmarked names are taken verbatim with no optional fields
    #[test]
    fn prop_plain_name_is_identity(name in plain_name()) {
        let meta = NameMetadata::extract(&name).unwrap();
        prop_assert_eq!(meta.name(), name.as_str());
        prop_assert!(!meta.cloned() && !meta.scaled() && !meta.mixed());
        prop_assert_eq!(meta.shape(), &NameShape::Plain);
        prop_assert!(meta.scale().is_none());
        prop_assert!(meta.dend().is_none() && meta.axon().is_none());
    }

    /// Scaled names re-serialize to their structured prefix
    #[test]
    fn prop_scaled_name_round_trip(
        name in plain_name(),
        sx in scale_text(),
        sy in scale_text(),
        sz in scale_text(),
    ) {
        let full = format!("{}_-_Scale_x{}_y{}_z{}", name, sx, sy, sz);
        let meta = NameMetadata::extract(&full).unwrap();
        prop_assert!(meta.scaled());
        prop_assert_eq!(meta.name(), name.as_str());
        prop_assert_eq!(meta.scaled_name(), Some(full));
        let scale = meta.scale().unwrap();
        prop_assert_eq!(scale.z.text(), sz.as_str());
        prop_assert_eq!(scale.z.value(), sz.parse::<f64>().unwrap());
    }

    /// Everything from the clone marker onward is dropped, whatever the flags
    #[test]
    fn prop_clone_suffix_never_in_name(
        name in plain_name(),
        suffix in "[A-Za-z0-9]{1,6}",
        scaled in any::<bool>(),
        mixed in any::<bool>(),
    ) {
        let mut base = if mixed {
            format!("dend-{}_axon-{}", name, name)
        } else {
            name.clone()
        };
        if scaled {
            base.push_str("_-_Scale_x1.0_y1.0_z1.0");
        }
        let full = format!("{}_-_Clone_{}", base, suffix);

        let meta = NameMetadata::extract(&full).unwrap();
        prop_assert!(meta.cloned());
        prop_assert!(!meta.name().contains("_-_Clone_"));
        prop_assert!(full.starts_with(meta.name()));
        prop_assert_eq!(meta.scaled(), scaled);
        prop_assert_eq!(meta.mixed(), mixed);
    }

    /// Extraction is deterministic
    #[test]
    fn prop_extraction_is_idempotent(name in "[A-Za-z0-9_+\\-]{1,24}") {
        let first = NameMetadata::extract(&name);
        let second = NameMetadata::extract(&name);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "extraction of {} was not deterministic", name),
        }
    }
}

#[test]
fn test_mixed_donors_with_hyphens() {
    let meta = NameMetadata::extract("dend-tkb061101a2_ch0_cc2_h_zk_60x_1_axon-C220797A-P3_-_Scale_x1.000_y1.025_z1.000").unwrap();
    assert_eq!(meta.dend(), Some("tkb061101a2_ch0_cc2_h_zk_60x_1"));
    assert_eq!(meta.axon(), Some("C220797A-P3"));
    assert_eq!(meta.name(), "dend-tkb061101a2_ch0_cc2_h_zk_60x_1_axon-C220797A-P3");
    assert_eq!(meta.scale_y(), Some(1.025));
}
