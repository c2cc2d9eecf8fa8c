// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration file to typed morphology views, through the umbrella crate.

use std::fs;
use std::sync::Arc;

use morphodb::prelude::*;
use morphodb::structures::{save_morphology_json, SectionRecord, ROOT_PARENT};
use tempfile::{tempdir, TempDir};

const NEURON: &str = "C060114A5";

/// Soma ring, an axon, one basal and one apical trunk with two tufts
fn neuron_properties() -> MorphologyProperties {
    MorphologyProperties {
        points: vec![
            // soma contour
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
            // axon
            [0.0, -1.0, 0.0],
            [0.0, -30.0, 0.0],
            // basal
            [1.0, 0.0, 0.0],
            [12.0, 0.0, 0.0],
            // apical trunk
            [0.0, 1.0, 0.0],
            [0.0, 50.0, 0.0],
            // tufts
            [0.0, 50.0, 0.0],
            [5.0, 60.0, 0.0],
            [0.0, 50.0, 0.0],
            [-5.0, 60.0, 0.0],
        ],
        diameters: vec![
            2.0, 2.0, 2.0, 2.0, 0.5, 0.5, 1.0, 0.8, 2.0, 1.5, 1.0, 0.8, 1.0, 0.8,
        ],
        perimeters: Vec::new(),
        structure: vec![
            SectionRecord::new(0, SectionType::Soma, ROOT_PARENT),
            SectionRecord::new(4, SectionType::Axon, 0),
            SectionRecord::new(6, SectionType::BasalDendrite, 0),
            SectionRecord::new(8, SectionType::ApicalDendrite, 0),
            SectionRecord::new(10, SectionType::ApicalDendrite, 3),
            SectionRecord::new(12, SectionType::ApicalDendrite, 3),
        ],
    }
}

/// Database stored with a non-default extension, plus its config file
fn database() -> (TempDir, MorphoDbConfig) {
    let dir = tempdir().unwrap();
    let loader = JsonMorphologyLoader::with_extension("morph");
    let scaled = format!("{}_-_Scale_x1.000_y0.975_z1.000", NEURON);
    for name in [NEURON, scaled.as_str()] {
        save_morphology_json(&loader.morphology_path(dir.path(), name), &neuron_properties())
            .unwrap();
    }
    fs::write(
        dir.path().join("neurondb.dat"),
        format!("{} 5 L5_TPC\n{} 5 L5_TPC\n", NEURON, scaled),
    )
    .unwrap();

    let config_path = dir.path().join("morphodb.toml");
    fs::write(
        &config_path,
        format!(
            "[database]\npath = {:?}\nclassification_file = \"neurondb.dat\"\nmorphology_extension = \"morph\"\n",
            dir.path().to_str().unwrap()
        ),
    )
    .unwrap();

    let config = load_config(Some(&config_path), None).expect("Failed to load config");
    (dir, config)
}

#[test]
fn test_config_to_typed_views() {
    let (_dir, config) = database();
    let mut registry = open_registry(&config).expect("Failed to open registry");

    let morphology = registry.lookup(NEURON).unwrap();
    assert_eq!(morphology.layer(), Some(5));
    assert_eq!(morphology.mtype(), Some("L5_TPC"));
    assert_eq!(morphology.path().extension().unwrap(), "morph");

    // raw accessors do not need the tree
    assert_eq!(morphology.number_of_points(), 14);
    assert_eq!(morphology.number_of_sections(), 6);
    assert!(!morphology.is_tree_built());

    assert_eq!(morphology.axon().unwrap().len(), 1);
    assert_eq!(morphology.basal_dendrites().unwrap().len(), 1);
    assert_eq!(morphology.apical_dendrites().unwrap().len(), 3);
    assert_eq!(morphology.dendrites().unwrap().len(), 4);
    assert_eq!(morphology.neurites().unwrap().len(), 5);
    assert!(morphology.is_tree_built());

    let soma = morphology.soma().unwrap();
    assert_eq!(soma.profile_points().len(), 4);
    assert_eq!(soma.centroid(), Some([0.0, 0.0, 0.0]));
    assert_eq!(soma.children().len(), 3);
}

#[test]
fn test_tree_queries_through_morphology() {
    let (_dir, config) = database();
    let mut registry = open_registry(&config).unwrap();
    let morphology = registry.lookup(NEURON).unwrap();

    let tuft_path: Vec<usize> = morphology
        .path_to_soma(5)
        .unwrap()
        .iter()
        .map(|section| section.id())
        .collect();
    assert_eq!(tuft_path, vec![5, 3, 0]);
    assert_eq!(morphology.parent(0).unwrap().map(|s| s.id()), None);

    let bounds = morphology.bounding_box().unwrap().unwrap();
    assert_eq!(bounds.min, [-5.0, -30.0, 0.0]);
    assert_eq!(bounds.max, [12.0, 60.0, 0.0]);

    let subset = morphology.subset("apical_dendrites").unwrap();
    assert_eq!(subset.len(), 3);
    assert!(matches!(
        morphology.subset("spines"),
        Err(MorphoError::AttributeNotFound(_))
    ));
}

#[test]
fn test_scaled_name_classified_by_full_name() {
    let (_dir, config) = database();
    let mut registry = open_registry(&config).unwrap();

    let scaled = registry
        .lookup("C060114A5_-_Scale_x1.000_y0.975_z1.000")
        .unwrap();
    assert_eq!(scaled.label(), NEURON);
    assert_eq!(scaled.name_attrs().scale_y(), Some(0.975));
    assert_eq!(scaled.layer(), Some(5));
}

#[test]
fn test_shared_registry_from_config() {
    let (_dir, config) = database();
    let shared = SharedMorphologyRegistry::new(open_registry(&config).unwrap());

    let first = shared.lookup(NEURON).unwrap();
    let second = shared.clone().lookup(NEURON).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}
