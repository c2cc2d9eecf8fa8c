// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tree reconstruction from a JSON file on disk.

use morphodb_structures::{
    save_morphology_json, JsonMorphologyLoader, MorphoTreeOps, MorphologyLoader,
    MorphologyProperties, SectionRecord, SectionType, ROOT_PARENT,
};
use tempfile::tempdir;

/// soma with one axon, two basal trunks and a bifurcating apical trunk
fn pyramidal_properties() -> MorphologyProperties {
    let mut points = Vec::new();
    let mut structure = Vec::new();
    let sections: [(SectionType, i32, [f32; 3]); 7] = [
        (SectionType::Soma, ROOT_PARENT, [0.0, 0.0, 0.0]),
        (SectionType::Axon, 0, [0.0, -1.0, 0.0]),
        (SectionType::BasalDendrite, 0, [1.0, 0.0, 0.0]),
        (SectionType::BasalDendrite, 0, [-1.0, 0.0, 0.0]),
        (SectionType::ApicalDendrite, 0, [0.0, 1.0, 0.0]),
        (SectionType::ApicalDendrite, 4, [0.0, 0.0, 1.0]),
        (SectionType::ApicalDendrite, 4, [0.0, 0.0, -1.0]),
    ];
    for (section_type, parent, direction) in sections {
        structure.push(SectionRecord::new(points.len() as u32, section_type, parent));
        for step in 0..3 {
            let s = step as f32 * 5.0;
            points.push([direction[0] * s, direction[1] * s, direction[2] * s]);
        }
    }
    let diameters = vec![1.5; points.len()];
    MorphologyProperties {
        points,
        diameters,
        perimeters: Vec::new(),
        structure,
    }
}

#[test]
fn test_tree_from_json_file() {
    let dir = tempdir().unwrap();
    let loader = JsonMorphologyLoader::new();
    let path = loader.morphology_path(dir.path(), "pyramidal");
    save_morphology_json(&path, &pyramidal_properties()).unwrap();

    let reader = loader.open(&path).expect("Failed to open morphology");
    let tree = reader.create_morpho_tree().expect("Failed to build tree");

    assert_eq!(tree.number_of_nodes().unwrap(), 7);
    assert_eq!(tree.find_nodes(SectionType::Axon).unwrap().len(), 1);
    assert_eq!(tree.find_nodes(SectionType::BasalDendrite).unwrap().len(), 2);
    assert_eq!(tree.find_nodes(SectionType::ApicalDendrite).unwrap().len(), 3);

    let apical_children: Vec<usize> = tree.children(4).unwrap().iter().map(|s| s.id()).collect();
    assert_eq!(apical_children, vec![5, 6]);

    let soma = tree.get_soma().unwrap();
    assert_eq!(soma.children().len(), 4);
}

#[test]
fn test_every_section_reaches_the_root() {
    let props = pyramidal_properties();
    let tree = morphodb_structures::MorphoTree::from_properties(&props).unwrap();
    for section in tree.get_all_nodes().unwrap() {
        let path = tree.path_to_soma(section.id()).unwrap();
        assert_eq!(path[0].id(), section.id());
        assert!(path[path.len() - 1].is_root());
    }
}

#[test]
fn test_section_lengths() {
    let tree = morphodb_structures::MorphoTree::from_properties(&pyramidal_properties()).unwrap();
    for section in tree.get_all_nodes().unwrap() {
        if section.is_root() {
            continue;
        }
        assert!((section.length() - 10.0).abs() < 1e-4, "section {}", section.id());
    }
}
