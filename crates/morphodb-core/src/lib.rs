// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

/*!
# morphodb-core

Domain layer of morphodb:

- `name_metadata` - flags and parameters encoded in morphology names
  (cloned / scaled / mixed)
- `morphology` - a morphology wrapping an open raw reader, with the section
  tree built lazily on the first topology query
- `registry` - name -> cached morphology, classified by layer and mtype

## Data flow

```text
MorphologyRegistry::lookup(name)
    │  classification table -> (layer, mtype)
    ▼
Morphology::open(dir, name, loader)  ── raw reader opened eagerly
    │
    ▼
typed views (axon, dendrites, soma, ...)  ── MorphoTree built on first use
```

Copyright 2025 MorphoDB Contributors
Licensed under the Apache License, Version 2.0
*/

pub mod morphology;
pub mod name_metadata;
pub mod registry;

pub use morphology::{Morphology, SectionSubset};
pub use name_metadata::{NameMetadata, NameShape, Scale};
pub use registry::{
    load_classification_table, parse_classification_line, Classification, MorphologyRegistry,
    SharedMorphologyRegistry,
};
