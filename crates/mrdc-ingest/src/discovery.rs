//! Dataset discovery: match files in a data directory to entities.

use std::path::{Path, PathBuf};

use mrdc_model::{ALL_ENTITIES, Entity};

use crate::error::{IngestError, Result};

const DATASET_EXTENSIONS: [&str; 2] = ["csv", "json"];

/// Source file for one entity, if present. `users.csv` wins over
/// `users.json` when both exist.
pub fn find_dataset(dir: &Path, entity: Entity) -> Option<PathBuf> {
    for extension in DATASET_EXTENSIONS {
        let candidate = dir.join(format!("{}.{extension}", entity.dataset_stem()));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// All entity datasets present in a directory, in pipeline order. Absent
/// entities are simply skipped; an absent directory is an error.
pub fn discover_datasets(dir: &Path) -> Result<Vec<(Entity, PathBuf)>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut found = Vec::new();
    for entity in ALL_ENTITIES {
        if let Some(path) = find_dataset(dir, entity) {
            found.push((entity, path));
        }
    }
    Ok(found)
}
