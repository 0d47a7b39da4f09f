//! Entity loading and writing utilities
//!
//! Generic helpers for moving entities between YAML files and memory,
//! reducing boilerplate in command implementations.

use miette::{IntoDiagnostic, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::entity::Entity;

/// Load all entities of type T from a directory
///
/// Scans the directory recursively for `.cqt.yaml` files and deserializes
/// them in path order. Files that fail to parse are silently skipped.
pub fn load_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut entities = Vec::new();

    if !dir.exists() {
        return Ok(entities);
    }

    let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.to_string_lossy().ends_with(".cqt.yaml"))
        .collect();
    paths.sort();

    for path in paths {
        if let Ok(content) = fs::read_to_string(&path) {
            if let Ok(entity) = serde_yaml::from_str::<T>(&content) {
                entities.push(entity);
            }
        }
    }

    Ok(entities)
}

/// Find an entity file by ID (supports partial matching)
///
/// Searches for a file whose stem contains the given ID.
/// Returns the first match found.
pub fn find_entity_file(dir: &Path, id: &str) -> Option<PathBuf> {
    if !dir.exists() {
        return None;
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.to_string_lossy().ends_with(".cqt.yaml"))
        .collect();
    paths.sort();

    paths.into_iter().find(|path| {
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        filename.contains(id)
    })
}

/// Load a single entity by ID
///
/// Searches for an entity file matching the ID and deserializes it.
/// Returns the path and entity if found.
pub fn load_entity<T: DeserializeOwned>(dir: &Path, id: &str) -> Result<Option<(PathBuf, T)>> {
    if let Some(path) = find_entity_file(dir, id) {
        let content = fs::read_to_string(&path).into_diagnostic()?;
        let entity: T = serde_yaml::from_str(&content).into_diagnostic()?;
        return Ok(Some((path, entity)));
    }
    Ok(None)
}

/// Write an entity to its canonical file under the given directory
///
/// The filename is `<ID>.cqt.yaml`. Returns the written path.
pub fn write_entity<T: Entity>(dir: &Path, entity: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir).into_diagnostic()?;
    let path = dir.join(format!("{}.cqt.yaml", entity.id()));
    let yaml = serde_yaml::to_string(entity).into_diagnostic()?;
    fs::write(&path, yaml).into_diagnostic()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Component;
    use tempfile::tempdir;

    #[test]
    fn test_load_all_empty_dir() {
        let dir = tempdir().unwrap();
        let result: Result<Vec<serde_json::Value>> = load_all(dir.path());
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_load_all_nonexistent_dir() {
        let result: Result<Vec<serde_json::Value>> = load_all(Path::new("/nonexistent/path"));
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_write_then_find_and_load() {
        let dir = tempdir().unwrap();
        let cmp = Component::new(
            "LM324AN".to_string(),
            "TI".to_string(),
            "模拟集成电路".to_string(),
            "test".to_string(),
        );
        let id = cmp.id.to_string();

        let path = write_entity(dir.path(), &cmp).unwrap();
        assert!(path.exists());

        let found = find_entity_file(dir.path(), &id).unwrap();
        assert_eq!(found, path);

        let (loaded_path, loaded): (PathBuf, Component) =
            load_entity(dir.path(), &id).unwrap().unwrap();
        assert_eq!(loaded_path, path);
        assert_eq!(loaded.part_number, "LM324AN");
    }

    #[test]
    fn test_find_entity_file_nonexistent() {
        assert!(find_entity_file(Path::new("/nonexistent/path"), "CMP-123").is_none());
    }
}
