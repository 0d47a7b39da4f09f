//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::{EntityId, EntityPrefix};

/// Represents a cqt project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .cqt/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            let cqt_dir = current.join(".cqt");
            if cqt_dir.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let cqt_dir = root.join(".cqt");
        if cqt_dir.exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        Self::write_structure(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .cqt/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(&root)?;
        Ok(Self { root })
    }

    fn write_structure(root: &Path) -> Result<(), ProjectError> {
        let cqt_dir = root.join(".cqt");
        std::fs::create_dir_all(&cqt_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = cqt_dir.join("config.yaml");
        std::fs::write(&config_path, Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        for dir in Self::entity_directories() {
            std::fs::create_dir_all(root.join(dir))
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# cqt Project Configuration

# Default author for imported components and traceability records
# author: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto

# Default page size for catalog queries
# page_size: 20
"#
    }

    /// The data directories scanned for entity files
    pub fn entity_directories() -> &'static [&'static str] {
        &["catalog/components", "traceability/records"]
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .cqt configuration directory
    pub fn cqt_dir(&self) -> PathBuf {
        self.root.join(".cqt")
    }

    /// Get the component catalog directory
    pub fn catalog_dir(&self) -> PathBuf {
        self.root.join(Self::entity_directory(EntityPrefix::Cmp))
    }

    /// Get the traceability records directory
    pub fn records_dir(&self) -> PathBuf {
        self.root.join(Self::entity_directory(EntityPrefix::Trc))
    }

    /// Get the path for a new entity file
    pub fn entity_path(&self, prefix: EntityPrefix, id: &EntityId) -> PathBuf {
        self.root
            .join(Self::entity_directory(prefix))
            .join(format!("{}.cqt.yaml", id))
    }

    /// Get the directory for a given entity prefix
    pub fn entity_directory(prefix: EntityPrefix) -> &'static str {
        match prefix {
            EntityPrefix::Cmp => "catalog/components",
            EntityPrefix::Trc => "traceability/records",
        }
    }

    /// Iterate all entity files of a given prefix type
    pub fn iter_entity_files(&self, prefix: EntityPrefix) -> impl Iterator<Item = PathBuf> {
        let dir = self.root.join(Self::entity_directory(prefix));
        walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().to_string_lossy().ends_with(".cqt.yaml"))
            .map(|e| e.path().to_path_buf())
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a cqt project (searched from {searched_from:?}). Run 'cqt init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("cqt project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
