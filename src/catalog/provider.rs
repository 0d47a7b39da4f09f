//! Corpus provider boundary
//!
//! The query engine consumes the catalog through this trait so the backing
//! storage (YAML directory, SQLite cache, in-memory seed) stays swappable.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::catalog::component::Component;
use crate::catalog::filter::FilterCriteria;

/// Facet fields a provider can enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetField {
    Manufacturer,
    PrimaryCategory,
    QualityLevel,
}

/// Errors surfaced by corpus providers
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backing storage cannot be reached; the core does not retry
    #[error("corpus storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    #[error("failed to parse component file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Read access to the component corpus
pub trait CorpusProvider {
    /// List components matching the criteria, preserving storage order
    fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Component>, ProviderError>;

    /// Distinct values observed for a facet field, sorted and deduplicated
    fn distinct_values(&self, field: FacetField) -> Result<Vec<String>, ProviderError> {
        let components = self.list(&FilterCriteria::default())?;
        let mut values: Vec<String> = components
            .iter()
            .map(|c| match field {
                FacetField::Manufacturer => c.manufacturer.clone(),
                FacetField::PrimaryCategory => c.primary_category.clone(),
                FacetField::QualityLevel => c.quality_level.clone(),
            })
            .filter(|v| !v.is_empty())
            .collect();
        values.sort();
        values.dedup();
        Ok(values)
    }
}

/// Corpus backed by a directory of `*.cqt.yaml` component files
///
/// Files are visited in path order so repeated scans observe the same
/// corpus order (relevant for stable sorting downstream). Unparseable
/// files are reported, not skipped silently.
pub struct YamlCorpus {
    dir: PathBuf,
}

impl YamlCorpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_all(&self) -> Result<Vec<Component>, ProviderError> {
        let mut components = Vec::new();
        if !self.dir.exists() {
            return Ok(components);
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(&self.dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.to_string_lossy().ends_with(".cqt.yaml"))
            .collect();
        paths.sort();

        for path in paths {
            let content = std::fs::read_to_string(&path)?;
            let component: Component =
                serde_yaml::from_str(&content).map_err(|e| ProviderError::Parse {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            components.push(component);
        }

        Ok(components)
    }
}

impl CorpusProvider for YamlCorpus {
    fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Component>, ProviderError> {
        let components = self.load_all()?;
        if criteria.is_empty() {
            return Ok(components);
        }
        Ok(components
            .into_iter()
            .filter(|c| criteria.matches(c))
            .collect())
    }
}

/// In-memory corpus, used by tests and bulk-import previews
pub struct MemoryCorpus {
    components: Vec<Component>,
}

impl MemoryCorpus {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }
}

impl CorpusProvider for MemoryCorpus {
    fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Component>, ProviderError> {
        Ok(self
            .components
            .iter()
            .filter(|c| criteria.matches(c))
            .cloned()
            .collect())
    }
}
