use crate::error::Result;
use crate::record::ModelRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk catalog document: `{ "models": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub models: Vec<ModelRecord>,
}

impl Manifest {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Source of model records for the selection engine.
///
/// Decouples selection from where the catalog lives (manifest file, meta
/// database, in-memory fixture).
pub trait ModelCatalog {
    fn list_models(&self) -> Result<Vec<ModelRecord>>;
}

/// Catalog backed by a JSON manifest file.
pub struct ManifestCatalog {
    path: PathBuf,
}

impl ManifestCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelCatalog for ManifestCatalog {
    fn list_models(&self) -> Result<Vec<ModelRecord>> {
        Ok(Manifest::load(&self.path)?.models)
    }
}

impl ModelCatalog for Vec<ModelRecord> {
    fn list_models(&self) -> Result<Vec<ModelRecord>> {
        Ok(self.clone())
    }
}
