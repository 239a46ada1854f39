use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A data-transformation model as supplied by the host catalog.
///
/// Fixed fields cover everything the selection engine reads. Anything else
/// the catalog carries (compiled SQL, column docs, interpretation output)
/// rides along in `extra` and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Unique model name, the addressing key for selection expressions.
    pub name: String,

    /// Source file path within the host project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Target schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Target database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Materialization strategy (view, table, incremental, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materialization: Option<String>,

    /// Tags referenced by `tag:` selection criteria.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Names of models this model directly references. May name models
    /// absent from the supplied collection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Description of what the model produces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Pass-through payload the engine never interprets.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ModelRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            schema: None,
            database: None,
            materialization: None,
            tags: Vec::new(),
            depends_on: Vec::new(),
            description: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn materialization(mut self, materialization: impl Into<String>) -> Self {
        self.materialization = Some(materialization.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}
