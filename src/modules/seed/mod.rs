//! One-time seed of the catalog.
//!
//! Categories and initial records are read from a JSON document at startup.
//! Without a configured path the bundled demo seed is used.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::features::catalog::models::FileRecord;
use crate::features::catalog::store::{RecordStore, StoreError};
use crate::features::categories::models::Category;

const BUNDLED_SEED: &str = include_str!("../../../seed/catalog.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate category id '{0}'")]
    DuplicateCategory(String),

    #[error("record {0} has updated_at before created_at")]
    InvalidTimestamps(uuid::Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub records: Vec<FileRecord>,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let data: SeedData = serde_json::from_str(json)?;
        data.check()?;
        Ok(data)
    }

    pub fn bundled() -> Result<Self, SeedError> {
        Self::from_json(BUNDLED_SEED)
    }

    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn check(&self) -> Result<(), SeedError> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.id.as_str()) {
                return Err(SeedError::DuplicateCategory(category.id.clone()));
            }
        }

        if let Some(record) = self.records.iter().find(|r| r.updated_at < r.created_at) {
            return Err(SeedError::InvalidTimestamps(record.id));
        }

        Ok(())
    }

    /// Split into the category list and a populated store
    pub fn into_parts(self) -> Result<(Vec<Category>, RecordStore), SeedError> {
        let store = RecordStore::from_records(self.records)?;
        Ok((self.categories, store))
    }
}
