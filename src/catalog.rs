//! Manifest catalog: which datasets exist and which dates each one has.
//!
//! The manifest is fetched once at startup and is read-only afterwards.
//! Dates are not ordered at rest; consumers sort. "Latest" means the
//! lexicographic maximum, which is chronological for ISO dates.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dates: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub datasets: Vec<DatasetEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct ManifestCatalog {
    manifest: Manifest,
}

impl ManifestCatalog {
    pub fn new(manifest: Manifest) -> Self {
        Self { manifest }
    }

    /// Dataset (id, display name) pairs in manifest order.
    pub fn datasets(&self) -> Vec<(String, String)> {
        self.manifest
            .datasets
            .iter()
            .map(|d| (d.id.clone(), d.name.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.datasets.is_empty()
    }

    pub fn first_dataset_id(&self) -> Option<&str> {
        self.manifest.datasets.first().map(|d| d.id.as_str())
    }

    /// Dates for a dataset, as stored (unsorted).
    pub fn dates(&self, dataset_id: &str) -> Result<&[String]> {
        match self.manifest.datasets.iter().find(|d| d.id == dataset_id) {
            Some(d) => Ok(&d.dates),
            None => bail!("unknown dataset: {}", dataset_id),
        }
    }

    /// Dates sorted newest-first.
    pub fn dates_desc(&self, dataset_id: &str) -> Result<Vec<String>> {
        let mut dates = self.dates(dataset_id)?.to_vec();
        dates.sort();
        dates.reverse();
        Ok(dates)
    }

    pub fn latest_date(&self, dataset_id: &str) -> Result<Option<String>> {
        Ok(self.dates_desc(dataset_id)?.into_iter().next())
    }

    pub fn display_name(&self, dataset_id: &str) -> Option<&str> {
        self.manifest
            .datasets
            .iter()
            .find(|d| d.id == dataset_id)
            .map(|d| d.name.as_str())
    }
}
