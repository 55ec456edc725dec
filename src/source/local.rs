//! Local directory source: the same static-file layout read from disk.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

use super::{log_fetch, DataSource};
use crate::catalog::Manifest;
use crate::model::BenchmarkDocument;

pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, rel: &str) -> Result<Vec<u8>> {
        let path = self.root.join(rel);
        let body = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        log_fetch(&path.display().to_string(), &body);
        Ok(body)
    }
}

#[async_trait]
impl DataSource for LocalSource {
    async fn fetch_manifest(&self) -> Result<Manifest> {
        let body = self.read("manifest.json")?;
        serde_json::from_slice(&body).context("decode manifest.json")
    }

    async fn fetch_document(&self, dataset_id: &str, date: &str) -> Result<BenchmarkDocument> {
        let rel = format!("{}/{}.json", dataset_id, date);
        let body = self.read(&rel)?;
        serde_json::from_slice(&body).with_context(|| format!("decode {}", rel))
    }
}
