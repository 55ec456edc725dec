//! HTTP source: static JSON behind a base URL.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{log_fetch, DataSource};
use crate::catalog::Manifest;
use crate::model::BenchmarkDocument;

pub struct HttpSource {
    client: Client,
    base: String,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{}", self.base, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;
        if !resp.status().is_success() {
            bail!("GET {} returned {}", url, resp.status());
        }
        let body = resp.bytes().await.with_context(|| format!("body of {}", url))?;
        log_fetch(&url, &body);
        Ok(body.to_vec())
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_manifest(&self) -> Result<Manifest> {
        let body = self.get_bytes("manifest.json").await?;
        serde_json::from_slice(&body).context("decode manifest.json")
    }

    async fn fetch_document(&self, dataset_id: &str, date: &str) -> Result<BenchmarkDocument> {
        let path = format!("{}/{}.json", dataset_id, date);
        let body = self.get_bytes(&path).await?;
        serde_json::from_slice(&body).with_context(|| format!("decode {}", path))
    }
}
