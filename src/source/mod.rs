//! Data sources: where manifest and document JSON come from.
//!
//! The dashboard core never talks to the network directly; it goes through
//! the `DataSource` seam. Two implementations: HTTP (the deployed layout of
//! static JSON behind a base URL) and a local directory with the same
//! layout, which is also what the tests use.
//!
//! Layout, both sources:
//! ```text
//! manifest.json
//! {dataset_id}/{date}.json
//! ```

pub mod http;
pub mod local;

use anyhow::Result;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::catalog::Manifest;
use crate::logging::{json_log, obj, v_num, v_str, Domain};
use crate::model::BenchmarkDocument;

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_manifest(&self) -> Result<Manifest>;
    async fn fetch_document(&self, dataset_id: &str, date: &str) -> Result<BenchmarkDocument>;
}

/// SHA-256 of a raw fetched body, hex-encoded. Logged with every fetch so
/// a rendered chart can be traced back to exact input bytes.
pub fn body_sha256(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

pub(crate) fn log_fetch(location: &str, body: &[u8]) {
    json_log(
        Domain::Fetch,
        "fetched",
        obj(&[
            ("location", v_str(location)),
            ("bytes", v_num(body.len() as f64)),
            ("sha256", v_str(&body_sha256(body))),
        ]),
    );
}
