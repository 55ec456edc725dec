//! Benchmark document model and load-time quality checks.
//!
//! A document is the full output of one benchmark run set for one
//! (dataset, date): a list of runs, each run a renderer configuration with
//! one record per (test, style) pair measured across every raster size.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raster size label. Upstream emits these as numbers, but older
/// documents carry strings ("64", "CTX"), so both decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeLabel {
    Num(u64),
    Text(String),
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeLabel::Num(n) => write!(f, "{}", n),
            SizeLabel::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentOptions {
    pub sizes: Vec<SizeLabel>,
}

/// One (test, style) measurement across all sizes. `rcpms` is render calls
/// per millisecond, index-aligned with `options.sizes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub test: String,
    pub style: String,
    pub rcpms: Vec<f64>,
}

/// One renderer configuration's full record set. Threading mode is encoded
/// in the name ("agg ST", "skia 4T"), not carried as a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub name: String,
    #[serde(default)]
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkDocument {
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub options: DocumentOptions,
    #[serde(default)]
    pub runs: Vec<Run>,
}

/// Quality report over a freshly decoded document. Violations are warnings,
/// never load failures: the projection engine is total and tolerates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub runs: u64,
    pub records: u64,
    pub length_mismatches: u64,
    pub duplicate_records: u64,
    pub warnings: Vec<String>,
}

impl DocumentReport {
    pub fn is_clean(&self) -> bool {
        self.length_mismatches == 0 && self.duplicate_records == 0
    }
}

/// Check document invariants: every record's rcpms must be index-aligned
/// with the size axis, and a run carries at most one record per
/// (test, style) pair.
pub fn validate_document(doc: &BenchmarkDocument) -> DocumentReport {
    let mut warnings = Vec::new();
    let mut records = 0u64;
    let mut length_mismatches = 0u64;
    let mut duplicate_records = 0u64;
    let size_count = doc.options.sizes.len();

    for run in &doc.runs {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        for rec in &run.records {
            records += 1;
            if rec.rcpms.len() != size_count {
                length_mismatches += 1;
                warnings.push(format!(
                    "length_mismatch: run={} test={} style={} got={} expected={}",
                    run.name,
                    rec.test,
                    rec.style,
                    rec.rcpms.len(),
                    size_count
                ));
            }
            let key = (rec.test.as_str(), rec.style.as_str());
            if seen.contains(&key) {
                duplicate_records += 1;
                warnings.push(format!(
                    "duplicate_record: run={} test={} style={}",
                    run.name, rec.test, rec.style
                ));
            } else {
                seen.push(key);
            }
        }
    }

    DocumentReport {
        runs: doc.runs.len() as u64,
        records,
        length_mismatches,
        duplicate_records,
        warnings,
    }
}
