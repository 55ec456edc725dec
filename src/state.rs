//! Dashboard state: runtime config, the current selection, and the
//! document store.
//!
//! Selection mutators never validate against the store. An inconsistent
//! selection is a normal state and simply projects to nothing.

use serde::{Deserialize, Serialize};

use crate::model::BenchmarkDocument;

#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP base URL for manifest + documents. When unset, the local
    /// data directory is used instead.
    pub base_url: Option<String>,
    pub data_dir: String,
    pub dataset: Option<String>,
    pub date: Option<String>,
    pub test: Option<String>,
    pub style: Option<String>,
    pub metric: Metric,
    pub threading: Threading,
    pub output: Output,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("BENCH_BASE_URL").ok(),
            data_dir: std::env::var("BENCH_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            dataset: std::env::var("DATASET").ok(),
            date: std::env::var("DATE").ok(),
            test: std::env::var("TEST").ok(),
            style: std::env::var("STYLE").ok(),
            metric: Metric::from_str(std::env::var("METRIC").as_deref().unwrap_or("time")),
            threading: Threading::from_str(std::env::var("THREADING").as_deref().unwrap_or("st")),
            output: Output::from_str(std::env::var("OUTPUT").as_deref().unwrap_or("ascii")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Time,
    RenderCalls,
}

impl Metric {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "calls" | "render_calls" | "rcpms" => Metric::RenderCalls,
            _ => Metric::Time,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Time => "time",
            Metric::RenderCalls => "render_calls",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threading {
    Single,
    Multi,
}

impl Threading {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mt" | "multi" => Threading::Multi,
            _ => Threading::Single,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Threading::Single => "single",
            Threading::Multi => "multi",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Ascii,
    Json,
}

impl Output {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Output::Json,
            _ => Output::Ascii,
        }
    }
}

/// The user-driven part of the state. Mutated one field at a time;
/// never persisted across reloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    pub test: Option<String>,
    pub style: Option<String>,
    pub metric: Metric,
    pub threading: Threading,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            test: None,
            style: None,
            metric: Metric::Time,
            threading: Threading::Single,
        }
    }
}

impl Selection {
    pub fn set_test(&mut self, test: Option<String>) {
        self.test = test;
    }

    pub fn set_style(&mut self, style: Option<String>) {
        self.style = style;
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
    }

    pub fn set_threading(&mut self, threading: Threading) {
        self.threading = threading;
    }
}

/// Holds the currently loaded document. Each load fully supersedes the
/// prior document; readers never see a partial update.
#[derive(Debug, Default)]
pub struct DataStore {
    current: Option<BenchmarkDocument>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, doc: BenchmarkDocument) {
        self.current = Some(doc);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&BenchmarkDocument> {
        self.current.as_ref()
    }
}
