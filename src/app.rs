//! Dashboard orchestrator: the explicit state-update + re-render cycle.
//!
//! User intent flows one way: a mutator updates the selection (or loads a
//! new document), availability is re-derived, the test/style choice is
//! re-resolved, and the caller asks for a fresh projection. Nothing is
//! cached between steps and there are no process-wide singletons.

use anyhow::Result;
use serde_json::Value;

use crate::catalog::{Manifest, ManifestCatalog};
use crate::logging::{json_log, log, obj, v_num, v_str, Domain, Level};
use crate::model::validate_document;
use crate::projection::{availability, project, resolve_choice, Availability, Projection};
use crate::render::{ascii_chart, chart_config};
use crate::source::DataSource;
use crate::state::{DataStore, Metric, Selection, Threading};

pub struct Dashboard {
    catalog: ManifestCatalog,
    store: DataStore,
    selection: Selection,
    dataset: Option<String>,
    date: Option<String>,
}

impl Dashboard {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            catalog: ManifestCatalog::new(manifest),
            store: DataStore::new(),
            selection: Selection::default(),
            dataset: None,
            date: None,
        }
    }

    /// Fetch the manifest through the source and start with an empty store.
    pub async fn bootstrap(source: &dyn DataSource) -> Result<Self> {
        let manifest = source.fetch_manifest().await?;
        json_log(
            Domain::Catalog,
            "manifest_loaded",
            obj(&[("datasets", v_num(manifest.datasets.len() as f64))]),
        );
        Ok(Self::new(manifest))
    }

    pub fn catalog(&self) -> &ManifestCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Select a dataset and load its latest date (or nothing, if the
    /// dataset has no dates). Unknown ids propagate as NotFound errors;
    /// callers log and keep prior state.
    pub async fn select_dataset(&mut self, source: &dyn DataSource, dataset_id: &str) -> Result<()> {
        let latest = self.catalog.latest_date(dataset_id)?;
        self.dataset = Some(dataset_id.to_string());
        match latest {
            Some(date) => self.select_date(source, &date).await,
            None => {
                self.date = None;
                self.store.clear();
                self.refresh_choices();
                Ok(())
            }
        }
    }

    /// Load the document for the current dataset at `date`. A failed fetch
    /// leaves the prior document in place.
    pub async fn select_date(&mut self, source: &dyn DataSource, date: &str) -> Result<()> {
        let dataset_id = match &self.dataset {
            Some(id) => id.clone(),
            None => return Ok(()),
        };
        match source.fetch_document(&dataset_id, date).await {
            Ok(doc) => {
                let report = validate_document(&doc);
                for warning in &report.warnings {
                    log(
                        Level::Warn,
                        Domain::Store,
                        "document_warning",
                        obj(&[("detail", v_str(warning))]),
                    );
                }
                json_log(
                    Domain::Store,
                    "document_loaded",
                    obj(&[
                        ("dataset", v_str(&dataset_id)),
                        ("date", v_str(date)),
                        ("updated", v_str(&doc.updated)),
                        ("runs", v_num(report.runs as f64)),
                        ("records", v_num(report.records as f64)),
                    ]),
                );
                self.date = Some(date.to_string());
                self.store.load(doc);
                self.refresh_choices();
                Ok(())
            }
            Err(err) => {
                log(
                    Level::Error,
                    Domain::Fetch,
                    "document_fetch_failed",
                    obj(&[
                        ("dataset", v_str(&dataset_id)),
                        ("date", v_str(date)),
                        ("error", v_str(&format!("{:#}", err))),
                    ]),
                );
                Ok(())
            }
        }
    }

    pub fn set_test(&mut self, test: Option<String>) {
        self.selection.set_test(test);
    }

    pub fn set_style(&mut self, style: Option<String>) {
        self.selection.set_style(style);
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.selection.set_metric(metric);
    }

    /// Threading changes reshape which tests/styles are offered, so the
    /// current choice is re-resolved against the new availability.
    pub fn set_threading(&mut self, threading: Threading) {
        self.selection.set_threading(threading);
        self.refresh_choices();
    }

    pub fn availability(&self) -> Availability {
        match self.store.current() {
            Some(doc) => availability(doc, self.selection.threading),
            None => Availability::default(),
        }
    }

    fn refresh_choices(&mut self) {
        let avail = self.availability();
        self.selection.test = resolve_choice(self.selection.test.as_ref(), &avail.tests);
        self.selection.style = resolve_choice(self.selection.style.as_ref(), &avail.styles);
        json_log(
            Domain::Project,
            "choices_resolved",
            obj(&[
                ("threading", v_str(self.selection.threading.as_str())),
                ("tests", v_num(avail.tests.len() as f64)),
                ("styles", v_num(avail.styles.len() as f64)),
                ("test", v_str(self.selection.test.as_deref().unwrap_or(""))),
                ("style", v_str(self.selection.style.as_deref().unwrap_or(""))),
            ]),
        );
    }

    /// Compute a fresh projection from the current store + selection.
    pub fn projection(&self) -> Projection {
        match self.store.current() {
            Some(doc) => project(doc, &self.selection),
            None => Projection::default(),
        }
    }

    pub fn chart_json(&self) -> Value {
        chart_config(&self.projection(), self.selection.metric)
    }

    pub fn chart_text(&self) -> String {
        ascii_chart(&self.projection(), self.selection.metric)
    }
}
