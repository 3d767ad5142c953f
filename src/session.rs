//! Owned, explicitly refreshed cache of the canonical dataset.
//!
//! A [`Session`] fetches the export once and answers every filter and
//! aggregation from memory until [`Session::refresh`] is called again.

use crate::error::Result;
use crate::filter::{
    apply_filters, org_group_options, process_area_options, FilterSpec, UnmappedPolicy,
};
use crate::loader::{load_and_clean, LoadReport};
use crate::mapping::OrgTable;
use crate::reports::build_dashboard;
use crate::source::{Fetcher, Source};
use crate::types::{CanonicalRecord, DashboardSummary};
use chrono::{DateTime, Utc};
use tracing::info;

/// Work orders derived from one fetch of the source. Never mutated.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<CanonicalRecord>,
    report: LoadReport,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn from_bytes(bytes: &[u8], table: &OrgTable) -> Result<Self> {
        let (records, report) = load_and_clean(bytes, table)?;
        Ok(Dataset {
            records,
            report,
            loaded_at: Utc::now(),
        })
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Records admitted by `policy` that match `spec`.
    pub fn view(&self, spec: &FilterSpec, policy: UnmappedPolicy) -> Vec<&CanonicalRecord> {
        apply_filters(self.records.iter().filter(|r| policy.admits(r)), spec)
    }
}

pub struct Session {
    source: Source,
    fetcher: Fetcher,
    org_table: OrgTable,
    policy: UnmappedPolicy,
    dataset: Option<Dataset>,
}

impl Session {
    /// Nothing is fetched until [`Session::refresh`] or
    /// [`Session::ensure_loaded`].
    pub fn new(source: Source, fetcher: Fetcher, org_table: OrgTable, policy: UnmappedPolicy) -> Self {
        Session {
            source,
            fetcher,
            org_table,
            policy,
            dataset: None,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn policy(&self) -> UnmappedPolicy {
        self.policy
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Fetch and rebuild the dataset. On failure the previous dataset, if
    /// any, stays in place.
    pub fn refresh(&mut self) -> Result<&Dataset> {
        let dataset = self.load()?;
        let dataset: &Dataset = self.dataset.insert(dataset);
        Ok(dataset)
    }

    pub fn ensure_loaded(&mut self) -> Result<&Dataset> {
        let dataset = match self.dataset.take() {
            Some(dataset) => dataset,
            None => self.load()?,
        };
        let dataset: &Dataset = self.dataset.insert(dataset);
        Ok(dataset)
    }

    fn load(&self) -> Result<Dataset> {
        let bytes = self.fetcher.fetch(&self.source)?;
        let dataset = Dataset::from_bytes(&bytes, &self.org_table)?;
        info!(source = %self.source, rows = dataset.records.len(), "dataset rebuilt");
        Ok(dataset)
    }

    /// Working subset for `spec`; empty when nothing has been loaded.
    pub fn view(&self, spec: &FilterSpec) -> Vec<&CanonicalRecord> {
        self.dataset
            .as_ref()
            .map(|d| d.view(spec, self.policy))
            .unwrap_or_default()
    }

    pub fn dashboard(&self, spec: &FilterSpec) -> DashboardSummary {
        build_dashboard(&self.view(spec), spec)
    }

    pub fn org_options(&self) -> Vec<String> {
        let records = self.dataset.as_ref().map(|d| d.records()).unwrap_or_default();
        org_group_options(records, self.policy)
    }

    pub fn process_options(&self) -> Vec<String> {
        let records = self.dataset.as_ref().map(|d| d.records()).unwrap_or_default();
        process_area_options(records, self.policy)
    }
}
