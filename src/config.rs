// Command-line and environment configuration.
//
// Every flag has an environment fallback; a `.env` file in the working
// directory is loaded before parsing.
use crate::error::Result;
use crate::filter::{FilterSpec, Selection, UnmappedPolicy};
use crate::mapping::{parse_org_entry, OrgTable};
use crate::source::{Fetcher, Source, DEFAULT_SOURCE_URL};
use crate::types::{OrgGroup, ProcessArea};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "maintenance-monitor", about = "Maintenance work-order dashboard", version)]
pub struct Args {
    /// URL or local path of the semicolon-delimited work-order export
    #[arg(long, env = "MAINT_SOURCE", default_value = DEFAULT_SOURCE_URL)]
    pub source: String,

    /// Download timeout in seconds
    #[arg(long, env = "MAINT_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Extra download attempts after the first failure
    #[arg(long, env = "MAINT_RETRIES", default_value_t = 1)]
    pub retries: u32,

    /// Initial org group filter (AA, AC, AM, unmapped or All)
    #[arg(long, default_value = "All")]
    pub org: Selection<OrgGroup>,

    /// Initial process area filter (Production, Purification, Distribution or All)
    #[arg(long, default_value = "All")]
    pub process: Selection<ProcessArea>,

    /// Whether rows with an unknown org code stay visible
    #[arg(long, env = "MAINT_UNMAPPED", value_enum, default_value_t = UnmappedPolicy::Surface)]
    pub unmapped: UnmappedPolicy,

    /// Additional org table entry, CODE=GROUP (repeatable)
    #[arg(long = "org-map", value_parser = parse_org_entry)]
    pub org_map: Vec<(i64, OrgGroup)>,

    /// Directory for exported CSV/JSON files
    #[arg(long, env = "MAINT_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Rows shown per table preview
    #[arg(long, default_value_t = 12)]
    pub preview_rows: usize,

    /// Load, report and exit without the interactive menu
    #[arg(long)]
    pub batch: bool,
}

impl Args {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Args::parse()
    }

    pub fn source(&self) -> Source {
        Source::parse(&self.source)
    }

    pub fn fetcher(&self) -> Result<Fetcher> {
        Fetcher::new(Duration::from_secs(self.timeout_secs), self.retries)
    }

    pub fn org_table(&self) -> OrgTable {
        OrgTable::with_extra(self.org_map.iter().copied())
    }

    pub fn filter(&self) -> FilterSpec {
        FilterSpec {
            org_group: self.org,
            process_area: self.process,
        }
    }
}
