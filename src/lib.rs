//! Maintenance work-order dashboard core.
//!
//! Loads the semicolon-delimited Latin-1 work-order export, normalizes it
//! into [`CanonicalRecord`]s, and answers filtered counters and grouped
//! series for a presentation layer to draw.
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod mapping;
pub mod output;
pub mod period;
pub mod reports;
pub mod session;
pub mod source;
pub mod types;
pub mod util;

pub use error::{MonitorError, Result};
pub use filter::{FilterSpec, Selection, UnmappedPolicy};
pub use session::{Dataset, Session};
pub use types::{CanonicalRecord, DashboardSummary, OrderType, OrgGroup, ProcessArea};
