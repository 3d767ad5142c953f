//! Where the work-order export comes from and how it is fetched.
//!
//! Remote sources get a bounded timeout and a fixed number of retries;
//! any failure that survives the retries is reported as
//! [`MonitorError::SourceUnavailable`].

use crate::error::{MonitorError, Result};
use std::fmt;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_SOURCE_URL: &str = "https://streamlitmaps.s3.amazonaws.com/data_orders.csv";

const USER_AGENT: &str = concat!("maintenance-monitor/", env!("CARGO_PKG_VERSION"));
const RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// Anything starting with `http://` or `https://` is fetched over the
    /// network, everything else is read as a local path.
    pub fn parse(s: &str) -> Source {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::File(PathBuf::from(s))
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Url(DEFAULT_SOURCE_URL.to_string())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct Fetcher {
    client: reqwest::blocking::Client,
    retries: u32,
}

impl Fetcher {
    pub fn new(timeout: Duration, retries: u32) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Fetcher { client, retries })
    }

    /// Raw bytes of the export, still in its original encoding.
    pub fn fetch(&self, source: &Source) -> Result<Vec<u8>> {
        match source {
            Source::Url(url) => self.fetch_url(url),
            Source::File(path) => {
                info!(path = %path.display(), "reading work orders from file");
                std::fs::read(path).map_err(|e| MonitorError::SourceUnavailable {
                    source_name: source.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn fetch_url(&self, url: &str) -> Result<Vec<u8>> {
        let mut reason = String::new();
        for attempt in 0..=self.retries {
            if attempt > 0 {
                warn!(url = %url, attempt, error = %reason, "retrying work-order download");
                sleep(RETRY_DELAY);
            }
            info!(url = %url, "downloading work orders");
            match self.try_get(url) {
                Ok(bytes) => {
                    info!(bytes = bytes.len(), "download complete");
                    return Ok(bytes);
                }
                Err(e) => reason = e,
            }
        }
        Err(MonitorError::SourceUnavailable {
            source_name: url.to_string(),
            reason,
        })
    }

    fn try_get(&self, url: &str) -> std::result::Result<Vec<u8>, String> {
        let resp = self.client.get(url).send().map_err(|e| e.to_string())?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("server returned {}", status.as_u16()));
        }
        let bytes = resp.bytes().map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }
}
