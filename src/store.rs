use crate::config::StorageConfig;
use crate::error::{InsightError, Result};
use log::debug;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Read access to the blobs behind the dashboard: letters as UTF-8 text and
/// insight tables as JSON arrays.
pub trait RecordStore {
    /// Returns [`InsightError::NotFound`] when `key` does not exist.
    fn fetch(&self, container: &str, key: &str) -> Result<String>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn fetch(&self, container: &str, key: &str) -> Result<String> {
        (**self).fetch(container, key)
    }
}

/// Serves `<root>/<container>/<key>` from the local filesystem, e.g. a synced
/// copy of the buckets.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.root)
    }

    fn path_for(&self, container: &str, key: &str) -> PathBuf {
        let mut path = self.root.join(container);
        path.extend(key.split('/').filter(|part| !part.is_empty()));
        path
    }
}

impl RecordStore for DirectoryStore {
    fn fetch(&self, container: &str, key: &str) -> Result<String> {
        if key.split('/').any(|part| part == "..") {
            return Err(not_found(container, key));
        }
        let path = self.path_for(container, key);
        debug!("Reading {}", path.display());
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => not_found(container, key),
            _ => InsightError::Io(e),
        })
    }
}

/// In-memory store, handy for tests and for callers that already hold the
/// tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: HashMap<(String, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, container: impl Into<String>, key: impl Into<String>, body: impl Into<String>) {
        self.objects.insert((container.into(), key.into()), body.into());
    }

    pub fn with(mut self, container: impl Into<String>, key: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(container, key, body);
        self
    }
}

impl RecordStore for MemoryStore {
    fn fetch(&self, container: &str, key: &str) -> Result<String> {
        self.objects
            .get(&(container.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| not_found(container, key))
    }
}

fn not_found(container: &str, key: &str) -> InsightError {
    InsightError::NotFound {
        container: container.to_string(),
        key: key.to_string(),
    }
}

/// Object keys used by the upstream extraction step.
pub mod keys {
    use crate::corpus::FundIdentifier;
    use crate::utils::{fund_slug, venture_slug};

    pub const PERFORMANCE_INSIGHTS: &str = "hedgefund_performance_insights.json";
    pub const GENERAL_INSIGHTS: &str = "hedgefund_general_insights.json";
    pub const VC_PERFORMANCE_INSIGHTS: &str = "vc_performance_insights.json";

    /// `greenlightcapital/cleaned/Greenlight Capital 2023 Q4.txt`
    pub fn letter(id: &FundIdentifier) -> String {
        format!("{}/cleaned/{}.txt", fund_slug(&id.fund_name), id)
    }

    /// `greenlightcapital/greenlightcapital_equities.json`
    pub fn equities(fund_name: &str) -> String {
        let slug = fund_slug(fund_name);
        format!("{slug}/{slug}_equities.json")
    }

    /// `sequoia/cleaned/Sequoia Capital 2023 Q4.txt`
    pub fn venture_letter(id: &FundIdentifier) -> String {
        format!("{}/cleaned/{}.txt", venture_slug(&id.fund_name), id)
    }

    /// `sequoia/sequoia_investments.json`
    pub fn venture_investments(fund_name: &str) -> String {
        let slug = venture_slug(fund_name);
        format!("{slug}/{slug}_investments.json")
    }
}
