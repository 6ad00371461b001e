//! Hierarchy service
//!
//! Loads person records from a JSON file and builds the org hierarchy.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, JsonResultExt};
use crate::domain::{HierarchyBuilder, HierarchyIssue, HierarchyNode, HierarchyStats, PersonRecord};
use crate::infrastructure::traits::FileSystem;

/// Result of building a hierarchy.
#[derive(Debug, Clone)]
pub struct HierarchyOutput {
    /// Root nodes with nested reports
    pub forest: Vec<HierarchyNode>,
    /// Data-quality findings absorbed while building
    pub issues: Vec<HierarchyIssue>,
    pub stats: HierarchyStats,
}

/// Accepted record file layouts: a bare array, or an object wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    List(Vec<PersonRecord>),
    Wrapped {
        #[serde(alias = "items")]
        records: Vec<PersonRecord>,
    },
}

impl RecordDocument {
    fn into_records(self) -> Vec<PersonRecord> {
        match self {
            RecordDocument::List(records) | RecordDocument::Wrapped { records } => records,
        }
    }
}

/// Service for building hierarchies from record files.
pub struct HierarchyService {
    fs: Arc<dyn FileSystem>,
    strict: bool,
}

impl HierarchyService {
    /// Create a new hierarchy service.
    ///
    /// In strict mode any absorbed issue fails the build.
    pub fn new(fs: Arc<dyn FileSystem>, strict: bool) -> Self {
        Self { fs, strict }
    }

    /// Read person records from a JSON file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_records(&self, path: &Path) -> ApplicationResult<Vec<PersonRecord>> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("records file not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read records", path)?;
        let document: RecordDocument = serde_json::from_str(&content).invalid_input(path)?;
        let records = document.into_records();

        debug!("load_records: {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Build the hierarchy for already loaded records.
    pub fn build_records(&self, records: &[PersonRecord]) -> ApplicationResult<HierarchyOutput> {
        let arena = HierarchyBuilder::new().build(records)?;
        let issues = arena.issues().to_vec();

        if self.strict && !issues.is_empty() {
            return Err(ApplicationError::StrictMode { issues });
        }

        let stats = arena.stats();
        Ok(HierarchyOutput {
            forest: arena.into_forest(),
            issues,
            stats,
        })
    }

    /// Load records from `path` and build their hierarchy.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self, path: &Path) -> ApplicationResult<HierarchyOutput> {
        let records = self.load_records(path)?;
        self.build_records(&records)
    }
}
