//! Chart loading service
//!
//! Reads chart files through the `FileSystem` boundary and turns them into engines.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, ChartFile, IoResultExt};
use crate::domain::{OrgEngine, RedoPolicy};
use crate::infrastructure::traits::FileSystem;

/// Service for reading and exporting org charts.
pub struct ChartService {
    fs: Arc<dyn FileSystem>,
}

impl ChartService {
    /// Create a new chart service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a chart file.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<ChartFile> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("chart not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::Chart {
                path: path.to_path_buf(),
                message: "not a file".to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read chart", path)?;
        let chart = ChartFile::parse(&content).map_err(|e| ApplicationError::Chart {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(
            "load: root={}, employees={}",
            chart.root.id,
            chart.employees.len()
        );
        Ok(chart)
    }

    /// Load a chart file straight into an engine.
    pub fn load_engine(&self, path: &Path, policy: RedoPolicy) -> ApplicationResult<OrgEngine> {
        let engine = self.load(path)?.into_engine(policy)?;
        Ok(engine)
    }

    /// Render the engine's current tree as chart TOML.
    pub fn export(&self, engine: &OrgEngine) -> ApplicationResult<String> {
        ChartFile::from_engine(engine)
            .to_toml()
            .map_err(|e| ApplicationError::OperationFailed {
                context: "serialize chart".to_string(),
                source: Box::new(e),
            })
    }
}
