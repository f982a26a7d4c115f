pub mod config;
pub use config::{Config, DisplayConfig, ExportConfig, LoadingConfig, ProfilingConfig};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvLensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    /// the input could not be loaded; fatal for the whole run
    #[error("Error reading '{}': {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<CsvLensError>,
    },
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

impl CsvLensError {
    pub fn load(path: impl Into<PathBuf>, source: CsvLensError) -> Self {
        Self::Load {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

pub type Result<T> = std::result::Result<T, CsvLensError>;
