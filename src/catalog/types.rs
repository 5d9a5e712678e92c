//! Core types for the catalog subsystem.

use crate::coords::CoordinateSystem;
use std::path::PathBuf;
use thiserror::Error;

/// One named surface feature on one body, as ingested.
///
/// Numeric fields that could not be parsed hold `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub name: String,
    /// Kilometers.
    pub diameter: f64,
    pub center_latitude: f64,
    /// Degrees, in the row's own convention.
    pub center_longitude: f64,
    pub coordinate_system: CoordinateSystem,
    pub origin: String,
    pub feature_type: Option<String>,
    pub approval_date: Option<f64>,
    pub approval_status: Option<String>,
}

/// One data source handed to the loader by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Lowercase body identifier, e.g. "mars".
    pub body: String,
    pub path: PathBuf,
    /// Preamble lines to drop before the header row.
    pub skip_lines: usize,
}

/// Failure to ingest one source. The body is left out of the catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV stream in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("loader task for {body} did not complete: {reason}")]
    Task { body: String, reason: String },
}

/// Failure to enumerate the data directory.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot list data directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
