//! Planetary Gazetteer — fuzzy search over planetary surface feature names.
//!
//! ```text
//! discovery ──► loader ──► Catalog ──► SearchService ──► HTTP / CLI
//!                                         │
//!                               fuzzy ◄───┴───► coords
//! ```
//!
//! The catalog is built once at startup and is read-only afterwards.

pub mod catalog;
pub mod config;
pub mod coords;
pub mod fuzzy;
pub mod search;
pub mod server;

pub use catalog::{Catalog, FeatureRecord};
pub use coords::{normalize, CoordinateSystem};
pub use search::{CoordinatePolicy, SearchError, SearchResponse, SearchResult, SearchService};
