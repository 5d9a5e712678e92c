//! Feature catalog subsystem.
//!
//! Discovers one CSV source per celestial body, loads each into typed
//! records, and holds the result as an immutable per-body catalog.

pub mod discovery;
pub mod loader;
pub mod store;
pub mod types;

pub use discovery::discover_sources;
pub use loader::{body_id_for, load_source};
pub use store::{BuildReport, Catalog};
pub use types::{DiscoveryError, FeatureRecord, LoadError, SourceSpec};
