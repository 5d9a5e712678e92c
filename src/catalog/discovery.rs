//! Data directory discovery: one CSV file per body.

use super::loader::body_id_for;
use super::types::{DiscoveryError, SourceSpec};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// List the sources in `dir` whose extension matches `extension`
/// (case-insensitive), sorted by file name.
///
/// `skip_lines` maps a body id to its preamble length; bodies not listed
/// have none.
pub fn discover_sources(
    dir: &Path,
    extension: &str,
    skip_lines: &HashMap<String, usize>,
) -> Result<Vec<SourceSpec>, DiscoveryError> {
    let entries = fs::read_dir(dir).map_err(|source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        })
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .filter_map(|path| {
            let body = body_id_for(&path)?;
            let skip = skip_lines.get(&body).copied().unwrap_or(0);
            Some(SourceSpec {
                body,
                path,
                skip_lines: skip,
            })
        })
        .collect())
}
