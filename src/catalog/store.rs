//! The per-body feature catalog, built once at startup.

use super::loader;
use super::types::{FeatureRecord, LoadError, SourceSpec};
use std::collections::HashMap;
use std::path::Path;
use tokio::task::{self, JoinSet};

type LoadFn = fn(&Path, usize) -> Result<Vec<FeatureRecord>, LoadError>;

/// Immutable mapping from lowercase body id to its features in source order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    bodies: HashMap<String, Vec<FeatureRecord>>,
}

/// What happened to each source during [`Catalog::build`].
#[derive(Debug, Default)]
pub struct BuildReport {
    /// (body, record count) for every source that loaded.
    pub loaded: Vec<(String, usize)>,
    pub failed: Vec<LoadError>,
}

impl Catalog {
    /// Load every source concurrently and assemble the catalog.
    ///
    /// A failing source is reported and skipped; the others still load.
    /// Results are inserted in `sources` order, so when two sources map to
    /// the same body the later one replaces the earlier.
    pub async fn build(sources: Vec<SourceSpec>) -> (Self, BuildReport) {
        Self::build_with(sources, loader::load_source).await
    }

    async fn build_with(sources: Vec<SourceSpec>, load: LoadFn) -> (Self, BuildReport) {
        let mut tasks = JoinSet::new();
        let mut slots: HashMap<task::Id, usize> = HashMap::with_capacity(sources.len());
        for (slot, spec) in sources.iter().cloned().enumerate() {
            let handle = tasks.spawn_blocking(move || load(&spec.path, spec.skip_lines));
            slots.insert(handle.id(), slot);
        }

        let mut outcomes: Vec<Option<Result<Vec<FeatureRecord>, LoadError>>> =
            (0..sources.len()).map(|_| None).collect();

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, result)) => (id, result),
                Err(e) => {
                    let id = e.id();
                    let body = slots
                        .get(&id)
                        .map_or("<unknown>", |&slot| sources[slot].body.as_str())
                        .to_string();
                    (
                        id,
                        Err(LoadError::Task {
                            body,
                            reason: e.to_string(),
                        }),
                    )
                }
            };
            if let Some(&slot) = slots.get(&id) {
                outcomes[slot] = Some(outcome);
            }
        }

        let mut catalog = Self::default();
        let mut report = BuildReport::default();
        for (spec, outcome) in sources.into_iter().zip(outcomes) {
            match outcome {
                Some(Ok(records)) => {
                    tracing::info!(
                        body = %spec.body,
                        path = %spec.path.display(),
                        records = records.len(),
                        "loaded source"
                    );
                    if catalog.bodies.contains_key(&spec.body) {
                        tracing::warn!(body = %spec.body, "duplicate body id, replacing earlier source");
                    }
                    report.loaded.push((spec.body.clone(), records.len()));
                    catalog.bodies.insert(spec.body, records);
                }
                Some(Err(e)) => {
                    tracing::warn!(body = %spec.body, error = %e, "skipping source");
                    report.failed.push(e);
                }
                None => {}
            }
        }

        (catalog, report)
    }

    /// Assemble a catalog from already-loaded records (tests, embedding).
    pub fn from_bodies<I, S>(bodies: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<FeatureRecord>)>,
        S: Into<String>,
    {
        Self {
            bodies: bodies
                .into_iter()
                .map(|(id, records)| (id.into().to_lowercase(), records))
                .collect(),
        }
    }

    /// Body ids, sorted.
    pub fn body_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.bodies.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Features of `body` (already lowercase), or `None` if it has no data.
    pub fn features(&self, body: &str) -> Option<&[FeatureRecord]> {
        self.bodies.get(body).map(Vec::as_slice)
    }

    pub fn contains(&self, body: &str) -> bool {
        self.bodies.contains_key(body)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn source(dir: &Path, file: &str, body: &str, contents: &str) -> SourceSpec {
        let path = dir.join(file);
        fs::write(&path, contents).unwrap();
        SourceSpec {
            body: body.into(),
            path,
            skip_lines: 0,
        }
    }

    #[tokio::test]
    async fn test_build_loads_each_body() {
        let dir = TempDir::new().unwrap();
        let sources = vec![
            source(dir.path(), "mars.csv", "mars", "Feature Name\nGale\nJezero\n"),
            source(dir.path(), "moon.csv", "moon", "Feature Name\nTycho\n"),
        ];

        let (catalog, report) = Catalog::build(sources).await;
        assert_eq!(catalog.body_ids(), vec!["mars", "moon"]);
        assert_eq!(catalog.features("mars").unwrap().len(), 2);
        assert_eq!(catalog.features("moon").unwrap()[0].name, "Tycho");
        assert_eq!(report.loaded.len(), 2);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn test_failed_source_does_not_block_others() {
        let dir = TempDir::new().unwrap();
        let missing = SourceSpec {
            body: "pluto".into(),
            path: dir.path().join("pluto.csv"),
            skip_lines: 0,
        };
        let sources = vec![
            missing,
            source(dir.path(), "venus.csv", "venus", "Feature Name\nMaat Mons\n"),
        ];

        let (catalog, report) = Catalog::build(sources).await;
        assert!(!catalog.contains("pluto"));
        assert!(catalog.contains("venus"));
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0], LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_body_last_wins() {
        let dir = TempDir::new().unwrap();
        let sources = vec![
            source(dir.path(), "a.csv", "mars", "Feature Name\nOld\n"),
            source(dir.path(), "b.csv", "mars", "Feature Name\nNew\n"),
        ];

        let (catalog, _) = Catalog::build(sources).await;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.features("mars").unwrap()[0].name, "New");
    }

    #[tokio::test]
    async fn test_panicking_load_names_its_body() {
        fn load(path: &Path, skip_lines: usize) -> Result<Vec<FeatureRecord>, LoadError> {
            if path.ends_with("titan.csv") {
                panic!("loader blew up");
            }
            loader::load_source(path, skip_lines)
        }

        let dir = TempDir::new().unwrap();
        let sources = vec![
            source(dir.path(), "titan.csv", "titan", "Feature Name\nKraken Mare\n"),
            source(dir.path(), "moon.csv", "moon", "Feature Name\nTycho\n"),
        ];

        let (catalog, report) = Catalog::build_with(sources, load).await;
        assert_eq!(catalog.body_ids(), vec!["moon"]);
        assert_eq!(report.failed.len(), 1);
        match &report.failed[0] {
            LoadError::Task { body, reason } => {
                assert_eq!(body, "titan");
                assert!(reason.contains("panic"), "{}", reason);
            }
            other => panic!("expected a task failure, got {:?}", other),
        }
    }

    #[test]
    fn test_from_bodies_lowercases() {
        let catalog = Catalog::from_bodies([("Mars", Vec::new())]);
        assert!(catalog.contains("mars"));
        assert!(!catalog.contains("Mars"));
    }
}
