//! Feature search over the catalog.
//!
//! Lookup flow:  body id (lowercased) → catalog slot → fuzzy filter on names
//!               → coordinate normalization → response projection
//!
//! An empty query is an existence check, not a search.

use crate::catalog::{Catalog, FeatureRecord};
use crate::coords;
use crate::fuzzy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What to do with rows whose coordinate system is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinatePolicy {
    /// Pass them through; only the (-180, 180] wraparound is applied.
    #[default]
    Permissive,
    /// Leave them out of results.
    Strict,
}

impl fmt::Display for CoordinatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinatePolicy::Permissive => write!(f, "permissive"),
            CoordinatePolicy::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for CoordinatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("Unknown coordinate policy '{}'. Use 'permissive' or 'strict'.", s)),
        }
    }
}

/// One feature as returned to callers, in canonical coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub name: String,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub diameter: f64,
    pub origin: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
}

/// Wire shape of a search or listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    /// `{ "hasData": bool }`
    Existence {
        #[serde(rename = "hasData")]
        has_data: bool,
    },
    /// `{ "name": body, "result": [...] }`
    Matches {
        name: String,
        result: Vec<SearchResult>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no data for body '{0}'")]
    UnknownBody(String),
}

/// Read-only query front end over a built [`Catalog`].
#[derive(Debug)]
pub struct SearchService {
    catalog: Catalog,
    policy: CoordinatePolicy,
}

impl SearchService {
    pub fn new(catalog: Catalog, policy: CoordinatePolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn policy(&self) -> CoordinatePolicy {
        self.policy
    }

    /// Every body with data, sorted.
    pub fn list_bodies(&self) -> Vec<String> {
        self.catalog.body_ids()
    }

    /// Case-insensitive existence check.
    pub fn has_body(&self, body: &str) -> bool {
        self.catalog.contains(&body.to_lowercase())
    }

    /// Fuzzy search feature names on `body`.
    ///
    /// A missing or blank query short-circuits to `{ hasData: true }`.
    pub fn search(&self, body: &str, query: Option<&str>) -> Result<SearchResponse, SearchError> {
        let id = body.to_lowercase();
        let features = self
            .catalog
            .features(&id)
            .ok_or_else(|| SearchError::UnknownBody(id.clone()))?;

        let query = match query.map(str::trim) {
            Some(q) if !q.is_empty() => q,
            _ => return Ok(SearchResponse::Existence { has_data: true }),
        };

        let matches = fuzzy::filter(query, features, |f| f.name.as_str());
        tracing::debug!(body = %id, query, matches = matches.len(), "search");

        let result = matches
            .into_iter()
            .filter_map(|m| self.project(m.item))
            .collect();
        Ok(SearchResponse::Matches { name: id, result })
    }

    /// Every feature on `body`, in source order, in canonical coordinates.
    pub fn list(&self, body: &str) -> Result<SearchResponse, SearchError> {
        let id = body.to_lowercase();
        let features = self
            .catalog
            .features(&id)
            .ok_or_else(|| SearchError::UnknownBody(id.clone()))?;

        let result = features.iter().filter_map(|f| self.project(f)).collect();
        Ok(SearchResponse::Matches { name: id, result })
    }

    fn project(&self, feature: &FeatureRecord) -> Option<SearchResult> {
        if self.policy == CoordinatePolicy::Strict && !feature.coordinate_system.is_determined() {
            tracing::debug!(
                feature = %feature.name,
                system = %feature.coordinate_system,
                "dropping feature without a known coordinate system"
            );
            return None;
        }
        let (lat, lon) = coords::normalize(
            feature.center_latitude,
            feature.center_longitude,
            feature.coordinate_system,
        );
        Some(SearchResult {
            name: feature.name.clone(),
            center_latitude: lat,
            center_longitude: lon,
            diameter: feature.diameter,
            origin: feature.origin.clone(),
            feature_type: feature.feature_type.clone(),
        })
    }
}
