use super::MetadataSource;
use crate::error::{Result, VersionsError};
use crate::model::{Coordinate, DependencyStatus, NONE};
use crate::version::{RevisionLevel, VersionComparator};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rayon::prelude::*;
use regex::Regex;
use std::sync::Arc;

/// Determines the latest version of declared dependencies at a revision level.
pub struct LatestVersionResolver {
    source: Arc<dyn MetadataSource>,
    revision: RevisionLevel,
    reject: Vec<Regex>,
}

impl LatestVersionResolver {
    /// `reject_patterns` are regexes matched against the candidate version
    /// and against `group:artifact:version`.
    pub fn new(
        source: Arc<dyn MetadataSource>,
        revision: RevisionLevel,
        reject_patterns: &[String],
    ) -> Result<Self> {
        let reject = reject_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    VersionsError::Config(format!("Invalid reject-versions pattern '{pattern}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source,
            revision,
            reject,
        })
    }

    fn is_rejected(&self, coordinate: &Coordinate, candidate: &str) -> bool {
        let notation = format!("{}:{}:{}", coordinate.group, coordinate.artifact, candidate);
        self.reject
            .iter()
            .any(|re| re.is_match(candidate) || re.is_match(&notation))
    }

    pub fn resolve(&self, coordinate: &Coordinate) -> DependencyStatus {
        if coordinate.is_undeclared() {
            return DependencyStatus::resolved(coordinate.clone(), NONE, None);
        }

        let key = coordinate.key();
        let versions = match self.source.fetch_versions(&key) {
            Ok(versions) => versions,
            Err(e) => {
                tracing::warn!("Failed to resolve {}: {}", key, e);
                return DependencyStatus::unresolved(coordinate.clone(), e.to_string());
            }
        };
        if versions.is_empty() {
            return DependencyStatus::unresolved(
                coordinate.clone(),
                format!("No versions of {key} found in any repository"),
            );
        }

        let candidates: Vec<String> = versions
            .into_iter()
            .filter(|candidate| !self.is_rejected(coordinate, candidate))
            .collect();
        match VersionComparator::select_latest(&candidates, self.revision) {
            Some(latest) => {
                tracing::debug!("Latest {} version of {}: {}", self.revision, key, latest);
                DependencyStatus::resolved(coordinate.clone(), latest, None)
            }
            None => DependencyStatus::unresolved(
                coordinate.clone(),
                format!(
                    "No {} version of {key} remains after rejection rules",
                    self.revision
                ),
            ),
        }
    }

    /// Resolves every coordinate in parallel, keeping the input order.
    pub fn resolve_all(&self, coordinates: &[Coordinate], show_progress: bool) -> Vec<DependencyStatus> {
        let pb = ProgressBar::new(coordinates.len() as u64);
        if !show_progress {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::default_bar().template("  [{bar:40}] {pos}/{len} {msg}") {
            pb.set_style(style.progress_chars("=>-"));
        }

        let statuses = coordinates
            .par_iter()
            .map(|coordinate| {
                pb.set_message(format!("Checking {}", coordinate.key()));
                let status = self.resolve(coordinate);
                pb.inc(1);
                status
            })
            .collect();
        pb.finish_and_clear();
        statuses
    }
}
