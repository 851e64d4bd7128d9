use crate::gradle::GradleUpdateResults;
use crate::version::RevisionLevel;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A project's dependency as it appears in a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub group: String,
    pub name: String,
    pub version: Option<String>,
    pub project_url: Option<String>,
    pub user_reason: Option<String>,
}

impl Dependency {
    /// `group:name`
    pub fn label(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }

    fn sort_cmp(&self, other: &Self) -> Ordering {
        self.group
            .cmp(&other.group)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.version.cmp(&other.version))
            .then_with(|| self.project_url.cmp(&other.project_url))
            .then_with(|| self.user_reason.cmp(&other.user_reason))
    }
}

/// The latest version found, stored under the revision level it was found at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionAvailable {
    pub release: Option<String>,
    pub milestone: Option<String>,
    pub integration: Option<String>,
}

impl VersionAvailable {
    pub fn at(revision: RevisionLevel, version: Option<String>) -> Self {
        match revision {
            RevisionLevel::Release => Self {
                release: version,
                ..Self::default()
            },
            RevisionLevel::Milestone => Self {
                milestone: version,
                ..Self::default()
            },
            RevisionLevel::Integration => Self {
                integration: version,
                ..Self::default()
            },
        }
    }

    pub fn get(&self, revision: RevisionLevel) -> Option<&str> {
        match revision {
            RevisionLevel::Release => self.release.as_deref(),
            RevisionLevel::Milestone => self.milestone.as_deref(),
            RevisionLevel::Integration => self.integration.as_deref(),
        }
    }
}

/// A dependency with a later version available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyOutdated {
    #[serde(flatten)]
    pub dependency: Dependency,
    pub available: VersionAvailable,
}

/// A dependency whose version is newer than the latest one found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyLatest {
    #[serde(flatten)]
    pub dependency: Dependency,
    pub latest: String,
}

/// A dependency whose latest version could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyUnresolved {
    #[serde(flatten)]
    pub dependency: Dependency,
    pub reason: String,
}

/// Access to the common dependency fields of every report entry.
pub trait ReportEntry {
    fn dependency(&self) -> &Dependency;
}

impl ReportEntry for Dependency {
    fn dependency(&self) -> &Dependency {
        self
    }
}

impl ReportEntry for DependencyOutdated {
    fn dependency(&self) -> &Dependency {
        &self.dependency
    }
}

impl ReportEntry for DependencyLatest {
    fn dependency(&self) -> &Dependency {
        &self.dependency
    }
}

impl ReportEntry for DependencyUnresolved {
    fn dependency(&self) -> &Dependency {
        &self.dependency
    }
}

/// A group of dependencies with its size precomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependenciesGroup<T> {
    pub count: usize,
    pub dependencies: Vec<T>,
}

impl<T: ReportEntry> DependenciesGroup<T> {
    /// Sorts by group, name, version, project URL and user reason.
    pub fn new(mut dependencies: Vec<T>) -> Self {
        dependencies.sort_by(|a, b| a.dependency().sort_cmp(b.dependency()));
        Self {
            count: dependencies.len(),
            dependencies,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// The result of a dependency update analysis.
///
/// `count` is the number of dependencies over all five groups; `current`
/// holds the up-to-date ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    pub count: usize,
    pub current: DependenciesGroup<Dependency>,
    pub outdated: DependenciesGroup<DependencyOutdated>,
    pub exceeded: DependenciesGroup<DependencyLatest>,
    pub undeclared: DependenciesGroup<Dependency>,
    pub unresolved: DependenciesGroup<DependencyUnresolved>,
    pub gradle: GradleUpdateResults,
}
