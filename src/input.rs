use crate::error::{Result, VersionsError};
use crate::model::{Coordinate, DependencyStatus};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const SCHEMA_VERSION: u32 = 1;

/// The dependencies of one project, as exported by the build.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDocument {
    pub schema_version: u32,
    #[serde(default = "default_project_path")]
    pub project_path: String,
    pub gradle_version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<InputDependency>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDependency {
    pub group: String,
    pub name: String,
    pub version: Option<String>,
    pub user_reason: Option<String>,
    /// Latest version, when the build already resolved it.
    pub latest: Option<String>,
    pub project_url: Option<String>,
    /// Why resolving the latest version failed.
    pub unresolved: Option<String>,
}

fn default_project_path() -> String {
    ":".to_string()
}

/// Input dependencies split by how far they got.
#[derive(Debug, Default)]
pub struct PartitionedInput {
    /// Dependencies with a known latest version or a known failure.
    pub statuses: Vec<DependencyStatus>,
    /// Dependencies still waiting for a metadata lookup.
    pub pending: Vec<Coordinate>,
}

impl InputDependency {
    fn coordinate(&self) -> Coordinate {
        let version = self.version.as_deref().filter(|v| !v.trim().is_empty());
        Coordinate::new(Some(&self.group), Some(&self.name), version)
            .with_reason(self.user_reason.clone())
    }
}

impl InputDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            VersionsError::InvalidInput(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let document: InputDocument = serde_json::from_str(content)?;
        if document.schema_version != SCHEMA_VERSION {
            return Err(VersionsError::InvalidInput(format!(
                "Unsupported schemaVersion {} (expected {SCHEMA_VERSION})",
                document.schema_version
            )));
        }
        for (index, dependency) in document.dependencies.iter().enumerate() {
            if dependency.group.trim().is_empty() || dependency.name.trim().is_empty() {
                return Err(VersionsError::InvalidInput(format!(
                    "Dependency #{} must have a group and a name",
                    index + 1
                )));
            }
        }
        Ok(document)
    }

    pub fn partition(&self) -> PartitionedInput {
        let mut input = PartitionedInput::default();
        for dependency in &self.dependencies {
            let coordinate = dependency.coordinate();
            if let Some(reason) = &dependency.unresolved {
                input
                    .statuses
                    .push(DependencyStatus::unresolved(coordinate, reason.clone()));
            } else if let Some(latest) = &dependency.latest {
                input.statuses.push(DependencyStatus::resolved(
                    coordinate,
                    latest.clone(),
                    dependency.project_url.clone(),
                ));
            } else {
                input.pending.push(coordinate);
            }
        }
        input
    }
}
