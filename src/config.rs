use crate::error::{Result, VersionsError};
use crate::gradle::{DEFAULT_GRADLE_VERSIONS_API, GradleReleaseChannel};
use crate::reporter::OutputFormat;
use crate::repository::RepositorySpec;
use crate::repository::maven::validate_repository_url;
use crate::update::UpdateRules;
use crate::version::RevisionLevel;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings of a report run, read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReportSettings {
    pub revision: RevisionLevel,
    /// Comma-separated formatter names; empty writes no report files.
    pub output_formatter: String,
    pub output_dir: PathBuf,
    pub report_file_name: String,
    pub check_for_gradle_update: bool,
    pub gradle_release_channel: GradleReleaseChannel,
    pub gradle_versions_api: String,
    /// Regexes; matching candidate versions are never picked as latest.
    pub reject_versions: Vec<String>,
    pub repositories: Vec<RepositorySpec>,
    /// Rules of the `update` command.
    pub update: UpdateRules,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            revision: RevisionLevel::Milestone,
            output_formatter: "text".to_string(),
            output_dir: PathBuf::from("build/dependencyUpdates"),
            report_file_name: "report".to_string(),
            check_for_gradle_update: true,
            gradle_release_channel: GradleReleaseChannel::ReleaseCandidate,
            gradle_versions_api: DEFAULT_GRADLE_VERSIONS_API.to_string(),
            reject_versions: Vec::new(),
            repositories: RepositorySpec::defaults(),
            update: UpdateRules::default(),
        }
    }
}

/// Values given on the command line; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub revision: Option<RevisionLevel>,
    pub output_formatter: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub report_file_name: Option<String>,
    pub gradle_release_channel: Option<GradleReleaseChannel>,
    pub gradle_versions_api: Option<String>,
    pub no_gradle_check: bool,
}

impl ReportSettings {
    /// Defaults, then `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    VersionsError::Config(format!("Cannot read {}: {e}", path.display()))
                })?;
                toml::from_str(&content)?
            }
            None => ReportSettings::default(),
        };
        Ok(settings)
    }

    pub fn apply(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(revision) = overrides.revision {
            self.revision = revision;
        }
        if let Some(formatter) = overrides.output_formatter {
            self.output_formatter = formatter;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(name) = overrides.report_file_name {
            self.report_file_name = name;
        }
        if let Some(channel) = overrides.gradle_release_channel {
            self.gradle_release_channel = channel;
        }
        if let Some(api) = overrides.gradle_versions_api {
            self.gradle_versions_api = api;
        }
        if overrides.no_gradle_check {
            self.check_for_gradle_update = false;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.report_file_name.trim().is_empty()
            || self.report_file_name.contains(['/', '\\'])
        {
            return Err(VersionsError::Config(format!(
                "Invalid report file name '{}'",
                self.report_file_name
            )));
        }
        for repository in &self.repositories {
            validate_repository_url(&repository.url)?;
        }
        Ok(())
    }

    pub fn formats(&self) -> Vec<OutputFormat> {
        OutputFormat::parse_list(&self.output_formatter)
    }

    /// `<output-dir>/<report-file-name>.<extension>`
    pub fn report_path(&self, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{extension}", self.report_file_name))
    }
}
