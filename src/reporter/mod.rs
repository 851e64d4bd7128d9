pub mod html;
pub mod json;
pub mod text;
pub mod xml;

use crate::gradle::GradleReleaseChannel;
use crate::report::ReportResult;
use crate::version::RevisionLevel;
use std::fmt;
use std::io::{self, Write};

pub use html::HtmlReporter;
pub use json::JsonReporter;
pub use text::PlainTextReporter;
pub use xml::XmlReporter;

/// Writes a report in one output format.
pub trait Reporter {
    fn write(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()>;

    fn file_extension(&self) -> &'static str;
}

/// What a reporter needs to know about the run besides the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterContext {
    pub project_path: String,
    pub revision: RevisionLevel,
    pub gradle_release_channel: GradleReleaseChannel,
}

impl Default for ReporterContext {
    fn default() -> Self {
        Self {
            project_path: ":".to_string(),
            revision: RevisionLevel::default(),
            gradle_release_channel: GradleReleaseChannel::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Text,
    Json,
    Xml,
    Html,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Html => "html",
        }
    }

    /// Parses a single formatter name. Unknown names select plain text.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "xml" => OutputFormat::Xml,
            "html" => OutputFormat::Html,
            "text" | "plain" | "txt" => OutputFormat::Text,
            other => {
                tracing::warn!("Unknown output formatter '{}', using plain text", other);
                OutputFormat::Text
            }
        }
    }

    /// Parses a comma-separated list such as `json,text`, dropping repeats.
    /// An empty list selects no formats.
    pub fn parse_list(names: &str) -> Vec<OutputFormat> {
        let mut formats = Vec::new();
        for name in names.split(',').filter(|name| !name.trim().is_empty()) {
            let format = Self::from_name(name);
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        formats
    }

    pub fn reporter(&self, context: &ReporterContext) -> Box<dyn Reporter> {
        match self {
            OutputFormat::Text => Box::new(PlainTextReporter::new(context.clone())),
            OutputFormat::Json => Box::new(JsonReporter),
            OutputFormat::Xml => Box::new(XmlReporter),
            OutputFormat::Html => Box::new(HtmlReporter::new(context.clone())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders a result in the given format.
pub fn render(
    result: &ReportResult,
    format: OutputFormat,
    context: &ReporterContext,
) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    format.reporter(context).write(&mut buffer, result)?;
    Ok(buffer)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::gradle::{
        GradleReleaseChannel, GradleStatus, GradleUpdateResults, ReleaseStatus,
    };
    use crate::report::{
        DependenciesGroup, Dependency, DependencyLatest, DependencyOutdated,
        DependencyUnresolved, ReportResult, VersionAvailable,
    };
    use crate::version::RevisionLevel;

    pub fn dependency(group: &str, name: &str, version: Option<&str>) -> Dependency {
        Dependency {
            group: group.to_string(),
            name: name.to_string(),
            version: version.map(str::to_string),
            ..Dependency::default()
        }
    }

    pub fn gradle(channel: GradleReleaseChannel) -> GradleUpdateResults {
        let status = GradleStatus {
            enabled: true,
            running: "8.5".to_string(),
            channels: [
                (GradleReleaseChannel::Current, ReleaseStatus::Available("8.6".into())),
                (
                    GradleReleaseChannel::ReleaseCandidate,
                    ReleaseStatus::Failure("timeout".into()),
                ),
                (GradleReleaseChannel::Nightly, ReleaseStatus::Unavailable),
            ]
            .into_iter()
            .collect(),
        };
        GradleUpdateResults::build(&status, channel)
    }

    /// One dependency in every group.
    pub fn sample() -> ReportResult {
        let current = DependenciesGroup::new(vec![Dependency {
            user_reason: Some("pinned by platform".into()),
            ..dependency("org.slf4j", "slf4j-api", Some("2.0.13"))
        }]);
        let outdated = DependenciesGroup::new(vec![DependencyOutdated {
            dependency: Dependency {
                project_url: Some("https://github.com/google/guava".into()),
                ..dependency("com.google.guava", "guava", Some("31.0-jre"))
            },
            available: VersionAvailable::at(RevisionLevel::Milestone, Some("33.2.1-jre".into())),
        }]);
        let exceeded = DependenciesGroup::new(vec![DependencyLatest {
            dependency: dependency("io.ktor", "ktor-client", Some("3.0.0")),
            latest: "2.3.12".to_string(),
        }]);
        let undeclared = DependenciesGroup::new(vec![dependency("org.junit", "junit-bom", None)]);
        let unresolved = DependenciesGroup::new(vec![DependencyUnresolved {
            dependency: dependency("com.example", "missing", Some("1.0")),
            reason: "Could not find any version".to_string(),
        }]);

        ReportResult {
            count: 5,
            current,
            outdated,
            exceeded,
            undeclared,
            unresolved,
            gradle: gradle(GradleReleaseChannel::ReleaseCandidate),
        }
    }

    pub fn empty() -> ReportResult {
        ReportResult {
            count: 0,
            current: DependenciesGroup::new(Vec::new()),
            outdated: DependenciesGroup::new(Vec::new()),
            exceeded: DependenciesGroup::new(Vec::new()),
            undeclared: DependenciesGroup::new(Vec::new()),
            unresolved: DependenciesGroup::new(Vec::new()),
            gradle: GradleUpdateResults::build(
                &GradleStatus::disabled("8.5"),
                GradleReleaseChannel::ReleaseCandidate,
            ),
        }
    }
}
