use super::{Reporter, ReporterContext};
use crate::report::{Dependency, ReportResult};
use std::io::{self, Write};

const RULE: &str = "------------------------------------------------------------";

/// Plain text report, also used for the console.
pub struct PlainTextReporter {
    context: ReporterContext,
}

impl PlainTextReporter {
    pub fn new(context: ReporterContext) -> Self {
        Self { context }
    }

    fn write_header(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{RULE}")?;
        writeln!(
            out,
            "{} Project Dependency Updates (report to plain text file)",
            self.context.project_path
        )?;
        writeln!(out, "{RULE}")
    }

    fn write_up_to_date(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        if result.current.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(
            out,
            "The following dependencies are using the latest {} version:",
            self.context.revision
        )?;
        for dependency in &result.current.dependencies {
            writeln!(out, " - {}:{}", dependency.label(), version_of(dependency))?;
            write_detail(out, dependency.user_reason.as_deref())?;
        }
        Ok(())
    }

    fn write_exceeded(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        if result.exceeded.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(
            out,
            "The following dependencies exceed the version found at the {} revision level:",
            self.context.revision
        )?;
        for entry in &result.exceeded.dependencies {
            let dependency = &entry.dependency;
            writeln!(
                out,
                " - {} [{} <- {}]",
                dependency.label(),
                version_of(dependency),
                entry.latest
            )?;
            write_detail(out, dependency.user_reason.as_deref())?;
            write_detail(out, dependency.project_url.as_deref())?;
        }
        Ok(())
    }

    fn write_upgrades(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        if result.outdated.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(
            out,
            "The following dependencies have later {} versions:",
            self.context.revision
        )?;
        for entry in &result.outdated.dependencies {
            let dependency = &entry.dependency;
            writeln!(
                out,
                " - {} [{} -> {}]",
                dependency.label(),
                version_of(dependency),
                entry.available.get(self.context.revision).unwrap_or_default()
            )?;
            write_detail(out, dependency.user_reason.as_deref())?;
            write_detail(out, dependency.project_url.as_deref())?;
        }
        Ok(())
    }

    fn write_undeclared(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        if result.undeclared.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(
            out,
            "Failed to compare versions for the following dependencies because they were declared without version:"
        )?;
        for dependency in &result.undeclared.dependencies {
            writeln!(out, " - {}", dependency.label())?;
        }
        Ok(())
    }

    fn write_unresolved(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        if result.unresolved.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(
            out,
            "Failed to determine the latest version for the following dependencies (use --verbose for details):"
        )?;
        for entry in &result.unresolved.dependencies {
            let dependency = &entry.dependency;
            writeln!(out, " - {}", dependency.label())?;
            write_detail(out, dependency.user_reason.as_deref())?;
            write_detail(out, dependency.project_url.as_deref())?;
            tracing::debug!(
                "{} is unresolved because: {}",
                dependency.label(),
                entry.reason
            );
        }
        Ok(())
    }

    fn write_gradle_updates(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        let gradle = &result.gradle;
        if !gradle.enabled {
            return Ok(());
        }
        let channel = self.context.gradle_release_channel;

        writeln!(out)?;
        writeln!(out, "Gradle {channel} updates:")?;
        for (failed, reason) in gradle.failures(channel) {
            writeln!(out, "[ERROR] [release channel: {failed}] {reason}")?;
        }

        write!(out, " - Gradle: [{}", gradle.running.version)?;
        let updates = gradle.breadcrumb(channel);
        for version in &updates {
            write!(out, " -> {version}")?;
        }
        if updates.is_empty() {
            write!(out, ": UP-TO-DATE")?;
        }
        writeln!(out, "]")
    }
}

fn version_of(dependency: &Dependency) -> &str {
    dependency.version.as_deref().unwrap_or_default()
}

fn write_detail(out: &mut dyn Write, detail: Option<&str>) -> io::Result<()> {
    match detail {
        Some(detail) => writeln!(out, "     {detail}"),
        None => Ok(()),
    }
}

impl Reporter for PlainTextReporter {
    fn write(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        self.write_header(out)?;

        if result.count == 0 {
            writeln!(out)?;
            writeln!(out, "No dependencies found.")?;
        } else {
            self.write_up_to_date(out, result)?;
            self.write_exceeded(out, result)?;
            self.write_upgrades(out, result)?;
            self.write_undeclared(out, result)?;
            self.write_unresolved(out, result)?;
        }

        self.write_gradle_updates(out, result)
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}
