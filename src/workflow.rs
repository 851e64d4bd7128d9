use crate::classify::VersionMapping;
use crate::config::{ReportSettings, SettingsOverrides};
use crate::error::{Result, VersionsError};
use crate::gradle::{GradleStatus, GradleUpdateResults, GradleVersionsApi, check_for_updates};
use crate::input::InputDocument;
use crate::model::{Coordinate, DependencyStatus, NONE};
use crate::report::{ReportResult, aggregate};
use crate::update::{PlannedUpdate, plan_updates, update_build_script, update_catalog};
use crate::reporter::{OutputFormat, ReporterContext, render};
use crate::repository::{
    LatestVersionResolver, MavenRepository, MetadataSource, ProjectUrlResolver,
};
use crate::version::compare_versions;
use colored::Colorize;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reason given to dependencies left without a latest version when no
/// metadata lookup was requested.
pub const LOOKUP_DISABLED_REASON: &str =
    "latest version not provided and repository lookup is disabled (use --resolve)";

#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: SettingsOverrides,
    /// Running Gradle version, overriding the input document.
    pub gradle_version: Option<String>,
    pub resolve: bool,
    pub quiet: bool,
}

/// Classify the dependencies of an input document and write the reports
pub fn execute_report(request: &ReportRequest) -> Result<ReportResult> {
    let settings =
        ReportSettings::load(request.config.as_deref())?.apply(request.overrides.clone());
    settings.validate()?;

    step("1. Reading dependency document...");
    let document = InputDocument::load(&request.input)?;
    eprintln!(
        "   Found {} dependencies in project {}",
        document.dependencies.len(),
        document.project_path.bright_cyan()
    );

    let metadata: Option<Arc<dyn MetadataSource>> = if request.resolve {
        step("2. Looking up latest versions...");
        for repository in &settings.repositories {
            eprintln!("   • {} ({})", repository.name.bright_cyan(), repository.url.dimmed());
        }
        Some(Arc::new(MavenRepository::new(settings.repositories.clone())?))
    } else {
        None
    };

    let running = request
        .gradle_version
        .clone()
        .or_else(|| document.gradle_version.clone());
    let gradle = gradle_status(&settings, running)?;

    step("3. Classifying dependencies...");
    let result = build_report(&document, &settings, metadata, gradle, !request.quiet)?;

    let context = ReporterContext {
        project_path: document.project_path.clone(),
        revision: settings.revision,
        gradle_release_channel: settings.gradle_release_channel,
    };

    if !request.quiet {
        let text = render(&result, OutputFormat::Text, &context)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(&text)?;
        stdout.flush()?;
    }

    let written = write_reports(&result, &settings, &context)?;
    for path in &written {
        eprintln!("   {}", format!("✓ Wrote {}", path.display()).green());
    }
    print_summary(&result);

    Ok(result)
}

fn step(message: &str) {
    eprintln!("\n{}", message.yellow());
}

fn gradle_status(settings: &ReportSettings, running: Option<String>) -> Result<GradleStatus> {
    let Some(running) = running.filter(|version| !version.trim().is_empty()) else {
        if settings.check_for_gradle_update {
            tracing::warn!("No running Gradle version known; skipping the Gradle update check");
        }
        return Ok(GradleStatus::disabled(""));
    };
    if !settings.check_for_gradle_update {
        return Ok(GradleStatus::disabled(running));
    }

    tracing::debug!("Checking Gradle updates against {}", settings.gradle_versions_api);
    let api = GradleVersionsApi::new(&settings.gradle_versions_api)?;
    Ok(check_for_updates(&api, &running))
}

/// Turns an input document into a report. Dependencies without a latest
/// version are looked up in `metadata`, or reported unresolved without one.
pub fn build_report(
    document: &InputDocument,
    settings: &ReportSettings,
    metadata: Option<Arc<dyn MetadataSource>>,
    gradle: GradleStatus,
    show_progress: bool,
) -> Result<ReportResult> {
    let input = document.partition();
    let mut statuses = input.statuses;

    match metadata {
        Some(source) => {
            let resolver = LatestVersionResolver::new(
                Arc::clone(&source),
                settings.revision,
                &settings.reject_versions,
            )?;
            statuses.extend(resolver.resolve_all(&input.pending, show_progress));

            let urls = ProjectUrlResolver::new(source);
            statuses.par_iter_mut().for_each(|status| {
                if let DependencyStatus::Resolved {
                    coordinate,
                    latest_version,
                    project_url,
                } = status
                {
                    // Read from the latest release's POM.
                    if project_url.is_none() {
                        let latest =
                            Coordinate::of(&coordinate.group, &coordinate.artifact, latest_version);
                        *project_url = urls.resolve(&latest);
                    }
                }
            });
        }
        None => {
            statuses.extend(input.pending.into_iter().map(|coordinate| {
                if coordinate.is_undeclared() {
                    DependencyStatus::resolved(coordinate, NONE, None)
                } else {
                    DependencyStatus::unresolved(coordinate, LOOKUP_DISABLED_REASON)
                }
            }));
        }
    }

    let mapping = VersionMapping::from_statuses(statuses);
    let classification = mapping.classify();
    tracing::debug!(
        "Classified {} of {} dependencies",
        classification.classified_count(),
        classification.current.len()
    );

    let gradle = GradleUpdateResults::build(&gradle, settings.gradle_release_channel);
    Ok(aggregate(
        &classification,
        &mapping.project_urls,
        gradle,
        settings.revision,
    ))
}

/// Writes one file per configured format. Every format is attempted; the
/// failures are returned together.
pub fn write_reports(
    result: &ReportResult,
    settings: &ReportSettings,
    context: &ReporterContext,
) -> Result<Vec<PathBuf>> {
    let formats = settings.formats();
    if formats.is_empty() {
        return Ok(Vec::new());
    }
    fs::create_dir_all(&settings.output_dir).map_err(|e| {
        VersionsError::ReportWrite(vec![format!(
            "{}: {e}",
            settings.output_dir.display()
        )])
    })?;

    let mut written = Vec::new();
    let mut failures = Vec::new();
    for format in formats {
        let reporter = format.reporter(context);
        let path = settings.report_path(reporter.file_extension());
        match write_report(&path, |out| reporter.write(out, result)) {
            Ok(()) => {
                tracing::info!("Generated {} report: {}", format, path.display());
                written.push(path);
            }
            Err(e) => {
                tracing::warn!("Failed to write {} report to {}: {}", format, path.display(), e);
                failures.push(format!("{}: {e}", path.display()));
            }
        }
    }

    if failures.is_empty() {
        Ok(written)
    } else {
        Err(VersionsError::ReportWrite(failures))
    }
}

fn write_report<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    write(&mut file)?;
    file.flush()
}

fn print_summary(result: &ReportResult) {
    eprintln!(
        "\n{}",
        format!(
            "✨ {} dependencies: {} up to date, {} outdated, {} exceeded, {} undeclared, {} unresolved",
            result.count,
            result.current.count,
            result.outdated.count,
            result.exceeded.count,
            result.undeclared.count,
            result.unresolved.count
        )
        .green()
        .bold()
    );
}

/// Build scripts rewritten by `update`, relative to the project directory.
const BUILD_SCRIPTS: &[&str] = &["build.gradle.kts", "build.gradle"];
const VERSION_CATALOG: &str = "gradle/libs.versions.toml";

#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub project_dir: PathBuf,
    /// JSON report; defaults to `<output-dir>/<report-file-name>.json`
    /// under the project directory.
    pub report: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub allow_major: bool,
    pub no_minor: bool,
    pub ignored_groups: Vec<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub planned: Vec<PlannedUpdate>,
    pub changed_files: Vec<PathBuf>,
}

/// Apply the outdated dependencies of a JSON report to the build scripts
/// and the version catalog
pub fn execute_update(request: &UpdateRequest) -> Result<UpdateOutcome> {
    let settings = ReportSettings::load(request.config.as_deref())?;
    let mut rules = settings.update.clone();
    if request.allow_major {
        rules.allow_major = true;
    }
    if request.no_minor {
        rules.allow_minor = false;
    }
    if !request.ignored_groups.is_empty() {
        rules.ignored_groups = request.ignored_groups.clone();
    }

    let report_path = request
        .report
        .clone()
        .unwrap_or_else(|| request.project_dir.join(settings.report_path("json")));

    step("1. Reading dependency report...");
    if !report_path.is_file() {
        eprintln!(
            "   {}",
            format!(
                "Dependency report not found at {}. Run 'gradle-versions report --output-formatter json' first.",
                report_path.display()
            )
            .yellow()
        );
        return Ok(UpdateOutcome::default());
    }
    let content = fs::read_to_string(&report_path).map_err(|e| {
        VersionsError::InvalidInput(format!("Cannot read {}: {e}", report_path.display()))
    })?;
    let report: ReportResult = serde_json::from_str(&content)?;

    step("2. Selecting updates...");
    let planned = plan_updates(&report, &rules);
    if planned.is_empty() {
        eprintln!("   {}", "No dependencies need updating.".green());
        return Ok(UpdateOutcome::default());
    }
    for update in &planned {
        eprintln!(
            "   • {} {} -> {}",
            update.module().bright_cyan(),
            update.from.dimmed(),
            update.to.green()
        );
    }

    step("3. Applying updates...");
    let mut changed_files = Vec::new();
    let mut applied: Vec<&PlannedUpdate> = Vec::new();
    let targets = BUILD_SCRIPTS
        .iter()
        .map(|name| (request.project_dir.join(name), false))
        .chain([(request.project_dir.join(VERSION_CATALOG), true)]);
    for (path, is_catalog) in targets {
        if !path.is_file() {
            continue;
        }
        let content = fs::read_to_string(&path)?;
        let (updated, hits) = if is_catalog {
            update_catalog(&content, &planned)?
        } else {
            update_build_script(&content, &planned)?
        };
        if hits.is_empty() {
            continue;
        }
        tracing::debug!("{} update(s) in {}", hits.len(), path.display());
        if !request.dry_run {
            fs::write(&path, updated)?;
            tracing::info!("Updated {}", path.display());
        }
        applied.extend(hits);
        changed_files.push(path);
    }

    for update in &planned {
        if !applied.contains(&update) {
            tracing::warn!("No declaration of {} {} was found", update.module(), update.from);
        }
    }

    let verb = if request.dry_run { "Would update" } else { "Updated" };
    for path in &changed_files {
        eprintln!("   {}", format!("✓ {verb} {}", path.display()).green());
    }
    if changed_files.is_empty() {
        eprintln!("   {}", "No matching declarations found.".yellow());
    }

    Ok(UpdateOutcome {
        planned,
        changed_files,
    })
}

/// Compare two versions and print `<`, `=` or `>`
pub fn execute_compare(left: &str, right: &str) -> Result<Ordering> {
    let ordering = compare_versions(left, right);
    let symbol = match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    println!("{symbol}");
    Ok(ordering)
}
