use super::{Reporter, ReporterContext};
use crate::report::{Dependency, ReportResult};
use quick_xml::escape::escape;
use std::io::{self, Write};

const HEAD: &str = r#"<head>
<meta charset="utf-8">
<title>Project Dependency Updates Report</title>
<style>
  body { font: 100% verdana, arial, sans-serif; background-color: #fff; }
  .currentInfo, .warningInfo { border-collapse: collapse; }
  .currentInfo td, .warningInfo td { border: 1px solid black; padding: 12px 15px; }
  .currentInfo tr:nth-child(even) { background-color: #E4FFB7; }
  .currentInfo tr:nth-child(odd) { background-color: #EFFFD2; }
  .warningInfo tr:nth-child(even) { background-color: #FFFF66; }
  .warningInfo tr:nth-child(odd) { background-color: #FFFFCC; }
</style>
</head>"#;

/// Standalone HTML page with one table per non-empty group.
pub struct HtmlReporter {
    context: ReporterContext,
}

/// Table layout for one dependency group.
struct Table<'a> {
    title: &'a str,
    intro: String,
    class: &'a str,
    columns: &'a [&'a str],
    rows: Vec<Vec<String>>,
}

impl HtmlReporter {
    pub fn new(context: ReporterContext) -> Self {
        Self { context }
    }

    fn tables(&self, result: &ReportResult) -> Vec<Table<'static>> {
        let revision = self.context.revision;
        let mut tables = Vec::new();

        tables.push(Table {
            title: "Current dependencies",
            intro: format!("The following dependencies are using the latest {revision} version:"),
            class: "currentInfo",
            columns: &["Name", "Group", "URL", "Current Version", "Reason"],
            rows: result
                .current
                .dependencies
                .iter()
                .map(|dependency| {
                    vec![
                        text(&dependency.name),
                        text(&dependency.group),
                        url_cell(dependency.project_url.as_deref()),
                        version_cell(dependency, dependency.version.as_deref()),
                        text(dependency.user_reason.as_deref().unwrap_or_default()),
                    ]
                })
                .collect(),
        });

        tables.push(Table {
            title: "Exceeded dependencies",
            intro: format!(
                "The following dependencies exceed the version found at the {revision} revision level:"
            ),
            class: "warningInfo",
            columns: &["Name", "Group", "URL", "Current Version", "Latest Version", "Reason"],
            rows: result
                .exceeded
                .dependencies
                .iter()
                .map(|entry| {
                    let dependency = &entry.dependency;
                    vec![
                        text(&dependency.name),
                        text(&dependency.group),
                        url_cell(dependency.project_url.as_deref()),
                        version_cell(dependency, dependency.version.as_deref()),
                        version_cell(dependency, Some(&entry.latest)),
                        text(dependency.user_reason.as_deref().unwrap_or_default()),
                    ]
                })
                .collect(),
        });

        tables.push(Table {
            title: "Later dependencies",
            intro: format!("The following dependencies have later {revision} versions:"),
            class: "warningInfo",
            columns: &["Name", "Group", "URL", "Current Version", "Latest Version", "Reason"],
            rows: result
                .outdated
                .dependencies
                .iter()
                .map(|entry| {
                    let dependency = &entry.dependency;
                    vec![
                        text(&dependency.name),
                        text(&dependency.group),
                        url_cell(dependency.project_url.as_deref()),
                        version_cell(dependency, dependency.version.as_deref()),
                        version_cell(dependency, entry.available.get(revision)),
                        text(dependency.user_reason.as_deref().unwrap_or_default()),
                    ]
                })
                .collect(),
        });

        tables.push(Table {
            title: "Undeclared dependencies",
            intro: "Failed to compare versions for the following dependencies because they were declared without version:".to_string(),
            class: "warningInfo",
            columns: &["Name", "Group"],
            rows: result
                .undeclared
                .dependencies
                .iter()
                .map(|dependency| vec![text(&dependency.name), text(&dependency.group)])
                .collect(),
        });

        tables.push(Table {
            title: "Unresolved dependencies",
            intro: "Failed to determine the latest version for the following dependencies:"
                .to_string(),
            class: "warningInfo",
            columns: &["Name", "Group", "URL", "Current Version", "Reason"],
            rows: result
                .unresolved
                .dependencies
                .iter()
                .map(|entry| {
                    let dependency = &entry.dependency;
                    vec![
                        text(&dependency.name),
                        text(&dependency.group),
                        url_cell(dependency.project_url.as_deref()),
                        version_cell(dependency, dependency.version.as_deref()),
                        text(&entry.reason),
                    ]
                })
                .collect(),
        });

        tables
    }

    fn write_gradle_updates(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        let gradle = &result.gradle;
        if !gradle.enabled {
            return Ok(());
        }
        let channel = self.context.gradle_release_channel;

        writeln!(out, "<h2>Gradle {channel} updates</h2>")?;
        for (failed, reason) in gradle.failures(channel) {
            writeln!(out, "<p>[ERROR] [release channel: {failed}] {}</p>", text(reason))?;
        }

        write!(out, "<p>Gradle: [{}", release_notes_link(&gradle.running.version))?;
        let updates = gradle.breadcrumb(channel);
        for version in &updates {
            write!(out, " -> {}", release_notes_link(version))?;
        }
        if updates.is_empty() {
            write!(out, ": UP-TO-DATE")?;
        }
        writeln!(out, "]</p>")?;
        writeln!(
            out,
            "<p>For information about Gradle releases click <a target=\"_blank\" href=\"https://gradle.org/releases/\">here</a>.</p>"
        )
    }
}

fn write_table(out: &mut dyn Write, table: &Table<'_>) -> io::Result<()> {
    if table.rows.is_empty() {
        return Ok(());
    }
    writeln!(out, "<h2>{}</h2>", table.title)?;
    writeln!(out, "<p>{}</p>", text(&table.intro))?;
    writeln!(out, "<table class=\"{}\">", table.class)?;
    writeln!(
        out,
        "<tr class=\"header\"><th colspan=\"{}\"><b>{}</b></th></tr>",
        table.columns.len(),
        table.title
    )?;
    write!(out, "<tr>")?;
    for column in table.columns {
        write!(out, "<td><b>{column}</b></td>")?;
    }
    writeln!(out, "</tr>")?;
    for row in &table.rows {
        write!(out, "<tr>")?;
        for cell in row {
            write!(out, "<td>{cell}</td>")?;
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "</table>")?;
    writeln!(out, "<br>")
}

fn text(value: &str) -> String {
    escape(value).into_owned()
}

fn link(href: &str, label: &str) -> String {
    format!(
        "<a target=\"_blank\" href=\"{}\">{}</a>",
        escape(href),
        escape(label)
    )
}

fn url_cell(url: Option<&str>) -> String {
    url.map(|url| link(url, url)).unwrap_or_default()
}

fn version_cell(dependency: &Dependency, version: Option<&str>) -> String {
    match version {
        Some(version) => {
            let sonatype = format!(
                "https://central.sonatype.com/artifact/{}/{}/{}/bundle",
                dependency.group, dependency.name, version
            );
            format!("{} {}", text(version), link(&sonatype, "Sonatype"))
        }
        None => String::new(),
    }
}

fn release_notes_link(version: &str) -> String {
    if version.is_empty() {
        return link("https://gradle.org/releases/", "unknown");
    }
    link(
        &format!("https://docs.gradle.org/{version}/release-notes.html"),
        version,
    )
}

impl Reporter for HtmlReporter {
    fn write(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        writeln!(out, "<!doctype html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "{HEAD}")?;
        writeln!(out, "<body>")?;
        writeln!(
            out,
            "<h1>{} Project Dependency Updates</h1>",
            text(&self.context.project_path)
        )?;

        if result.count == 0 {
            writeln!(out, "<p>No dependencies found.</p>")?;
        } else {
            for table in self.tables(result) {
                write_table(out, &table)?;
            }
        }
        self.write_gradle_updates(out, result)?;

        writeln!(out, "</body>")?;
        writeln!(out, "</html>")
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }
}
