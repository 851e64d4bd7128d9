use crate::gradle::GradleReleaseChannel;
use crate::version::RevisionLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gradle-versions",
    about = "Report which Gradle dependencies are up to date, outdated or ahead of the latest release",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify the dependencies of an exported project and write update reports
    Report {
        /// Dependency document exported by the build (JSON)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// TOML settings file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Revision level of the latest versions: release, milestone or integration
        #[arg(long, value_name = "LEVEL")]
        revision: Option<RevisionLevel>,

        /// Comma-separated report formats (text, json, xml, html); empty writes no files
        #[arg(long, value_name = "LIST")]
        output_formatter: Option<String>,

        /// Directory receiving the report files
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Report file name without extension
        #[arg(long, value_name = "NAME")]
        report_file_name: Option<String>,

        /// Gradle release channel: current, release-candidate or nightly
        #[arg(long, value_name = "CHANNEL")]
        gradle_release_channel: Option<GradleReleaseChannel>,

        /// Running Gradle version, overriding the one in the input document
        #[arg(long, value_name = "VERSION")]
        gradle_version: Option<String>,

        /// Skip the Gradle update check
        #[arg(long)]
        no_gradle_check: bool,

        /// Base URL of the Gradle versions API
        #[arg(long, value_name = "URL")]
        gradle_versions_api: Option<String>,

        /// Look up missing latest versions in the configured Maven repositories
        #[arg(long)]
        resolve: bool,

        /// Do not print the plain text report to stdout
        #[arg(short, long)]
        quiet: bool,
    },

    /// Apply the outdated dependencies of a JSON report to the build scripts
    /// and the version catalog
    Update {
        /// Project directory holding build.gradle(.kts) and gradle/libs.versions.toml
        #[arg(long, value_name = "DIR", default_value = ".")]
        project_dir: PathBuf,

        /// JSON report to apply; defaults to the report location of the settings
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// TOML settings file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Also apply upgrades of the major version
        #[arg(long)]
        allow_major: bool,

        /// Skip upgrades of the minor version
        #[arg(long)]
        no_minor: bool,

        /// Groups never updated (comma-separated or repeated)
        #[arg(long, value_name = "GROUP", value_delimiter = ',')]
        ignore_group: Vec<String>,

        /// Show the planned updates without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Compare two version strings and print <, = or >
    Compare {
        #[arg(value_name = "A")]
        left: String,

        #[arg(value_name = "B")]
        right: String,
    },
}
