use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use gradle_versions::cli::{Cli, Commands};
use gradle_versions::config::SettingsOverrides;
use gradle_versions::workflow::{self, ReportRequest, UpdateRequest};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Report {
            input,
            config,
            revision,
            output_formatter,
            output_dir,
            report_file_name,
            gradle_release_channel,
            gradle_version,
            no_gradle_check,
            gradle_versions_api,
            resolve,
            quiet,
        } => {
            let request = ReportRequest {
                input,
                config,
                overrides: SettingsOverrides {
                    revision,
                    output_formatter,
                    output_dir,
                    report_file_name,
                    gradle_release_channel,
                    gradle_versions_api,
                    no_gradle_check,
                },
                gradle_version,
                resolve,
                quiet,
            };
            workflow::execute_report(&request).with_context(|| {
                format!("Dependency report for {} failed", request.input.display())
            })?;
        }
        Commands::Update {
            project_dir,
            report,
            config,
            allow_major,
            no_minor,
            ignore_group,
            dry_run,
        } => {
            let request = UpdateRequest {
                project_dir,
                report,
                config,
                allow_major,
                no_minor,
                ignored_groups: ignore_group,
                dry_run,
            };
            workflow::execute_update(&request).with_context(|| {
                format!("Updating dependencies in {} failed", request.project_dir.display())
            })?;
        }
        Commands::Compare { left, right } => {
            workflow::execute_compare(&left, &right)?;
        }
    }
    Ok(())
}
