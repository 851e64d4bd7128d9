//! Classifies a project's dependencies against their latest versions and
//! writes dependency update reports in text, JSON, XML and HTML. Reports
//! can then be applied to the build scripts and the version catalog.

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod gradle;
pub mod input;
pub mod model;
pub mod report;
pub mod reporter;
pub mod repository;
pub mod update;
pub mod version;
pub mod workflow;

pub use classify::{Classification, VersionMapping, classify};
pub use error::{Result, VersionsError};
pub use report::{ReportResult, aggregate};
pub use reporter::{OutputFormat, ReporterContext, render};
