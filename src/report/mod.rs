pub mod aggregate;
pub mod keys;
pub mod result;

pub use aggregate::aggregate;
pub use result::{
    DependenciesGroup, Dependency, DependencyLatest, DependencyOutdated, DependencyUnresolved,
    ReportEntry, ReportResult, VersionAvailable,
};
