pub mod channel;
pub mod checker;
pub mod update;

pub use channel::GradleReleaseChannel;
pub use checker::{DEFAULT_GRADLE_VERSIONS_API, GradleVersionsApi, ReleaseSource, check_for_updates};
pub use update::{GradleStatus, GradleUpdateResult, GradleUpdateResults, ReleaseStatus};
