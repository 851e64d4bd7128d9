use super::channel::GradleReleaseChannel;
use crate::version::VersionComparator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of looking up the latest release of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseStatus {
    Available(String),
    /// The channel has no release, e.g. no open release candidate.
    Unavailable,
    Failure(String),
}

/// Running Gradle version plus the status of every channel that was checked.
#[derive(Debug, Clone, Default)]
pub struct GradleStatus {
    pub enabled: bool,
    pub running: String,
    pub channels: HashMap<GradleReleaseChannel, ReleaseStatus>,
}

impl GradleStatus {
    pub fn disabled(running: impl Into<String>) -> Self {
        Self {
            enabled: false,
            running: running.into(),
            channels: HashMap::new(),
        }
    }

    pub fn channel(&self, channel: GradleReleaseChannel) -> Option<&ReleaseStatus> {
        self.channels.get(&channel)
    }
}

/// Update result for one release channel (or the running version).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradleUpdateResult {
    /// Version available on the channel, empty when there is none.
    pub version: String,
    /// The version is newer than the running Gradle.
    pub is_update_available: bool,
    /// The lookup for this channel failed.
    pub is_failure: bool,
    /// How to interpret the result when `version` is empty.
    pub reason: String,
}

impl GradleUpdateResult {
    pub fn new(enabled: bool, running: &str, release: Option<&ReleaseStatus>) -> Self {
        if !enabled {
            return Self::empty(false, "update check disabled");
        }
        match release {
            Some(ReleaseStatus::Available(version)) => Self {
                version: version.clone(),
                is_update_available: VersionComparator::is_newer(version, running),
                is_failure: false,
                reason: String::new(),
            },
            Some(ReleaseStatus::Unavailable) => {
                Self::empty(false, "update check succeeded: no release available")
            }
            Some(ReleaseStatus::Failure(reason)) => Self::empty(true, reason),
            None => Self::empty(true, "update check did not run"),
        }
    }

    fn empty(is_failure: bool, reason: &str) -> Self {
        Self {
            version: String::new(),
            is_update_available: false,
            is_failure,
            reason: reason.to_string(),
        }
    }

    /// Compares the versions carried by two results.
    pub fn is_newer_than(&self, other: &GradleUpdateResult) -> bool {
        VersionComparator::is_newer(&self.version, &other.version)
    }
}

/// Gradle update results of every release channel, including the running version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradleUpdateResults {
    pub enabled: bool,
    pub running: GradleUpdateResult,
    pub current: GradleUpdateResult,
    pub release_candidate: GradleUpdateResult,
    pub nightly: GradleUpdateResult,
}

impl GradleUpdateResults {
    pub fn build(status: &GradleStatus, channel: GradleReleaseChannel) -> Self {
        let enabled = status.enabled;
        let running = ReleaseStatus::Available(status.running.clone());
        let result_for = |target: GradleReleaseChannel| {
            GradleUpdateResult::new(
                enabled && channel.includes(target),
                &status.running,
                status.channel(target),
            )
        };

        Self {
            enabled,
            running: GradleUpdateResult::new(enabled, &status.running, Some(&running)),
            current: result_for(GradleReleaseChannel::Current),
            release_candidate: result_for(GradleReleaseChannel::ReleaseCandidate),
            nightly: result_for(GradleReleaseChannel::Nightly),
        }
    }

    pub fn result(&self, channel: GradleReleaseChannel) -> &GradleUpdateResult {
        match channel {
            GradleReleaseChannel::Current => &self.current,
            GradleReleaseChannel::ReleaseCandidate => &self.release_candidate,
            GradleReleaseChannel::Nightly => &self.nightly,
        }
    }

    /// Channels whose lookup failed, restricted to the selected channel.
    pub fn failures(&self, channel: GradleReleaseChannel) -> Vec<(GradleReleaseChannel, &str)> {
        GradleReleaseChannel::ALL
            .into_iter()
            .filter(|target| channel.includes(*target))
            .filter(|target| self.result(*target).is_failure)
            .map(|target| (target, self.result(target).reason.as_str()))
            .collect()
    }

    /// Versions to print after the running one: the current release when it
    /// is newer than the running Gradle, pre-release channels when they are
    /// newer than the current release. Empty means up to date.
    pub fn breadcrumb(&self, channel: GradleReleaseChannel) -> Vec<&str> {
        let mut updates = Vec::new();
        if self.current.is_update_available && self.current.is_newer_than(&self.running) {
            updates.push(self.current.version.as_str());
        }
        for target in [
            GradleReleaseChannel::ReleaseCandidate,
            GradleReleaseChannel::Nightly,
        ] {
            let result = self.result(target);
            if channel.includes(target)
                && result.is_update_available
                && result.is_newer_than(&self.current)
            {
                updates.push(result.version.as_str());
            }
        }
        updates
    }
}
