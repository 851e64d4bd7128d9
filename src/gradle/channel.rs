use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The Gradle release channels and their ids in the versions API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradleReleaseChannel {
    Current,
    #[default]
    ReleaseCandidate,
    Nightly,
}

impl GradleReleaseChannel {
    pub const ALL: [GradleReleaseChannel; 3] = [
        GradleReleaseChannel::Current,
        GradleReleaseChannel::ReleaseCandidate,
        GradleReleaseChannel::Nightly,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            GradleReleaseChannel::Current => "current",
            GradleReleaseChannel::ReleaseCandidate => "release-candidate",
            GradleReleaseChannel::Nightly => "nightly",
        }
    }

    /// Whether updates on `channel` are reported when this channel is selected.
    pub fn includes(&self, channel: GradleReleaseChannel) -> bool {
        match channel {
            GradleReleaseChannel::Current => true,
            GradleReleaseChannel::ReleaseCandidate => matches!(
                self,
                GradleReleaseChannel::ReleaseCandidate | GradleReleaseChannel::Nightly
            ),
            GradleReleaseChannel::Nightly => *self == GradleReleaseChannel::Nightly,
        }
    }
}

impl fmt::Display for GradleReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GradleReleaseChannel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        GradleReleaseChannel::ALL
            .into_iter()
            .find(|channel| channel.id() == value.trim())
            .ok_or_else(|| {
                format!(
                    "unknown Gradle release channel '{value}' (expected current, release-candidate or nightly)"
                )
            })
    }
}
