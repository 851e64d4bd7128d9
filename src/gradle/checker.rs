use super::channel::GradleReleaseChannel;
use super::update::{GradleStatus, ReleaseStatus};
use crate::error::{Result, VersionsError};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

pub const DEFAULT_GRADLE_VERSIONS_API: &str = "https://services.gradle.org/versions/";
const CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

/// Looks up the latest version published on a Gradle release channel.
pub trait ReleaseSource: Send + Sync {
    /// `Ok(None)` when the channel currently has no release.
    fn latest_release(&self, channel: GradleReleaseChannel) -> Result<Option<String>>;
}

/// Client for the Gradle versions API (`<base>/<channel-id>`).
pub struct GradleVersionsApi {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct VersionSite {
    version: Option<String>,
}

impl GradleVersionsApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|_| {
            VersionsError::Config(format!("Invalid Gradle versions API URL: {base_url}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(VersionsError::Config(format!(
                "Unsupported Gradle versions API scheme: {}",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .user_agent("gradle-versions")
            .build()
            .map_err(|e| VersionsError::Io(std::io::Error::other(e)))?;

        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { client, base_url })
    }
}

impl ReleaseSource for GradleVersionsApi {
    fn latest_release(&self, channel: GradleReleaseChannel) -> Result<Option<String>> {
        let url = format!("{}{}", self.base_url, channel.id());
        tracing::debug!("Fetching Gradle {} release from {}", channel, url);

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| VersionsError::Metadata(e.to_string()))?;
        let site: VersionSite = response
            .json()
            .map_err(|e| VersionsError::Metadata(format!("Invalid response from {url}: {e}")))?;

        Ok(site.version.filter(|version| !version.is_empty()))
    }
}

/// Queries every release channel. A failing channel is recorded as
/// [`ReleaseStatus::Failure`] and never aborts the check.
pub fn check_for_updates(source: &dyn ReleaseSource, running: &str) -> GradleStatus {
    let mut channels = HashMap::new();
    for channel in GradleReleaseChannel::ALL {
        let status = match source.latest_release(channel) {
            Ok(Some(version)) => ReleaseStatus::Available(version),
            Ok(None) => ReleaseStatus::Unavailable,
            Err(e) => {
                tracing::warn!("Gradle update check failed for {}: {}", channel, e);
                ReleaseStatus::Failure(e.to_string())
            }
        };
        channels.insert(channel, status);
    }

    GradleStatus {
        enabled: true,
        running: running.to_string(),
        channels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedReleases;

    impl ReleaseSource for FixedReleases {
        fn latest_release(&self, channel: GradleReleaseChannel) -> Result<Option<String>> {
            match channel {
                GradleReleaseChannel::Current => Ok(Some("8.6".into())),
                GradleReleaseChannel::ReleaseCandidate => Ok(None),
                GradleReleaseChannel::Nightly => {
                    Err(VersionsError::Metadata("connection refused".into()))
                }
            }
        }
    }

    #[test]
    fn records_status_for_every_channel() {
        let status = check_for_updates(&FixedReleases, "8.5");
        assert!(status.enabled);
        assert_eq!(status.running, "8.5");
        assert_eq!(
            status.channel(GradleReleaseChannel::Current),
            Some(&ReleaseStatus::Available("8.6".into()))
        );
        assert_eq!(
            status.channel(GradleReleaseChannel::ReleaseCandidate),
            Some(&ReleaseStatus::Unavailable)
        );
        assert!(matches!(
            status.channel(GradleReleaseChannel::Nightly),
            Some(ReleaseStatus::Failure(reason)) if reason.contains("connection refused")
        ));
    }

    #[test]
    fn rejects_non_http_api_url() {
        assert!(matches!(
            GradleVersionsApi::new("file:///tmp/versions"),
            Err(VersionsError::Config(_))
        ));
        assert!(GradleVersionsApi::new("https://services.gradle.org/versions").is_ok());
    }
}
