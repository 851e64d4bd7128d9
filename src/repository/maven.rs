use super::{MetadataSource, RepositorySpec};
use crate::error::{Result, VersionsError};
use crate::model::{Coordinate, Key};
use quick_xml::de::from_str;
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use url::Url;

const MAX_METADATA_BYTES: usize = 10 * 1024 * 1024;

/// A repository with its group filters compiled.
struct Repository {
    name: String,
    url: String,
    group_filters: Vec<Regex>,
}

impl Repository {
    fn accepts(&self, group: &str) -> bool {
        self.group_filters.is_empty() || self.group_filters.iter().any(|re| re.is_match(group))
    }

    fn artifact_url(&self, key: &Key) -> String {
        format!(
            "{}/{}/{}",
            self.url.trim_end_matches('/'),
            key.group.replace('.', "/"),
            key.artifact
        )
    }
}

/// Maven repository client over an ordered repository list.
pub struct MavenRepository {
    client: Client,
    repositories: Vec<Repository>,
}

#[derive(Debug, Deserialize)]
struct MavenMetadata {
    #[serde(default)]
    versioning: Versioning,
}

#[derive(Debug, Default, Deserialize)]
struct Versioning {
    #[serde(default)]
    versions: Versions,
}

#[derive(Debug, Default, Deserialize)]
struct Versions {
    #[serde(default)]
    version: Vec<String>,
}

impl MavenRepository {
    pub fn new(repositories: Vec<RepositorySpec>) -> Result<Self> {
        let repositories = if repositories.is_empty() {
            RepositorySpec::defaults()
        } else {
            repositories
        };

        let repositories = repositories
            .into_iter()
            .map(Self::compile)
            .collect::<Result<Vec<_>>>()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("gradle-versions")
            .build()
            .map_err(|e| VersionsError::Io(std::io::Error::other(e)))?;

        Ok(Self {
            client,
            repositories,
        })
    }

    fn compile(spec: RepositorySpec) -> Result<Repository> {
        validate_repository_url(&spec.url)?;
        let group_filters = spec
            .group_filters
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    VersionsError::Config(format!(
                        "Invalid group filter '{pattern}' for repository {}: {e}",
                        spec.name
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Repository {
            name: spec.name,
            url: spec.url,
            group_filters,
        })
    }

    /// GETs `url`. `Ok(None)` when the repository does not have the file.
    fn get(&self, url: &str) -> Result<Option<String>> {
        tracing::debug!("Fetching: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| VersionsError::Metadata(format!("Request to {url} failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(VersionsError::Metadata(format!(
                "HTTP {} from {url}",
                response.status()
            )));
        }
        if response
            .content_length()
            .is_some_and(|length| length as usize > MAX_METADATA_BYTES)
        {
            return Err(VersionsError::Metadata(format!(
                "Response from {url} exceeded the 10 MiB limit"
            )));
        }

        let text = response
            .text()
            .map_err(|e| VersionsError::Metadata(format!("Failed to read {url}: {e}")))?;
        if text.len() > MAX_METADATA_BYTES {
            return Err(VersionsError::Metadata(format!(
                "Response from {url} exceeded the 10 MiB limit"
            )));
        }
        Ok(Some(text))
    }

    /// Queries the repositories accepting `group` in order and returns the
    /// first hit. Errors only surface when no repository answered.
    fn first_hit<T>(
        &self,
        group: &str,
        mut fetch: impl FnMut(&Repository) -> Result<Option<T>>,
    ) -> Result<Option<T>> {
        let mut errors = Vec::new();
        for repository in self.repositories.iter().filter(|repo| repo.accepts(group)) {
            match fetch(repository) {
                Ok(Some(found)) => return Ok(Some(found)),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!("{} lookup failed: {}", repository.name, e);
                    errors.push(e.to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(None)
        } else {
            Err(VersionsError::Metadata(errors.join("; ")))
        }
    }
}

impl MetadataSource for MavenRepository {
    fn fetch_versions(&self, key: &Key) -> Result<Vec<String>> {
        let versions = self.first_hit(&key.group, |repository| {
            let url = format!("{}/maven-metadata.xml", repository.artifact_url(key));
            let Some(text) = self.get(&url)? else {
                return Ok(None);
            };
            let metadata: MavenMetadata = from_str(&text).map_err(|e| {
                VersionsError::Metadata(format!("Failed to parse Maven metadata from {url}: {e}"))
            })?;
            let versions = metadata.versioning.versions.version;
            Ok((!versions.is_empty()).then_some(versions))
        })?;
        Ok(versions.unwrap_or_default())
    }

    fn fetch_pom(&self, coordinate: &Coordinate) -> Result<Option<String>> {
        let key = coordinate.key();
        self.first_hit(&key.group, |repository| {
            let url = format!(
                "{}/{}/{}-{}.pom",
                repository.artifact_url(&key),
                coordinate.version,
                coordinate.artifact,
                coordinate.version
            );
            self.get(&url)
        })
    }
}

/// Accepts http(s) URLs whose host is not loopback or private.
pub fn validate_repository_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url)
        .map_err(|_| VersionsError::Config(format!("Invalid repository URL: {url}")))?;

    match parsed.scheme() {
        "https" | "http" => {}
        scheme => {
            return Err(VersionsError::Config(format!(
                "Unsupported repository scheme: {scheme}"
            )));
        }
    }

    if let Some(host) = parsed.host_str() {
        if is_private_host(host) {
            return Err(VersionsError::Config(format!(
                "Repository host '{host}' is not allowed"
            )));
        }
    }

    Ok(())
}

fn is_private_host(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }

    let host = host.trim_start_matches('[').trim_end_matches(']');
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_private() || v4.is_loopback(),
        Ok(IpAddr::V6(v6)) => v6.is_loopback() || v6.is_unique_local(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_repository() {
        assert!(validate_repository_url("https://repo.maven.apache.org/maven2").is_ok());
    }

    #[test]
    fn rejects_invalid_scheme() {
        let err = validate_repository_url("ftp://example.com").unwrap_err();
        assert!(matches!(err, VersionsError::Config(_)));
    }

    #[test]
    fn rejects_private_hosts() {
        for url in [
            "https://127.0.0.1/repo",
            "http://10.0.0.4/maven",
            "https://localhost:8081/releases",
            "https://[::1]/repo",
        ] {
            assert!(
                matches!(validate_repository_url(url), Err(VersionsError::Config(_))),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn group_filters_limit_repositories() {
        let repository = MavenRepository::compile(RepositorySpec {
            name: "Google Maven".into(),
            url: "https://dl.google.com/dl/android/maven2".into(),
            group_filters: vec![".*android.*".into()],
        })
        .unwrap();
        assert!(repository.accepts("androidx.core"));
        assert!(!repository.accepts("org.slf4j"));
        assert_eq!(
            repository.artifact_url(&Key::new("androidx.core", "core-ktx")),
            "https://dl.google.com/dl/android/maven2/androidx/core/core-ktx"
        );
    }

    #[test]
    fn invalid_group_filter_is_a_config_error() {
        let result = MavenRepository::new(vec![RepositorySpec {
            name: "broken".into(),
            url: "https://repo.example.org/maven2".into(),
            group_filters: vec!["(".into()],
        }]);
        assert!(matches!(result, Err(VersionsError::Config(_))));
    }

    #[test]
    fn parses_maven_metadata_versions() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>org.slf4j</groupId>
  <artifactId>slf4j-api</artifactId>
  <versioning>
    <latest>2.0.13</latest>
    <release>2.0.13</release>
    <versions>
      <version>1.7.36</version>
      <version>2.0.0-alpha1</version>
      <version>2.0.13</version>
    </versions>
    <lastUpdated>20240404000000</lastUpdated>
  </versioning>
</metadata>"#;
        let metadata: MavenMetadata = from_str(xml).unwrap();
        assert_eq!(
            metadata.versioning.versions.version,
            ["1.7.36", "2.0.0-alpha1", "2.0.13"]
        );
    }
}
