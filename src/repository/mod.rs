use crate::error::Result;
use crate::model::{Coordinate, Key};
use serde::{Deserialize, Serialize};

pub mod maven;
pub mod project_url;
pub mod resolver;

pub use maven::MavenRepository;
pub use project_url::{MemoCache, ProjectUrlCache, ProjectUrlResolver};
pub use resolver::LatestVersionResolver;

pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2";
pub const GOOGLE_MAVEN: &str = "https://dl.google.com/dl/android/maven2";

/// Source of published versions and POM files.
pub trait MetadataSource: Send + Sync {
    /// Every published version of `key`. Empty when no repository has it.
    fn fetch_versions(&self, key: &Key) -> Result<Vec<String>>;

    /// Raw POM of `coordinate`, `None` when no repository has it.
    fn fetch_pom(&self, coordinate: &Coordinate) -> Result<Option<String>>;
}

/// A Maven repository to query, optionally restricted to matching groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RepositorySpec {
    pub name: String,
    pub url: String,
    /// Group regexes; an empty list accepts every group.
    #[serde(default)]
    pub group_filters: Vec<String>,
}

impl RepositorySpec {
    pub fn defaults() -> Vec<RepositorySpec> {
        vec![
            RepositorySpec {
                name: "Maven Central".to_string(),
                url: MAVEN_CENTRAL.to_string(),
                group_filters: Vec::new(),
            },
            RepositorySpec {
                name: "Google Maven".to_string(),
                url: GOOGLE_MAVEN.to_string(),
                group_filters: vec![
                    ".*google.*".to_string(),
                    ".*android.*".to_string(),
                    ".*androidx.*".to_string(),
                ],
            },
        ]
    }
}
