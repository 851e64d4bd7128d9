use super::MetadataSource;
use crate::model::Coordinate;
use dashmap::DashMap;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Sonatype's hosting parent; its URL says nothing about the project.
const OSS_PARENT: (&str, &str) = ("org.sonatype.oss", "oss-parent");

/// Values computed at most once per coordinate.
///
/// Each coordinate maps to a shared cell; concurrent callers for the same
/// coordinate wait for the first one instead of computing again.
pub struct MemoCache<V> {
    entries: DashMap<Coordinate, Arc<OnceLock<V>>>,
}

/// Memoized project URLs.
pub type ProjectUrlCache = MemoCache<Option<String>>;

impl<V> Default for MemoCache<V> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<V> fmt::Debug for MemoCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<V: Clone> MemoCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `compute` must not call back into this cache.
    pub fn get_or_compute<F>(&self, coordinate: &Coordinate, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        // The shard lock is released before computing.
        let cell = Arc::clone(&self.entries.entry(coordinate.clone()).or_default());
        cell.get_or_init(compute).clone()
    }

    /// The cached value, without waiting for a computation in flight.
    pub fn peek(&self, coordinate: &Coordinate) -> Option<V> {
        self.entries
            .get(coordinate)
            .and_then(|cell| cell.get().cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pom {
    url: Option<String>,
    scm: Option<Scm>,
    parent: Option<Parent>,
}

#[derive(Debug, Default, Deserialize)]
struct Scm {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Parent {
    group_id: String,
    artifact_id: String,
    version: String,
}

/// What one POM contributes to a project URL lookup.
#[derive(Debug, Clone, Default)]
struct PomLinks {
    url: Option<String>,
    parent: Option<Coordinate>,
}

impl From<Pom> for PomLinks {
    fn from(pom: Pom) -> Self {
        let url = non_blank(pom.url.as_deref())
            .or_else(|| non_blank(pom.scm.as_ref().and_then(|scm| scm.url.as_deref())));
        let parent = pom
            .parent
            .filter(|parent| (parent.group_id.as_str(), parent.artifact_id.as_str()) != OSS_PARENT)
            .map(|parent| Coordinate::of(&parent.group_id, &parent.artifact_id, &parent.version));
        Self { url, parent }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Finds a dependency's project URL in its POM: `url`, then `scm/url`, then
/// the parent POM's project URL.
///
/// Every POM is fetched at most once, however many children share it.
pub struct ProjectUrlResolver {
    source: Arc<dyn MetadataSource>,
    cache: ProjectUrlCache,
    poms: MemoCache<PomLinks>,
}

impl ProjectUrlResolver {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self {
            source,
            cache: ProjectUrlCache::new(),
            poms: MemoCache::new(),
        }
    }

    pub fn resolve(&self, coordinate: &Coordinate) -> Option<String> {
        if coordinate.is_undeclared() {
            return None;
        }
        if let Some(cached) = self.cache.peek(coordinate) {
            return cached;
        }

        let (url, chain) = self.walk(coordinate);
        // Ancestors on the walked chain share the same answer.
        for ancestor in chain.iter().skip(1) {
            self.cache.get_or_compute(ancestor, || url.clone());
        }
        self.cache.get_or_compute(coordinate, || url)
    }

    /// Follows parents until a URL turns up. Cells are only ever filled with
    /// a single POM fetch, so no cell waits on another.
    fn walk(&self, coordinate: &Coordinate) -> (Option<String>, Vec<Coordinate>) {
        let mut chain = vec![coordinate.clone()];
        let mut current = coordinate.clone();
        loop {
            let links = self.links(&current);
            if links.url.is_some() {
                return (links.url, chain);
            }
            let Some(parent) = links.parent else {
                return (None, chain);
            };
            if chain.contains(&parent) {
                tracing::debug!("Parent cycle at {} while resolving {}", parent, coordinate);
                return (None, chain);
            }
            if let Some(cached) = self.cache.peek(&parent) {
                return (cached, chain);
            }
            chain.push(parent.clone());
            current = parent;
        }
    }

    fn links(&self, coordinate: &Coordinate) -> PomLinks {
        self.poms
            .get_or_compute(coordinate, || self.fetch_links(coordinate))
    }

    fn fetch_links(&self, coordinate: &Coordinate) -> PomLinks {
        let pom = match self.source.fetch_pom(coordinate) {
            Ok(Some(text)) => text,
            Ok(None) => return PomLinks::default(),
            Err(e) => {
                tracing::warn!("Failed to fetch POM for {}: {}", coordinate, e);
                return PomLinks::default();
            }
        };
        match from_str::<Pom>(&pom) {
            Ok(pom) => pom.into(),
            Err(e) => {
                tracing::warn!("Failed to parse POM for {}: {}", coordinate, e);
                PomLinks::default()
            }
        }
    }

    pub fn cache(&self) -> &ProjectUrlCache {
        &self.cache
    }
}
