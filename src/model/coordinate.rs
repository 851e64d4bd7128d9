use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Placeholder used when a group, artifact or version was not declared.
pub const NONE: &str = "none";

/// The dependency's coordinate.
///
/// Equality, hashing and ordering only look at group, artifact and version.
/// The user supplied reason travels with the coordinate but two coordinates
/// that differ only by their reason are the same dependency.
#[derive(Debug, Clone)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub user_reason: Option<String>,
}

/// Dependency identity ignoring the version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    pub group: String,
    pub artifact: String,
}

impl Coordinate {
    pub fn new(group: Option<&str>, artifact: Option<&str>, version: Option<&str>) -> Self {
        Self {
            group: group.unwrap_or(NONE).to_string(),
            artifact: artifact.unwrap_or(NONE).to_string(),
            version: version.unwrap_or(NONE).to_string(),
            user_reason: None,
        }
    }

    /// Shorthand for a fully declared coordinate.
    pub fn of(group: &str, artifact: &str, version: &str) -> Self {
        Self::new(Some(group), Some(artifact), Some(version))
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.user_reason = reason;
        self
    }

    /// Parses `group:artifact` or `group:artifact:version`.
    pub fn parse(notation: &str) -> Option<Self> {
        let parts: Vec<&str> = notation.split(':').collect();
        match parts.as_slice() {
            [group, artifact] if !group.is_empty() && !artifact.is_empty() => {
                Some(Self::new(Some(*group), Some(*artifact), None))
            }
            [group, artifact, version] if !group.is_empty() && !artifact.is_empty() => {
                let version = (!version.is_empty()).then_some(*version);
                Some(Self::new(Some(*group), Some(*artifact), version))
            }
            _ => None,
        }
    }

    pub fn key(&self) -> Key {
        Key::new(&self.group, &self.artifact)
    }

    /// `true` when no version was declared for this dependency.
    pub fn is_undeclared(&self) -> bool {
        self.version == NONE
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.artifact == other.artifact && self.version == other.version
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group.hash(state);
        self.artifact.hash(state);
        self.version.hash(state);
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.group
            .cmp(&other.group)
            .then_with(|| self.artifact.cmp(&other.artifact))
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl Key {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn missing_parts_default_to_none() {
        let coordinate = Coordinate::new(None, Some("core"), None);
        assert_eq!(coordinate.group, "none");
        assert_eq!(coordinate.version, "none");
        assert!(coordinate.is_undeclared());
    }

    #[test]
    fn equality_ignores_user_reason() {
        let plain = Coordinate::of("com.example", "core", "1.0");
        let reasoned = plain.clone().with_reason(Some("pinned for CVE".into()));
        assert_eq!(plain, reasoned);

        let mut set = HashSet::new();
        set.insert(plain);
        assert!(!set.insert(reasoned));
    }

    #[test]
    fn orders_by_key_then_version_string() {
        let mut coordinates = vec![
            Coordinate::of("b", "a", "1.0"),
            Coordinate::of("a", "b", "2.0"),
            Coordinate::of("a", "b", "10.0"),
            Coordinate::of("a", "a", "3.0"),
        ];
        coordinates.sort();
        let rendered: Vec<String> = coordinates.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["a:a:3.0", "a:b:10.0", "a:b:2.0", "b:a:1.0"]);
    }

    #[test]
    fn parses_colon_notation() {
        let coordinate = Coordinate::parse("com.squareup:okhttp:4.12.0").unwrap();
        assert_eq!(coordinate.key(), Key::new("com.squareup", "okhttp"));
        assert_eq!(coordinate.version, "4.12.0");

        assert!(Coordinate::parse("com.squareup:okhttp").unwrap().is_undeclared());
        assert!(Coordinate::parse("okhttp").is_none());
        assert!(Coordinate::parse("a:b:c:d").is_none());
    }
}
