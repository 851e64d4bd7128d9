use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Qualifiers with a fixed rank. Any other textual part ranks 0, so `dev`
/// sorts below every unknown qualifier and the rest above it.
const SPECIAL_QUALIFIERS: &[(&str, i8)] = &[
    ("dev", -1),
    ("rc", 1),
    ("snapshot", 2),
    ("final", 3),
    ("ga", 4),
    ("release", 5),
    ("sp", 6),
];

/// Markers that keep a version out of the `release` revision level.
const UNSTABLE_MARKERS: &[&str] = &[
    "alpha", "beta", "rc", "cr", "m", "milestone", "preview", "eap", "dev", "snapshot", "canary",
    "ea", "pr",
];

/// Version representation ordered part by part.
#[derive(Debug, Clone)]
pub struct Version {
    pub original: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Numeric(String),
    Text(String),
}

impl Part {
    fn text(&self) -> &str {
        match self {
            Part::Numeric(raw) | Part::Text(raw) => raw,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Part::Numeric(..))
    }
}

impl Version {
    pub fn parse(version: &str) -> Self {
        Version {
            original: version.to_string(),
            parts: Self::split_parts(version),
        }
    }

    /// Splits at `.`, `-`, `_`, `+` and at every digit/non-digit boundary.
    fn split_parts(version: &str) -> Vec<Part> {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut current_is_digit = false;

        for ch in version.chars() {
            if matches!(ch, '.' | '-' | '_' | '+') {
                Self::flush_part(&mut current, current_is_digit, &mut parts);
                continue;
            }
            let is_digit = ch.is_ascii_digit();
            if !current.is_empty() && is_digit != current_is_digit {
                Self::flush_part(&mut current, current_is_digit, &mut parts);
            }
            current_is_digit = is_digit;
            current.push(ch);
        }
        Self::flush_part(&mut current, current_is_digit, &mut parts);

        parts
    }

    fn flush_part(current: &mut String, is_digit: bool, parts: &mut Vec<Part>) {
        if current.is_empty() {
            return;
        }
        let raw = std::mem::take(current);
        parts.push(if is_digit {
            Part::Numeric(raw)
        } else {
            Part::Text(raw)
        });
    }

    /// Digit runs of any length, compared by value.
    fn compare_digits(a: &str, b: &str) -> Ordering {
        let a = a.trim_start_matches('0');
        let b = b.trim_start_matches('0');
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }

    /// Snapshots are integration builds and never part of a milestone or release.
    pub fn is_snapshot(&self) -> bool {
        self.original.to_ascii_lowercase().ends_with("snapshot")
    }

    pub fn is_stable(&self) -> bool {
        if self.is_snapshot() {
            return false;
        }
        self.parts.iter().all(|part| match part {
            Part::Numeric(..) => true,
            Part::Text(text) => {
                let lower = text.to_ascii_lowercase();
                !UNSTABLE_MARKERS.contains(&lower.as_str())
            }
        })
    }

    fn special_rank(text: &str) -> Option<i8> {
        let lower = text.to_ascii_lowercase();
        SPECIAL_QUALIFIERS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, rank)| *rank)
    }

    fn compare_text(a: &str, b: &str) -> Ordering {
        match (Self::special_rank(a), Self::special_rank(b)) {
            (Some(ra), Some(rb)) => ra.cmp(&rb),
            (Some(ra), None) => ra.cmp(&0),
            (None, Some(rb)) => 0i8.cmp(&rb),
            (None, None) => a.cmp(b),
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.original == other.original {
            return Ordering::Equal;
        }

        for (a, b) in self.parts.iter().zip(other.parts.iter()) {
            if a.text() == b.text() {
                continue;
            }
            let ordering = match (a, b) {
                (Part::Numeric(x), Part::Numeric(y)) => Self::compare_digits(x, y),
                (Part::Numeric(..), Part::Text(_)) => Ordering::Greater,
                (Part::Text(_), Part::Numeric(..)) => Ordering::Less,
                (Part::Text(x), Part::Text(y)) => Self::compare_text(x, y),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        // One version is a prefix of the other: an extra numeric part wins,
        // an extra qualifier loses.
        let common = self.parts.len().min(other.parts.len());
        match self.parts.len().cmp(&other.parts.len()) {
            Ordering::Greater if self.parts[common].is_numeric() => Ordering::Greater,
            Ordering::Greater => Ordering::Less,
            Ordering::Less if other.parts[common].is_numeric() => Ordering::Less,
            Ordering::Less => Ordering::Greater,
            Ordering::Equal => Ordering::Equal,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Compares two version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    Version::parse(a).cmp(&Version::parse(b))
}

/// Precision of the candidates considered when looking for the latest version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionLevel {
    /// Stable releases only.
    Release,
    /// Releases and pre-releases, no snapshots.
    #[default]
    Milestone,
    /// Every published version, snapshots included.
    Integration,
}

impl RevisionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionLevel::Release => "release",
            RevisionLevel::Milestone => "milestone",
            RevisionLevel::Integration => "integration",
        }
    }

    pub fn accepts(&self, version: &Version) -> bool {
        match self {
            RevisionLevel::Release => version.is_stable(),
            RevisionLevel::Milestone => !version.is_snapshot(),
            RevisionLevel::Integration => true,
        }
    }
}

impl fmt::Display for RevisionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevisionLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "release" => Ok(RevisionLevel::Release),
            "milestone" => Ok(RevisionLevel::Milestone),
            "integration" => Ok(RevisionLevel::Integration),
            other => Err(format!(
                "unknown revision '{other}' (expected release, milestone or integration)"
            )),
        }
    }
}

pub struct VersionComparator;

impl VersionComparator {
    /// Get the latest version accepted at the given revision level
    pub fn select_latest(versions: &[String], revision: RevisionLevel) -> Option<String> {
        versions
            .iter()
            .map(|v| Version::parse(v))
            .filter(|v| revision.accepts(v))
            .max()
            .map(|v| v.original)
    }

    /// Check if version `a` is newer than version `b`
    pub fn is_newer(a: &str, b: &str) -> bool {
        compare_versions(a, b) == Ordering::Greater
    }
}
