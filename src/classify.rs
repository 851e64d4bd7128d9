use crate::model::{Coordinate, DependencyStatus, Key};
use crate::version::compare_versions;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Reason recorded when a coordinate reaches classification without a
/// latest version and without a resolution failure.
pub const MISSING_LATEST_REASON: &str = "no latest version was resolved for this dependency";

/// Buckets produced by [`classify`]. The five buckets are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Every declared coordinate, whatever its bucket.
    pub current: BTreeSet<Coordinate>,
    /// Latest coordinate per key.
    pub latest: BTreeMap<Key, Coordinate>,
    pub up_to_date: BTreeSet<Coordinate>,
    pub upgrade: BTreeSet<Coordinate>,
    pub downgrade: BTreeSet<Coordinate>,
    pub undeclared: BTreeSet<Coordinate>,
    /// Coordinates whose latest version could not be determined, with the cause.
    pub unresolved: BTreeMap<Coordinate, String>,
}

impl Classification {
    /// Number of coordinates placed in a bucket.
    pub fn classified_count(&self) -> usize {
        self.up_to_date.len()
            + self.upgrade.len()
            + self.downgrade.len()
            + self.undeclared.len()
            + self.unresolved.len()
    }
}

/// Groups the dependencies into up-to-date, upgrades available, downgrade,
/// undeclared or unresolved buckets.
pub fn classify(
    current: &BTreeSet<Coordinate>,
    latest: &BTreeMap<Key, Coordinate>,
    unresolved: &BTreeMap<Key, String>,
) -> Classification {
    let mut classification = Classification {
        current: current.clone(),
        latest: latest.clone(),
        ..Classification::default()
    };

    for coordinate in current {
        let key = coordinate.key();
        if let Some(reason) = unresolved.get(&key) {
            classification
                .unresolved
                .insert(coordinate.clone(), reason.clone());
            continue;
        }
        if coordinate.is_undeclared() {
            classification.undeclared.insert(coordinate.clone());
            continue;
        }

        let Some(latest_coordinate) = latest.get(&key) else {
            tracing::warn!(
                "No latest version for {} and no resolution failure recorded; reporting it as unresolved",
                coordinate
            );
            classification
                .unresolved
                .insert(coordinate.clone(), MISSING_LATEST_REASON.to_string());
            continue;
        };

        tracing::debug!(
            "Comparing dependency (current: {}, latest: {})",
            coordinate,
            latest_coordinate.version
        );
        let bucket = match compare_versions(&coordinate.version, &latest_coordinate.version) {
            Ordering::Less => &mut classification.upgrade,
            Ordering::Equal => &mut classification.up_to_date,
            Ordering::Greater => &mut classification.downgrade,
        };
        bucket.insert(coordinate.clone());
    }

    classification
}

/// Classifier input gathered from dependency statuses.
#[derive(Debug, Clone, Default)]
pub struct VersionMapping {
    pub current: BTreeSet<Coordinate>,
    pub latest: BTreeMap<Key, Coordinate>,
    pub unresolved: BTreeMap<Key, String>,
    pub project_urls: BTreeMap<Key, String>,
}

impl VersionMapping {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = DependencyStatus>,
    {
        let admitted = admit_statuses(statuses);

        let mut mapping = VersionMapping::default();
        let mut latest = BTreeSet::new();
        for status in &admitted {
            mapping.current.insert(status.coordinate().clone());
            match status {
                DependencyStatus::Resolved { project_url, .. } => {
                    if let Some(coordinate) = status.latest_coordinate() {
                        latest.insert(coordinate);
                    }
                    if let Some(url) = project_url.as_ref().filter(|url| !url.is_empty()) {
                        mapping
                            .project_urls
                            .insert(status.coordinate().key(), url.clone());
                    }
                }
                DependencyStatus::Unresolved { coordinate, reason } => {
                    mapping.unresolved.insert(coordinate.key(), reason.clone());
                }
            }
        }
        // Sorted insertion: on a key clash the highest latest coordinate wins.
        for coordinate in latest {
            mapping.latest.insert(coordinate.key(), coordinate);
        }
        mapping
    }

    pub fn classify(&self) -> Classification {
        classify(&self.current, &self.latest, &self.unresolved)
    }
}

/// Keeps one status per key unless several carry concrete versions. A status
/// with a concrete version evicts an earlier undeclared (`none`) one.
fn admit_statuses<I>(statuses: I) -> Vec<DependencyStatus>
where
    I: IntoIterator<Item = DependencyStatus>,
{
    let mut admitted: Vec<DependencyStatus> = Vec::new();
    for status in statuses {
        let key = status.coordinate().key();
        let key_known = admitted
            .iter()
            .any(|known| known.coordinate().key() == key);
        if !key_known {
            admitted.push(status);
            continue;
        }
        let duplicate = admitted
            .iter()
            .any(|known| known.coordinate() == status.coordinate());
        if status.coordinate().is_undeclared() || duplicate {
            continue;
        }
        admitted.retain(|known| {
            !(known.coordinate().key() == key && known.coordinate().is_undeclared())
        });
        admitted.push(status);
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(coordinates: &[Coordinate]) -> BTreeSet<Coordinate> {
        coordinates.iter().cloned().collect()
    }

    fn latest(entries: &[(&str, &str, &str)]) -> BTreeMap<Key, Coordinate> {
        entries
            .iter()
            .map(|(g, a, v)| (Key::new(*g, *a), Coordinate::of(g, a, v)))
            .collect()
    }

    #[test]
    fn older_version_is_an_upgrade() {
        let result = classify(
            &current(&[Coordinate::of("g1", "a1", "1.0")]),
            &latest(&[("g1", "a1", "2.0")]),
            &BTreeMap::new(),
        );
        assert_eq!(result.upgrade, current(&[Coordinate::of("g1", "a1", "1.0")]));
        assert!(result.up_to_date.is_empty());
        assert!(result.downgrade.is_empty());
    }

    #[test]
    fn newer_version_exceeds_latest() {
        let result = classify(
            &current(&[Coordinate::of("g1", "a1", "3.0")]),
            &latest(&[("g1", "a1", "2.0")]),
            &BTreeMap::new(),
        );
        assert_eq!(result.downgrade, current(&[Coordinate::of("g1", "a1", "3.0")]));
        assert!(result.upgrade.is_empty());
    }

    #[test]
    fn equal_versions_are_up_to_date() {
        let result = classify(
            &current(&[
                Coordinate::of("g1", "a1", "2.0"),
                Coordinate::of("g2", "a2", "1.0rc1"),
            ]),
            &latest(&[("g1", "a1", "2.0"), ("g2", "a2", "1.0-rc-1")]),
            &BTreeMap::new(),
        );
        assert_eq!(result.up_to_date.len(), 2);
        assert_eq!(result.classified_count(), 2);
    }

    #[test]
    fn undeclared_versions_are_never_compared() {
        let result = classify(
            &current(&[Coordinate::new(Some("g1"), Some("a1"), None)]),
            &latest(&[("g1", "a1", "none")]),
            &BTreeMap::new(),
        );
        assert_eq!(result.undeclared.len(), 1);
        assert!(result.upgrade.is_empty());
        assert!(result.downgrade.is_empty());
        assert!(result.up_to_date.is_empty());
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn unresolved_key_wins_over_latest_entry() {
        let mut unresolved = BTreeMap::new();
        unresolved.insert(Key::new("g1", "a1"), "Could not resolve g1:a1:+".to_string());

        let result = classify(
            &current(&[Coordinate::of("g1", "a1", "1.0")]),
            &latest(&[("g1", "a1", "2.0")]),
            &unresolved,
        );
        assert_eq!(
            result.unresolved.get(&Coordinate::of("g1", "a1", "1.0")).map(String::as_str),
            Some("Could not resolve g1:a1:+")
        );
        assert!(result.upgrade.is_empty());
    }

    #[test]
    fn missing_latest_falls_back_to_unresolved() {
        let result = classify(
            &current(&[Coordinate::of("g1", "a1", "1.0")]),
            &BTreeMap::new(),
            &BTreeMap::new(),
        );
        assert_eq!(
            result.unresolved.get(&Coordinate::of("g1", "a1", "1.0")).map(String::as_str),
            Some(MISSING_LATEST_REASON)
        );
    }

    #[test]
    fn every_coordinate_lands_in_exactly_one_bucket() {
        let mut unresolved = BTreeMap::new();
        unresolved.insert(Key::new("g", "broken"), "timeout".to_string());
        let declared = current(&[
            Coordinate::of("g", "old", "1.0"),
            Coordinate::of("g", "same", "1.0"),
            Coordinate::of("g", "ahead", "9.0"),
            Coordinate::new(Some("g"), Some("bare"), None),
            Coordinate::of("g", "broken", "1.0"),
            Coordinate::of("g", "orphan", "1.0"),
        ]);
        let result = classify(
            &declared,
            &latest(&[
                ("g", "old", "2.0"),
                ("g", "same", "1.0"),
                ("g", "ahead", "2.0"),
                ("g", "bare", "none"),
            ]),
            &unresolved,
        );

        assert_eq!(result.classified_count(), declared.len());
        for coordinate in &declared {
            let hits = [
                result.up_to_date.contains(coordinate),
                result.upgrade.contains(coordinate),
                result.downgrade.contains(coordinate),
                result.undeclared.contains(coordinate),
                result.unresolved.contains_key(coordinate),
            ]
            .iter()
            .filter(|hit| **hit)
            .count();
            assert_eq!(hits, 1, "{coordinate} classified {hits} times");
        }
    }

    #[test]
    fn concrete_status_replaces_undeclared_one() {
        let mapping = VersionMapping::from_statuses(vec![
            DependencyStatus::resolved(Coordinate::new(Some("g"), Some("a"), None), "none", None),
            DependencyStatus::resolved(Coordinate::of("g", "a", "1.0"), "2.0", None),
            DependencyStatus::resolved(Coordinate::new(Some("g"), Some("a"), None), "none", None),
        ]);
        assert_eq!(mapping.current, current(&[Coordinate::of("g", "a", "1.0")]));
    }

    #[test]
    fn keeps_every_concrete_version_of_a_key() {
        let mapping = VersionMapping::from_statuses(vec![
            DependencyStatus::resolved(Coordinate::of("g", "a", "1.0"), "2.0", None),
            DependencyStatus::resolved(Coordinate::of("g", "a", "1.5"), "2.0", None),
            DependencyStatus::resolved(Coordinate::of("g", "a", "1.0"), "2.0", None),
        ]);
        assert_eq!(mapping.current.len(), 2);

        let result = mapping.classify();
        assert_eq!(result.upgrade.len(), 2);
    }

    #[test]
    fn collects_unresolved_reasons_and_project_urls() {
        let mapping = VersionMapping::from_statuses(vec![
            DependencyStatus::resolved(
                Coordinate::of("g", "a", "1.0"),
                "1.0",
                Some("https://example.org/a".into()),
            ),
            DependencyStatus::resolved(Coordinate::of("g", "b", "1.0"), "1.1", Some(String::new())),
            DependencyStatus::unresolved(Coordinate::of("g", "c", "1.0"), "not found"),
        ]);

        assert_eq!(
            mapping.project_urls.get(&Key::new("g", "a")).map(String::as_str),
            Some("https://example.org/a")
        );
        assert!(!mapping.project_urls.contains_key(&Key::new("g", "b")));
        assert_eq!(
            mapping.unresolved.get(&Key::new("g", "c")).map(String::as_str),
            Some("not found")
        );
        assert!(!mapping.latest.contains_key(&Key::new("g", "c")));
    }
}
