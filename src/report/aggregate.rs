use super::keys::suffixed_keys;
use super::result::{
    DependenciesGroup, Dependency, DependencyLatest, DependencyOutdated, DependencyUnresolved,
    ReportResult, VersionAvailable,
};
use crate::classify::Classification;
use crate::gradle::GradleUpdateResults;
use crate::model::{Coordinate, Key};
use crate::version::RevisionLevel;
use std::collections::BTreeMap;

/// Builds the report tree out of a classification.
///
/// Duplicate keys within a bucket are kept apart with `[N]` suffixes. Entries
/// are displayed and looked up under their coordinate's own name, so an
/// artifact whose real name ends in `[N]` keeps it.
pub fn aggregate(
    classification: &Classification,
    project_urls: &BTreeMap<Key, String>,
    gradle: GradleUpdateResults,
    revision: RevisionLevel,
) -> ReportResult {
    let entry = |coordinate: &Coordinate| {
        Dependency {
            project_url: project_urls.get(&coordinate.key()).cloned(),
            group: coordinate.group.clone(),
            name: coordinate.artifact.clone(),
            version: Some(coordinate.version.clone()),
            user_reason: coordinate.user_reason.clone(),
        }
    };
    let latest_version = |coordinate: &Coordinate| {
        classification
            .latest
            .get(&coordinate.key())
            .map(|latest| latest.version.clone())
    };

    let current: Vec<Dependency> = suffixed_keys(&classification.up_to_date)
        .values()
        .map(entry)
        .collect();

    let outdated: Vec<DependencyOutdated> = suffixed_keys(&classification.upgrade)
        .values()
        .map(|coordinate| DependencyOutdated {
            dependency: entry(coordinate),
            available: VersionAvailable::at(revision, latest_version(coordinate)),
        })
        .collect();

    let exceeded: Vec<DependencyLatest> = suffixed_keys(&classification.downgrade)
        .values()
        .map(|coordinate| DependencyLatest {
            dependency: entry(coordinate),
            latest: latest_version(coordinate).unwrap_or_default(),
        })
        .collect();

    let undeclared: Vec<Dependency> = suffixed_keys(&classification.undeclared)
        .values()
        .map(|coordinate| Dependency {
            group: coordinate.group.clone(),
            name: coordinate.artifact.clone(),
            ..Dependency::default()
        })
        .collect();

    let unresolved: Vec<DependencyUnresolved> =
        suffixed_keys(classification.unresolved.keys())
            .values()
            .map(|coordinate| DependencyUnresolved {
                dependency: entry(coordinate),
                reason: classification
                    .unresolved
                    .get(coordinate)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();

    let current = DependenciesGroup::new(current);
    let outdated = DependenciesGroup::new(outdated);
    let exceeded = DependenciesGroup::new(exceeded);
    let undeclared = DependenciesGroup::new(undeclared);
    let unresolved = DependenciesGroup::new(unresolved);

    ReportResult {
        count: current.count + outdated.count + exceeded.count + undeclared.count + unresolved.count,
        current,
        outdated,
        exceeded,
        undeclared,
        unresolved,
        gradle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{VersionMapping, classify};
    use crate::gradle::{GradleReleaseChannel, GradleStatus};
    use crate::model::DependencyStatus;
    use std::collections::BTreeSet;

    fn gradle() -> GradleUpdateResults {
        GradleUpdateResults::build(
            &GradleStatus::disabled("8.5"),
            GradleReleaseChannel::ReleaseCandidate,
        )
    }

    fn report(statuses: Vec<DependencyStatus>) -> ReportResult {
        let mapping = VersionMapping::from_statuses(statuses);
        aggregate(
            &mapping.classify(),
            &mapping.project_urls,
            gradle(),
            RevisionLevel::Milestone,
        )
    }

    #[test]
    fn outdated_dependency_carries_available_version() {
        let result = report(vec![DependencyStatus::resolved(
            Coordinate::of("g1", "a1", "1.0"),
            "2.0",
            Some("https://example.org".into()),
        )]);

        assert_eq!(result.count, 1);
        assert_eq!(result.outdated.count, 1);
        let entry = &result.outdated.dependencies[0];
        assert_eq!(entry.dependency.label(), "g1:a1");
        assert_eq!(entry.dependency.version.as_deref(), Some("1.0"));
        assert_eq!(entry.dependency.project_url.as_deref(), Some("https://example.org"));
        assert_eq!(entry.available.milestone.as_deref(), Some("2.0"));
        assert!(entry.available.release.is_none());
    }

    #[test]
    fn exceeded_dependency_carries_latest_version() {
        let result = report(vec![DependencyStatus::resolved(
            Coordinate::of("g1", "a1", "3.0"),
            "2.0",
            None,
        )]);
        assert_eq!(result.exceeded.count, 1);
        assert_eq!(result.exceeded.dependencies[0].latest, "2.0");
    }

    #[test]
    fn undeclared_entries_carry_only_group_and_name() {
        let result = report(vec![DependencyStatus::resolved(
            Coordinate::new(Some("g1"), Some("a1"), None).with_reason(Some("bom".into())),
            "none",
            Some("https://example.org".into()),
        )]);
        assert_eq!(result.undeclared.count, 1);
        assert_eq!(
            result.undeclared.dependencies[0],
            Dependency {
                group: "g1".into(),
                name: "a1".into(),
                ..Dependency::default()
            }
        );
    }

    #[test]
    fn unresolved_entries_carry_reason_and_user_reason() {
        let result = report(vec![DependencyStatus::unresolved(
            Coordinate::of("g1", "a1", "1.0").with_reason(Some("pinned".into())),
            "Could not find any version",
        )]);
        let entry = &result.unresolved.dependencies[0];
        assert_eq!(entry.reason, "Could not find any version");
        assert_eq!(entry.dependency.version.as_deref(), Some("1.0"));
        assert_eq!(entry.dependency.user_reason.as_deref(), Some("pinned"));
    }

    #[test]
    fn duplicate_keys_are_reported_under_the_plain_name() {
        let result = report(vec![
            DependencyStatus::resolved(Coordinate::of("g", "a", "1.0"), "2.0", None),
            DependencyStatus::resolved(Coordinate::of("g", "a", "1.5"), "2.0", None),
        ]);
        assert_eq!(result.outdated.count, 2);
        let versions: Vec<_> = result
            .outdated
            .dependencies
            .iter()
            .map(|entry| {
                assert_eq!(entry.dependency.name, "a");
                assert_eq!(entry.available.milestone.as_deref(), Some("2.0"));
                entry.dependency.version.clone().unwrap_or_default()
            })
            .collect();
        assert_eq!(versions, ["1.0", "1.5"]);
    }

    #[test]
    fn bracketed_artifact_names_are_kept() {
        let result = report(vec![
            DependencyStatus::resolved(
                Coordinate::of("g", "x[2]", "1.0"),
                "2.0",
                Some("https://x2.example.org".into()),
            ),
            DependencyStatus::resolved(
                Coordinate::of("g", "x", "1.0"),
                "1.0",
                Some("https://x.example.org".into()),
            ),
        ]);

        assert_eq!(result.outdated.count, 1);
        let entry = &result.outdated.dependencies[0];
        assert_eq!(entry.dependency.name, "x[2]");
        assert_eq!(entry.dependency.project_url.as_deref(), Some("https://x2.example.org"));
        assert_eq!(entry.available.milestone.as_deref(), Some("2.0"));
        assert_eq!(result.current.dependencies[0].name, "x");
        assert_eq!(
            result.current.dependencies[0].project_url.as_deref(),
            Some("https://x.example.org")
        );
    }

    #[test]
    fn count_matches_every_group() {
        let mut unresolved = BTreeMap::new();
        unresolved.insert(Key::new("g", "broken"), "timeout".to_string());
        let current: BTreeSet<Coordinate> = [
            Coordinate::of("g", "old", "1.0"),
            Coordinate::of("g", "same", "1.0"),
            Coordinate::of("g", "ahead", "9.0"),
            Coordinate::new(Some("g"), Some("bare"), None),
            Coordinate::of("g", "broken", "1.0"),
        ]
        .into_iter()
        .collect();
        let latest: BTreeMap<Key, Coordinate> = [
            Coordinate::of("g", "old", "2.0"),
            Coordinate::of("g", "same", "1.0"),
            Coordinate::of("g", "ahead", "2.0"),
            Coordinate::new(Some("g"), Some("bare"), None),
        ]
        .into_iter()
        .map(|coordinate| (coordinate.key(), coordinate))
        .collect();

        let classification = classify(&current, &latest, &unresolved);
        let result = aggregate(
            &classification,
            &BTreeMap::new(),
            gradle(),
            RevisionLevel::Release,
        );

        assert_eq!(result.count, current.len());
        assert_eq!(
            result.count,
            result.current.count
                + result.outdated.count
                + result.exceeded.count
                + result.undeclared.count
                + result.unresolved.count
        );
        for count in [
            result.current.count,
            result.outdated.count,
            result.exceeded.count,
            result.undeclared.count,
            result.unresolved.count,
        ] {
            assert_eq!(count, 1);
        }
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let result = report(Vec::new());
        assert_eq!(result.count, 0);
        assert!(result.current.is_empty());
        assert!(result.unresolved.is_empty());
    }
}
