//! Applies the upgrades listed in a JSON dependency report to the build
//! scripts and the version catalog.

mod build_file;
mod catalog;

pub use build_file::update_build_script;
pub use catalog::update_catalog;

use crate::report::{ReportResult, VersionAvailable};
use serde::Deserialize;
use std::fmt;

/// Which upgrades from a report may be applied.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct UpdateRules {
    /// Apply upgrades that change the first version part.
    pub allow_major: bool,
    /// Apply upgrades that change the second version part.
    pub allow_minor: bool,
    pub ignored_groups: Vec<String>,
}

impl Default for UpdateRules {
    fn default() -> Self {
        Self {
            allow_major: false,
            allow_minor: true,
            ignored_groups: Vec::new(),
        }
    }
}

impl UpdateRules {
    fn ignores(&self, group: &str) -> bool {
        self.ignored_groups.iter().any(|ignored| ignored == group)
    }

    fn permits(&self, kind: UpgradeKind) -> bool {
        match kind {
            UpgradeKind::Major => self.allow_major,
            UpgradeKind::Minor => self.allow_minor,
            UpgradeKind::Patch => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpgradeKind {
    Major,
    Minor,
    Patch,
}

impl UpgradeKind {
    /// Compares the first two dot-separated parts.
    fn between(from: &str, to: &str) -> Self {
        let mut from = from.split('.');
        let mut to = to.split('.');
        if from.next() != to.next() {
            UpgradeKind::Major
        } else if from.next() != to.next() {
            UpgradeKind::Minor
        } else {
            UpgradeKind::Patch
        }
    }
}

/// One dependency to move from its declared version to a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub group: String,
    pub name: String,
    pub from: String,
    pub to: String,
}

impl PlannedUpdate {
    pub fn new(group: &str, name: &str, from: &str, to: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// `group:name`
    pub fn module(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }

    fn is_module(&self, group: &str, name: &str) -> bool {
        self.group == group && self.name == name
    }
}

impl fmt::Display for PlannedUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {} -> {}", self.group, self.name, self.from, self.to)
    }
}

/// The newest version the report offers, whichever revision level it was
/// found at.
fn available_version(available: &VersionAvailable) -> Option<&str> {
    available
        .release
        .as_deref()
        .or(available.milestone.as_deref())
        .or(available.integration.as_deref())
}

/// Picks the outdated dependencies of `report` that `rules` let through.
pub fn plan_updates(report: &ReportResult, rules: &UpdateRules) -> Vec<PlannedUpdate> {
    report
        .outdated
        .dependencies
        .iter()
        .filter_map(|entry| {
            let dependency = &entry.dependency;
            if rules.ignores(&dependency.group) {
                tracing::debug!("Skipping {}: group is ignored", dependency.label());
                return None;
            }
            let from = dependency.version.as_deref()?;
            let to = available_version(&entry.available)?;
            let kind = UpgradeKind::between(from, to);
            if !rules.permits(kind) {
                tracing::debug!(
                    "Skipping {} {} -> {}: {:?} upgrades are not allowed",
                    dependency.label(),
                    from,
                    to,
                    kind
                );
                return None;
            }
            Some(PlannedUpdate::new(&dependency.group, &dependency.name, from, to))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{DependenciesGroup, Dependency, DependencyOutdated};
    use crate::reporter::fixtures;
    use crate::version::RevisionLevel;

    fn outdated(group: &str, name: &str, from: &str, to: &str) -> DependencyOutdated {
        DependencyOutdated {
            dependency: Dependency {
                group: group.into(),
                name: name.into(),
                version: Some(from.into()),
                ..Dependency::default()
            },
            available: VersionAvailable::at(RevisionLevel::Milestone, Some(to.into())),
        }
    }

    fn report(entries: Vec<DependencyOutdated>) -> ReportResult {
        ReportResult {
            outdated: DependenciesGroup::new(entries),
            ..fixtures::empty()
        }
    }

    #[test]
    fn classifies_upgrade_kinds() {
        assert_eq!(UpgradeKind::between("1.2.3", "2.0.0"), UpgradeKind::Major);
        assert_eq!(UpgradeKind::between("1.2.3", "1.3.0"), UpgradeKind::Minor);
        assert_eq!(UpgradeKind::between("1.2.3", "1.2.4"), UpgradeKind::Patch);
        assert_eq!(UpgradeKind::between("31.0-jre", "33.2.1-jre"), UpgradeKind::Major);
        assert_eq!(UpgradeKind::between("5", "5.1"), UpgradeKind::Minor);
    }

    #[test]
    fn default_rules_keep_minor_and_patch_upgrades() {
        let plan = plan_updates(
            &report(vec![
                outdated("g", "major", "1.0.0", "2.0.0"),
                outdated("g", "minor", "1.0.0", "1.1.0"),
                outdated("g", "patch", "1.0.0", "1.0.1"),
            ]),
            &UpdateRules::default(),
        );
        let names: Vec<&str> = plan.iter().map(|update| update.name.as_str()).collect();
        assert_eq!(names, ["minor", "patch"]);
        assert_eq!(plan[0], PlannedUpdate::new("g", "minor", "1.0.0", "1.1.0"));
    }

    #[test]
    fn rules_gate_major_minor_and_groups() {
        let report = report(vec![
            outdated("g", "major", "1.0.0", "2.0.0"),
            outdated("g", "minor", "1.0.0", "1.1.0"),
            outdated("org.springframework", "spring-core", "6.0.0", "6.0.1"),
        ]);
        let rules = UpdateRules {
            allow_major: true,
            allow_minor: false,
            ignored_groups: vec!["org.springframework".into()],
        };

        let plan = plan_updates(&report, &rules);
        assert_eq!(plan, [PlannedUpdate::new("g", "major", "1.0.0", "2.0.0")]);
    }

    #[test]
    fn uses_whichever_revision_slot_is_filled() {
        let mut entry = outdated("g", "a", "1.0", "1.1");
        entry.available = VersionAvailable::at(RevisionLevel::Release, Some("1.2".into()));
        let plan = plan_updates(&report(vec![entry]), &UpdateRules::default());
        assert_eq!(plan[0].to, "1.2");

        let mut entry = outdated("g", "a", "1.0", "1.1");
        entry.available = VersionAvailable::default();
        assert!(plan_updates(&report(vec![entry]), &UpdateRules::default()).is_empty());
    }

    #[test]
    fn displays_as_module_and_versions() {
        let update = PlannedUpdate::new("g", "a", "1.0", "1.1");
        assert_eq!(update.module(), "g:a");
        assert_eq!(update.to_string(), "g:a 1.0 -> 1.1");
    }
}
