use super::coordinate::Coordinate;

/// The version status of a dependency.
///
/// A status is either resolved, carrying the latest version found at the
/// requested revision level, or unresolved, carrying the failure that kept
/// the lookup from producing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
    Resolved {
        coordinate: Coordinate,
        latest_version: String,
        project_url: Option<String>,
    },
    Unresolved {
        coordinate: Coordinate,
        reason: String,
    },
}

impl DependencyStatus {
    pub fn resolved(
        coordinate: Coordinate,
        latest_version: impl Into<String>,
        project_url: Option<String>,
    ) -> Self {
        Self::Resolved {
            coordinate,
            latest_version: latest_version.into(),
            project_url,
        }
    }

    pub fn unresolved(coordinate: Coordinate, reason: impl Into<String>) -> Self {
        Self::Unresolved {
            coordinate,
            reason: reason.into(),
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        match self {
            Self::Resolved { coordinate, .. } | Self::Unresolved { coordinate, .. } => coordinate,
        }
    }

    /// The declared coordinate moved to the latest version, or `None` when
    /// resolution failed.
    pub fn latest_coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Resolved {
                coordinate,
                latest_version,
                ..
            } => Some(Coordinate {
                version: latest_version.clone(),
                ..coordinate.clone()
            }),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn project_url(&self) -> Option<&str> {
        match self {
            Self::Resolved { project_url, .. } => project_url.as_deref(),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}
