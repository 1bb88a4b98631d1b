//! Version-control provenance resolved from CI environment variables.

use chrono::{DateTime, Utc};

use crate::report::model::VersionControlDetails;

/// Checked in order; the first non-empty value names the branch.
pub const BRANCH_VARS: &[&str] = &["GITHUB_REF_NAME", "GITHUB_HEAD_REF", "GITHUB_SHA"];
pub const REPOSITORY_VAR: &str = "GITHUB_REPOSITORY";
pub const SERVER_URL_VAR: &str = "GITHUB_SERVER_URL";
pub const REVISION_VAR: &str = "GITHUB_SHA";

const DEFAULT_SERVER_URL: &str = "https://github.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// `owner/name`
    pub repository: String,
    pub repository_uri: String,
    pub branch: Option<String>,
    pub revision: Option<String>,
}

impl Provenance {
    /// Resolve provenance through `lookup`, which maps a variable name to its
    /// value. Returns `None` unless a repository is known.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let repository = first_non_empty(&lookup, &[REPOSITORY_VAR])?;
        let server =
            first_non_empty(&lookup, &[SERVER_URL_VAR]).unwrap_or_else(|| DEFAULT_SERVER_URL.into());

        Some(Self {
            repository_uri: format!("{}/{}", server.trim_end_matches('/'), repository),
            repository,
            branch: first_non_empty(&lookup, BRANCH_VARS),
            revision: first_non_empty(&lookup, &[REVISION_VAR]),
        })
    }

    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn to_sarif(&self, as_of: DateTime<Utc>) -> VersionControlDetails {
        VersionControlDetails {
            repository_uri: self.repository_uri.clone(),
            branch: self.branch.clone(),
            revision_id: self.revision.clone(),
            as_of_time_utc: as_of,
        }
    }
}

/// First of `names` whose value is present and non-empty.
pub fn first_non_empty<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(*name))
        .find(|value| !value.is_empty())
}
