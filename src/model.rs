//! Data model for tracked repositories
//!
//! The types here mirror the shapes exchanged with the backend process:
//! - [`Repo`] identifies a repository by hosting service, owner and name
//! - [`TrackedSetting`] is the persisted identity and preference record
//! - [`FetchedEntry`] pairs a setting with its star count snapshot

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hosting service a tracked repository belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    GitHub,
    GitLab,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::GitHub => "github",
            Provider::GitLab => "gitlab",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Some(Provider::GitHub),
            "gitlab" => Some(Provider::GitLab),
            _ => None,
        }
    }
}

/// Repository identity: hosting service + owner + name
///
/// Immutable once set on a setting. Uniqueness of owner/name pairs is not
/// enforced locally; the backend may reject duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub provider: Provider,
    pub owner: String,
    pub name: String,
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Persisted tracking record for one repository
///
/// `id` is issued once by the backend's `uuid` command and never changes.
/// `order` is a historical insertion index, not a dense rank: values are
/// never renumbered after deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedSetting {
    pub id: String,
    pub order: usize,
    pub favourite: bool,
    pub repo: Repo,
}

/// A tracked setting together with the star count snapshot the backend
/// supplied at load/refresh time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedEntry {
    pub setting: TrackedSetting,
    pub stars: u32,
}

/// Apply the display-order rule: the favourite entry (if any) first, the
/// remainder by ascending `order`. The sort is stable, so entries sharing an
/// `order` value keep their relative position.
pub fn sort_entries(entries: &mut [FetchedEntry]) {
    entries.sort_by_key(|e| (!e.setting.favourite, e.setting.order));
}
