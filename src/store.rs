//! Repository list store
//!
//! [`RepoListStore`] owns the authoritative in-process list of tracked
//! repositories and their star count snapshots. Every user intent (load,
//! add, favourite toggle, delete) goes through it; it performs the backend
//! call, commits the invariant-preserving local mutation, and surfaces
//! failures without corrupting local state.
//!
//! Two rules shape every operation:
//!
//! - **Single writer.** All operations run under one async mutex held across
//!   every backend suspension point, so concurrent calls from the host event
//!   loop apply strictly one at a time against the shared list.
//! - **Confirm then commit.** Mutations touch the local list only after the
//!   backend has acknowledged the change. On failure the list is untouched, a
//!   transient notice is raised, and the error is returned.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::model::{sort_entries, FetchedEntry, Provider, Repo, TrackedSetting};
use crate::notify::{Notice, NoticeBoard, DEFAULT_DISMISS_AFTER};

/// Store lifecycle phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, initial load not yet performed
    Init,
    /// Last load succeeded; the list is authoritative
    Ready,
    /// Last load failed wholesale (backend `read` unreachable)
    Error(String),
}

struct Inner {
    entries: Vec<FetchedEntry>,
    phase: Phase,
    notices: NoticeBoard,
}

/// Single source of truth for the tracked repository list
pub struct RepoListStore {
    backend: Arc<dyn Backend>,
    inner: Mutex<Inner>,
}

impl RepoListStore {
    /// Create a store in the `Init` phase. The host must call [`load`] once
    /// before displaying anything.
    ///
    /// [`load`]: RepoListStore::load
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_dismiss_after(backend, DEFAULT_DISMISS_AFTER)
    }

    /// Like [`RepoListStore::new`] but with a custom notice dismiss window
    pub fn with_dismiss_after(backend: Arc<dyn Backend>, dismiss_after: Duration) -> Self {
        Self {
            backend,
            inner: Mutex::new(Inner {
                entries: Vec::new(),
                phase: Phase::Init,
                notices: NoticeBoard::new(dismiss_after),
            }),
        }
    }

    /// Load (or refresh) the list from the backend.
    ///
    /// Per-entry read failures are non-fatal: affected entries are dropped
    /// with a warning and the load proceeds with the remainder. The resulting
    /// list replaces the previous one wholesale, sorted favourite-first then
    /// by ascending order.
    pub async fn load(&self) -> Result<Vec<FetchedEntry>> {
        let mut inner = self.inner.lock().await;

        match self.backend.read().await {
            Ok(results) => {
                let mut entries = Vec::with_capacity(results.len());
                for result in results {
                    match result {
                        Ok(entry) => entries.push(entry),
                        Err(message) => {
                            warn!("Dropping unreadable entry: {}", message);
                        }
                    }
                }
                sort_entries(&mut entries);

                info!("Loaded {} tracked repositories", entries.len());
                inner.entries = entries;
                inner.phase = Phase::Ready;
                Ok(inner.entries.clone())
            }
            Err(e) => {
                inner.phase = Phase::Error(e.to_string());
                inner.notices.push(format!("Could not load repositories: {e}"));
                Err(e.context("Backend read failed"))
            }
        }
    }

    /// Track a new repository.
    ///
    /// A blank owner or name makes the whole operation a no-op (`Ok(None)`,
    /// no backend call). On success the new entry is appended to the end of
    /// the list; new entries are never favourite, so the display order is
    /// preserved without a re-sort.
    pub async fn add(
        &self,
        provider: Provider,
        owner: &str,
        name: &str,
    ) -> Result<Option<FetchedEntry>> {
        if owner.is_empty() || name.is_empty() {
            debug!("Ignoring add with blank owner or name");
            return Ok(None);
        }

        let mut inner = self.inner.lock().await;

        let id = match self.backend.uuid().await {
            Ok(id) => id,
            Err(e) => {
                inner.notices.push(format!("Could not add {owner}/{name}: {e}"));
                return Err(e.context("Backend uuid failed"));
            }
        };

        let setting = TrackedSetting {
            id,
            order: inner.entries.len(),
            favourite: false,
            repo: Repo {
                provider,
                owner: owner.to_string(),
                name: name.to_string(),
            },
        };

        match self.backend.create(&setting).await {
            Ok(stars) => {
                info!("Now tracking {} ({} stars)", setting.repo, stars);
                let entry = FetchedEntry { setting, stars };
                inner.entries.push(entry.clone());
                Ok(Some(entry))
            }
            Err(e) => {
                warn!("Backend rejected {}: {}", setting.repo, e);
                inner.notices.push(format!("Could not add {}: {e}", setting.repo));
                Err(e.context("Backend create failed"))
            }
        }
    }

    /// Flip the favourite flag of the entry with the given id.
    ///
    /// Promoting an entry demotes the current favourite (there is at most
    /// one) as part of the same operation; both sides are persisted, the
    /// demotion first so the backend never holds two favourites. An unknown
    /// id is a silent no-op. The list is not re-sorted until the next load.
    pub async fn toggle_favourite(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;

        let Some(index) = inner.entries.iter().position(|e| e.setting.id == id) else {
            debug!("toggle_favourite: id {} not in list", id);
            return Ok(());
        };

        let mut promoted = inner.entries[index].setting.clone();
        promoted.favourite = !promoted.favourite;

        let demoted_index = if promoted.favourite {
            inner
                .entries
                .iter()
                .position(|e| e.setting.favourite && e.setting.id != id)
        } else {
            None
        };

        if let Some(di) = demoted_index {
            let mut demoted = inner.entries[di].setting.clone();
            demoted.favourite = false;
            if let Err(e) = self.backend.update(&demoted).await {
                inner.notices.push(format!("Could not update {}: {e}", demoted.repo));
                return Err(e.context("Backend update failed"));
            }
        }

        if let Err(e) = self.backend.update(&promoted).await {
            // The demotion may already be persisted; the backend then holds
            // zero favourites, which keeps the invariant. The next load
            // reconciles local state.
            inner.notices.push(format!("Could not update {}: {e}", promoted.repo));
            return Err(e.context("Backend update failed"));
        }

        if let Some(di) = demoted_index {
            inner.entries[di].setting.favourite = false;
        }
        debug!(
            "{} is {} favourite",
            promoted.repo,
            if promoted.favourite { "now" } else { "no longer" }
        );
        inner.entries[index].setting = promoted;
        Ok(())
    }

    /// Stop tracking the entry with the given id.
    ///
    /// A favourite entry is demoted (and the demotion persisted) before the
    /// backend delete, so no entry is ever removed while flagged favourite.
    /// Remaining `order` values are not renumbered. An unknown id is a
    /// silent no-op.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;

        let Some(index) = inner.entries.iter().position(|e| e.setting.id == id) else {
            debug!("delete: id {} not in list", id);
            return Ok(());
        };

        if inner.entries[index].setting.favourite {
            let mut demoted = inner.entries[index].setting.clone();
            demoted.favourite = false;
            if let Err(e) = self.backend.update(&demoted).await {
                inner.notices.push(format!("Could not update {}: {e}", demoted.repo));
                return Err(e.context("Backend update failed"));
            }
            inner.entries[index].setting.favourite = false;
        }

        let setting = inner.entries[index].setting.clone();
        if let Err(e) = self.backend.delete(&setting).await {
            inner.notices.push(format!("Could not remove {}: {e}", setting.repo));
            return Err(e.context("Backend delete failed"));
        }

        info!("No longer tracking {}", setting.repo);
        inner.entries.remove(index);
        Ok(())
    }

    /// Snapshot of the current list
    pub async fn entries(&self) -> Vec<FetchedEntry> {
        self.inner.lock().await.entries.clone()
    }

    /// Current lifecycle phase
    pub async fn phase(&self) -> Phase {
        self.inner.lock().await.phase.clone()
    }

    /// Currently active (not yet auto-dismissed) notices
    pub async fn active_notices(&self) -> Vec<Notice> {
        self.inner.lock().await.notices.active()
    }

    /// Receive a copy of every notice raised from now on
    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<Notice> {
        self.inner.lock().await.notices.subscribe()
    }
}
