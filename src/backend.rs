//! Backend command interface
//!
//! The store never touches persistence or the hosting services directly; a
//! separate backend process owns both and is reachable only through the five
//! commands below. [`Backend`] is the seam the store talks through, so tests
//! can substitute a mock and the host can plug in [`crate::ipc::CommandBackend`].

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{FetchedEntry, TrackedSetting};

/// Per-entry outcome of a `read`: the backend reports each stored setting
/// either with its current star count or with a failure message.
pub type ReadResult = std::result::Result<FetchedEntry, String>;

/// Asynchronous command interface to the backend collaborator.
///
/// The outer `Result` of each method is a transport or command failure; the
/// inner results of [`Backend::read`] are per-entry failures and do not fail
/// the call as a whole.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Load all persisted settings with fresh star counts.
    async fn read(&self) -> Result<Vec<ReadResult>>;

    /// Obtain a new opaque identifier for a setting about to be created.
    async fn uuid(&self) -> Result<String>;

    /// Persist a new setting; returns the initial star count on success.
    async fn create(&self, setting: &TrackedSetting) -> Result<u32>;

    /// Persist a mutated setting (favourite/order changes).
    async fn update(&self, setting: &TrackedSetting) -> Result<()>;

    /// Remove a persisted setting.
    async fn delete(&self, setting: &TrackedSetting) -> Result<()>;
}
