/// Common test utilities and helpers for Starboard tests
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use starboard::backend::{Backend, ReadResult};
use starboard::{FetchedEntry, Provider, Repo, TrackedSetting};

/// One recorded backend invocation, for asserting call order and payloads
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Read,
    Uuid,
    Create(TrackedSetting),
    Update(TrackedSetting),
    Delete(TrackedSetting),
}

#[derive(Default)]
struct State {
    read_results: Vec<ReadResult>,
    uuid_counter: u32,
    create_stars: u32,
    fail_create: bool,
    fail_update: bool,
    fail_delete: bool,
    calls: Vec<Call>,
}

/// Scripted in-memory backend.
///
/// `read` replays the configured result sequence, `uuid` hands out
/// "u1", "u2", … and every call is recorded for later inspection.
/// Individual mutating commands can be switched to failure mode.
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                create_stars: 42,
                ..State::default()
            }),
        }
    }

    /// Backend whose `read` answers with the given per-entry results
    pub fn with_read_results(results: Vec<ReadResult>) -> Self {
        let backend = Self::new();
        backend.state.lock().unwrap().read_results = results;
        backend
    }

    /// Backend whose `read` answers with the given entries, all readable
    pub fn with_entries(entries: Vec<FetchedEntry>) -> Self {
        Self::with_read_results(entries.into_iter().map(Ok).collect())
    }

    pub fn set_create_stars(&self, stars: u32) {
        self.state.lock().unwrap().create_stars = stars;
    }

    pub fn fail_create(&self) {
        self.state.lock().unwrap().fail_create = true;
    }

    pub fn fail_update(&self) {
        self.state.lock().unwrap().fail_update = true;
    }

    pub fn fail_delete(&self) {
        self.state.lock().unwrap().fail_delete = true;
    }

    /// Every backend invocation so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn read(&self) -> Result<Vec<ReadResult>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Read);
        Ok(state.read_results.clone())
    }

    async fn uuid(&self) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Uuid);
        state.uuid_counter += 1;
        Ok(format!("u{}", state.uuid_counter))
    }

    async fn create(&self, setting: &TrackedSetting) -> Result<u32> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(setting.clone()));
        if state.fail_create {
            return Err(anyhow!("repository not resolvable"));
        }
        Ok(state.create_stars)
    }

    async fn update(&self, setting: &TrackedSetting) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Update(setting.clone()));
        if state.fail_update {
            return Err(anyhow!("write failed"));
        }
        Ok(())
    }

    async fn delete(&self, setting: &TrackedSetting) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete(setting.clone()));
        if state.fail_delete {
            return Err(anyhow!("write failed"));
        }
        Ok(())
    }
}

/// A GitHub entry named after its id, for scripted read results
pub fn github_entry(id: &str, order: usize, favourite: bool, stars: u32) -> FetchedEntry {
    FetchedEntry {
        setting: TrackedSetting {
            id: id.to_string(),
            order,
            favourite,
            repo: Repo {
                provider: Provider::GitHub,
                owner: "octo".to_string(),
                name: id.to_string(),
            },
        },
        stars,
    }
}
