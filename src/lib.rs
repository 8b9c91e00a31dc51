//! Starboard - Desktop front-end core for tracking repository star counts
//!
//! Starboard keeps a user-chosen list of GitHub/GitLab repositories with
//! their star counts, lets the user pin at most one of them as favourite,
//! and keeps the local list consistent with an external backend process
//! that owns persistence and star retrieval.
//!
//! ## Core Pieces
//!
//! - **RepoListStore**: the authoritative in-process repository list with
//!   serialized, confirm-then-commit mutations
//! - **Backend Interface**: five asynchronous commands (`read`, `uuid`,
//!   `create`, `update`, `delete`) the backend collaborator answers
//! - **Notifications**: transient, auto-dismissing error banners for the
//!   hosting UI
//!
//! ## Modules
//!
//! - [`store`]: repository list state management
//! - [`backend`]: backend command interface
//! - [`ipc`]: backend process adapter (JSON over stdio)
//! - [`model`]: data model
//! - [`notify`]: transient notifications
//! - [`config`]: configuration management and parsing

pub mod backend;
pub mod config;
pub mod ipc;
pub mod model;
pub mod notify;
pub mod store;

pub use backend::Backend;
pub use config::Config;
pub use ipc::CommandBackend;
pub use model::{FetchedEntry, Provider, Repo, TrackedSetting};
pub use notify::Notice;
pub use store::{Phase, RepoListStore};
