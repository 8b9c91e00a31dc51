//! Backend process adapter
//!
//! [`CommandBackend`] implements [`Backend`] by spawning the configured
//! backend command and exchanging newline-delimited JSON over its stdio.
//! One request per line, one reply per line; replies are shaped as serde's
//! external `Ok`/`Err` tagging (`{"Ok":…}` / `{"Err":"message"}`), matching
//! what the backend process emits at its command boundary.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::debug;

use crate::backend::{Backend, ReadResult};
use crate::model::TrackedSetting;

/// Wire shape of a backend request
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
enum Request<'a> {
    Read,
    Uuid,
    Create { setting: &'a TrackedSetting },
    Update { setting: &'a TrackedSetting },
    Delete { setting: &'a TrackedSetting },
}

impl Request<'_> {
    fn name(&self) -> &'static str {
        match self {
            Request::Read => "read",
            Request::Uuid => "uuid",
            Request::Create { .. } => "create",
            Request::Update { .. } => "update",
            Request::Delete { .. } => "delete",
        }
    }
}

struct Channel {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    // Kept so the child is killed when the backend is dropped
    _child: Child,
}

/// [`Backend`] implementation talking to a spawned backend process
pub struct CommandBackend {
    channel: Mutex<Channel>,
}

impl CommandBackend {
    /// Spawn the backend command with piped stdio
    pub fn spawn(program: &str, args: &[String]) -> Result<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start backend command: {}", program))?;

        let stdin = child.stdin.take().context("Backend stdin unavailable")?;
        let stdout = BufReader::new(child.stdout.take().context("Backend stdout unavailable")?);

        debug!("Backend process started: {}", program);
        Ok(Self {
            channel: Mutex::new(Channel {
                stdin,
                stdout,
                _child: child,
            }),
        })
    }

    /// Send one request line and decode the single reply line.
    ///
    /// The channel lock serializes requests; the backend never sees
    /// interleaved command bytes.
    async fn call<T: DeserializeOwned>(&self, request: &Request<'_>) -> Result<T> {
        let mut line =
            serde_json::to_string(request).context("Failed to encode backend request")?;
        line.push('\n');

        let mut channel = self.channel.lock().await;
        channel
            .stdin
            .write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to send {} request", request.name()))?;
        channel
            .stdin
            .flush()
            .await
            .context("Failed to flush backend request")?;

        let mut reply = String::new();
        let n = channel
            .stdout
            .read_line(&mut reply)
            .await
            .with_context(|| format!("Failed to read {} reply", request.name()))?;
        if n == 0 {
            bail!("Backend process closed the connection");
        }

        let outcome: std::result::Result<T, String> = serde_json::from_str(reply.trim())
            .with_context(|| format!("Malformed {} reply: {}", request.name(), reply.trim()))?;
        outcome.map_err(|message| anyhow!(message))
    }
}

#[async_trait]
impl Backend for CommandBackend {
    async fn read(&self) -> Result<Vec<ReadResult>> {
        self.call(&Request::Read).await
    }

    async fn uuid(&self) -> Result<String> {
        self.call(&Request::Uuid).await
    }

    async fn create(&self, setting: &TrackedSetting) -> Result<u32> {
        self.call(&Request::Create { setting }).await
    }

    async fn update(&self, setting: &TrackedSetting) -> Result<()> {
        self.call(&Request::Update { setting }).await
    }

    async fn delete(&self, setting: &TrackedSetting) -> Result<()> {
        self.call(&Request::Delete { setting }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FetchedEntry, Provider, Repo};
    use serde_json::json;

    fn setting() -> TrackedSetting {
        TrackedSetting {
            id: "u1".to_string(),
            order: 0,
            favourite: false,
            repo: Repo {
                provider: Provider::GitHub,
                owner: "octo".to_string(),
                name: "cat".to_string(),
            },
        }
    }

    #[test]
    fn test_bare_request_shape() {
        assert_eq!(
            serde_json::to_value(Request::Read).unwrap(),
            json!({"cmd": "read"})
        );
        assert_eq!(
            serde_json::to_value(Request::Uuid).unwrap(),
            json!({"cmd": "uuid"})
        );
    }

    #[test]
    fn test_create_request_shape() {
        let setting = setting();
        assert_eq!(
            serde_json::to_value(Request::Create { setting: &setting }).unwrap(),
            json!({
                "cmd": "create",
                "setting": {
                    "id": "u1",
                    "order": 0,
                    "favourite": false,
                    "repo": {"provider": "GitHub", "owner": "octo", "name": "cat"}
                }
            })
        );
    }

    #[test]
    fn test_reply_envelope_decoding() {
        let ok: std::result::Result<u32, String> = serde_json::from_str(r#"{"Ok":42}"#).unwrap();
        assert_eq!(ok, Ok(42));

        let err: std::result::Result<u32, String> =
            serde_json::from_str(r#"{"Err":"not resolvable"}"#).unwrap();
        assert_eq!(err, Err("not resolvable".to_string()));

        let unit: std::result::Result<(), String> = serde_json::from_str(r#"{"Ok":null}"#).unwrap();
        assert_eq!(unit, Ok(()));
    }

    #[test]
    fn test_read_reply_decoding() {
        let reply = json!({"Ok": [
            {"Ok": {"setting": serde_json::to_value(setting()).unwrap(), "stars": 3}},
            {"Err": "bad"}
        ]})
        .to_string();

        let results: std::result::Result<Vec<ReadResult>, String> =
            serde_json::from_str(&reply).unwrap();
        let results = results.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            Ok(FetchedEntry {
                setting: setting(),
                stars: 3
            })
        );
        assert_eq!(results[1], Err("bad".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_round_trip_with_scripted_backend() {
        // A backend that answers every request with a fixed uuid reply
        let script = r#"while read -r line; do echo '{"Ok":"fixed-id"}'; done"#;
        let backend =
            CommandBackend::spawn("sh", &["-c".to_string(), script.to_string()]).unwrap();

        assert_eq!(backend.uuid().await.unwrap(), "fixed-id");
        // The channel survives multiple requests
        assert_eq!(backend.uuid().await.unwrap(), "fixed-id");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_error_reply_becomes_error() {
        let script = r#"while read -r line; do echo '{"Err":"boom"}'; done"#;
        let backend =
            CommandBackend::spawn("sh", &["-c".to_string(), script.to_string()]).unwrap();

        let err = backend.uuid().await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_closed_backend_is_reported() {
        let backend = CommandBackend::spawn("true", &[]).unwrap();
        let err = backend.uuid().await.unwrap_err();
        assert!(err.to_string().contains("closed") || err.to_string().contains("uuid"));
    }
}
