//! Resume token persistence with external-change detection.
//!
//! Every operation takes the store lock, stats the state file, and rereads it
//! only when its modification time differs from the one recorded at the last
//! load or save. Mutations are written to `<file>.tmp` and renamed over the
//! target before the lock is released.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::types::{chat_key, ResumeToken};

/// Schema version written to and expected in the state file.
pub const STATE_VERSION: i64 = 1;

/// File name of the state file.
pub const STATE_FILENAME: &str = "telegram_chat_sessions_state.json";

// ─────────────────────────────────────────────
// On-disk documents
// ─────────────────────────────────────────────

/// Last known resume token for one (chat, engine) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SessionRecord {
    /// Empty string means "no session".
    resume: String,
}

/// Sessions of one chat key, by engine name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ChatRecord {
    #[serde(default)]
    sessions: BTreeMap<String, SessionRecord>,
}

/// Root document. Field order matters: `chats` serializes before `version`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    chats: BTreeMap<String, ChatRecord>,
    version: i64,
}

impl StoreFile {
    fn empty() -> Self {
        Self {
            chats: BTreeMap::new(),
            version: STATE_VERSION,
        }
    }
}

// ─────────────────────────────────────────────
// SessionStore
// ─────────────────────────────────────────────

/// State guarded by the store lock.
struct Inner {
    state: StoreFile,
    loaded: bool,
    /// Modification time seen at the last load or save; `None` if the file was missing.
    mtime: Option<SystemTime>,
}

/// Per-chat resume tokens backed by a single JSON file.
///
/// All operations are serialized through one async mutex, including the
/// reload and persist steps. Separate instances on the same path do not
/// coordinate; the last writer wins.
pub struct SessionStore {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl SessionStore {
    /// Create a store for `path`. Nothing is read until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: Mutex::new(Inner {
                state: StoreFile::empty(),
                loaded: false,
                mtime: None,
            }),
        }
    }

    /// Path of the backing state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up the resume token for `engine` in the given chat.
    ///
    /// Returns `None` when the chat, the engine entry, or a non-empty token is missing.
    pub async fn get_session_resume(
        &self,
        chat_id: i64,
        owner_id: Option<i64>,
        engine: &str,
    ) -> Result<Option<ResumeToken>> {
        let mut inner = self.inner.lock().await;
        self.reload_if_stale(&mut inner).await?;

        let token = inner
            .state
            .chats
            .get(&chat_key(chat_id, owner_id))
            .and_then(|chat| chat.sessions.get(engine))
            .filter(|entry| !entry.resume.is_empty())
            .map(|entry| ResumeToken::new(engine, entry.resume.clone()));
        Ok(token)
    }

    /// Record `token` for its engine in the given chat and persist.
    ///
    /// On `Err` the in-memory value may be ahead of the file on disk.
    pub async fn set_session_resume(
        &self,
        chat_id: i64,
        owner_id: Option<i64>,
        token: &ResumeToken,
    ) -> Result<()> {
        let mut inner = self.inner.lock().await;
        self.reload_if_stale(&mut inner).await?;

        inner
            .state
            .chats
            .entry(chat_key(chat_id, owner_id))
            .or_default()
            .sessions
            .insert(
                token.engine.clone(),
                SessionRecord {
                    resume: token.value.clone(),
                },
            );
        self.save(&mut inner).await
    }

    /// Drop every engine session of the given chat and persist.
    ///
    /// Unknown chats are left alone and nothing is written.
    pub async fn clear_sessions(&self, chat_id: i64, owner_id: Option<i64>) -> Result<()> {
        let mut inner = self.inner.lock().await;
        self.reload_if_stale(&mut inner).await?;

        let Some(chat) = inner.state.chats.get_mut(&chat_key(chat_id, owner_id)) else {
            return Ok(());
        };
        chat.sessions.clear();
        self.save(&mut inner).await
    }

    // ─────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────

    async fn stat_mtime(&self) -> Result<Option<SystemTime>> {
        let stat_err = |source: std::io::Error| StoreError::Stat {
            path: self.path.clone(),
            source,
        };
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.modified().map(Some).map_err(stat_err),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(stat_err(e)),
        }
    }

    async fn reload_if_stale(&self, inner: &mut Inner) -> Result<()> {
        let current = self.stat_mtime().await?;
        if inner.loaded && current == inner.mtime {
            return Ok(());
        }
        self.load(inner, current).await;
        Ok(())
    }

    /// Replace the in-memory state with the file content.
    ///
    /// Unreadable, malformed, or wrong-version files load as an empty store.
    async fn load(&self, inner: &mut Inner, mtime: Option<SystemTime>) {
        inner.loaded = true;
        inner.mtime = mtime;
        if mtime.is_none() {
            debug!(path = %self.path.display(), "no chat sessions file, starting empty");
            inner.state = StoreFile::empty();
            return;
        }

        match self.read_state().await {
            Ok(state) if state.version == STATE_VERSION => {
                debug!(
                    path = %self.path.display(),
                    chats = state.chats.len(),
                    "loaded chat sessions"
                );
                inner.state = state;
            }
            Ok(state) => {
                warn!(
                    path = %self.path.display(),
                    version = state.version,
                    expected = STATE_VERSION,
                    "chat_sessions.version_mismatch"
                );
                inner.state = StoreFile::empty();
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    error_kind = e.kind(),
                    "chat_sessions.load_failed"
                );
                inner.state = StoreFile::empty();
            }
        }
    }

    async fn read_state(&self) -> Result<StoreFile> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the whole state to `<file>.tmp`, then rename it over the file.
    async fn save(&self, inner: &mut Inner) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let mut json = serde_json::to_string_pretty(&inner.state).map_err(StoreError::Serialize)?;
        json.push('\n');

        let tmp_path = self.tmp_path();
        if let Err(source) = write_synced(&tmp_path, json.as_bytes()).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::Write {
                path: tmp_path,
                source,
            });
        }
        if let Err(source) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::Rename {
                from: tmp_path,
                to: self.path.clone(),
                source,
            });
        }

        // Record our own write so it is not taken for an external change.
        inner.mtime = self.saved_mtime(self.stat_mtime().await);
        debug!(
            path = %self.path.display(),
            chats = inner.state.chats.len(),
            "saved chat sessions"
        );
        Ok(())
    }

    /// Mtime to record after a completed rename.
    ///
    /// The file is already in place, so a failed stat only forces a reload
    /// on the next operation.
    fn saved_mtime(&self, stat: Result<Option<SystemTime>>) -> Option<SystemTime> {
        match stat {
            Ok(mtime) => mtime,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    error_kind = e.kind(),
                    "chat_sessions.stat_after_save_failed"
                );
                None
            }
        }
    }

    /// `state.json` -> `state.json.tmp`
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

async fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
