use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{AnnotationSession, InkTool, StatusTone};
use crate::annotation::Annotation;
use crate::storage::StorageError;

/// Storage key of the saved annotation set.
pub const SESSION_STORAGE_KEY: &str = "analysis-session";
/// Storage key of the selected tool.
pub const TOOL_STORAGE_KEY: &str = "analysis-mode";
pub const SESSION_SNAPSHOT_VERSION: u32 = 1;

/// Errors raised while saving or restoring a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session was built without a storage backend.
    #[error("No session storage configured")]
    NoStorage,
    /// Encoding or decoding the snapshot failed.
    #[error("Session data could not be encoded or decoded: {0}")]
    Json(#[from] serde_json::Error),
    /// The backend failed.
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),
    /// The stored snapshot uses a layout this build does not know.
    #[error("Unsupported session snapshot version {0}")]
    UnsupportedVersion(u32),
}

/// Serializable copy of the annotation list and selected tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub version: u32,
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub tool: InkTool,
}

impl AnnotationSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SESSION_SNAPSHOT_VERSION,
            annotations: self.annotations.clone(),
            tool: self.tool,
        }
    }

    /// Write the current snapshot to storage.
    pub fn save_session(&mut self) -> Result<(), SessionError> {
        let bytes = serde_json::to_vec(&self.snapshot())?;
        let storage = self.storage.as_mut().ok_or(SessionError::NoStorage)?;
        storage.set(SESSION_STORAGE_KEY, &bytes)?;
        debug!("Saved session with {} annotations", self.annotations.len());
        Ok(())
    }

    /// Replace the annotation list with the stored snapshot.
    ///
    /// Returns the number of restored annotations; nothing stored yet yields
    /// zero and leaves the session untouched. The tool saved on its own key
    /// is written on every switch, so it takes precedence over the snapshot's.
    pub fn restore_session(&mut self) -> Result<usize, SessionError> {
        let storage = self.storage.as_ref().ok_or(SessionError::NoStorage)?;
        let Some(bytes) = storage.get(SESSION_STORAGE_KEY)? else {
            return Ok(0);
        };
        let snapshot: SessionSnapshot = serde_json::from_slice(&bytes)?;
        let restored = self.apply_snapshot(snapshot)?;
        if let Some(tool) = self.load_saved_tool() {
            self.tool = tool;
        }
        Ok(restored)
    }

    /// Replace the annotation list and tool with `snapshot`.
    pub fn apply_snapshot(&mut self, snapshot: SessionSnapshot) -> Result<usize, SessionError> {
        if snapshot.version != SESSION_SNAPSHOT_VERSION {
            return Err(SessionError::UnsupportedVersion(snapshot.version));
        }
        let mut restored: Vec<Annotation> = Vec::with_capacity(snapshot.annotations.len());
        for annotation in snapshot.annotations {
            if restored.iter().any(|kept| kept.id() == annotation.id()) {
                warn!("Dropping duplicate annotation {} from snapshot", annotation.id());
                continue;
            }
            restored.push(annotation.sanitized());
        }
        let count = restored.len();
        self.annotations = restored;
        self.colors_assigned = count;
        self.reink_target = None;
        self.tool = snapshot.tool;
        info!("Restored session with {count} annotations");
        self.set_status(format!("Restored {count} frames"), StatusTone::Info);
        let views = self.views();
        for observer in &mut self.observers {
            observer.annotations_changed(&views);
        }
        Ok(count)
    }

    pub(super) fn persist_quietly(&mut self) {
        if self.storage.is_none() {
            return;
        }
        if let Err(err) = self.save_session() {
            warn!("Failed to save session: {err}");
        }
    }
}
