use serde::{Deserialize, Serialize};

use super::AnnotationSession;

/// Severity of the latest status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusTone {
    Idle,
    Info,
    Warning,
    Error,
}

impl StatusTone {
    /// Short badge text for the tone.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

/// Latest user-facing status line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub text: String,
    pub tone: StatusTone,
}

impl SessionStatus {
    pub(crate) fn idle() -> Self {
        Self {
            text: "Draw on the page, then run detection or drag a frame.".to_string(),
            tone: StatusTone::Idle,
        }
    }
}

impl AnnotationSession {
    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub(super) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.status = SessionStatus {
            text: text.into(),
            tone,
        };
    }
}
