//! Labeled rectangles tracking one glyph each through review and commit.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::NormalizedRect;

mod state;

pub use state::{LabelState, UNKNOWN_LABEL};

/// Upper bound on suggested characters carried by one annotation.
pub const MAX_CANDIDATES: usize = 3;

/// Stable identifier of an annotation within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationId(String);

impl AnnotationId {
    /// Create a new unique identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Rehydrate an identifier from a stored string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display colour handed out round-robin so neighbouring boxes differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationColor {
    Red,
    Orange,
    Green,
    Blue,
    Purple,
}

impl AnnotationColor {
    pub const PALETTE: [AnnotationColor; 5] = [
        Self::Red,
        Self::Orange,
        Self::Green,
        Self::Blue,
        Self::Purple,
    ];

    /// Colour for the `index`-th annotation created in a session.
    pub fn for_index(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Self::Red => "#ef4444",
            Self::Orange => "#f97316",
            Self::Green => "#22c55e",
            Self::Blue => "#3b82f6",
            Self::Purple => "#a855f7",
        }
    }
}

/// One rectangle over the reference frame plus its label workflow state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    id: AnnotationId,
    rect: NormalizedRect,
    label: String,
    state: LabelState,
    color: AnnotationColor,
}

impl Annotation {
    /// New unconfirmed annotation showing the first candidate as its pending label.
    pub fn new(rect: NormalizedRect, candidates: Vec<String>, color: AnnotationColor) -> Self {
        let candidates = trim_candidates(candidates);
        Self {
            id: AnnotationId::new(),
            rect,
            label: candidates.first().cloned().unwrap_or_default(),
            state: LabelState::Suggested { candidates },
            color,
        }
    }

    pub fn id(&self) -> &AnnotationId {
        &self.id
    }

    pub fn rect(&self) -> NormalizedRect {
        self.rect
    }

    /// Displayed label; empty while in review.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> &LabelState {
        &self.state
    }

    pub fn color(&self) -> AnnotationColor {
        self.color
    }

    pub fn candidates(&self) -> &[String] {
        self.state.candidates()
    }

    pub fn is_confirmed(&self) -> bool {
        self.state.is_confirmed()
    }

    pub fn needs_review(&self) -> bool {
        self.state.needs_review()
    }

    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }

    pub fn is_registered(&self) -> bool {
        self.state.is_registered()
    }

    /// Confirmed but not yet committed to the training store.
    pub fn is_pending_commit(&self) -> bool {
        matches!(
            self.state,
            LabelState::Confirmed {
                registered: false,
                ..
            }
        )
    }

    /// Accept one of the offered candidates. Only valid while suggestions are shown.
    pub fn choose_candidate(&mut self, candidate: &str) -> bool {
        if !self.candidates().iter().any(|c| c == candidate) {
            return false;
        }
        self.label = candidate.to_string();
        self.state = LabelState::Confirmed {
            unknown: false,
            registered: false,
        };
        true
    }

    /// Accept a typed label. Blank input is ignored.
    pub fn assign_label(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.confirm(text, false)
    }

    /// Confirm the box as undecidable.
    pub fn mark_unknown(&mut self) -> bool {
        self.confirm(UNKNOWN_LABEL, true)
    }

    /// Invalidate the label so the box can be re-inked.
    pub fn request_review(&mut self) -> bool {
        if self.needs_review() {
            return false;
        }
        self.label.clear();
        self.state = LabelState::NeedsReview;
        true
    }

    /// Leave review with fresh suggestions. Ignored outside review.
    pub fn reanalyze(&mut self, candidates: Vec<String>) -> bool {
        if !self.needs_review() {
            return false;
        }
        let candidates = trim_candidates(candidates);
        self.label = candidates.first().cloned().unwrap_or_default();
        self.state = LabelState::Suggested { candidates };
        true
    }

    /// Record that the confirmed label is now part of the training store.
    pub fn mark_registered(&mut self) -> bool {
        match &mut self.state {
            LabelState::Confirmed { registered, .. } if !*registered => {
                *registered = true;
                true
            }
            _ => false,
        }
    }

    /// Replace the geometry, e.g. after a drag.
    pub fn set_rect(&mut self, rect: NormalizedRect) {
        self.rect = rect;
    }

    fn confirm(&mut self, label: &str, unknown: bool) -> bool {
        if let LabelState::Confirmed {
            unknown: current, ..
        } = self.state
            && current == unknown
            && self.label == label
        {
            return false;
        }
        self.label = label.to_string();
        self.state = LabelState::Confirmed {
            unknown,
            registered: false,
        };
        true
    }

    /// Flattened, render-ready view.
    pub fn view(&self) -> AnnotationView {
        AnnotationView {
            id: self.id.clone(),
            x: self.rect.x(),
            y: self.rect.y(),
            width: self.rect.width(),
            height: self.rect.height(),
            char: self.label.clone(),
            candidates: self.candidates().to_vec(),
            unknown: self.is_unknown(),
            confirmed: self.is_confirmed(),
            registered: self.is_registered(),
            needs_review: self.needs_review(),
            color: self.color,
            status: self.state.status_text(&self.label),
        }
    }

    /// Re-apply invariants to an annotation read back from storage.
    pub(crate) fn sanitized(self) -> Self {
        let state = match self.state {
            LabelState::Suggested { candidates } => LabelState::Suggested {
                candidates: trim_candidates(candidates),
            },
            other => other,
        };
        let label = if state.needs_review() {
            String::new()
        } else {
            self.label
        };
        let rect = self.rect;
        Self {
            id: self.id,
            rect: NormalizedRect::new(rect.x(), rect.y(), rect.width(), rect.height()),
            label,
            state,
            color: self.color,
        }
    }
}

/// What the rendering collaborator receives for each annotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationView {
    pub id: AnnotationId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub char: String,
    pub candidates: Vec<String>,
    pub unknown: bool,
    pub confirmed: bool,
    pub registered: bool,
    pub needs_review: bool,
    pub color: AnnotationColor,
    pub status: String,
}

fn trim_candidates(mut candidates: Vec<String>) -> Vec<String> {
    candidates.truncate(MAX_CANDIDATES);
    candidates
}
