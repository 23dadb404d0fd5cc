use serde::{Deserialize, Serialize};

/// Label shown for annotations the user marked as undecidable.
pub const UNKNOWN_LABEL: &str = "？";

/// Where an annotation sits in the label workflow.
///
/// The flags exposed on [`super::Annotation`] are derived from this enum, so
/// `needs_review` and `confirmed` can never both hold, and `unknown` or
/// `registered` can only be set on a confirmed label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LabelState {
    /// Unlabeled, offering up to three suggested characters.
    Suggested { candidates: Vec<String> },
    /// Label invalidated while the user re-inks the box.
    NeedsReview,
    /// A label was accepted.
    Confirmed {
        unknown: bool,
        /// Set once the label has been committed to the training store.
        registered: bool,
    },
}

impl LabelState {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    pub fn needs_review(&self) -> bool {
        matches!(self, Self::NeedsReview)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Confirmed { unknown: true, .. })
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Confirmed { registered: true, .. })
    }

    pub fn candidates(&self) -> &[String] {
        match self {
            Self::Suggested { candidates } => candidates,
            _ => &[],
        }
    }

    /// Short status used by renderers.
    pub fn status_text(&self, label: &str) -> String {
        match self {
            Self::Confirmed { unknown: true, .. } => "Undetermined".to_string(),
            Self::Confirmed { .. } => format!("Confirmed: {label}"),
            Self::NeedsReview => "Waiting for re-analysis".to_string(),
            Self::Suggested { .. } => "Pick a candidate".to_string(),
        }
    }
}
