use std::fmt;

use serde::Serialize;

use super::AnnotationSession;

/// Labels currently shown on the page, split by confirmation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecognizedText {
    /// Suggested labels not yet confirmed, in annotation order.
    pub pending: Vec<String>,
    /// Confirmed labels, with `？` for undetermined boxes.
    pub confirmed: Vec<String>,
}

impl RecognizedText {
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.confirmed.is_empty()
    }
}

impl fmt::Display for RecognizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |labels: &[String]| {
            if labels.is_empty() {
                "-".to_string()
            } else {
                labels.join("・")
            }
        };
        if self.is_empty() {
            return f.write_str("Candidates: -");
        }
        write!(
            f,
            "Candidates: {} / Confirmed: {}",
            join(&self.pending),
            join(&self.confirmed)
        )
    }
}

impl AnnotationSession {
    pub fn recognized_text(&self) -> RecognizedText {
        let mut text = RecognizedText::default();
        for annotation in &self.annotations {
            if annotation.label().is_empty() {
                continue;
            }
            if annotation.is_confirmed() {
                text.confirmed.push(annotation.label().to_string());
            } else {
                text.pending.push(annotation.label().to_string());
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_marks_missing_groups() {
        assert_eq!(RecognizedText::default().to_string(), "Candidates: -");
        let text = RecognizedText {
            pending: vec!["あ".into(), "い".into()],
            confirmed: Vec::new(),
        };
        assert_eq!(text.to_string(), "Candidates: あ・い / Confirmed: -");
    }
}
