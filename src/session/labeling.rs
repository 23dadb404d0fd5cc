use rand::Rng;
use tracing::debug;

use super::{AnnotationSession, StatusTone};
use crate::annotation::AnnotationId;

/// Exclusive upper bound for re-analysis seeds.
const REANALYSIS_SEED_RANGE: u64 = 100;

impl AnnotationSession {
    /// Accept one of the annotation's offered candidates.
    pub fn select_candidate(&mut self, id: &AnnotationId, candidate: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if !self.annotations[index].choose_candidate(candidate) {
            debug!("Candidate {candidate:?} not offered by {id}");
            return false;
        }
        self.set_status(format!("Confirmed {candidate}"), StatusTone::Info);
        self.annotations_updated();
        true
    }

    /// Accept the candidate at `position` in the annotation's list.
    pub fn select_candidate_at(&mut self, id: &AnnotationId, position: usize) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let Some(candidate) = self.annotations[index].candidates().get(position).cloned() else {
            debug!("No candidate #{position} on {id}");
            return false;
        };
        self.select_candidate(id, &candidate)
    }

    /// Confirm a typed label. Surrounding whitespace is dropped and blank
    /// input is ignored.
    pub fn set_label_from_text(&mut self, id: &AnnotationId, text: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if !self.annotations[index].assign_label(text) {
            return false;
        }
        self.finish_reink_for(id);
        self.set_status(format!("Confirmed {}", text.trim()), StatusTone::Info);
        self.annotations_updated();
        true
    }

    /// Confirm the annotation as undecidable.
    pub fn mark_unknown(&mut self, id: &AnnotationId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if !self.annotations[index].mark_unknown() {
            return false;
        }
        self.finish_reink_for(id);
        self.set_status("Marked as undetermined", StatusTone::Info);
        self.annotations_updated();
        true
    }

    /// Invalidate the label so the box can be re-inked and re-analyzed.
    pub fn mark_for_review(&mut self, id: &AnnotationId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if !self.annotations[index].request_review() {
            return false;
        }
        self.set_status(
            "Rewrite the character inside the box, then re-analyze",
            StatusTone::Info,
        );
        self.annotations_updated();
        true
    }

    /// Give an annotation in review fresh suggestions.
    pub fn reanalyze(&mut self, id: &AnnotationId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if !self.reanalyze_at(index) {
            debug!("Annotation {id} is not waiting for re-analysis");
            return false;
        }
        self.finish_reink_for(id);
        self.set_status("Re-analyzed; pick a candidate", StatusTone::Info);
        self.annotations_updated();
        true
    }

    /// Re-seed one annotation in review without notifying observers.
    pub(super) fn reanalyze_at(&mut self, index: usize) -> bool {
        if !self.annotations[index].needs_review() {
            return false;
        }
        let seed = self.rng.random_range(0..REANALYSIS_SEED_RANGE);
        let candidates = self.candidates_for_seed(seed);
        self.annotations[index].reanalyze(candidates)
    }

    fn finish_reink_for(&mut self, id: &AnnotationId) {
        if self.reink_target.as_ref() == Some(id) {
            self.reink_target = None;
        }
    }
}
