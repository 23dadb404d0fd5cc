use tracing::{debug, info};

use super::{AnnotationSession, StatusTone};
use crate::annotation::AnnotationId;
use crate::surface::{RasterSurface, Stroke};

impl AnnotationSession {
    /// Start re-inking an annotation; it enters review if it is not already there.
    pub fn begin_reink_edit(&mut self, id: &AnnotationId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.reink_target = Some(id.clone());
        if self.annotations[index].request_review() {
            self.set_status("Re-ink the character inside the box", StatusTone::Info);
            self.annotations_updated();
        }
        true
    }

    /// Paint `stroke` onto `surface`, clipped to the annotation's box.
    ///
    /// Returns the number of pixels changed. Drawing into a box that is not in
    /// review forces it into review first.
    pub fn draw_reink_stroke(
        &mut self,
        id: &AnnotationId,
        surface: &mut RasterSurface,
        stroke: &Stroke,
    ) -> usize {
        let Some(index) = self.index_of(id) else {
            return 0;
        };
        if self.annotations[index].request_review() {
            self.reink_target = Some(id.clone());
            self.annotations_updated();
        }
        let Some(clip) = self.annotations[index]
            .rect()
            .to_region(surface.width(), surface.height())
        else {
            debug!("Annotation {id} does not cover any surface pixels");
            return 0;
        };
        surface.apply_stroke_clipped(stroke, clip)
    }

    /// Finish re-inking and re-analyze the box.
    pub fn end_reink_edit(&mut self, id: &AnnotationId) -> bool {
        if self.reink_target.as_ref() == Some(id) {
            self.reink_target = None;
        }
        self.reanalyze(id)
    }

    /// Annotation currently being re-inked, if any.
    pub fn reink_target(&self) -> Option<&AnnotationId> {
        self.reink_target.as_ref()
    }

    /// Drag an annotation by a frame-pixel delta; it stops at the frame edges.
    pub fn move_annotation(&mut self, id: &AnnotationId, dx: f32, dy: f32) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if self.frame.is_empty() {
            return false;
        }
        let current = self.annotations[index].rect();
        let moved = current.translated(dx / self.frame.width, dy / self.frame.height);
        if moved == current {
            return false;
        }
        self.annotations[index].set_rect(moved);
        self.annotations_updated();
        true
    }

    pub fn delete_annotation(&mut self, id: &AnnotationId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.annotations.remove(index);
        if self.reink_target.as_ref() == Some(id) {
            self.reink_target = None;
        }
        self.set_status("Frame removed", StatusTone::Info);
        self.annotations_updated();
        true
    }

    /// Remove every annotation. Returns how many were removed.
    pub fn clear_annotations(&mut self) -> usize {
        let removed = self.annotations.len();
        self.annotations.clear();
        self.reink_target = None;
        if removed > 0 {
            info!("Cleared {removed} annotations");
        }
        self.set_status("Frames cleared", StatusTone::Idle);
        self.annotations_updated();
        removed
    }
}
