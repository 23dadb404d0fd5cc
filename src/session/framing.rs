use tracing::debug;

use super::{AnnotationSession, StatusTone};
use crate::annotation::AnnotationId;
use crate::geometry::{NormalizedRect, PixelRect};

impl AnnotationSession {
    /// Create an annotation from a rectangle dragged over the frame.
    ///
    /// `rect` is in frame pixels and may have been dragged in any direction.
    /// Frames smaller than the configured minimum on either side are ignored.
    pub fn create_from_manual_frame(&mut self, rect: PixelRect) -> Option<AnnotationId> {
        if self.frame.is_empty() {
            debug!("Ignoring manual frame before the frame size is known");
            return None;
        }
        let rect = rect.normalized();
        let min = self.settings.min_frame_px;
        if !(rect.width >= min && rect.height >= min) {
            self.set_status(
                format!("Frame too small; drag at least {min:.0}px on each side"),
                StatusTone::Warning,
            );
            return None;
        }
        let normalized = NormalizedRect::from_pixel_rect(rect, self.frame);
        if normalized.is_empty() {
            self.set_status("Frame lies outside the page", StatusTone::Warning);
            return None;
        }
        let id = self.push_annotation(normalized);
        self.set_status("Frame added; pick a candidate", StatusTone::Info);
        self.annotations_updated();
        Some(id)
    }

    /// Topmost annotation under a frame-pixel point. Later annotations are
    /// drawn above earlier ones.
    pub fn annotation_at(&self, x: f32, y: f32) -> Option<&AnnotationId> {
        if self.frame.is_empty() {
            return None;
        }
        self.annotations
            .iter()
            .rev()
            .find(|annotation| annotation.rect().to_pixel_rect(self.frame).contains(x, y))
            .map(|annotation| annotation.id())
    }
}
