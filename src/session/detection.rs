use tracing::info;

use super::{AnnotationSession, StatusTone};
use crate::annotation::AnnotationId;
use crate::reconcile::reconcile;
use crate::surface::RasterSurface;

/// What a detection pass changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectionReport {
    /// Annotations created for newly found ink, in creation order.
    pub created: Vec<AnnotationId>,
    /// Annotations in review that received fresh suggestions.
    pub reanalyzed: Vec<AnnotationId>,
    /// Regions skipped because an annotation already covers them.
    pub suppressed: usize,
}

impl DetectionReport {
    /// True when the pass left the annotation list untouched.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.reanalyzed.is_empty()
    }
}

impl AnnotationSession {
    /// Detect ink on `surface` and merge the result into the annotation list.
    ///
    /// New ink gets new annotations; ink already covered by a box is skipped;
    /// boxes waiting for re-analysis are re-seeded in place.
    pub fn run_auto_detection(&mut self, surface: &RasterSurface) -> DetectionReport {
        let report = self.detect_and_merge(surface);
        self.report_detection(&report);
        if !report.is_empty() {
            self.annotations_updated();
        }
        report
    }

    /// Drop every annotation and rebuild the list from a fresh detection pass.
    pub fn replace_with_detection(&mut self, surface: &RasterSurface) -> DetectionReport {
        let removed = self.annotations.len();
        self.annotations.clear();
        self.reink_target = None;
        let report = self.detect_and_merge(surface);
        self.report_detection(&report);
        if removed > 0 || !report.is_empty() {
            self.annotations_updated();
        }
        report
    }

    fn detect_and_merge(&mut self, surface: &RasterSurface) -> DetectionReport {
        let buffer = self.detection_buffer(surface);
        let regions = self.detector.detect(&buffer);
        let (width, height) = (buffer.width(), buffer.height());
        let merged = reconcile(
            &regions,
            width,
            height,
            &self.annotations,
            self.detector.settings().overlap_fraction,
        );

        let mut report = DetectionReport {
            suppressed: merged.suppressed,
            ..DetectionReport::default()
        };
        for region in &merged.novel {
            let id = self.push_annotation(region.to_normalized(width, height));
            report.created.push(id);
        }
        for id in merged.review {
            let Some(index) = self.index_of(&id) else {
                continue;
            };
            if self.reanalyze_at(index) {
                report.reanalyzed.push(id);
            }
        }
        if let Some(target) = &self.reink_target
            && report.reanalyzed.contains(target)
        {
            self.reink_target = None;
        }
        info!(
            "Detection found {} regions: {} new, {} re-analyzed, {} suppressed",
            regions.len(),
            report.created.len(),
            report.reanalyzed.len(),
            report.suppressed
        );
        report
    }

    /// Copy of the ink, scaled to the reference frame when one is set.
    fn detection_buffer(&self, surface: &RasterSurface) -> RasterSurface {
        if self.frame.is_empty() {
            return surface.snapshot();
        }
        let width = self.frame.width.round() as u32;
        let height = self.frame.height.round() as u32;
        if (width, height) == (surface.width(), surface.height()) || width == 0 || height == 0 {
            return surface.snapshot();
        }
        let mut buffer = RasterSurface::new(width, height);
        surface.mirror_into(&mut buffer);
        buffer
    }

    fn report_detection(&mut self, report: &DetectionReport) {
        if report.is_empty() && report.suppressed == 0 {
            self.set_status("No characters found on the page", StatusTone::Warning);
        } else if report.is_empty() {
            self.set_status("No new characters found", StatusTone::Info);
        } else {
            self.set_status(
                format!(
                    "{} new frames, {} re-analyzed",
                    report.created.len(),
                    report.reanalyzed.len()
                ),
                StatusTone::Info,
            );
        }
    }
}
