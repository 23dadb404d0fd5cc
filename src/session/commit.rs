use tracing::{info, warn};

use super::{AnnotationSession, StatusTone};
use crate::surface::RasterSurface;

/// Outcome of committing confirmed annotations to the training store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Annotations now registered.
    pub committed: usize,
    /// Registered annotations whose sample image could not be captured.
    pub without_image: usize,
    /// Annotations the store refused; they stay unregistered.
    pub failed: usize,
}

impl AnnotationSession {
    /// Add every confirmed, not yet registered annotation to the training store.
    ///
    /// Each sample image is cropped from `surface`. Running this twice without
    /// new confirmations adds nothing the second time.
    pub fn commit_confirmed(&mut self, surface: &RasterSurface) -> CommitReport {
        let mut report = CommitReport::default();
        for index in 0..self.annotations.len() {
            let annotation = &self.annotations[index];
            if !annotation.is_pending_commit() {
                continue;
            }
            let label = annotation.label().to_string();
            let unknown = annotation.is_unknown();
            let sample = match surface.capture(annotation.rect()) {
                Ok(uri) => Some(uri),
                Err(err) => {
                    warn!("Sample capture failed for {}: {err}", annotation.id());
                    None
                }
            };
            let captured = sample.is_some();
            match self.training.add(&label, unknown, sample) {
                Ok(()) => {
                    self.annotations[index].mark_registered();
                    report.committed += 1;
                    if !captured {
                        report.without_image += 1;
                    }
                }
                Err(err) => {
                    warn!("Failed to register {label:?}: {err}");
                    report.failed += 1;
                }
            }
        }
        self.report_commit(report);
        if report.committed > 0 {
            info!(
                "Registered {} samples ({} without image, {} failed)",
                report.committed, report.without_image, report.failed
            );
            self.annotations_updated();
        }
        report
    }

    fn report_commit(&mut self, report: CommitReport) {
        if report.failed > 0 {
            self.set_status(
                format!(
                    "Saved {} samples; {} could not be saved",
                    report.committed, report.failed
                ),
                StatusTone::Error,
            );
        } else if report.committed == 0 {
            self.set_status("No confirmed characters to save", StatusTone::Warning);
        } else {
            self.set_status(
                format!("Saved {} characters as training data", report.committed),
                StatusTone::Info,
            );
        }
    }
}
