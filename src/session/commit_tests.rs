use super::test_support::{ReadOnlyStore, session, two_glyph_surface};
use super::*;
use crate::config::EngineConfig;
use crate::geometry::FrameSize;
use crate::surface::{PNG_DATA_URI_PREFIX, RasterSurface};
use crate::training::TrainingStore;

#[test]
fn confirmed_annotations_are_registered_with_images() {
    let mut session = session(200, 100);
    let surface = two_glyph_surface();
    let ids = session.run_auto_detection(&surface).created;
    session.select_candidate(&ids[0], "あ");
    session.mark_unknown(&ids[1]);

    let report = session.commit_confirmed(&surface);

    assert_eq!(
        report,
        CommitReport {
            committed: 2,
            without_image: 0,
            failed: 0
        }
    );
    assert!(session.annotations().iter().all(|a| a.is_registered()));
    let entry = session.training().entry("あ", false).unwrap();
    assert_eq!(entry.count, 1);
    assert!(entry.samples[0].starts_with(PNG_DATA_URI_PREFIX));
    assert!(session.training().entry("？", true).is_some());
}

#[test]
fn second_commit_adds_nothing() {
    let mut session = session(200, 100);
    let surface = two_glyph_surface();
    let ids = session.run_auto_detection(&surface).created;
    session.select_candidate(&ids[0], "あ");
    session.commit_confirmed(&surface);

    let report = session.commit_confirmed(&surface);

    assert_eq!(report, CommitReport::default());
    assert_eq!(session.training().total_samples(), 1);
    assert_eq!(session.status().tone, StatusTone::Warning);
}

#[test]
fn relabel_after_commit_registers_again() {
    let mut session = session(200, 100);
    let surface = two_glyph_surface();
    let ids = session.run_auto_detection(&surface).created;
    session.select_candidate(&ids[0], "あ");
    session.commit_confirmed(&surface);

    session.set_label_from_text(&ids[0], "お");
    session.commit_confirmed(&surface);

    assert_eq!(session.training().entry("あ", false).unwrap().count, 1);
    assert_eq!(session.training().entry("お", false).unwrap().count, 1);
}

#[test]
fn missing_surface_pixels_fall_back_to_count_only() {
    let mut session = session(200, 100);
    let ids = session.run_auto_detection(&two_glyph_surface()).created;
    session.select_candidate(&ids[0], "あ");

    let report = session.commit_confirmed(&RasterSurface::new(0, 0));

    assert_eq!(report.committed, 1);
    assert_eq!(report.without_image, 1);
    let entry = session.training().entry("あ", false).unwrap();
    assert_eq!(entry.count, 1);
    assert!(entry.samples.is_empty());
}

#[test]
fn store_failure_leaves_annotation_unregistered() {
    let training = TrainingStore::open(Box::new(ReadOnlyStore));
    let mut session = AnnotationSession::new(&EngineConfig::default(), training);
    session.set_frame_size(FrameSize::new(200.0, 100.0));
    let surface = two_glyph_surface();
    let ids = session.run_auto_detection(&surface).created;
    session.select_candidate(&ids[0], "あ");

    let report = session.commit_confirmed(&surface);

    assert_eq!(report.failed, 1);
    assert_eq!(report.committed, 0);
    assert!(session.annotation(&ids[0]).unwrap().is_pending_commit());
    assert_eq!(session.status().tone, StatusTone::Error);
    assert!(session.training().is_empty());
}

#[test]
fn trained_characters_lead_new_suggestions() {
    let mut session = session(200, 100);
    let surface = two_glyph_surface();
    let ids = session.run_auto_detection(&surface).created;
    session.set_label_from_text(&ids[0], "か");
    session.set_label_from_text(&ids[1], "か");
    let report = session.commit_confirmed(&surface);

    assert_eq!(report.committed, 2);
    assert_eq!(session.training().entries().len(), 1);
    assert_eq!(session.training().entry("か", false).map(|e| e.count), Some(2));
    assert_eq!(session.candidates_for_seed(0), vec!["か", "あ", "い"]);
}
