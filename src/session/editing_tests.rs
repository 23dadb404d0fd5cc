use super::test_support::{RecordingObserver, session, two_glyph_surface};
use super::*;
use crate::geometry::PixelRect;
use crate::surface::{RasterSurface, Stroke, StrokeStyle};

#[test]
fn move_is_clamped_to_frame_edges() {
    let mut session = session(200, 100);
    let id = session
        .create_from_manual_frame(PixelRect::new(10.0, 10.0, 40.0, 20.0))
        .unwrap();

    assert!(session.move_annotation(&id, 1000.0, -1000.0));

    let rect = session.annotation(&id).unwrap().rect();
    assert!((rect.x() + rect.width() - 1.0).abs() < 1e-6);
    assert_eq!(rect.y(), 0.0);
    assert!((rect.width() - 0.2).abs() < 1e-6);
    assert!(!session.move_annotation(&id, 50.0, -50.0));
}

#[test]
fn move_by_pixels_scales_with_frame() {
    let mut session = session(200, 100);
    let id = session
        .create_from_manual_frame(PixelRect::new(10.0, 10.0, 20.0, 20.0))
        .unwrap();
    session.move_annotation(&id, 20.0, 10.0);
    let rect = session.annotation(&id).unwrap().rect();
    assert!((rect.x() - 0.15).abs() < 1e-6);
    assert!((rect.y() - 0.2).abs() < 1e-6);
}

#[test]
fn reink_flow_enters_review_and_reanalyzes() {
    let mut session = session(200, 100);
    let ids = session.run_auto_detection(&two_glyph_surface()).created;
    session.select_candidate(&ids[0], "あ");

    assert!(session.begin_reink_edit(&ids[0]));
    assert!(session.annotation(&ids[0]).unwrap().needs_review());
    assert_eq!(session.reink_target(), Some(&ids[0]));

    assert!(session.end_reink_edit(&ids[0]));
    let annotation = session.annotation(&ids[0]).unwrap();
    assert!(!annotation.needs_review());
    assert!(!annotation.candidates().is_empty());
    assert_eq!(session.reink_target(), None);
}

#[test]
fn reink_strokes_stay_inside_the_box() {
    let mut session = session(200, 100);
    let id = session
        .create_from_manual_frame(PixelRect::new(50.0, 20.0, 40.0, 40.0))
        .unwrap();
    let mut surface = RasterSurface::new(200, 100);
    let stroke = Stroke::from_points(
        StrokeStyle::ink([0, 0, 255], 3.0),
        [(0.0, 40.0), (199.0, 40.0)],
    );

    let painted = session.draw_reink_stroke(&id, &mut surface, &stroke);

    assert!(painted > 0);
    assert!(session.annotation(&id).unwrap().needs_review());
    assert!(surface.alpha_at(70, 40) > 0);
    assert_eq!(surface.alpha_at(30, 40), 0);
    assert_eq!(surface.alpha_at(120, 40), 0);
}

#[test]
fn delete_and_clear_notify_observers() {
    let mut session = session(200, 100);
    let ids = session.run_auto_detection(&two_glyph_surface()).created;
    let observer = RecordingObserver::default();
    session.subscribe(Box::new(observer.clone()));

    assert!(session.delete_annotation(&ids[0]));
    assert_eq!(observer.last().len(), 1);
    assert!(!session.delete_annotation(&ids[0]));

    assert_eq!(session.clear_annotations(), 1);
    assert!(observer.last().is_empty());
    assert_eq!(observer.update_count(), 3);
}

#[test]
fn new_ids_are_never_reused() {
    let mut session = session(200, 100);
    let first = session.run_auto_detection(&two_glyph_surface()).created;
    session.clear_annotations();
    let second = session.run_auto_detection(&two_glyph_surface()).created;
    assert!(first.iter().all(|id| !second.contains(id)));
}
