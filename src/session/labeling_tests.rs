use super::test_support::{RecordingObserver, session, two_glyph_surface};
use super::*;
use crate::annotation::{AnnotationId, UNKNOWN_LABEL};

fn detected(session: &mut AnnotationSession) -> Vec<AnnotationId> {
    session.run_auto_detection(&two_glyph_surface()).created
}

fn assert_state_invariants(session: &AnnotationSession) {
    for annotation in session.annotations() {
        assert!(!(annotation.needs_review() && annotation.is_confirmed()));
        assert!(!annotation.is_unknown() || annotation.is_confirmed());
        assert!(!annotation.is_registered() || annotation.is_confirmed());
        let rect = annotation.rect();
        assert!(rect.x() >= 0.0 && rect.y() >= 0.0);
        assert!(rect.x() + rect.width() <= 1.0 + 1e-6);
        assert!(rect.y() + rect.height() <= 1.0 + 1e-6);
    }
}

#[test]
fn selecting_a_candidate_confirms_it() {
    let mut session = session(200, 100);
    let ids = detected(&mut session);

    assert!(session.select_candidate(&ids[0], "い"));

    let annotation = session.annotation(&ids[0]).unwrap();
    assert!(annotation.is_confirmed());
    assert_eq!(annotation.label(), "い");
    assert!(!session.select_candidate(&ids[0], "あ"));
    assert_state_invariants(&session);
}

#[test]
fn candidate_by_position() {
    let mut session = session(200, 100);
    let ids = detected(&mut session);
    assert!(!session.select_candidate_at(&ids[1], 7));
    assert!(session.select_candidate_at(&ids[1], 2));
    assert_eq!(session.annotation(&ids[1]).unwrap().label(), "え");
}

#[test]
fn typed_labels_are_trimmed_and_blank_ignored() {
    let mut session = session(200, 100);
    let ids = detected(&mut session);
    assert!(!session.set_label_from_text(&ids[0], "   "));
    assert!(!session.annotation(&ids[0]).unwrap().is_confirmed());
    assert!(session.set_label_from_text(&ids[0], "  漢 "));
    assert_eq!(session.annotation(&ids[0]).unwrap().label(), "漢");
}

#[test]
fn unknown_mark_uses_full_width_question_mark() {
    let mut session = session(200, 100);
    let ids = detected(&mut session);
    assert!(session.mark_unknown(&ids[0]));
    let annotation = session.annotation(&ids[0]).unwrap();
    assert!(annotation.is_unknown());
    assert_eq!(annotation.label(), UNKNOWN_LABEL);
    assert_state_invariants(&session);
}

#[test]
fn review_then_reanalyze_offers_fresh_candidates() {
    let mut session = session(200, 100);
    let ids = detected(&mut session);
    session.mark_unknown(&ids[0]);

    assert!(session.mark_for_review(&ids[0]));
    let annotation = session.annotation(&ids[0]).unwrap();
    assert!(annotation.needs_review());
    assert_eq!(annotation.label(), "");
    assert!(!annotation.is_unknown());

    assert!(session.reanalyze(&ids[0]));
    let annotation = session.annotation(&ids[0]).unwrap();
    assert!(!annotation.needs_review());
    assert_eq!(annotation.candidates().len(), 3);
    assert!(!session.reanalyze(&ids[0]));
}

#[test]
fn label_in_review_confirms_directly() {
    let mut session = session(200, 100);
    let ids = detected(&mut session);
    session.mark_for_review(&ids[0]);
    assert!(session.set_label_from_text(&ids[0], "ね"));
    assert!(session.annotation(&ids[0]).unwrap().is_confirmed());
    assert_state_invariants(&session);
}

#[test]
fn unknown_ids_are_ignored() {
    let mut session = session(200, 100);
    detected(&mut session);
    let observer = RecordingObserver::default();
    session.subscribe(Box::new(observer.clone()));
    let missing = AnnotationId::from_string("missing");

    assert!(!session.select_candidate(&missing, "あ"));
    assert!(!session.select_candidate_at(&missing, 0));
    assert!(!session.set_label_from_text(&missing, "あ"));
    assert!(!session.mark_unknown(&missing));
    assert!(!session.mark_for_review(&missing));
    assert!(!session.reanalyze(&missing));
    assert!(!session.delete_annotation(&missing));
    assert!(!session.move_annotation(&missing, 1.0, 1.0));

    assert_eq!(observer.update_count(), 1);
    assert_eq!(session.annotations().len(), 2);
}

#[test]
fn observers_see_every_label_change() {
    let mut session = session(200, 100);
    let ids = detected(&mut session);
    let observer = RecordingObserver::default();
    session.subscribe(Box::new(observer.clone()));

    session.select_candidate(&ids[0], "あ");
    session.mark_unknown(&ids[1]);

    assert_eq!(observer.update_count(), 3);
    let views = observer.last();
    assert_eq!(views.len(), 2);
    assert!(views[0].confirmed && !views[0].unknown);
    assert!(views[1].unknown);
}

#[test]
fn recognized_text_splits_pending_and_confirmed() {
    let mut session = session(200, 100);
    let ids = detected(&mut session);
    session.mark_unknown(&ids[1]);

    let text = session.recognized_text();

    assert_eq!(text.pending, vec!["あ"]);
    assert_eq!(text.confirmed, vec![UNKNOWN_LABEL]);
}

#[test]
fn random_action_sequences_keep_invariants() {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    let mut rng = StdRng::seed_from_u64(7);
    let mut session = session(200, 100);
    let ids = detected(&mut session);
    for _ in 0..200 {
        let id = &ids[rng.random_range(0..ids.len())];
        match rng.random_range(0..7) {
            0 => {
                session.select_candidate_at(id, rng.random_range(0..3));
            }
            1 => {
                session.set_label_from_text(id, "x");
            }
            2 => {
                session.mark_unknown(id);
            }
            3 => {
                session.mark_for_review(id);
            }
            4 => {
                session.reanalyze(id);
            }
            5 => {
                let (dx, dy) = (rng.random_range(-80.0..80.0), rng.random_range(-80.0..80.0));
                session.move_annotation(id, dx, dy);
            }
            _ => {
                session.begin_reink_edit(id);
            }
        }
        assert_state_invariants(&session);
    }
}
