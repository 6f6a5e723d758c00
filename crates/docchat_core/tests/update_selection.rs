use std::collections::BTreeSet;

use docchat_core::{update, AppState, Document, DocumentId, Effect, Msg, SELECTION_HINT};
use pretty_assertions::assert_eq;

fn init_logging() {
    docchat_logging::initialize_for_tests();
}

fn toggle(state: AppState, id: &str) -> AppState {
    let (state, effects) = update(state, Msg::DocumentToggled(DocumentId::from(id)));
    assert!(effects.is_empty());
    state
}

fn selected_set(state: &AppState) -> BTreeSet<String> {
    state
        .selection()
        .iter()
        .map(|id| id.as_str().to_string())
        .collect()
}

#[test]
fn started_requests_document_list() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Started);

    assert_eq!(effects, vec![Effect::FetchDocuments]);
    assert!(state.documents().is_empty());
}

#[test]
fn documents_loaded_keep_arrival_order() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::DocumentsLoaded(vec![
            Document::new("z", "zeta.pdf", Some(2)),
            Document::new("a", "alpha.pdf", None),
        ]),
    );

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    let names: Vec<_> = view.documents.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, vec!["zeta.pdf", "alpha.pdf"]);
    assert_eq!(view.documents[0].pages_label, "2 pages");
    assert_eq!(view.documents[1].pages_label, "? pages");
    assert!(view.documents.iter().all(|d| !d.selected));
}

#[test]
fn zero_page_count_is_shown_as_unknown() {
    let (state, _) = update(
        AppState::new(),
        Msg::DocumentsLoaded(vec![Document::new("d1", "scan.pdf", Some(0))]),
    );

    assert_eq!(state.view().documents[0].pages_label, "? pages");
}

#[test]
fn toggling_twice_is_a_noop() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::DocumentsLoaded(vec![Document::new("d1", "a.pdf", Some(5))]),
    );

    let state = toggle(state, "d1");
    assert!(state.is_selected(&DocumentId::from("d1")));
    assert!(state.view().documents[0].selected);

    let state = toggle(state, "d1");
    assert!(state.selection().is_empty());
}

#[test]
fn selection_matches_symmetric_difference_fold() {
    init_logging();
    let sequences: [&[&str]; 5] = [
        &["a", "b", "a", "c"],
        &["a", "a", "a"],
        &["x", "y", "z", "y", "x", "z"],
        &["d1", "d2", "d3", "d2", "d4", "d1", "d1"],
        &[],
    ];

    for sequence in sequences {
        let mut state = AppState::new();
        let mut expected = BTreeSet::new();
        for id in sequence {
            state = toggle(state, id);
            if !expected.remove(*id) {
                expected.insert(id.to_string());
            }
            assert_eq!(selected_set(&state), expected, "after toggling {id} in {sequence:?}");
        }
    }
}

#[test]
fn unknown_ids_can_be_toggled() {
    init_logging();
    let state = toggle(AppState::new(), "not-listed-yet");

    assert_eq!(state.selection(), &[DocumentId::from("not-listed-yet")]);
}

#[test]
fn selection_keeps_toggle_order() {
    init_logging();
    let state = toggle(AppState::new(), "b");
    let state = toggle(state, "a");
    let state = toggle(state, "c");
    let state = toggle(state, "a");

    assert_eq!(
        state.selection(),
        &[DocumentId::from("b"), DocumentId::from("c")]
    );
}

#[test]
fn selection_summary_and_hint_follow_selection() {
    init_logging();
    let view = AppState::new().view();
    assert_eq!(view.selection_summary, "No documents selected");
    assert_eq!(view.selection_hint, None);

    let (state, _) = update(
        AppState::new(),
        Msg::DocumentsLoaded(vec![
            Document::new("d1", "a.pdf", Some(1)),
            Document::new("d2", "b.pdf", Some(1)),
        ]),
    );
    assert_eq!(state.view().selection_hint, Some(SELECTION_HINT));

    let state = toggle(state, "d1");
    let view = state.view();
    assert_eq!(view.selection_summary, "1 document selected");
    assert_eq!(view.selection_hint, None);

    let state = toggle(state, "d2");
    assert_eq!(state.view().selection_summary, "2 documents selected");
}
