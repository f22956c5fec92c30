//! List, selection and drag behavior driven through a session.

use docfuse::document::EntryId;
use docfuse::drag::DragOutcome;
use docfuse::list::Direction;
use std::collections::HashSet;

use crate::common::{png_bytes, session, source};

fn names(session: &docfuse::Session) -> Vec<String> {
    session.list().iter().map(|e| e.name().to_string()).collect()
}

#[test]
fn test_group_move_up_from_b_a_c() {
    let mut session = session();
    let ids = session.ingest([
        source("B.png", png_bytes(2, 2)),
        source("A.pdf", Vec::new()),
        source("C.pdf", Vec::new()),
    ]);
    let list = session.list_mut();
    list.toggle_select(&ids[1]);
    list.toggle_select(&ids[2]);

    assert!(list.move_entry(&ids[1], Direction::Up));
    assert_eq!(names(&session), vec!["A.pdf", "C.pdf", "B.png"]);
}

#[test]
fn test_group_stays_contiguous_and_ordered() {
    let mut session = session();
    let ids = session.ingest((0..7).map(|i| source(&format!("{i}.pdf"), Vec::new())));
    let selected: HashSet<EntryId> = [&ids[2], &ids[4], &ids[6]].into_iter().cloned().collect();

    let list = session.list_mut();
    assert!(list.move_group(&selected, Direction::Up));

    let mut positions: Vec<usize> = selected.iter().map(|id| list.index_of(id).unwrap()).collect();
    positions.sort_unstable();
    assert_eq!(positions, vec![1, 2, 3]);

    let kept: Vec<EntryId> = list.ids().into_iter().filter(|id| selected.contains(id)).collect();
    assert_eq!(kept, vec![ids[2].clone(), ids[4].clone(), ids[6].clone()]);
}

#[test]
fn test_drag_from_first_to_third_of_four() {
    let mut session = session();
    let ids = session.ingest((0..4).map(|i| source(&format!("i{i}.pdf"), Vec::new())));

    session.drag_start(ids[0].clone());
    let outcome = session.drag_end(&ids[0], Some(&ids[2]));

    assert_eq!(outcome, DragOutcome::Moved);
    assert_eq!(names(&session), vec!["i1.pdf", "i2.pdf", "i0.pdf", "i3.pdf"]);
}

#[test]
fn test_group_drag_down_lands_after_target() {
    let mut session = session();
    let ids = session.ingest((0..5).map(|i| source(&format!("{i}.pdf"), Vec::new())));
    session.list_mut().toggle_select(&ids[0]);
    session.list_mut().toggle_select(&ids[1]);

    let outcome = session.drag_end(&ids[0], Some(&ids[3]));

    assert_eq!(outcome, DragOutcome::GroupMoved);
    assert_eq!(names(&session), vec!["2.pdf", "3.pdf", "0.pdf", "1.pdf", "4.pdf"]);
}

#[test]
fn test_toggle_select_all_with_everything_selected_clears() {
    let mut session = session();
    let ids = session.ingest((0..3).map(|i| source(&format!("{i}.txt"), Vec::new())));
    let list = session.list_mut();
    for id in &ids {
        list.toggle_select(id);
    }
    assert!(list.is_all_selected());

    list.toggle_select_all();
    assert!(list.selection().is_empty());
}

#[test]
fn test_bulk_delete_always_clears_selection() {
    let mut session = session();
    let ids = session.ingest((0..4).map(|i| source(&format!("{i}.pdf"), Vec::new())));
    let list = session.list_mut();
    list.toggle_select(&ids[0]);
    list.toggle_select(&ids[3]);

    let targets: HashSet<EntryId> = [ids[1].clone()].into();
    assert_eq!(list.bulk_delete(&targets), 1);
    assert!(list.selection().is_empty());
    assert_eq!(list.len(), 3);
}

#[test]
fn test_deleting_image_releases_preview_once() {
    let mut session = session();
    let ids = session.ingest([source("photo.png", png_bytes(2, 2)), source("a.pdf", Vec::new())]);
    assert_eq!(session.previews().live_count(), 1);

    assert!(session.list_mut().delete(&ids[0]));
    assert!(!session.list_mut().delete(&ids[0]));

    assert_eq!(session.previews().live_count(), 0);
    assert_eq!(session.previews().released_count(), 1);
}

#[test]
fn test_move_up_then_down_restores_order() {
    let mut session = session();
    let ids = session.ingest((0..3).map(|i| source(&format!("{i}.pdf"), Vec::new())));
    let before = session.list().ids();

    let list = session.list_mut();
    assert!(list.move_single(&ids[2], Direction::Up));
    assert!(list.move_single(&ids[2], Direction::Down));
    assert_eq!(list.ids(), before);

    assert!(!list.move_single(&ids[0], Direction::Up));
    assert_eq!(list.ids(), before);
}

#[test]
fn test_stale_ids_are_ignored() {
    let mut session = session();
    session.ingest([source("a.pdf", Vec::new())]);
    let stale = EntryId::new("gone");

    let list = session.list_mut();
    assert!(!list.rotate(&stale));
    assert!(!list.delete(&stale));
    assert!(!list.toggle_select(&stale));
    assert!(!list.move_entry(&stale, Direction::Down));
    assert_eq!(session.drag_end(&stale, Some(&EntryId::new("e1"))), DragOutcome::Ignored);
    assert_eq!(session.list().len(), 1);
}
