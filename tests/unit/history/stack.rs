use super::*;

#[test]
fn n_undos_restore_initial_state() {
    let mut h = History::default();
    let mut state = 0;
    for _ in 0..5 {
        h.record(state);
        state += 1;
    }
    while let Some(prev) = h.undo(state) {
        state = prev;
    }
    assert_eq!(state, 0);
    assert_eq!(h.redo_depth(), 5);
}

#[test]
fn redo_after_undo_restores_edit() {
    let mut h = History::default();
    h.record("a");
    let state = "b";
    let state = h.undo(state).unwrap();
    assert_eq!(state, "a");
    let state = h.redo(state).unwrap();
    assert_eq!(state, "b");
    assert!(h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn new_record_clears_redo() {
    let mut h = History::default();
    h.record(1);
    let _ = h.undo(2);
    assert!(h.can_redo());
    h.record(1);
    assert!(!h.can_redo());
}

#[test]
fn empty_stacks_are_no_ops() {
    let mut h: History<u8> = History::default();
    assert_eq!(h.undo(3), None);
    assert_eq!(h.redo(3), None);
    assert_eq!(h.redo_depth(), 0);
}

#[test]
fn limit_drops_oldest() {
    let mut h = History::new(2);
    h.record(1);
    h.record(2);
    h.record(3);
    assert_eq!(h.undo_depth(), 2);
    assert_eq!(h.undo(4), Some(3));
    assert_eq!(h.undo(3), Some(2));
    assert_eq!(h.undo(2), None);
}

#[test]
fn capped_stack_keeps_newest_steps_through_long_runs() {
    let mut h = History::new(3);
    for state in 0..1_000 {
        h.record(state);
    }
    assert_eq!(h.undo_depth(), 3);
    let mut state = 1_000;
    let mut seen = Vec::new();
    while let Some(prev) = h.undo(state) {
        seen.push(prev);
        state = prev;
    }
    assert_eq!(seen, vec![999, 998, 997]);
    while let Some(next) = h.redo(state) {
        state = next;
    }
    assert_eq!(state, 1_000);
    assert_eq!(h.undo_depth(), 3);
}

#[test]
fn reset_clears_both() {
    let mut h = History::default();
    h.record(1);
    let _ = h.undo(2);
    h.record(5);
    h.reset();
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}
