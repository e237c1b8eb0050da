use super::*;

#[test]
fn mode_transitions_follow_the_state_machine() {
    let mut mode = EditMode::default();
    assert!(mode.is_idle());
    mode.begin_restore().unwrap();
    assert!(mode.is_restoring());
    mode.end_restore().unwrap();
    mode.begin_drag().unwrap();
    assert!(mode.is_dragging());
    mode.end_drag().unwrap();
    assert!(mode.is_idle());
}

#[test]
fn restoring_while_dragging_is_an_error() {
    let mut mode = EditMode::default();
    mode.begin_drag().unwrap();
    let err = mode.begin_restore().unwrap_err();
    assert!(err.to_string().contains("begin restore"));
    assert!(mode.is_dragging());
}

#[test]
fn unbalanced_end_is_an_error() {
    let mut mode = EditMode::default();
    assert!(mode.end_restore().is_err());
    assert!(mode.end_drag().is_err());
    mode.begin_restore().unwrap();
    assert!(mode.begin_drag().is_err());
    assert!(mode.is_restoring());
}

#[test]
fn target_prefers_keyframe_within_tolerance() {
    let times = [0.0, 50.0, 100.0];
    assert_eq!(edit_target(50.3, &times, 0.5), Some(50.0));
    assert_eq!(edit_target(99.6, &times, 0.5), Some(100.0));
}

#[test]
fn single_keyframe_takes_every_edit() {
    assert_eq!(edit_target(80.0, &[20.0], 0.5), Some(20.0));
    assert_eq!(edit_target(0.0, &[20.0], 0.5), Some(20.0));
}

#[test]
fn outside_range_targets_the_endpoint() {
    let times = [20.0, 60.0];
    assert_eq!(edit_target(90.0, &times, 0.5), Some(60.0));
    assert_eq!(edit_target(5.0, &times, 0.5), Some(20.0));
}

#[test]
fn strictly_between_keyframes_has_no_target() {
    assert_eq!(edit_target(40.0, &[20.0, 60.0], 0.5), None);
    assert_eq!(edit_target(40.0, &[], 0.5), None);
}
