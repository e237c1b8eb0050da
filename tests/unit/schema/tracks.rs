use super::*;
use serde_json::json;

fn doc(v: Value) -> TrackDoc {
    serde_json::from_value(v).unwrap()
}

#[test]
fn normalize_coerces_sorts_and_collapses() {
    let raw = vec![
        json!({ "t": 500.4, "x": 5, "y": 0 }),
        json!({ "t": "0", "x": 0, "y": 0 }),
        json!({ "t_ms": 1000, "x": 10, "y": 0 }),
        json!({ "t": 500, "x": 6, "y": 1 }),
        json!({ "t": -1, "x": 0, "y": 0 }),
        json!({ "t": "soon", "x": 0, "y": 0 }),
        json!({ "t": 200, "x": "left", "y": 0 }),
        json!(7),
    ];
    let (track, dropped) = TrackSamples::normalize(&raw);
    assert_eq!(dropped, 4);
    assert_eq!(track.times().collect::<Vec<_>>(), vec![0, 500, 1000]);
    // Duplicate 500ms entries: the later one wins.
    assert_eq!(track.value_at(500), Some(Point::new(6.0, 1.0)));
}

#[test]
fn value_at_holds_then_interpolates() {
    let track = TrackSamples::from_samples([
        (100, Point::new(0.0, 0.0)),
        (300, Point::new(20.0, 10.0)),
    ]);
    assert_eq!(track.value_at(0), Some(Point::new(0.0, 0.0)));
    assert_eq!(track.value_at(200), Some(Point::new(10.0, 5.0)));
    assert_eq!(track.value_at(900), Some(Point::new(20.0, 10.0)));
    assert_eq!(TrackSamples::default().value_at(5), None);
}

#[test]
fn two_sample_track_yields_endpoint_keyframes() {
    let d = doc(json!({
        "play": { "name": "Simple" },
        "items": [{ "id": "p1", "type": "player", "x": 0, "y": 0 }],
        "tracks": { "p1": { "keyframes": [
            { "t": 0, "x": 0, "y": 0 },
            { "t": 1000, "x": 10, "y": 0 }
        ] } },
        "timeline": { "durationMs": 1000 }
    }));
    let m = migrate_tracks(&d);
    assert_eq!(m.keyframes, vec![0.0, 100.0]);
    assert_eq!(m.snapshots["0"].player("p1").unwrap().x, 0.0);
    assert_eq!(m.snapshots["100"].player("p1").unwrap().x, 10.0);
    assert_eq!(m.playback.loop_seconds, 1.0);
    assert_eq!(m.info.name, "Simple");
}

#[test]
fn grid_is_union_of_all_tracks_and_untracked_items_hold_base() {
    let d = doc(json!({
        "play": { "name": "Union" },
        "items": [
            { "id": "b", "type": "player", "x": 0, "y": 0, "name": "Bee", "number": 4 },
            { "id": "a", "type": "player", "x": 3, "y": 3 },
            { "id": "ball", "type": "ball", "x": 50, "y": 50 }
        ],
        "tracks": {
            "a": { "keyframes": [{ "t": 250, "x": 0, "y": 0 }, { "t": 750, "x": 10, "y": 0 }] },
            "ball": { "keyframes": [{ "t": 500, "x": 60, "y": 50 }] }
        },
        "timeline": { "durationMs": 1000 }
    }));
    let m = migrate_tracks(&d);
    assert_eq!(m.keyframes, vec![0.0, 25.0, 50.0, 75.0]);

    let at_50 = &m.snapshots["50"];
    assert_eq!(at_50.represented_player_ids, vec!["a", "b"]);
    assert_eq!(at_50.player("a").unwrap().x, 5.0);
    assert_eq!(at_50.player("b").unwrap().x, 0.0);
    assert_eq!(at_50.player("b").unwrap().name, "Bee");
    assert_eq!(at_50.ball.as_ref().unwrap().x, 60.0);

    // Before the ball's only sample the value is held.
    assert_eq!(m.snapshots["0"].ball.as_ref().unwrap().x, 60.0);
}

#[test]
fn missing_duration_falls_back_to_last_sample() {
    let d = doc(json!({
        "play": { "name": "NoDuration" },
        "items": [{ "id": "p", "type": "player", "x": 0, "y": 0 }],
        "tracks": { "p": { "keyframes": [{ "t": 0, "x": 0, "y": 0 }, { "t": 4000, "x": 1, "y": 0 }] } }
    }));
    let m = migrate_tracks(&d);
    assert_eq!(m.keyframes, vec![0.0, 100.0]);
    assert_eq!(m.playback.loop_seconds, 4.0);
}

#[test]
fn no_samples_at_all_yields_single_base_keyframe() {
    let d = doc(json!({
        "play": { "name": "Static" },
        "items": [{ "id": "p", "type": "player", "x": 2, "y": 3 }],
        "tracks": {}
    }));
    let m = migrate_tracks(&d);
    assert_eq!(m.keyframes, vec![0.0]);
    assert_eq!(m.snapshots["0"].player("p").unwrap().y, 3.0);
    assert!(m.snapshots["0"].ball.is_none());
    assert_eq!(m.playback.loop_seconds, FALLBACK_DURATION_MS / 1000.0);
}

#[test]
fn only_first_ball_is_kept() {
    let d = doc(json!({
        "play": { "name": "Two balls" },
        "items": [
            { "id": "ball-a", "type": "ball", "x": 1, "y": 1 },
            { "id": "ball-b", "type": "ball", "x": 2, "y": 2 }
        ],
        "tracks": {}
    }));
    let m = migrate_tracks(&d);
    assert_eq!(m.snapshots["0"].ball.as_ref().unwrap().id, "ball-a");
}
