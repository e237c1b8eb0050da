use super::*;
use chrono::TimeZone;

#[test]
fn export_has_documented_top_level_shape() {
    let info = PlayInfo {
        name: "Horns".to_string(),
        id: "play-1".to_string(),
        ..PlayInfo::default()
    };
    let field = FieldState {
        camera: Camera {
            x: 5.0,
            y: -2.0,
            zoom: 1.5,
        },
        field_rotation: 90.0,
    };
    let mut scene = SceneSnapshot::with_default_ball();
    scene.upsert_player(PlayerToken::new("p1", 10.0, 20.0));
    let mut store = KeyframeStore::default();
    store.insert(0.0);
    store.write(0.0, scene.clone());
    let playback = PlaybackState::default();

    let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
    let doc = build_export(
        ExportInput {
            info: &info,
            field: &field,
            scene: &scene,
            store: &store,
            playback: &playback,
        },
        at,
    );
    let v = serde_json::to_value(&doc).unwrap();

    assert_eq!(v["schemaVersion"], "play-export-v1");
    assert_eq!(v["exportedAt"], "2026-03-01T12:30:00.000Z");
    assert_eq!(v["play"]["name"], "Horns");
    assert_eq!(v["play"]["canvas"]["camera"]["zoom"], 1.5);
    assert_eq!(v["play"]["canvas"]["fieldRotation"], 90.0);
    assert_eq!(v["play"]["canvas"]["coordinateSystem"], "canvas-px");
    assert_eq!(v["play"]["entities"]["playersById"]["p1"]["x"], 10.0);
    assert_eq!(v["play"]["entities"]["representedPlayerIds"][0], "p1");
    assert_eq!(v["play"]["timeline"]["keyframes"][0], 0.0);
    assert!(v["play"]["timeline"]["keyframeSnapshots"]["0"].is_object());
    assert_eq!(v["play"]["timeline"]["playback"]["loopSeconds"], 10.0);
    assert_eq!(v["play"]["meta"]["appVersion"], env!("CARGO_PKG_VERSION"));
    assert!(v["play"]["settings"]["currentPlayerColor"].is_string());
}

#[test]
fn playback_doc_sanitizes_out_of_range_values() {
    let doc = PlaybackDoc {
        time_percent: 250.0,
        speed_multiplier: 200,
        autoplay_enabled: false,
        loop_seconds: -1.0,
        selected_keyframe: None,
    };
    let state = doc.to_state();
    assert_eq!(state.time_percent, 100.0);
    assert_eq!(state.speed_multiplier, 100);
    assert_eq!(state.loop_seconds, PlaybackState::default().loop_seconds);
    assert!(!state.is_playing);
}
