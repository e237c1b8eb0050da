use super::*;

#[test]
fn settings_fill_missing_fields() {
    let s: PlaySettings = serde_json::from_str(r#"{"advancedSettings":{"grid":true}}"#).unwrap();
    assert_eq!(s.advanced_settings, serde_json::json!({"grid": true}));
    assert_eq!(s.all_players_display, serde_json::Value::Null);
    assert_eq!(s.current_player_color, DEFAULT_PLAYER_COLOR);
}

#[test]
fn settings_round_trip_unknown_shapes() {
    let raw = serde_json::json!({
        "advancedSettings": {"arrows": [1, 2, 3]},
        "allPlayersDisplay": "compact",
        "currentPlayerColor": "#ff0000",
    });
    let s: PlaySettings = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(serde_json::to_value(&s).unwrap(), raw);
}

#[test]
fn default_info_uses_canvas_coordinates() {
    let info = PlayInfo::default();
    assert_eq!(info.coordinate_system, DEFAULT_COORDINATE_SYSTEM);
    assert!(info.id.is_empty());
    assert!(info.settings.advanced_settings.is_object());
}
