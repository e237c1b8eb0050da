use super::*;

#[test]
fn player_json_uses_flat_field_names_and_defaults() {
    let p: PlayerToken = serde_json::from_str(r#"{"id":"p1","x":1.5,"y":2.0,"number":7}"#).unwrap();
    assert_eq!(p.number, PlayerNumber::from(7));
    assert_eq!(p.name, "");
    assert_eq!(p.color, DEFAULT_PLAYER_COLOR);

    let v = serde_json::to_value(&p).unwrap();
    assert_eq!(v["number"], serde_json::json!(7));
    assert_eq!(v["x"], serde_json::json!(1.5));
}

#[test]
fn player_number_accepts_text() {
    let p: PlayerToken =
        serde_json::from_str(r#"{"id":"gk","x":0,"y":0,"number":"GK"}"#).unwrap();
    assert_eq!(p.number, PlayerNumber::from("GK"));
}

#[test]
fn snapshot_json_is_camel_case() {
    let mut s = SceneSnapshot::with_default_ball();
    s.upsert_player(PlayerToken::new("p1", 1.0, 2.0));
    let v = serde_json::to_value(&s).unwrap();
    assert!(v.get("playersById").is_some());
    assert_eq!(v["representedPlayerIds"], serde_json::json!(["p1"]));
    assert_eq!(v["ball"]["id"], serde_json::json!("ball"));
}

#[test]
fn upsert_does_not_duplicate_display_order() {
    let mut s = SceneSnapshot::default();
    s.upsert_player(PlayerToken::new("a", 0.0, 0.0));
    s.upsert_player(PlayerToken::new("a", 5.0, 0.0));
    assert_eq!(s.represented_player_ids, vec!["a".to_string()]);
    assert_eq!(s.player("a").unwrap().x, 5.0);
}

#[test]
fn ordered_ids_put_represented_first_then_unlisted_records() {
    let mut s = SceneSnapshot::default();
    s.players_by_id
        .insert("z".to_string(), PlayerToken::new("z", 0.0, 0.0));
    s.players_by_id
        .insert("a".to_string(), PlayerToken::new("a", 0.0, 0.0));
    s.represented_player_ids = vec!["z".to_string(), "ghost".to_string()];
    assert_eq!(s.ordered_player_ids(), vec!["z", "ghost", "a"]);
}

#[test]
fn dedupe_keeps_first_occurrence() {
    let mut s = SceneSnapshot {
        represented_player_ids: vec!["b".into(), "a".into(), "b".into()],
        ..SceneSnapshot::default()
    };
    s.dedupe_represented();
    assert_eq!(s.represented_player_ids, vec!["b", "a"]);
}

#[test]
fn set_position_rejects_unknown_tokens() {
    let mut s = SceneSnapshot::default();
    assert!(s.set_position(&TokenRef::player("nope"), Point::new(1.0, 1.0)).is_err());
    assert!(s.set_position(&TokenRef::Ball, Point::new(1.0, 1.0)).is_err());

    let mut s = SceneSnapshot::with_default_ball();
    s.set_position(&TokenRef::Ball, Point::new(3.0, 4.0)).unwrap();
    assert_eq!(s.position_of(&TokenRef::Ball), Some(Point::new(3.0, 4.0)));
    assert!(s.set_position(&TokenRef::Ball, Point::new(f64::NAN, 0.0)).is_err());
}

#[test]
fn remove_player_clears_both_views() {
    let mut s = SceneSnapshot::default();
    s.upsert_player(PlayerToken::new("a", 0.0, 0.0));
    assert!(s.remove_player("a").is_some());
    assert!(s.represented_player_ids.is_empty());
    assert_eq!(s.player_count(), 0);
}
