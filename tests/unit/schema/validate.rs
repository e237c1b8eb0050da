use super::*;
use serde_json::json;

fn snapshot_doc() -> Value {
    json!({
        "schemaVersion": "play-export-v1",
        "play": {
            "name": "Flood left",
            "entities": { "playersById": {}, "representedPlayerIds": [] },
            "timeline": { "keyframes": [0, 50], "keyframeSnapshots": {} }
        }
    })
}

fn messages(errs: &SchemaErrors) -> Vec<String> {
    errs.errors.iter().map(ToString::to_string).collect()
}

#[test]
fn well_formed_snapshot_doc_passes_shape_checks() {
    validate_snapshot_doc(&snapshot_doc()).unwrap();
}

#[test]
fn non_object_root_is_rejected() {
    let errs = validate_snapshot_doc(&json!([1, 2])).unwrap_err();
    assert_eq!(messages(&errs), vec!["$: root must be an object"]);
}

#[test]
fn version_mismatch_is_rejected() {
    let mut doc = snapshot_doc();
    doc["schemaVersion"] = json!("play-export-v0");
    let errs = validate_snapshot_doc(&doc).unwrap_err();
    assert!(messages(&errs)[0].starts_with("$.schemaVersion:"));
}

#[test]
fn snapshot_doc_errors_are_collected_with_paths() {
    let mut doc = snapshot_doc();
    doc["play"]["name"] = json!(42);
    doc["play"]["entities"]["playersById"] = json!([]);
    doc["play"]["timeline"]["keyframes"] = json!([0, "fifty"]);
    doc["play"]["timeline"]["keyframeSnapshots"] = json!([]);
    let msgs = messages(&validate_snapshot_doc(&doc).unwrap_err());
    assert_eq!(
        msgs,
        vec![
            "$.play.name: must be a string",
            "$.play.entities.playersById: must be an object, not an array",
            "$.play.timeline.keyframes[1]: keyframe time must be a finite number",
            "$.play.timeline.keyframeSnapshots: must be an object, not an array",
        ]
    );
}

#[test]
fn keyframes_must_be_an_array() {
    let mut doc = snapshot_doc();
    doc["play"]["timeline"]["keyframes"] = json!({ "0": 1 });
    let msgs = messages(&validate_snapshot_doc(&doc).unwrap_err());
    assert_eq!(msgs, vec!["$.play.timeline.keyframes: must be an array of numbers"]);
}

fn track_doc() -> Value {
    json!({
        "schemaVersion": "1.0.0",
        "play": { "name": "Sweep" },
        "items": [
            { "id": "p1", "type": "player", "x": 0, "y": 0 },
            { "id": "ball", "type": "ball", "x": 1, "y": 1 }
        ],
        "tracks": { "p1": { "keyframes": [] } },
        "timeline": { "durationMs": 1000 }
    })
}

#[test]
fn well_formed_track_doc_passes() {
    validate_track_doc(&track_doc()).unwrap();
}

#[test]
fn track_doc_reports_items_and_tracks() {
    let mut doc = track_doc();
    doc["items"][0]["type"] = json!("referee");
    doc["items"][1]["x"] = json!("left");
    doc["tracks"]["p1"]["keyframes"] = json!({});
    doc["tracks"]["p2"] = json!(3);
    let msgs = messages(&validate_track_doc(&doc).unwrap_err());
    assert_eq!(
        msgs,
        vec![
            "$.items[0].type: unknown item type \"referee\" (expected \"player\" or \"ball\")",
            "$.items[1].x: must be a number",
            "$.tracks[\"p1\"].keyframes: must be an array",
            "$.tracks[\"p2\"]: track must be an object",
        ]
    );
}

#[test]
fn track_doc_requires_items_and_tracks() {
    let doc = json!({ "schemaVersion": "1.0.0", "play": { "name": "x" }, "tracks": [] });
    let msgs = messages(&validate_track_doc(&doc).unwrap_err());
    assert_eq!(
        msgs,
        vec![
            "$.items: missing field",
            "$.tracks: must be an object, not an array",
        ]
    );
}
